//! Item catalog and selection state for the MoveKit quote form.
//!
//! The catalog defines the universe of selectable items and their render
//! order; the store tracks which of them the customer picked and how many.
//! Both string projections of the store feed the submission path, so they
//! are recomputed on demand and never cached.

mod catalog;
mod store;

pub use catalog::{CatalogItem, ItemCatalog};
pub use store::SelectionStore;
