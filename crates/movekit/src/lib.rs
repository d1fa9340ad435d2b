//! MoveKit: terminal quote-capture form for a removals business.
//!
//! The binary wires three things together: an interactive TUI form with
//! item chips, a webhook sink that logs each submission, and a WhatsApp
//! deep-link handoff. The submission flow itself lives in [`submit`] and is
//! fully usable without the TUI, which is how the tests drive it.

pub mod config;
pub mod submit;
pub mod tui;
