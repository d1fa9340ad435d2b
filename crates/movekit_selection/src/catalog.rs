//! Static item catalog.

use serde::{Deserialize, Serialize};

/// One selectable item: display name plus an icon identifier understood by
/// whatever front end renders the chip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub name: String,
    #[serde(default)]
    pub icon: String,
}

impl CatalogItem {
    pub fn new(name: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            icon: icon.into(),
        }
    }
}

/// Ordered list of selectable items, immutable for the session.
/// Render order is catalog order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemCatalog {
    items: Vec<CatalogItem>,
}

impl ItemCatalog {
    pub fn new(items: Vec<CatalogItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogItem> {
        self.items.iter()
    }
}

impl Default for ItemCatalog {
    /// Built-in removals catalog used when config.toml does not override it.
    fn default() -> Self {
        Self::new(vec![
            CatalogItem::new("Bed", "bed"),
            CatalogItem::new("Sofa", "sofa"),
            CatalogItem::new("Wardrobe", "cabinet"),
            CatalogItem::new("Washing Machine", "washing-machine"),
            CatalogItem::new("Fridge Freezer", "refrigerator"),
            CatalogItem::new("Dining Table", "table"),
            CatalogItem::new("Chairs", "armchair"),
            CatalogItem::new("TV", "tv"),
            CatalogItem::new("Boxes", "package"),
            CatalogItem::new("Other", "more-horizontal"),
        ])
    }
}
