//! Selection state: item name -> quantity.

use indexmap::IndexMap;

/// In-memory selection state for one quote form.
///
/// Owned by the form controller and injected wherever selection state is
/// read or mutated; there is deliberately no process-wide instance. Every
/// stored entry has quantity >= 1 — removal deletes the entry outright, so
/// zero-quantity entries never persist. Iteration order is insertion order.
#[derive(Debug, Clone, Default)]
pub struct SelectionStore {
    items: IndexMap<String, u32>,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one of `name`: absent items are inserted at quantity 1,
    /// present ones are bumped. There is no decrement, only [`remove`].
    ///
    /// [`remove`]: SelectionStore::remove
    pub fn increment(&mut self, name: &str) {
        *self.items.entry(name.to_string()).or_insert(0) += 1;
    }

    /// Drop `name` entirely. No-op when absent.
    pub fn remove(&mut self, name: &str) {
        self.items.shift_remove(name);
    }

    /// Current quantity for `name`, 0 when not selected.
    pub fn quantity(&self, name: &str) -> u32 {
        self.items.get(name).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Owned copy of the mapping; callers cannot mutate the store through it.
    pub fn snapshot(&self) -> IndexMap<String, u32> {
        self.items.clone()
    }

    /// Display projection: `"Name (xN)"` when N > 1, else `"Name"`,
    /// joined by `", "`. This is what the form's selected-items field holds.
    pub fn display_string(&self) -> String {
        self.project(|name, qty| format!("{} (x{})", name, qty))
    }

    /// Compact projection: `"Name xN"` when N > 1, else `"Name"`,
    /// joined by `", "`. This is what the remote log and handoff message use.
    pub fn compact_string(&self) -> String {
        self.project(|name, qty| format!("{} x{}", name, qty))
    }

    fn project(&self, multi: impl Fn(&str, u32) -> String) -> String {
        self.items
            .iter()
            .map(|(name, &qty)| {
                if qty > 1 {
                    multi(name, qty)
                } else {
                    name.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}
