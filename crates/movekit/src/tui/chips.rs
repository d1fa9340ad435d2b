//! The item chip row: one selectable control per catalog entry.
//!
//! Chips have no state of their own beyond the cursor — quantity and
//! selection always come from the injected [`SelectionStore`], so what is
//! rendered can never drift from what gets submitted.

use crossterm::event::{KeyCode, KeyEvent};
use movekit_selection::{ItemCatalog, SelectionStore};
use ratatui::prelude::*;

/// What a key press did to the chip row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChipEvent {
    /// Key was not for us.
    Ignored,
    /// Cursor moved; no selection change.
    Moved,
    /// Selection state changed; the selected-items field must be rewritten.
    Mutated,
}

pub struct ChipGrid {
    catalog: ItemCatalog,
    pub cursor: usize,
}

impl ChipGrid {
    pub fn new(catalog: ItemCatalog) -> Self {
        Self { catalog, cursor: 0 }
    }

    pub fn catalog(&self) -> &ItemCatalog {
        &self.catalog
    }

    fn cursor_item(&self) -> Option<&str> {
        self.catalog
            .items()
            .get(self.cursor)
            .map(|item| item.name.as_str())
    }

    /// Handle a key while the chip row has focus. Activation (Enter/Space)
    /// increments; the removal keys (`x`, Backspace, Delete) clear the item
    /// outright. The two never overlap, so a removal can never count as an
    /// activation.
    pub fn handle_key(&mut self, key: KeyEvent, store: &mut SelectionStore) -> ChipEvent {
        if self.catalog.is_empty() {
            return ChipEvent::Ignored;
        }
        match key.code {
            KeyCode::Left => {
                self.cursor = self.cursor.checked_sub(1).unwrap_or(self.catalog.len() - 1);
                ChipEvent::Moved
            }
            KeyCode::Right => {
                self.cursor = (self.cursor + 1) % self.catalog.len();
                ChipEvent::Moved
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(name) = self.cursor_item() {
                    let name = name.to_string();
                    store.increment(&name);
                    return ChipEvent::Mutated;
                }
                ChipEvent::Ignored
            }
            KeyCode::Char('x') | KeyCode::Char('X') | KeyCode::Backspace | KeyCode::Delete => {
                if let Some(name) = self.cursor_item() {
                    let name = name.to_string();
                    store.remove(&name);
                    return ChipEvent::Mutated;
                }
                ChipEvent::Ignored
            }
            _ => ChipEvent::Ignored,
        }
    }

    /// Render the chips as one wrappable line of spans.
    pub fn spans(&self, store: &SelectionStore, focused: bool) -> Line<'static> {
        let mut spans: Vec<Span<'static>> = Vec::new();
        for (index, item) in self.catalog.iter().enumerate() {
            if index > 0 {
                spans.push(Span::raw(" "));
            }
            let quantity = store.quantity(&item.name);
            let label = chip_label(&item.name, quantity);
            let mut style = if quantity > 0 {
                Style::default().fg(Color::White).bg(Color::Blue)
            } else {
                Style::default().fg(Color::Gray)
            };
            if focused && index == self.cursor {
                style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
            }
            spans.push(Span::styled(label, style));
        }
        Line::from(spans)
    }
}

/// Chip text: `[ Bed ]` unselected, `[ Bed (x2) ✕ ]` selected — the `✕`
/// marker appears the moment quantity goes 0 -> 1, matching the removal
/// affordance on the web form.
fn chip_label(name: &str, quantity: u32) -> String {
    match quantity {
        0 => format!("[ {} ]", name),
        1 => format!("[ {} ✕ ]", name),
        n => format!("[ {} (x{}) ✕ ]", name, n),
    }
}
