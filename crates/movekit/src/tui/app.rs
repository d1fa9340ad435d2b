//! TUI application state and key handling.

use crate::config::MoveKitConfig;
use crate::submit::{SubmissionController, SubmissionOutcome, SubmissionPhase};
use crate::tui::chips::{ChipEvent, ChipGrid};
use crate::tui::form::FormState;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use movekit_handoff::HandoffOpener;
use movekit_protocol::FormSource;
use movekit_selection::SelectionStore;
use std::sync::Arc;
use tracing::warn;

/// Which screen is showing. `Confirmed` is terminal: the form cannot be
/// resubmitted without restarting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Form,
    Confirmed,
}

/// What currently has focus on the form screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Chips,
    Field(usize),
    Submit,
}

pub struct App {
    pub running: bool,
    pub screen: Screen,
    pub focus: Focus,
    pub store: SelectionStore,
    pub chips: ChipGrid,
    pub form: FormState,
    pub outcome: Option<SubmissionOutcome>,
    controller: SubmissionController,
    opener: Option<Arc<dyn HandoffOpener>>,
}

impl App {
    pub fn new(
        config: &MoveKitConfig,
        source: FormSource,
        opener: Option<Arc<dyn HandoffOpener>>,
    ) -> Self {
        Self {
            running: true,
            screen: Screen::Form,
            focus: Focus::Chips,
            store: SelectionStore::new(),
            chips: ChipGrid::new(config.catalog()),
            form: FormState::new(source),
            outcome: None,
            controller: SubmissionController::new(config, opener.clone()),
            opener,
        }
    }

    /// Suppress the delayed automatic open; the `W` key fallback stays
    /// available.
    pub fn with_auto_open(mut self, auto_open: bool) -> Self {
        self.controller = self.controller.with_auto_open(auto_open);
        self
    }

    /// Whether a system opener is wired up at all. When it is not, the
    /// confirmation screen shows the handoff link for copy-paste instead
    /// of advertising a dead `W` binding.
    pub fn can_open(&self) -> bool {
        self.opener.is_some()
    }

    /// True while a submission is in flight; the submit control is treated
    /// as disabled for the duration.
    pub fn submitting(&self) -> bool {
        !matches!(
            self.controller.phase(),
            SubmissionPhase::Idle | SubmissionPhase::Confirmed
        )
    }

    pub async fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.running = false;
            return;
        }
        match self.screen {
            Screen::Form => self.handle_form_key(key).await,
            Screen::Confirmed => self.handle_confirmed_key(key),
        }
    }

    async fn handle_form_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.running = false;
                return;
            }
            KeyCode::Tab => {
                self.focus = self.next_focus();
                return;
            }
            KeyCode::BackTab => {
                self.focus = self.prev_focus();
                return;
            }
            _ => {}
        }

        match self.focus {
            Focus::Chips => {
                if self.chips.handle_key(key, &mut self.store) == ChipEvent::Mutated {
                    // Hidden-field contract: rewrite on every selection change.
                    self.form.set_selected_items(self.store.display_string());
                }
            }
            Focus::Field(index) => match key.code {
                KeyCode::Char(c) => {
                    if let Some(field) = self.form.fields.get_mut(index) {
                        field.value.push(c);
                    }
                }
                KeyCode::Backspace => {
                    if let Some(field) = self.form.fields.get_mut(index) {
                        field.value.pop();
                    }
                }
                _ => {}
            },
            Focus::Submit => {
                if key.code == KeyCode::Enter {
                    self.submit().await;
                }
            }
        }
    }

    fn handle_confirmed_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Char('w') | KeyCode::Char('W') => self.open_manual_handoff(),
            _ => {}
        }
    }

    /// Manual fallback: open the handoff link on demand from the
    /// confirmation screen.
    fn open_manual_handoff(&self) {
        let Some(opener) = self.opener.as_ref() else {
            return;
        };
        let manual = self
            .outcome
            .as_ref()
            .and_then(|outcome| outcome.confirmation.manual.as_ref());
        if let Some(control) = manual {
            if let Err(err) = opener.open(&control.url) {
                warn!(error = %err, "manual WhatsApp open failed");
            }
        }
    }

    async fn submit(&mut self) {
        let record = self.form.record(&self.store);
        if let Some(outcome) = self.controller.submit(record).await {
            self.outcome = Some(outcome);
            self.screen = Screen::Confirmed;
        }
    }

    fn next_focus(&self) -> Focus {
        match self.focus {
            Focus::Chips => Focus::Field(0),
            Focus::Field(i) if i + 1 < self.form.fields.len() => Focus::Field(i + 1),
            Focus::Field(_) => Focus::Submit,
            Focus::Submit => Focus::Chips,
        }
    }

    fn prev_focus(&self) -> Focus {
        match self.focus {
            Focus::Chips => Focus::Submit,
            Focus::Field(0) => Focus::Chips,
            Focus::Field(i) => Focus::Field(i - 1),
            Focus::Submit => Focus::Field(self.form.fields.len().saturating_sub(1)),
        }
    }
}
