//! Terminal user interface for the MoveKit quote form.

pub mod app;
pub mod chips;
pub mod event;
pub mod form;
pub mod ui;

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use movekit_handoff::HandoffOpener;
use movekit_protocol::FormSource;
use ratatui::{backend::Backend, backend::CrosstermBackend, Terminal};
use std::io::stdout;
use std::sync::Arc;

use crate::config::MoveKitConfig;
use crate::tui::app::App;
use crate::tui::event::{poll_input, Input};

const REDRAW_INTERVAL: std::time::Duration = std::time::Duration::from_millis(100);

/// Run the form TUI until the user quits.
pub async fn run(
    config: &MoveKitConfig,
    source: FormSource,
    opener: Option<Arc<dyn HandoffOpener>>,
    auto_open: bool,
) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config, source, opener).with_auto_open(auto_open);

    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    while app.running {
        terminal.draw(|frame| ui::draw(frame, app))?;

        if let Input::Key(key) = poll_input(REDRAW_INTERVAL).await {
            app.handle_key(key).await;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::submit::{Confirmation, SubmissionOutcome};
    use crate::tui::app::Screen;
    use movekit_handoff::{ManualHandoff, SystemOpener};
    use ratatui::backend::TestBackend;

    fn buffer_text(buffer: &ratatui::buffer::Buffer) -> String {
        buffer.content.iter().map(|cell| cell.symbol()).collect()
    }

    fn confirmed_outcome() -> SubmissionOutcome {
        SubmissionOutcome {
            logged_ok: true,
            confirmation: Confirmation {
                heading: "Thank you".to_string(),
                body: "Received.".to_string(),
                manual: Some(ManualHandoff {
                    label: "Continue to WhatsApp".to_string(),
                    url: "https://wa.me/447497460219?text=Hi".to_string(),
                }),
                auto_handoff: false,
            },
        }
    }

    #[test]
    fn test_form_screen_renders_without_panic() {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();

        let app = App::new(&MoveKitConfig::default(), FormSource::Lead, None);
        terminal.draw(|frame| ui::draw(frame, &app)).unwrap();

        let buffer = terminal.backend().buffer();
        assert_eq!(buffer.area.width, 80);
        assert_eq!(buffer.area.height, 24);
    }

    #[test]
    fn test_form_renders_in_tight_area() {
        let backend = TestBackend::new(20, 8);
        let mut terminal = Terminal::new(backend).unwrap();

        let app = App::new(&MoveKitConfig::default(), FormSource::Contact, None);
        terminal.draw(|frame| ui::draw(frame, &app)).unwrap();
    }

    #[test]
    fn test_confirmation_without_opener_shows_handoff_url() {
        let backend = TestBackend::new(120, 24);
        let mut terminal = Terminal::new(backend).unwrap();

        let mut app = App::new(&MoveKitConfig::default(), FormSource::Lead, None);
        app.screen = Screen::Confirmed;
        app.outcome = Some(confirmed_outcome());
        terminal.draw(|frame| ui::draw(frame, &app)).unwrap();

        let text = buffer_text(terminal.backend().buffer());
        assert!(text.contains("https://wa.me/447497460219"));
        assert!(!text.contains("open WhatsApp"));
    }

    #[test]
    fn test_confirmation_with_opener_advertises_w_key() {
        let backend = TestBackend::new(120, 24);
        let mut terminal = Terminal::new(backend).unwrap();

        let opener: Arc<dyn HandoffOpener> = Arc::new(SystemOpener);
        let mut app = App::new(&MoveKitConfig::default(), FormSource::Lead, Some(opener));
        app.screen = Screen::Confirmed;
        app.outcome = Some(confirmed_outcome());
        terminal.draw(|frame| ui::draw(frame, &app)).unwrap();

        let text = buffer_text(terminal.backend().buffer());
        assert!(text.contains("[W] Continue to WhatsApp"));
        assert!(text.contains("W open WhatsApp"));
        assert!(!text.contains("https://wa.me/"));
    }
}
