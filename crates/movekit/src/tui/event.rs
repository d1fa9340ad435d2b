//! Input polling for the form loop.
//!
//! Crossterm's reads are synchronous, so each poll runs on the blocking
//! pool with the redraw interval as its timeout. Anything that is not a
//! key press collapses to [`Input::Idle`]: the caller redraws every
//! iteration anyway, which also covers resizes.

use crossterm::event::{self, Event as TermEvent, KeyEvent};
use std::time::Duration;

/// One loop iteration's worth of input.
#[derive(Debug)]
pub enum Input {
    Key(KeyEvent),
    /// Nothing actionable arrived within the redraw interval.
    Idle,
}

/// Wait up to `within` for terminal input.
pub async fn poll_input(within: Duration) -> Input {
    tokio::task::spawn_blocking(move || match event::poll(within) {
        Ok(true) => event::read().map(classify).unwrap_or(Input::Idle),
        _ => Input::Idle,
    })
    .await
    .unwrap_or(Input::Idle)
}

fn classify(event: TermEvent) -> Input {
    match event {
        TermEvent::Key(key) => Input::Key(key),
        _ => Input::Idle,
    }
}
