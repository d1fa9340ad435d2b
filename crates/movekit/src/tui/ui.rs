//! Rendering for the quote form and the confirmation screen.

use crate::tui::app::{App, Focus, Screen};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};

pub fn draw(frame: &mut Frame, app: &App) {
    match app.screen {
        Screen::Form => draw_form(frame, app),
        Screen::Confirmed => draw_confirmation(frame, app),
    }
}

fn draw_form(frame: &mut Frame, app: &App) {
    let field_rows = app.form.fields.len() as u16;
    let chunks = Layout::vertical([
        Constraint::Length(3),              // title
        Constraint::Length(4),              // chips
        Constraint::Length(field_rows + 2), // inputs
        Constraint::Length(3),              // submit
        Constraint::Min(0),
        Constraint::Length(2), // action bar
    ])
    .split(frame.area());

    let title = Paragraph::new(format!(
        "MoveKit quote form ({})",
        app.form.source.as_str()
    ))
    .style(Style::default().add_modifier(Modifier::BOLD))
    .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(title, chunks[0]);

    let chips_focused = app.focus == Focus::Chips;
    let chips = Paragraph::new(app.chips.spans(&app.store, chips_focused))
        .wrap(Wrap { trim: true })
        .block(titled_block("Items to move", chips_focused));
    frame.render_widget(chips, chunks[1]);

    let mut lines: Vec<Line> = Vec::new();
    for (index, field) in app.form.fields.iter().enumerate() {
        let focused = app.focus == Focus::Field(index);
        let label_style = if focused {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        let mut spans = vec![
            Span::styled(format!("{:>17}: ", field.label), label_style),
            Span::raw(field.value.clone()),
        ];
        if focused {
            spans.push(Span::styled("_", Style::default().fg(Color::Cyan)));
        }
        lines.push(Line::from(spans));
    }
    let fields = Paragraph::new(lines).block(titled_block(
        "Your details",
        matches!(app.focus, Focus::Field(_)),
    ));
    frame.render_widget(fields, chunks[2]);

    let submit_focused = app.focus == Focus::Submit;
    let submit_label = if app.submitting() {
        "Submitting..."
    } else {
        "[ Request a quote ]"
    };
    let submit_style = if app.submitting() {
        Style::default().fg(Color::DarkGray)
    } else if submit_focused {
        Style::default()
            .fg(Color::White)
            .bg(Color::Blue)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    let submit = Paragraph::new(Span::styled(submit_label, submit_style))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(submit, chunks[3]);

    let hints = match app.focus {
        Focus::Chips => "←/→ move  Enter/Space add  x remove  Tab next  Esc quit",
        Focus::Field(_) => "type to edit  Backspace delete  Tab next  Esc quit",
        Focus::Submit => "Enter submit  Tab next  Esc quit",
    };
    let bar = Paragraph::new(hints)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(bar, chunks[5]);
}

fn draw_confirmation(frame: &mut Frame, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(5),
        Constraint::Length(2),
    ])
    .split(frame.area());

    let Some(outcome) = app.outcome.as_ref() else {
        return;
    };
    let confirmation = &outcome.confirmation;

    let heading = Paragraph::new(confirmation.heading.clone())
        .style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(heading, chunks[0]);

    let mut lines = vec![Line::raw(confirmation.body.clone()), Line::raw("")];
    if let Some(manual) = &confirmation.manual {
        if app.can_open() {
            lines.push(Line::from(Span::styled(
                format!("[W] {}", manual.label),
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            )));
        } else {
            // No opener available; show the link itself instead.
            lines.push(Line::raw(format!("{}:", manual.label)));
            lines.push(Line::styled(
                manual.url.clone(),
                Style::default().fg(Color::Green),
            ));
        }
    }
    let body = Paragraph::new(lines).wrap(Wrap { trim: true });
    frame.render_widget(body, chunks[1]);

    let hint = if confirmation.manual.is_some() && app.can_open() {
        "W open WhatsApp  Q quit"
    } else {
        "Q quit"
    };
    let bar = Paragraph::new(hint)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(bar, chunks[2]);
}

fn titled_block(title: &'static str, focused: bool) -> Block<'static> {
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(border_style)
}
