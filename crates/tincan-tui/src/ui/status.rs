//! Status bar.
//!
//! One line mirroring the link lifecycle, with transient notices (like a
//! failed send) taking precedence.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use tincan_core::LinkState;

use crate::{App, app::Role};

/// Render the status bar.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let (text, style) = status_content(app);
    let status_line = Line::from(vec![Span::raw(" "), Span::styled(text, style)]);

    let paragraph =
        Paragraph::new(status_line).style(Style::default().bg(Color::DarkGray).fg(Color::White));

    frame.render_widget(paragraph, area);
}

fn status_content(app: &App) -> (String, Style) {
    if let Some(message) = app.status() {
        return (message.to_owned(), Style::default().fg(Color::Yellow));
    }

    match app.link() {
        LinkState::Unconfigured => (
            "No server address. Press F2 to set one.".to_owned(),
            Style::default().fg(Color::Yellow),
        ),
        LinkState::Connecting => {
            let text = match (app.role(), app.local()) {
                (Role::Listener, Some(local)) => {
                    format!("Listening at {} on Port {}...", local.ip(), local.port())
                },
                (Role::Listener, None) => "Starting listener...".to_owned(),
                (Role::Dialer, _) => "Establishing connection...".to_owned(),
            };
            (text, Style::default().fg(Color::Yellow))
        },
        LinkState::Connected => {
            let text = match app.peer() {
                Some(peer) => format!("Connected to {} at {}", peer.ip(), peer.port()),
                None => "Connected".to_owned(),
            };
            (text, Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
        },
        LinkState::Closed => {
            let text = match app.disconnect_reason() {
                Some(reason) => format!("Disconnected: {reason}"),
                None => "Disconnected".to_owned(),
            };
            (text, Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
        },
    }
}
