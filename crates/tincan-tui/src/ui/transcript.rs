//! Transcript area.
//!
//! Sent messages hug the right edge, received chunks the left, each in its
//! own colored bubble.

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
};

use crate::{App, Theme, app::Origin};

const BORDER_SIZE: u16 = 2;

/// Render the transcript.
pub fn render(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .style(Style::default().bg(theme.background));

    let items: Vec<ListItem> = if app.transcript().is_empty() {
        vec![ListItem::new(Line::from(Span::styled(
            "No messages yet",
            Style::default().fg(Color::DarkGray),
        )))]
    } else {
        app.transcript()
            .iter()
            .map(|bubble| {
                let style = match bubble.origin {
                    Origin::Sent => Style::default().fg(Color::White).bg(theme.sent),
                    Origin::Received => Style::default().fg(Color::White).bg(theme.received),
                };
                let line = Line::from(Span::styled(format!(" {} ", bubble.text), style));
                let line = match bubble.origin {
                    Origin::Sent => line.alignment(Alignment::Right),
                    Origin::Received => line.alignment(Alignment::Left),
                };
                ListItem::new(line)
            })
            .collect()
    };

    // Keep the newest entries visible; there is no scrollback.
    let visible_height = area.height.saturating_sub(BORDER_SIZE) as usize;
    let skip = items.len().saturating_sub(visible_height);
    let visible_items: Vec<_> = items.into_iter().skip(skip).collect();

    let list = List::new(visible_items).block(block);

    frame.render_widget(list, area);
}
