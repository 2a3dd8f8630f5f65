//! Address form modal.
//!
//! A centered two-field dialog on top of the chat. Fields that failed the
//! last submit get a red border until the next attempt.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::{
    Theme,
    app::{AddressForm, FormField},
    input::InputState,
};

const FORM_WIDTH: u16 = 40;
const FORM_HEIGHT: u16 = 9; // borders + two fields + hint
const FIELD_HEIGHT: u16 = 3;

/// Render the modal over the full frame area.
pub fn render(frame: &mut Frame, form: &AddressForm, theme: &Theme, area: Rect) {
    let modal = centered(FORM_WIDTH, FORM_HEIGHT, area);
    frame.render_widget(Clear, modal);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Server Address ")
        .style(Style::default().bg(theme.background).fg(Color::White));
    let inner = block.inner(modal);
    frame.render_widget(block, modal);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(FIELD_HEIGHT),
            Constraint::Length(FIELD_HEIGHT),
            Constraint::Length(1),
        ])
        .split(inner);

    let [host_area, port_area, hint_area] = chunks.as_ref() else {
        return;
    };

    field(
        frame,
        " IP ",
        &form.host,
        form.focus == FormField::Host,
        form.errors.invalid_host(),
        *host_area,
    );
    field(
        frame,
        " Port ",
        &form.port,
        form.focus == FormField::Port,
        form.errors.invalid_port(),
        *port_area,
    );

    let hint = Paragraph::new("Tab switches, Enter connects, Esc closes")
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(hint, *hint_area);
}

fn field(
    frame: &mut Frame,
    title: &str,
    input: &InputState,
    focused: bool,
    invalid: bool,
    area: Rect,
) {
    let border_style = if invalid {
        Style::default().fg(Color::Red)
    } else if focused {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let block = Block::default().borders(Borders::ALL).border_style(border_style).title(title);
    let paragraph =
        Paragraph::new(input.buffer()).style(Style::default().fg(Color::White)).block(block);
    frame.render_widget(paragraph, area);

    if focused {
        let max_x = area.x.saturating_add(area.width).saturating_sub(2);
        let cursor_x =
            area.x.saturating_add(1).saturating_add(input.cursor_column() as u16).min(max_x);
        frame.set_cursor_position((cursor_x, area.y.saturating_add(1)));
    }
}

fn centered(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    }
}
