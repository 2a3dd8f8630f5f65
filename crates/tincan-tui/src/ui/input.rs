//! Message input line.
//!
//! Shows the buffer with a cursor while the link is up, dimmed and inert
//! otherwise.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
};

use tincan_core::LinkState;

use crate::{App, Theme};

const PROMPT_WIDTH: u16 = 3; // left border plus "> "
const INPUT_LINE_OFFSET_Y: u16 = 1; // text row sits below the top border
const RIGHT_PADDING: u16 = 1; // keep the cursor off the right border

/// Render the input line.
pub fn render(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let enabled = app.link() == LinkState::Connected;

    let style = if enabled {
        Style::default().fg(Color::White).bg(theme.light)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let block = Block::default().borders(Borders::ALL);

    let input_text = format!("> {}", app.message().buffer());
    let paragraph = Paragraph::new(input_text).style(style).block(block);

    frame.render_widget(paragraph, area);

    if enabled {
        frame.set_cursor_position(cursor_position(area, app.message().cursor_column()));
    }
}

/// Terminal cell for the cursor: tracks the edit column until the text
/// outgrows the box, then pins to the last cell inside the right border.
fn cursor_position(area: Rect, column: usize) -> (u16, u16) {
    let usable_width = area.width.saturating_sub(PROMPT_WIDTH + RIGHT_PADDING);
    let column = (column as u16).min(usable_width);
    let last_cell = area.x.saturating_add(area.width).saturating_sub(RIGHT_PADDING);

    let x = area.x.saturating_add(PROMPT_WIDTH).saturating_add(column).min(last_cell);
    (x, area.y.saturating_add(INPUT_LINE_OFFSET_Y))
}
