//! UI rendering.
//!
//! Rendering functions that convert [`App`] state into terminal output
//! using ratatui widgets. All functions are pure (no I/O), taking state
//! and drawing into the frame.

mod form;
mod input;
mod status;
mod transcript;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};

use crate::{App, Theme};

/// Render the entire UI.
pub fn render(frame: &mut Frame, app: &App, theme: &Theme) {
    const TRANSCRIPT_MIN_HEIGHT: u16 = 3;
    const INPUT_HEIGHT: u16 = 3;
    const STATUS_HEIGHT: u16 = 1;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(TRANSCRIPT_MIN_HEIGHT),
            Constraint::Length(INPUT_HEIGHT),
            Constraint::Length(STATUS_HEIGHT),
        ])
        .split(frame.area());

    let [transcript_area, input_area, status_area] = chunks.as_ref() else {
        return;
    };

    transcript::render(frame, app, theme, *transcript_area);
    input::render(frame, app, theme, *input_area);
    status::render(frame, app, *status_area);

    // The modal draws last so it sits on top and owns the cursor.
    if let Some(address_form) = app.form() {
        form::render(frame, address_form, theme, frame.area());
    }
}
