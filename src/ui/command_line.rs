//! Command line UI component

use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use super::layout::line_with_cursor;
use crate::app::state::{CommandLineState, CommandMode};
use crate::theme::Palette;

/// Draw the command line at the bottom of the screen
pub fn draw(frame: &mut Frame, area: Rect, state: &CommandLineState, palette: &Palette) {
    let line = match state.mode {
        CommandMode::Normal => match &state.message {
            Some(msg) => {
                let color = if state.is_error { palette.error } else { palette.fg_secondary };
                Line::from(Span::styled(msg.clone(), Style::default().fg(color)))
            }
            None => Line::from(Span::styled(
                "Press : for commands, ? for help",
                Style::default().fg(palette.fg_muted),
            )),
        },
        CommandMode::Command => line_with_cursor(
            &state.display_text(),
            state.input.cursor + 1, // +1 for prefix
            Style::default().fg(palette.accent_primary),
            palette,
        ),
    };

    let paragraph = Paragraph::new(line).style(Style::default().bg(palette.bg_primary));
    frame.render_widget(paragraph, area);
}
