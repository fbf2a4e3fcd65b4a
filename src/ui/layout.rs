//! Layout utilities and common components

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::state::AppState;
use crate::theme::Palette;

/// Create a centered rectangle with the given percentage of width and height
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .split(r);

    Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .split(popup_layout[1])[1]
}

/// One-line bar above every screen but the landing page
pub fn draw_header(frame: &mut Frame, area: Rect, state: &AppState, palette: &Palette) {
    let muted = Style::default().fg(palette.fg_muted);
    let sep = Span::styled("  │  ", muted);

    let mut spans = vec![Span::styled(
        " ✦ skyspace",
        Style::default().fg(palette.accent_primary).add_modifier(Modifier::BOLD),
    )];

    spans.push(sep.clone());
    match &state.signed_in {
        Some(handle) => spans.push(Span::styled(
            format!("@{}", handle),
            Style::default().fg(palette.fg_primary),
        )),
        None => spans.push(Span::styled("not signed in", muted)),
    }

    if let Some(view) = &state.profile.view {
        spans.push(sep.clone());
        spans.push(Span::styled(format!("viewing {}", view.title()), muted));
    }

    spans.push(sep);
    spans.push(Span::styled(state.ai_status.clone(), muted));

    if state.is_previewing() {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            " PREVIEW ",
            Style::default()
                .fg(palette.bg_primary)
                .bg(palette.warning)
                .add_modifier(Modifier::BOLD),
        ));
    }

    let header = Paragraph::new(Line::from(spans)).style(Style::default().bg(palette.bg_secondary));
    frame.render_widget(header, area);
}

/// Build a line with a visible cursor at character index `cursor_pos`
pub fn line_with_cursor(
    text: &str,
    cursor_pos: usize,
    base_style: Style,
    palette: &Palette,
) -> Line<'static> {
    let chars: Vec<char> = text.chars().collect();
    let mut spans = Vec::new();

    // Text before cursor
    if cursor_pos > 0 {
        let before: String = chars.iter().take(cursor_pos).collect();
        spans.push(Span::styled(before, base_style));
    }

    // Cursor character (or space if at end)
    let cursor_char = chars.get(cursor_pos).copied().unwrap_or(' ');
    let cursor_style =
        Style::default().fg(palette.bg_primary).bg(palette.cursor).add_modifier(Modifier::BOLD);
    spans.push(Span::styled(cursor_char.to_string(), cursor_style));

    // Text after cursor
    if cursor_pos + 1 < chars.len() {
        let after: String = chars.iter().skip(cursor_pos + 1).collect();
        spans.push(Span::styled(after, base_style));
    }

    Line::from(spans)
}

/// Shorten to `max_chars` characters, ending in "..." when cut
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else if max_chars <= 3 {
        ".".repeat(max_chars)
    } else {
        let kept: String = s.chars().take(max_chars - 3).collect();
        format!("{}...", kept)
    }
}
