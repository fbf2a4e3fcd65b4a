//! Theme editor form

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use super::layout::{line_with_cursor, truncate};
use crate::app::state::AppState;
use crate::theme::{
    Choice, FONT_OPTIONS, FieldKind, FriendsListPosition, MusicPlayerPosition, Palette,
    ProfilePosition, ThemeField, WIDTH_OPTIONS, parse_color,
};

const LABEL_WIDTH: usize = 18;

/// Draw the editor form; updates the visible height for scrolling
pub fn draw(frame: &mut Frame, area: Rect, state: &mut AppState, palette: &Palette) {
    let title =
        if state.is_previewing() { " Theme editor • modified " } else { " Theme editor " };
    let block = Block::default()
        .title(Span::styled(
            title,
            Style::default().fg(palette.accent_primary).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.border_focused))
        .style(Style::default().bg(palette.bg_secondary));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::vertical([Constraint::Min(3), Constraint::Length(3)]).split(inner);
    let list_area = rows[0];

    state.editor.visible_height = list_area.height as usize;
    state.editor.ensure_selection_visible();

    let state: &AppState = state;
    let theme = state.theme();
    let editor = &state.editor;
    let value_width = (list_area.width as usize).saturating_sub(LABEL_WIDTH + 4);

    let lines: Vec<Line> = ThemeField::ALL
        .iter()
        .enumerate()
        .skip(editor.scroll_offset)
        .take(list_area.height as usize)
        .map(|(idx, field)| {
            let selected = idx == editor.selected;
            let value = field.value(theme);
            let editing = editor.editing && selected;
            field_line(*field, &value, selected, editing, state, value_width, palette)
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), list_area);

    draw_scrollbar(frame, list_area, editor.scroll_offset, ThemeField::ALL.len(), palette);
    draw_hints(frame, rows[1], editor.selected_field(), editor.editing, palette);
}

fn field_line(
    field: ThemeField,
    value: &str,
    selected: bool,
    editing: bool,
    state: &AppState,
    value_width: usize,
    palette: &Palette,
) -> Line<'static> {
    let marker = if selected { "▸ " } else { "  " };
    let label_style = if selected {
        Style::default().fg(palette.accent_primary).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(palette.fg_secondary)
    };
    let label = format!("{:<width$}", field.label(), width = LABEL_WIDTH);

    let mut spans = vec![
        Span::styled(marker, Style::default().fg(palette.accent_primary)),
        Span::styled(label, label_style),
    ];

    if editing {
        let buffer = &state.editor.buffer;
        let base = Style::default().fg(palette.fg_primary);
        spans.extend(line_with_cursor(&buffer.text, buffer.cursor, base, palette).spans);
        return Line::from(spans);
    }

    if field.kind() == FieldKind::Color {
        let swatch = match parse_color(value) {
            Some(color) => Span::styled("██ ", Style::default().fg(color)),
            None => Span::styled("?? ", Style::default().fg(palette.error)),
        };
        spans.push(swatch);
    }

    let shown = if value.is_empty() { "(none)".to_string() } else { value.to_string() };
    let value_style = if selected {
        Style::default().fg(palette.fg_primary).bg(palette.selection)
    } else {
        Style::default().fg(palette.fg_primary)
    };
    spans.push(Span::styled(truncate(&shown, value_width), value_style));

    let line = Line::from(spans);
    if selected { line.style(Style::default().bg(palette.selection)) } else { line }
}

/// Section name and key hints under the form
fn draw_hints(frame: &mut Frame, area: Rect, field: ThemeField, editing: bool, palette: &Palette) {
    let muted = Style::default().fg(palette.fg_muted);
    let key = Style::default().fg(palette.accent_secondary);

    let mut lines = vec![Line::from(vec![
        Span::styled(field.section(), key),
        Span::styled(format!(" • {}", options_hint(field)), muted),
    ])];

    let keys: &[(&str, &str)] = if editing {
        &[("Enter", "apply"), ("Esc", "cancel"), ("^S", "apply & save")]
    } else {
        &[
            ("Enter", "edit"),
            ("Tab", "cycle"),
            ("^S", "save"),
            ("^R", "reset"),
            ("a", "AI"),
            ("Esc", "close"),
        ]
    };
    let mut spans = Vec::new();
    for (k, what) in keys {
        spans.push(Span::styled(*k, key));
        spans.push(Span::styled(format!(" {}  ", what), muted));
    }
    lines.push(Line::from(spans));

    frame.render_widget(Paragraph::new(lines), Rect { y: area.y + 1, height: 2, ..area });
}

/// What values a field accepts
pub fn options_hint(field: ThemeField) -> String {
    fn names<C: Choice>() -> String {
        C::ALL.iter().map(|c| c.as_str()).collect::<Vec<_>>().join(" / ")
    }

    match (field.kind(), field) {
        (FieldKind::Color, _) => "hex like #6366f1, rgb() or a color name".into(),
        (FieldKind::FontFamily, _) => {
            let first: Vec<&str> = FONT_OPTIONS.iter().take(3).copied().collect();
            format!("e.g. {}", first.join("; "))
        }
        (FieldKind::Length, _) => "CSS length like 16px or 1rem".into(),
        (FieldKind::Choice, ThemeField::ProfilePosition) => names::<ProfilePosition>(),
        (FieldKind::Choice, ThemeField::MusicPlayer) => names::<MusicPlayerPosition>(),
        (FieldKind::Choice, _) => names::<FriendsListPosition>(),
        (FieldKind::Width, _) => format!("{} or a CSS width", WIDTH_OPTIONS.join(" / ")),
        (FieldKind::Url, _) => "URL, empty to clear".into(),
        (FieldKind::Toggle, _) => "on / off".into(),
    }
}

fn draw_scrollbar(frame: &mut Frame, area: Rect, offset: usize, total: usize, palette: &Palette) {
    let height = area.height as usize;
    if total <= height || height == 0 {
        return;
    }

    let thumb = (height * height / total).max(1);
    let max_offset = total - height;
    let thumb_start = (offset.min(max_offset) * (height - thumb)) / max_offset;

    let lines: Vec<Line> = (0..height)
        .map(|row| {
            let (ch, color) = if row >= thumb_start && row < thumb_start + thumb {
                ("█", palette.accent_primary)
            } else {
                ("░", palette.fg_muted)
            };
            Line::from(Span::styled(ch, Style::default().fg(color)))
        })
        .collect();

    let bar = Rect { x: area.x + area.width.saturating_sub(1), width: 1, ..area };
    frame.render_widget(Paragraph::new(lines), bar);
}
