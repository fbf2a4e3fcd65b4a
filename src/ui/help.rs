//! Help overlay

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use super::layout::centered_rect;
use crate::theme::Palette;

const KEYS: &[(&str, &str)] = &[
    ("j/k ↑/↓", "scroll or move between fields"),
    ("g/G", "jump to top / bottom"),
    ("e", "edit your theme"),
    ("a", "generate a theme from a description"),
    ("Tab", "cycle the selected option"),
    ("Enter", "edit the selected field"),
    ("Ctrl-S", "save the draft to your page"),
    ("Ctrl-R", "reset the draft"),
    ("Esc", "close the editor, discarding the draft"),
    ("o", "open a profile"),
    ("y", "copy theme JSON"),
    (":", "command line"),
];

const COMMANDS: &[(&str, &str)] = &[
    (":open <handle|did>", "view a profile page"),
    (":login <handle> <app-password>", "sign in to Bluesky"),
    (":logout", "sign out"),
    (":edit", "edit your own theme"),
    (":generate <prompt>", "generate a theme"),
    (":save", "save the draft"),
    (":revert", "swap in the previous theme"),
    (":import / :export <path>", "theme JSON from / to a file"),
    (":claude-key <key>", "store a Claude API key"),
    (":claude-model <name>", "haiku, sonnet or opus"),
    (":ai on|off", "toggle AI generation"),
    (":q", "quit"),
];

pub fn draw(frame: &mut Frame, area: Rect, palette: &Palette) {
    let popup = centered_rect(70, 80, area);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .title(Span::styled(
            " Help ",
            Style::default().fg(palette.accent_primary).add_modifier(Modifier::BOLD),
        ))
        .title_bottom(Span::styled(" Esc or ? to close ", Style::default().fg(palette.fg_muted)))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.border_focused))
        .style(Style::default().bg(palette.bg_secondary));

    let mut lines = Vec::new();
    section(&mut lines, "Keys", KEYS, palette);
    lines.push(Line::from(""));
    section(&mut lines, "Commands", COMMANDS, palette);

    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

fn section(lines: &mut Vec<Line<'static>>, title: &str, rows: &[(&str, &str)], palette: &Palette) {
    lines.push(Line::from(Span::styled(
        title.to_string(),
        Style::default().fg(palette.accent_secondary).add_modifier(Modifier::BOLD),
    )));
    let width = rows.iter().map(|(k, _)| k.chars().count()).max().unwrap_or(0) + 2;
    for (key, what) in rows {
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<width$}", key), Style::default().fg(palette.highlight)),
            Span::styled(what.to_string(), Style::default().fg(palette.fg_primary)),
        ]));
    }
}
