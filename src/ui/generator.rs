//! AI theme generator panel

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
};

use super::layout::{line_with_cursor, truncate};
use crate::app::state::AppState;
use crate::generator::EXAMPLE_PROMPTS;
use crate::theme::Palette;

const SPINNER: [&str; 4] = ["◐", "◓", "◑", "◒"];

pub fn draw(frame: &mut Frame, area: Rect, state: &AppState, palette: &Palette) {
    let block = Block::default()
        .title(Span::styled(
            " ✦ Generate a theme ",
            Style::default().fg(palette.accent_primary).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.border_focused))
        .style(Style::default().bg(palette.bg_secondary));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::vertical([
        Constraint::Length(4), // prompt
        Constraint::Length(2), // status
        Constraint::Min(3),    // examples
        Constraint::Length(2), // hints
    ])
    .split(inner);

    draw_prompt(frame, rows[0], state, palette);
    draw_status(frame, rows[1], state, palette);
    draw_examples(frame, rows[2], state.generator.example, palette);
    draw_hints(frame, rows[3], palette);
}

fn draw_prompt(frame: &mut Frame, area: Rect, state: &AppState, palette: &Palette) {
    let block = Block::default()
        .title(Span::styled(" Describe your vibe ", Style::default().fg(palette.fg_secondary)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.border))
        .style(Style::default().bg(palette.bg_tertiary));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let prompt = &state.generator.prompt;
    let style = Style::default().fg(palette.fg_primary);
    let line = line_with_cursor(&prompt.text, prompt.cursor, style, palette);
    frame.render_widget(Paragraph::new(line).wrap(Wrap { trim: false }), inner);
}

fn draw_status(frame: &mut Frame, area: Rect, state: &AppState, palette: &Palette) {
    let generator = &state.generator;
    let line = if generator.pending {
        let spin = SPINNER[(state.tick / 4) as usize % SPINNER.len()];
        Line::from(vec![
            Span::styled(format!("{} ", spin), Style::default().fg(palette.highlight)),
            Span::styled("Generating...", Style::default().fg(palette.fg_primary)),
        ])
    } else if let Some(source) = generator.last_source {
        Line::from(vec![
            Span::styled("✓ ", Style::default().fg(palette.success)),
            Span::styled(
                format!("Generated with {} • Ctrl-S to save", source.label()),
                Style::default().fg(palette.fg_primary),
            ),
        ])
    } else {
        Line::from(Span::styled(
            format!("Using {}", state.ai_status),
            Style::default().fg(palette.fg_muted),
        ))
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn draw_examples(frame: &mut Frame, area: Rect, selected: Option<usize>, palette: &Palette) {
    let width = (area.width as usize).saturating_sub(2);
    let mut lines = vec![Line::from(Span::styled(
        "Examples (↑/↓)",
        Style::default().fg(palette.accent_secondary),
    ))];
    for (idx, example) in EXAMPLE_PROMPTS.iter().enumerate() {
        let line = if Some(idx) == selected {
            Line::from(Span::styled(
                format!("▸ {}", truncate(example, width)),
                Style::default().fg(palette.fg_primary).bg(palette.selection),
            ))
        } else {
            Line::from(Span::styled(
                format!("  {}", truncate(example, width)),
                Style::default().fg(palette.fg_muted),
            ))
        };
        lines.push(line);
    }
    frame.render_widget(Paragraph::new(lines), area);
}

fn draw_hints(frame: &mut Frame, area: Rect, palette: &Palette) {
    let key = Style::default().fg(palette.accent_secondary);
    let muted = Style::default().fg(palette.fg_muted);
    let line = Line::from(vec![
        Span::styled("Enter", key),
        Span::styled(" generate  ", muted),
        Span::styled("Tab", key),
        Span::styled(" editor  ", muted),
        Span::styled("^R", key),
        Span::styled(" reset  ", muted),
        Span::styled("Esc", key),
        Span::styled(" close", muted),
    ]);
    frame.render_widget(Paragraph::new(line), Rect { y: area.y + 1, height: 1, ..area });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::GenerationSource;
    use ratatui::{Terminal, backend::TestBackend};

    fn render(state: &AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(70, 24)).unwrap();
        terminal
            .draw(|frame| {
                let palette = state.palette().clone();
                draw(frame, frame.area(), state, &palette);
            })
            .unwrap();
        terminal.backend().buffer().content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn idle_panel_shows_examples_and_generator() {
        let mut state = AppState::default();
        state.ai_status = "AI off (keyword matching)".into();
        let screen = render(&state);
        assert!(screen.contains("Using AI off (keyword matching)"));
        assert!(screen.contains("Ocean theme"));
    }

    #[test]
    fn pending_shows_spinner() {
        let mut state = AppState::default();
        state.generator.pending = true;
        assert!(render(&state).contains("Generating..."));
    }

    #[test]
    fn selected_example_fills_the_prompt() {
        let mut state = AppState::default();
        state.generator.cycle_example(true);
        state.generator.last_source = Some(GenerationSource::Keywords);
        let screen = render(&state);
        assert!(screen.contains("▸ Dark mode with purple"));
        assert!(screen.contains("Generated with keyword matching"));
    }
}
