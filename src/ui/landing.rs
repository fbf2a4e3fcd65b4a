//! Landing screen with a twinkling star field

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    widgets::Paragraph,
};

use crate::app::state::LandingAnimation;
use crate::theme::Palette;

/// Star positions as (row, col, char), lit in this order
const STAR_PATH: &[(usize, usize, char)] = &[
    (4, 2, '·'),
    (1, 6, '✦'),
    (6, 9, '·'),
    (0, 13, '*'),
    (3, 16, '✧'),
    (7, 19, '·'),
    (2, 22, '✦'),
    (5, 25, '*'),
    (0, 29, '·'),
    (6, 31, '✧'),
    (3, 34, '·'),
    (1, 38, '*'),
    (7, 40, '✦'),
    (4, 43, '·'),
    (0, 46, '✧'),
    (5, 49, '·'),
    (2, 52, '*'),
    (7, 55, '·'),
    (3, 58, '✦'),
    (6, 61, '·'),
];

const SKY_ROWS: usize = 8;
const SKY_COLS: usize = 64;

const TAGLINE: &str = "MySpace-style profile themes for Bluesky";
const PROMPT: &str = "Press any key to begin...";

/// Build the star field based on animation progress
fn build_sky(progress: f32) -> String {
    let mut grid: Vec<Vec<char>> = vec![vec![' '; SKY_COLS]; SKY_ROWS];

    let stars_to_draw = ((STAR_PATH.len() as f32) * progress) as usize;
    for &(row, col, ch) in STAR_PATH.iter().take(stars_to_draw) {
        if row < SKY_ROWS && col < SKY_COLS {
            grid[row][col] = ch;
        }
    }

    grid.iter().map(|row| row.iter().collect::<String>()).collect::<Vec<_>>().join("\n")
}

/// Draw the landing screen
pub fn draw(frame: &mut Frame, animation: &LandingAnimation, palette: &Palette) {
    let area = frame.area();

    // Fill background
    let bg_style = Style::default().bg(palette.bg_primary);
    frame.render_widget(Paragraph::new("").style(bg_style), area);

    let sky_style = Style::default().fg(palette.highlight).bg(palette.bg_primary);
    let sky_y = (area.height / 4).min(area.height.saturating_sub(SKY_ROWS as u16 + 12));
    let sky_area = Rect {
        x: area.x,
        y: sky_y,
        width: area.width,
        height: (SKY_ROWS as u16).min(area.height.saturating_sub(sky_y)),
    };
    let sky = Paragraph::new(build_sky(animation.stars_progress()))
        .style(sky_style)
        .alignment(Alignment::Center);
    frame.render_widget(sky, sky_area);

    // Title, revealed character by character
    let title_chars = animation.title_chars();
    if title_chars > 0 {
        let title = LandingAnimation::TITLE;
        let visible: String = title.chars().take(title_chars).collect();
        // Pad with spaces to maintain centering
        let padded = format!("{:<width$}", visible, width = title.len());
        let title_style = Style::default()
            .fg(palette.accent_primary)
            .bg(palette.bg_primary)
            .add_modifier(Modifier::BOLD);
        draw_centered_line(frame, area, sky_area.y + sky_area.height + 2, &padded, title_style);
    }

    if animation.show_tagline() {
        let tagline_style = Style::default().fg(palette.fg_muted).bg(palette.bg_primary);
        draw_centered_line(frame, area, sky_area.y + sky_area.height + 4, TAGLINE, tagline_style);
    }

    // Blinking prompt
    if animation.complete && (animation.start_time.elapsed().as_millis() / 500) % 2 == 0 {
        let prompt_style = Style::default().fg(palette.fg_muted).bg(palette.bg_primary);
        draw_centered_line(frame, area, sky_area.y + sky_area.height + 8, PROMPT, prompt_style);
    }
}

fn draw_centered_line(frame: &mut Frame, area: Rect, y: u16, text: &str, style: Style) {
    if y >= area.y + area.height {
        return;
    }
    let line_area = Rect { x: area.x, y, width: area.width, height: 1 };
    frame.render_widget(
        Paragraph::new(text.to_string()).style(style).alignment(Alignment::Center),
        line_area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn star_count(sky: &str) -> usize {
        sky.chars().filter(|c| !c.is_whitespace()).count()
    }

    #[test]
    fn sky_empty_at_zero() {
        assert_eq!(star_count(&build_sky(0.0)), 0);
    }

    #[test]
    fn sky_full_at_one() {
        assert_eq!(star_count(&build_sky(1.0)), STAR_PATH.len());
    }

    #[test]
    fn sky_partial() {
        let count = star_count(&build_sky(0.5));
        assert!(count > 0 && count < STAR_PATH.len());
    }

    #[test]
    fn stars_fit_the_grid() {
        assert!(STAR_PATH.iter().all(|&(r, c, _)| r < SKY_ROWS && c < SKY_COLS));
    }
}
