//! Themed profile page
//!
//! Everything here draws with the palette it is handed and reads layout
//! choices from the theme on screen, so a preview draft renders exactly
//! like a saved theme.

use ratatui::{
    Frame,
    layout::{Constraint, Layout as Split, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
};
use textwrap::{Options, wrap};

use super::layout::truncate;
use crate::app::state::AppState;
use crate::studio::ProfileView;
use crate::theme::{
    FriendsListPosition, Layout, MusicPlayerPosition, Palette, ProfilePosition, ThemeConfig,
    content_columns,
};

const CARD_WIDTH: u16 = 32;
const FRIENDS_WIDTH: u16 = 26;
const CARD_HEIGHT: u16 = 11;
const PLAYER_HEIGHT: u16 = 3;

const SPARKLES: [char; 4] = ['✦', '✧', '*', '·'];

/// Frames per animation step
const TICKS_PER_STEP: u64 = 8;

/// Where each part of the page goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageAreas {
    pub card: Rect,
    pub posts: Rect,
    pub friends: Option<Rect>,
    pub player: Option<Rect>,
}

/// Split the content area according to the theme layout
///
/// `has_player` reserves room for the music player when a track is set.
pub fn page_areas(layout: &Layout, area: Rect, has_player: bool) -> PageAreas {
    let player_rows = Constraint::Length(PLAYER_HEIGHT);
    let (area, player) = match (has_player, layout.music_player) {
        (true, MusicPlayerPosition::Top) => {
            let [player, rest] = rows(area, player_rows, Constraint::Min(3));
            (rest, Some(player))
        }
        (true, MusicPlayerPosition::Bottom) => {
            let [rest, player] = rows(area, Constraint::Min(3), player_rows);
            (rest, Some(player))
        }
        _ => (area, None),
    };

    let friends_cols = Constraint::Length(FRIENDS_WIDTH);
    let (row, friends) = match layout.friends_list {
        FriendsListPosition::Hidden => (area, None),
        FriendsListPosition::Left => {
            let [friends, rest] = cols(area, friends_cols, Constraint::Min(20));
            (rest, Some(friends))
        }
        FriendsListPosition::Right => {
            let [rest, friends] = cols(area, Constraint::Min(20), friends_cols);
            (rest, Some(friends))
        }
    };

    let card_cols = Constraint::Length(CARD_WIDTH);
    let (card, posts) = match layout.profile_position {
        ProfilePosition::Left => {
            let [card, posts] = cols(row, card_cols, Constraint::Min(20));
            (card, posts)
        }
        ProfilePosition::Right => {
            let [posts, card] = cols(row, Constraint::Min(20), card_cols);
            (card, posts)
        }
        ProfilePosition::Center => {
            let [card, posts] = rows(row, Constraint::Length(CARD_HEIGHT), Constraint::Min(3));
            (card, posts)
        }
    };

    // The sidebar player lives at the bottom of the profile card
    let (card, player) = match (has_player, layout.music_player) {
        (true, MusicPlayerPosition::Sidebar) if card.height > PLAYER_HEIGHT + 4 => {
            let [card, player] = rows(card, Constraint::Min(4), player_rows);
            (card, Some(player))
        }
        _ => (card, player),
    };

    PageAreas { card, posts, friends, player }
}

fn rows(area: Rect, first: Constraint, second: Constraint) -> [Rect; 2] {
    let split = Split::vertical([first, second]).split(area);
    [split[0], split[1]]
}

fn cols(area: Rect, first: Constraint, second: Constraint) -> [Rect; 2] {
    let split = Split::horizontal([first, second]).split(area);
    [split[0], split[1]]
}

/// Draw the profile on screen with the current (or draft) theme
pub fn draw(frame: &mut Frame, area: Rect, state: &AppState, palette: &Palette) {
    let theme = state.theme();
    frame.render_widget(Block::default().style(Style::default().bg(palette.bg_primary)), area);

    let Some(view) = &state.profile.view else {
        draw_empty(frame, area, state.profile.loading, palette);
        return;
    };

    let width = content_columns(&theme.layout.content_width, area.width);
    let mut page = Rect { x: area.x + (area.width - width) / 2, width, ..area };

    if let Some(url) = &theme.customization.background_image {
        let line = Line::from(Span::styled(
            format!("▨ background: {}", truncate(url, width.saturating_sub(14) as usize)),
            Style::default().fg(palette.fg_muted).add_modifier(Modifier::ITALIC),
        ));
        frame.render_widget(Paragraph::new(line), Rect { height: 1, ..page });
        page.y += 1;
        page.height = page.height.saturating_sub(1);
    }

    let music = theme.customization.profile_music.as_deref();
    let areas = page_areas(&theme.layout, page, music.is_some());
    let step = animation_step(theme, state.tick);

    draw_card(frame, areas.card, view, palette);
    draw_posts(frame, areas.posts, view, state.profile.scroll_offset, palette);
    if let Some(friends) = areas.friends {
        draw_friends(frame, friends, view, palette);
    }
    if let (Some(player), Some(url)) = (areas.player, music) {
        draw_player(frame, player, url, step, theme.customization.animations, palette);
    }

    if theme.customization.glitter {
        draw_glitter(frame, page, step, palette);
    }
}

/// Animation frame counter; frozen at 0 when animations are off
fn animation_step(theme: &ThemeConfig, tick: u64) -> u64 {
    if theme.customization.animations { tick / TICKS_PER_STEP } else { 0 }
}

fn draw_empty(frame: &mut Frame, area: Rect, loading: bool, palette: &Palette) {
    let text = if loading {
        "Loading profile..."
    } else {
        "No profile open\n\n\
         :open <handle> to view a page\n\
         :login <handle> <app-password> to edit yours"
    };
    let msg = Paragraph::new(text)
        .style(Style::default().fg(palette.fg_muted))
        .alignment(ratatui::layout::Alignment::Center)
        .wrap(Wrap { trim: false });
    let y = area.y + area.height / 3;
    frame.render_widget(msg, Rect { y, height: area.height.saturating_sub(y - area.y), ..area });
}

fn panel<'a>(title: String, palette: &Palette) -> Block<'a> {
    Block::default()
        .title(Span::styled(
            title,
            Style::default()
                .fg(palette.accent_primary)
                .add_modifier(palette.heading_modifier),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.border))
        .style(Style::default().bg(palette.bg_secondary))
}

fn draw_card(frame: &mut Frame, area: Rect, view: &ProfileView, palette: &Palette) {
    let name = view.profile.as_ref().map(|p| p.name().to_string()).unwrap_or_else(|| view.title());
    let block = panel(format!(" {} ", name), palette);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let muted = Style::default().fg(palette.fg_muted);
    let text = Style::default().fg(palette.fg_primary);
    let mut lines = Vec::new();

    if let Some(profile) = &view.profile {
        lines.push(Line::from(Span::styled(
            format!("@{}", profile.handle),
            Style::default().fg(palette.accent_secondary),
        )));
    }
    lines.push(Line::from(Span::styled(view.did.to_string(), muted)));
    lines.push(Line::from(""));

    if let Some(profile) = &view.profile {
        if let Some(description) = profile.description.as_deref().filter(|d| !d.is_empty()) {
            for row in wrap_text(description, inner.width) {
                lines.push(Line::from(Span::styled(row, text)));
            }
            lines.push(Line::from(""));
        }
        lines.push(Line::from(vec![
            Span::styled(profile.followers_count.to_string(), text.add_modifier(Modifier::BOLD)),
            Span::styled(" followers  ", muted),
            Span::styled(profile.follows_count.to_string(), text.add_modifier(Modifier::BOLD)),
            Span::styled(" following", muted),
        ]));
        lines.push(Line::from(Span::styled(format!("{} posts", profile.posts_count), muted)));
    }

    if let Some(err) = &view.load_error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("⚠ {}", err),
            Style::default().fg(palette.error),
        )));
    }

    lines.push(Line::from(""));
    let badge = if view.editable {
        Span::styled(" your page ", Style::default().fg(palette.bg_primary).bg(palette.success))
    } else {
        Span::styled(" read-only ", Style::default().fg(palette.bg_primary).bg(palette.fg_muted))
    };
    lines.push(Line::from(badge));

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

fn draw_posts(frame: &mut Frame, area: Rect, view: &ProfileView, scroll: usize, palette: &Palette) {
    let block = panel(" Posts ".to_string(), palette);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if view.feed.is_empty() {
        let msg = Paragraph::new("No posts yet").style(Style::default().fg(palette.fg_muted));
        frame.render_widget(msg, inner);
        return;
    }

    let muted = Style::default().fg(palette.fg_muted);
    let mut lines = Vec::new();
    for item in &view.feed {
        let post = &item.post;
        let stamp = post.timestamp().unwrap_or_default();
        lines.push(Line::from(vec![
            Span::styled(stamp, muted),
            Span::styled(
                format!("  ♥ {}", post.like_count),
                Style::default().fg(palette.highlight),
            ),
        ]));
        for row in wrap_text(&post.record.text, inner.width) {
            lines.push(Line::from(Span::styled(row, Style::default().fg(palette.fg_primary))));
        }
        lines.push(Line::from(""));
    }

    let max_scroll = lines.len().saturating_sub(inner.height as usize);
    let visible: Vec<Line> = lines.into_iter().skip(scroll.min(max_scroll)).collect();
    frame.render_widget(Paragraph::new(visible), inner);
}

fn draw_friends(frame: &mut Frame, area: Rect, view: &ProfileView, palette: &Palette) {
    let block = panel(format!(" Friends ({}) ", view.friends.len()), palette);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if view.friends.is_empty() {
        let msg = Paragraph::new("No friends to show").style(Style::default().fg(palette.fg_muted));
        frame.render_widget(msg, inner);
        return;
    }

    let width = inner.width.saturating_sub(2) as usize;
    let lines: Vec<Line> = view
        .friends
        .iter()
        .take(inner.height as usize)
        .map(|friend| {
            let name = truncate(friend.name(), width);
            Line::from(vec![
                Span::styled("♡ ", Style::default().fg(palette.accent_secondary)),
                Span::styled(name, Style::default().fg(palette.fg_primary)),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}

fn draw_player(
    frame: &mut Frame,
    area: Rect,
    url: &str,
    step: u64,
    animated: bool,
    palette: &Palette,
) {
    let block = panel(" ♫ Now playing ".to_string(), palette);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let bar_width = 10;
    let reserved = bar_width + 4;
    let title = truncate(url, (inner.width as usize).saturating_sub(reserved));
    let symbol = if animated { "▶" } else { "■" };
    let line = Line::from(vec![
        Span::styled(format!("{} ", symbol), Style::default().fg(palette.accent_primary)),
        Span::styled(title, Style::default().fg(palette.fg_primary)),
        Span::raw(" "),
        Span::styled(progress_bar(step, bar_width), Style::default().fg(palette.highlight)),
    ]);
    frame.render_widget(Paragraph::new(line), inner);
}

/// Looping progress bar for the music player
fn progress_bar(step: u64, width: usize) -> String {
    let filled = (step as usize) % (width + 1);
    format!("{}{}", "━".repeat(filled), "─".repeat(width - filled))
}

/// Sparkles scattered over blank cells of `area`
fn draw_glitter(frame: &mut Frame, area: Rect, step: u64, palette: &Palette) {
    let colors = [palette.highlight, palette.accent_primary, palette.accent_secondary];
    let buffer = frame.buffer_mut();
    for (i, (x, y, ch)) in sparkle_positions(area, step).into_iter().enumerate() {
        if let Some(cell) = buffer.cell_mut((x, y)) {
            if cell.symbol() == " " {
                cell.set_char(ch).set_fg(colors[i % colors.len()]);
            }
        }
    }
}

/// Pseudo-random sparkle cells for one animation step
pub fn sparkle_positions(area: Rect, step: u64) -> Vec<(u16, u16, char)> {
    if area.width == 0 || area.height == 0 {
        return Vec::new();
    }

    let count = (area.width as usize * area.height as usize / 60).clamp(4, 80);
    let mut seed = step.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut next = || {
        seed = seed.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1_442_695_040_888_963_407);
        seed >> 33
    };

    (0..count)
        .map(|_| {
            let x = area.x + (next() % area.width as u64) as u16;
            let y = area.y + (next() % area.height as u64) as u16;
            let ch = SPARKLES[(next() % SPARKLES.len() as u64) as usize];
            (x, y, ch)
        })
        .collect()
}

fn wrap_text(text: &str, width: u16) -> Vec<String> {
    if width < 2 {
        return vec![text.to_string()];
    }
    wrap(text, Options::new(width as usize)).into_iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bluesky::Profile;
    use crate::identity::Did;
    use crate::page::Page;
    use pretty_assertions::assert_eq;
    use ratatui::{Terminal, backend::TestBackend};

    fn area() -> Rect {
        Rect::new(0, 0, 120, 40)
    }

    #[test]
    fn default_layout_puts_card_left_and_friends_right() {
        let areas = page_areas(&Layout::default(), area(), false);
        assert_eq!(areas.card.x, 0);
        assert_eq!(areas.card.width, CARD_WIDTH);
        let friends = areas.friends.unwrap();
        assert_eq!(friends.x + friends.width, 120);
        assert!(areas.posts.x > areas.card.x && areas.posts.x < friends.x);
        assert_eq!(areas.player, None);
    }

    #[test]
    fn right_profile_and_hidden_friends() {
        let layout = Layout {
            profile_position: ProfilePosition::Right,
            friends_list: FriendsListPosition::Hidden,
            ..Layout::default()
        };
        let areas = page_areas(&layout, area(), false);
        assert_eq!(areas.friends, None);
        assert_eq!(areas.card.x + areas.card.width, 120);
        assert_eq!(areas.posts.x, 0);
    }

    #[test]
    fn center_profile_stacks_card_over_posts() {
        let layout = Layout { profile_position: ProfilePosition::Center, ..Layout::default() };
        let areas = page_areas(&layout, area(), false);
        assert_eq!(areas.card.height, CARD_HEIGHT);
        assert_eq!(areas.posts.y, areas.card.y + CARD_HEIGHT);
    }

    #[test]
    fn player_positions() {
        let top = Layout { music_player: MusicPlayerPosition::Top, ..Layout::default() };
        let areas = page_areas(&top, area(), true);
        assert_eq!(areas.player.unwrap().y, 0);
        assert_eq!(areas.card.y, PLAYER_HEIGHT);

        let bottom = page_areas(&Layout::default(), area(), true);
        assert_eq!(bottom.player.unwrap().y, 40 - PLAYER_HEIGHT);

        let sidebar = Layout { music_player: MusicPlayerPosition::Sidebar, ..Layout::default() };
        let areas = page_areas(&sidebar, area(), true);
        let player = areas.player.unwrap();
        assert_eq!(player.x, areas.card.x);
        assert_eq!(player.y, areas.card.y + areas.card.height);
    }

    #[test]
    fn sparkles_stay_inside_and_twinkle() {
        let rect = Rect::new(10, 5, 50, 20);
        let first = sparkle_positions(rect, 0);
        assert!(!first.is_empty());
        assert!(first.iter().all(|&(x, y, _)| rect.contains((x, y).into())));
        assert_eq!(first, sparkle_positions(rect, 0));
        assert_ne!(first, sparkle_positions(rect, 1));
        assert!(sparkle_positions(Rect::new(0, 0, 0, 5), 3).is_empty());
    }

    #[test]
    fn frozen_animation_without_animations() {
        let mut theme = ThemeConfig::default();
        assert_eq!(animation_step(&theme, 80), 10);
        theme.customization.animations = false;
        assert_eq!(animation_step(&theme, 80), 0);
        assert_eq!(progress_bar(0, 4), "────");
        assert_eq!(progress_bar(3, 4), "━━━─");
    }

    fn render(state: &AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal
            .draw(|frame| {
                let palette = state.palette().clone();
                draw(frame, frame.area(), state, &palette);
            })
            .unwrap();
        terminal.backend().buffer().content().iter().map(|c| c.symbol()).collect()
    }

    fn alice_view(theme: ThemeConfig) -> ProfileView {
        let did = Did::parse("did:plc:alice").unwrap();
        ProfileView {
            page: Some(Page::new(did.clone(), theme)),
            did,
            profile: Some(Profile {
                did: "did:plc:alice".into(),
                handle: "alice.test".into(),
                display_name: Some("Alice".into()),
                ..Profile::default()
            }),
            friends: Vec::new(),
            feed: Vec::new(),
            load_error: Some("posts: timed out".into()),
            editable: false,
        }
    }

    #[test]
    fn renders_profile_with_inline_errors_and_music() {
        let mut theme = ThemeConfig::default();
        theme.customization.profile_music = Some("https://music.test/song.mp3".into());
        theme.customization.background_image = Some("https://img.test/bg.png".into());

        let mut state = AppState::default();
        state.profile.set_view(alice_view(theme));

        let screen = render(&state);
        assert!(screen.contains("@alice.test"));
        assert!(screen.contains("timed out"));
        assert!(screen.contains("read-only"));
        assert!(screen.contains("music.test/song.mp3"));
        assert!(screen.contains("background: https://img.test/bg.png"));
        assert!(screen.contains("No friends to show"));
    }

    #[test]
    fn hidden_friends_are_not_rendered() {
        let mut theme = ThemeConfig::default();
        theme.layout.friends_list = FriendsListPosition::Hidden;

        let mut state = AppState::default();
        state.profile.set_view(alice_view(theme));
        assert!(!render(&state).contains("Friends ("));
    }

    #[test]
    fn empty_state_prompts_to_open() {
        let screen = render(&AppState::default());
        assert!(screen.contains("No profile open"));
    }
}
