//! Terminal projection of a theme
//!
//! The renderer never reads [`ThemeConfig`] colors directly. It receives a
//! [`Palette`] derived from whichever theme is on screen (the saved one, or a
//! preview draft).

use ratatui::style::{Color, Modifier};

use super::{Fonts, ThemeConfig};

/// Colors the UI draws with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    // Background colors
    pub bg_primary: Color,
    pub bg_secondary: Color,
    pub bg_tertiary: Color,

    // Foreground colors
    pub fg_primary: Color,
    pub fg_secondary: Color,
    pub fg_muted: Color,

    // Accent colors
    pub accent_primary: Color,
    pub accent_secondary: Color,
    pub highlight: Color,

    // Semantic colors
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,

    // UI elements
    pub border: Color,
    pub border_focused: Color,
    pub selection: Color,
    pub cursor: Color,

    /// Modifier applied to headings, derived from the heading font
    pub heading_modifier: Modifier,
}

impl Default for Palette {
    fn default() -> Self {
        Palette::from_theme(&ThemeConfig::default())
    }
}

impl Palette {
    /// Project a theme into terminal colors
    ///
    /// Slots that fail to parse fall back to the matching slot of the default
    /// theme, so a half-typed hex value in the editor never breaks rendering.
    pub fn from_theme(theme: &ThemeConfig) -> Self {
        let defaults = ThemeConfig::default();
        let slot = |value: &str, default: &str| {
            parse_color(value).or_else(|| parse_color(default)).unwrap_or(Color::Reset)
        };

        let c = &theme.colors;
        let d = &defaults.colors;
        let primary = slot(&c.primary, &d.primary);
        let secondary = slot(&c.secondary, &d.secondary);
        let accent = slot(&c.accent, &d.accent);
        let background = slot(&c.background, &d.background);
        let text = slot(&c.text, &d.text);
        let border = slot(&c.border, &d.border);

        Self {
            bg_primary: background,
            bg_secondary: blend(background, text, 0.06),
            bg_tertiary: blend(background, text, 0.16),

            fg_primary: text,
            fg_secondary: blend(text, primary, 0.25),
            fg_muted: blend(text, background, 0.45),

            accent_primary: primary,
            accent_secondary: secondary,
            highlight: accent,

            success: Color::Rgb(16, 185, 129),  // #10b981
            warning: Color::Rgb(245, 158, 11),  // #f59e0b
            error: Color::Rgb(239, 68, 68),     // #ef4444
            info: Color::Rgb(56, 189, 248),     // #38bdf8

            border,
            border_focused: primary,
            selection: blend(background, primary, 0.35),
            cursor: text,

            heading_modifier: heading_modifier(&theme.fonts),
        }
    }
}

/// Parse a CSS color: `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(r, g, b)`, or a common name
pub fn parse_color(input: &str) -> Option<Color> {
    let s = input.trim().to_ascii_lowercase();

    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex);
    }

    if let Some(args) = s.strip_prefix("rgb(").or_else(|| s.strip_prefix("rgba(")) {
        let args = args.strip_suffix(')')?;
        let channels: Vec<u8> = args
            .split(',')
            .take(3)
            .map(|part| part.trim().parse::<u8>().ok())
            .collect::<Option<_>>()?;
        return match channels.as_slice() {
            [r, g, b] => Some(Color::Rgb(*r, *g, *b)),
            _ => None,
        };
    }

    named_color(&s)
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.is_ascii() {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => {
            let mut digits = hex.chars().map(|c| c.to_digit(16).map(|d| (d * 17) as u8));
            Some(Color::Rgb(digits.next()??, digits.next()??, digits.next()??))
        }
        6 | 8 => {
            Some(Color::Rgb(channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?))
        }
        _ => None,
    }
}

fn named_color(name: &str) -> Option<Color> {
    let (r, g, b) = match name {
        "black" => (0, 0, 0),
        "white" => (255, 255, 255),
        "red" => (255, 0, 0),
        "green" => (0, 128, 0),
        "lime" => (0, 255, 0),
        "blue" => (0, 0, 255),
        "navy" => (0, 0, 128),
        "yellow" => (255, 255, 0),
        "orange" => (255, 165, 0),
        "purple" => (128, 0, 128),
        "violet" => (238, 130, 238),
        "pink" => (255, 192, 203),
        "hotpink" => (255, 105, 180),
        "gray" | "grey" => (128, 128, 128),
        "silver" => (192, 192, 192),
        "maroon" => (128, 0, 0),
        "olive" => (128, 128, 0),
        "teal" => (0, 128, 128),
        "cyan" | "aqua" => (0, 255, 255),
        "magenta" | "fuchsia" => (255, 0, 255),
        "gold" => (255, 215, 0),
        "indigo" => (75, 0, 130),
        "turquoise" => (64, 224, 208),
        "coral" => (255, 127, 80),
        "crimson" => (220, 20, 60),
        _ => return None,
    };
    Some(Color::Rgb(r, g, b))
}

/// Mix `amount` of `to` into `from` (0.0 = `from`, 1.0 = `to`)
fn blend(from: Color, to: Color, amount: f32) -> Color {
    match (from, to) {
        (Color::Rgb(r1, g1, b1), Color::Rgb(r2, g2, b2)) => {
            let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * amount).round() as u8;
            Color::Rgb(mix(r1, r2), mix(g1, g2), mix(b1, b2))
        }
        _ => from,
    }
}

/// Terminals have one font, so families and sizes map to text modifiers
fn heading_modifier(fonts: &Fonts) -> Modifier {
    let family = fonts.heading.to_ascii_lowercase();
    let mut modifier = Modifier::BOLD;
    if family.contains("cursive") || (family.contains("serif") && !family.contains("sans")) {
        modifier |= Modifier::ITALIC;
    }
    if length_px(&fonts.size.large).is_some_and(|px| px >= 22.0) {
        modifier |= Modifier::UNDERLINED;
    }
    modifier
}

/// Parse a CSS length into pixels (`px`, `rem`/`em` at 16px, bare numbers)
fn length_px(length: &str) -> Option<f32> {
    let s = length.trim().to_ascii_lowercase();
    if let Some(n) = s.strip_suffix("px") {
        n.trim().parse().ok()
    } else if let Some(n) = s.strip_suffix("rem").or_else(|| s.strip_suffix("em")) {
        n.trim().parse::<f32>().ok().map(|v| v * 16.0)
    } else {
        s.parse().ok()
    }
}

/// Columns for a CSS content width, given the columns available
///
/// One terminal column stands in for ten CSS pixels. Percentages are taken
/// of `available`. The result is clamped to `[min(40, available), available]`.
pub fn content_columns(width: &str, available: u16) -> u16 {
    let floor = available.min(40);
    let s = width.trim();
    let cols = if let Some(pct) = s.strip_suffix('%') {
        pct.trim().parse::<f32>().ok().map(|p| (available as f32 * p / 100.0) as u16)
    } else {
        length_px(s).map(|px| (px / 10.0) as u16)
    };
    cols.unwrap_or(available).clamp(floor, available)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_hex_forms() {
        assert_eq!(parse_color("#6366f1"), Some(Color::Rgb(0x63, 0x66, 0xf1)));
        assert_eq!(parse_color("#FFF"), Some(Color::Rgb(255, 255, 255)));
        assert_eq!(parse_color(" #11182780 "), Some(Color::Rgb(0x11, 0x18, 0x27)));
        assert_eq!(parse_color("#12345"), None);
        assert_eq!(parse_color("#zzzzzz"), None);
    }

    #[test]
    fn parse_rgb_function_and_names() {
        assert_eq!(parse_color("rgb(10, 20, 30)"), Some(Color::Rgb(10, 20, 30)));
        assert_eq!(parse_color("rgba(10,20,30,0.5)"), Some(Color::Rgb(10, 20, 30)));
        assert_eq!(parse_color("HotPink"), Some(Color::Rgb(255, 105, 180)));
        assert_eq!(parse_color("rgb(300, 0, 0)"), None);
        assert_eq!(parse_color("chartreuse-ish"), None);
    }

    #[test]
    fn palette_uses_theme_colors() {
        let palette = Palette::default();
        assert_eq!(palette.bg_primary, Color::Rgb(0x11, 0x18, 0x27));
        assert_eq!(palette.fg_primary, Color::Rgb(0xf9, 0xfa, 0xfb));
        assert_eq!(palette.accent_primary, Color::Rgb(0x63, 0x66, 0xf1));
        assert_eq!(palette.border, Color::Rgb(0x37, 0x41, 0x51));
    }

    #[test]
    fn unparseable_slot_falls_back_to_default_slot() {
        let mut theme = ThemeConfig::default();
        theme.colors.background = "#12".into();
        let palette = Palette::from_theme(&theme);
        assert_eq!(palette.bg_primary, Color::Rgb(0x11, 0x18, 0x27));
    }

    #[test]
    fn blend_moves_toward_target() {
        let mid = blend(Color::Rgb(0, 0, 0), Color::Rgb(200, 100, 50), 0.5);
        assert_eq!(mid, Color::Rgb(100, 50, 25));
        assert_eq!(blend(Color::Reset, Color::Rgb(1, 2, 3), 0.5), Color::Reset);
    }

    #[test]
    fn heading_modifier_follows_fonts() {
        let mut theme = ThemeConfig::default();
        assert_eq!(Palette::from_theme(&theme).heading_modifier, Modifier::BOLD);

        theme.fonts.heading = "Georgia, serif".into();
        theme.fonts.size.large = "22px".into();
        let modifier = Palette::from_theme(&theme).heading_modifier;
        assert!(modifier.contains(Modifier::ITALIC));
        assert!(modifier.contains(Modifier::UNDERLINED));
    }

    #[test]
    fn content_columns_scales_and_clamps() {
        assert_eq!(content_columns("800px", 200), 80);
        assert_eq!(content_columns("1200px", 100), 100);
        assert_eq!(content_columns("50%", 120), 60);
        assert_eq!(content_columns("100px", 120), 40);
        assert_eq!(content_columns("wat", 90), 90);
        assert_eq!(content_columns("600px", 30), 30);
    }
}
