//! Offline keyword mapper
//!
//! Each group below is matched independently against the lower-cased
//! prompt. Within a group the first rule with a matching keyword wins.

use crate::theme::{
    Colors, FontSizes, FriendsListPosition, MusicPlayerPosition, ProfilePosition, ThemeConfig,
};

/// A color scheme: keywords and the six color slots
struct Scheme {
    keywords: &'static [&'static str],
    colors: [&'static str; 6],
}

const SCHEMES: &[Scheme] = &[
    Scheme {
        keywords: &["light", "bright", "white"],
        colors: ["#1e40af", "#3b82f6", "#60a5fa", "#ffffff", "#1f2937", "#e5e7eb"],
    },
    Scheme {
        keywords: &["dark", "night", "black"],
        colors: ["#6366f1", "#8b5cf6", "#a855f7", "#111827", "#f9fafb", "#374151"],
    },
    Scheme {
        keywords: &["sunset", "orange", "warm"],
        colors: ["#f59e0b", "#f97316", "#ef4444", "#fef3c7", "#92400e", "#fcd34d"],
    },
    Scheme {
        keywords: &["ocean", "blue", "water"],
        colors: ["#0891b2", "#06b6d4", "#22d3ee", "#f0f9ff", "#0c4a6e", "#7dd3fc"],
    },
    Scheme {
        keywords: &["forest", "green", "nature"],
        colors: ["#059669", "#10b981", "#34d399", "#f0fdf4", "#064e3b", "#86efac"],
    },
    Scheme {
        keywords: &["pink", "rose", "romantic"],
        colors: ["#e11d48", "#f43f5e", "#fb7185", "#fdf2f8", "#881337", "#fbb6ce"],
    },
    Scheme {
        keywords: &["purple", "violet", "magic"],
        colors: ["#7c3aed", "#8b5cf6", "#a78bfa", "#faf5ff", "#581c87", "#c4b5fd"],
    },
];

const FONT_RULES: &[(&[&str], &str)] = &[
    (&["serif", "elegant", "classic"], "Georgia, serif"),
    (&["mono", "code", "tech"], "Monaco, monospace"),
    (&["comic", "fun", "playful"], "Comic Sans MS, cursive"),
];

const SIZE_RULES: &[(&[&str], [&str; 3])] = &[
    (&["large", "big"], ["14px", "16px", "22px"]),
    (&["small", "compact"], ["10px", "12px", "16px"]),
];

const WIDTH_RULES: &[(&[&str], &str)] =
    &[(&["wide", "full width"], "1200px"), (&["narrow", "compact"], "600px")];

/// First rule in `rules` whose keywords occur in `prompt`
fn first_match<'a, T>(prompt: &str, rules: &'a [(&[&str], T)]) -> Option<&'a T> {
    rules.iter().find(|(keywords, _)| mentions(prompt, keywords)).map(|(_, value)| value)
}

fn mentions(prompt: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| prompt.contains(k))
}

/// Derive a theme from a description using fixed keyword rules
///
/// Starts from `current` (or the defaults) and changes only what the prompt
/// mentions. Deterministic and free of I/O.
pub fn generate_from_prompt(prompt: &str, current: Option<&ThemeConfig>) -> ThemeConfig {
    let prompt = prompt.to_lowercase();
    let mut theme = current.cloned().unwrap_or_default();

    if let Some(scheme) = SCHEMES.iter().find(|s| mentions(&prompt, s.keywords)) {
        let [primary, secondary, accent, background, text, border] =
            scheme.colors.map(String::from);
        theme.colors = Colors { primary, secondary, accent, background, text, border };
    }

    if mentions(&prompt, &["center", "middle"]) {
        theme.layout.profile_position = ProfilePosition::Center;
    } else if prompt.contains("right") {
        theme.layout.profile_position = ProfilePosition::Right;
    }

    if mentions(&prompt, &["music top", "player top"]) {
        theme.layout.music_player = MusicPlayerPosition::Top;
    }

    if mentions(&prompt, &["hide friends", "no friends"]) {
        theme.layout.friends_list = FriendsListPosition::Hidden;
    }

    if let Some(family) = first_match(&prompt, FONT_RULES) {
        theme.fonts.heading = family.to_string();
        theme.fonts.body = family.to_string();
    }

    if let Some([small, medium, large]) = first_match(&prompt, SIZE_RULES) {
        theme.fonts.size = FontSizes {
            small: small.to_string(),
            medium: medium.to_string(),
            large: large.to_string(),
        };
    }

    if mentions(&prompt, &["glitter", "sparkle", "bling"]) {
        theme.customization.glitter = true;
    }

    if mentions(&prompt, &["no animation", "static"]) {
        theme.customization.animations = false;
    }

    if let Some(width) = first_match(&prompt, WIDTH_RULES) {
        theme.layout.content_width = width.to_string();
    }

    theme
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn no_keywords_returns_current() {
        let mut current = ThemeConfig::default();
        current.colors.primary = "#abcdef".into();
        assert_eq!(generate_from_prompt("something unrelated", Some(&current)), current);
        assert_eq!(generate_from_prompt("", None), ThemeConfig::default());
    }

    #[test]
    fn ocean_scheme_replaces_all_colors() {
        let theme = generate_from_prompt("Ocean vibes", None);
        assert_eq!(theme.colors.primary, "#0891b2");
        assert_eq!(theme.colors.background, "#f0f9ff");
        assert_eq!(theme.colors.border, "#7dd3fc");
    }

    #[test]
    fn first_scheme_wins() {
        // "bright" (light) precedes "pink" in rule order
        let theme = generate_from_prompt("bright pink", None);
        assert_eq!(theme.colors.background, "#ffffff");
    }

    #[test]
    fn groups_are_independent() {
        let mut current = ThemeConfig::default();
        current.fonts.heading = "Courier New, monospace".into();
        current.customization.glitter = true;

        let theme = generate_from_prompt("forest, profile on the right", Some(&current));
        assert_eq!(theme.colors.primary, "#059669");
        assert_eq!(theme.layout.profile_position, ProfilePosition::Right);
        assert_eq!(theme.fonts, current.fonts);
        assert_eq!(theme.customization, current.customization);
    }

    #[test]
    fn center_beats_right() {
        let theme = generate_from_prompt("center it, not right", None);
        assert_eq!(theme.layout.profile_position, ProfilePosition::Center);
    }

    #[test]
    fn compact_hits_size_and_width() {
        let theme = generate_from_prompt("compact", None);
        assert_eq!(theme.fonts.size.large, "16px");
        assert_eq!(theme.layout.content_width, "600px");
    }

    #[test]
    fn effects_and_layout_keywords() {
        let theme = generate_from_prompt(
            "Retro with SPARKLE, music top, hide friends, static, wide, big comic text",
            None,
        );
        assert!(theme.customization.glitter);
        assert!(!theme.customization.animations);
        assert_eq!(theme.layout.music_player, MusicPlayerPosition::Top);
        assert_eq!(theme.layout.friends_list, FriendsListPosition::Hidden);
        assert_eq!(theme.layout.content_width, "1200px");
        assert_eq!(theme.fonts.size.medium, "16px");
        assert_eq!(theme.fonts.body, "Comic Sans MS, cursive");
    }

    #[test]
    fn serif_matches_inside_sans_serif() {
        // Substring matching is literal
        let theme = generate_from_prompt("sans-serif please", None);
        assert_eq!(theme.fonts.heading, "Georgia, serif");
    }

    proptest! {
        #[test]
        fn generation_is_deterministic(prompt in "[a-z ]{0,40}") {
            let current = ThemeConfig::default();
            prop_assert_eq!(
                generate_from_prompt(&prompt, Some(&current)),
                generate_from_prompt(&prompt, Some(&current))
            );
        }
    }
}
