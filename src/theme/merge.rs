//! Typed theme merging
//!
//! Section-by-section, one level deeper for `fonts.size`. The override wins,
//! then the base. Since a base is always a complete [`ThemeConfig`], the
//! built-in defaults enter through [`resolve`] when there is no fallback.

use super::{
    Colors, Customization, FontSizes, Fonts, Layout, PartialColors, PartialCustomization,
    PartialFontSizes, PartialFonts, PartialLayout, PartialThemeConfig, ThemeConfig,
};

/// Overlay `overrides` on `base`
pub fn merge(base: &ThemeConfig, overrides: &PartialThemeConfig) -> ThemeConfig {
    ThemeConfig {
        colors: merge_colors(&base.colors, &overrides.colors),
        fonts: merge_fonts(&base.fonts, &overrides.fonts),
        layout: merge_layout(&base.layout, &overrides.layout),
        customization: merge_customization(&base.customization, &overrides.customization),
    }
}

/// Defaults, then `fallback`, then `incoming`
pub fn resolve(fallback: Option<&ThemeConfig>, incoming: &PartialThemeConfig) -> ThemeConfig {
    match fallback {
        Some(fallback) => merge(fallback, incoming),
        None => merge(&ThemeConfig::default(), incoming),
    }
}

fn pick(over: &Option<String>, base: &str) -> String {
    over.clone().unwrap_or_else(|| base.to_string())
}

fn merge_colors(base: &Colors, over: &PartialColors) -> Colors {
    Colors {
        primary: pick(&over.primary, &base.primary),
        secondary: pick(&over.secondary, &base.secondary),
        accent: pick(&over.accent, &base.accent),
        background: pick(&over.background, &base.background),
        text: pick(&over.text, &base.text),
        border: pick(&over.border, &base.border),
    }
}

fn merge_fonts(base: &Fonts, over: &PartialFonts) -> Fonts {
    Fonts {
        heading: pick(&over.heading, &base.heading),
        body: pick(&over.body, &base.body),
        size: merge_sizes(&base.size, &over.size),
    }
}

fn merge_sizes(base: &FontSizes, over: &PartialFontSizes) -> FontSizes {
    FontSizes {
        small: pick(&over.small, &base.small),
        medium: pick(&over.medium, &base.medium),
        large: pick(&over.large, &base.large),
    }
}

fn merge_layout(base: &Layout, over: &PartialLayout) -> Layout {
    Layout {
        profile_position: over.profile_position.unwrap_or(base.profile_position),
        music_player: over.music_player.unwrap_or(base.music_player),
        friends_list: over.friends_list.unwrap_or(base.friends_list),
        content_width: pick(&over.content_width, &base.content_width),
    }
}

fn merge_customization(base: &Customization, over: &PartialCustomization) -> Customization {
    Customization {
        background_image: over
            .background_image
            .clone()
            .unwrap_or_else(|| base.background_image.clone()),
        profile_music: over.profile_music.clone().unwrap_or_else(|| base.profile_music.clone()),
        animations: over.animations.unwrap_or(base.animations),
        glitter: over.glitter.unwrap_or(base.glitter),
    }
}
