//! Profile page themes
//!
//! A [`ThemeConfig`] is the full visual configuration of a profile page. It is
//! always fully populated: forms, JSON imports, and generators produce a
//! [`PartialThemeConfig`], and [`merge`]/[`resolve`] turn that into a complete
//! theme with a fixed precedence (defaults, then fallback, then incoming).

mod field;
mod merge;
mod palette;
mod partial;
pub mod preview;

pub use field::{FieldKind, ThemeField};
pub use merge::{merge, resolve};
pub use palette::{Palette, content_columns, parse_color};
pub use partial::{
    PartialColors, PartialCustomization, PartialFontSizes, PartialFonts, PartialLayout,
    PartialThemeConfig,
};
pub use preview::{PreviewSession, render_variables};

use serde::{Deserialize, Deserializer, Serialize};

/// Font families offered by the editor and the AI generator
pub const FONT_OPTIONS: &[&str] = &[
    "Arial, sans-serif",
    "Georgia, serif",
    "Times New Roman, serif",
    "Comic Sans MS, cursive",
    "Monaco, monospace",
    "Courier New, monospace",
    "Helvetica, sans-serif",
];

/// Content widths offered by the editor and the AI generator
pub const WIDTH_OPTIONS: &[&str] = &["600px", "800px", "1000px", "1200px"];

/// Complete visual configuration of a profile page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeConfig {
    pub colors: Colors,
    pub fonts: Fonts,
    pub layout: Layout,
    pub customization: Customization,
}

impl ThemeConfig {
    /// Build a theme from arbitrary JSON, repairing anything missing or malformed
    pub fn from_value(value: &serde_json::Value) -> Self {
        resolve(None, &PartialThemeConfig::from_value(value))
    }

    /// Pretty JSON, as shown in the editor and written by `export`
    pub fn to_pretty_json(&self) -> String {
        // Plain strings, enums, and bools cannot fail to serialize
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// Serde helper: load a stored theme through the repair path
pub(crate) fn deserialize_lenient<'de, D>(deserializer: D) -> Result<ThemeConfig, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(ThemeConfig::from_value(&value))
}

/// Serde helper: nullable variant of [`deserialize_lenient`]
pub(crate) fn deserialize_lenient_opt<'de, D>(
    deserializer: D,
) -> Result<Option<ThemeConfig>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.filter(|v| !v.is_null()).map(|v| ThemeConfig::from_value(&v)))
}

/// The six named color slots
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Colors {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub background: String,
    pub text: String,
    pub border: String,
}

impl Default for Colors {
    fn default() -> Self {
        Self {
            primary: "#6366f1".into(),
            secondary: "#8b5cf6".into(),
            accent: "#a855f7".into(),
            background: "#111827".into(),
            text: "#f9fafb".into(),
            border: "#374151".into(),
        }
    }
}

/// Font families and the size scale
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fonts {
    pub heading: String,
    pub body: String,
    pub size: FontSizes,
}

impl Default for Fonts {
    fn default() -> Self {
        Self {
            heading: "Arial, sans-serif".into(),
            body: "Helvetica, sans-serif".into(),
            size: FontSizes::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontSizes {
    pub small: String,
    pub medium: String,
    pub large: String,
}

impl Default for FontSizes {
    fn default() -> Self {
        Self { small: "12px".into(), medium: "14px".into(), large: "18px".into() }
    }
}

/// Placement of the page's building blocks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    pub profile_position: ProfilePosition,
    pub music_player: MusicPlayerPosition,
    pub friends_list: FriendsListPosition,
    pub content_width: String,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            profile_position: ProfilePosition::Left,
            music_player: MusicPlayerPosition::Bottom,
            friends_list: FriendsListPosition::Right,
            content_width: "800px".into(),
        }
    }
}

/// Media and effects
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customization {
    pub background_image: Option<String>,
    pub profile_music: Option<String>,
    pub animations: bool,
    pub glitter: bool,
}

impl Default for Customization {
    fn default() -> Self {
        Self { background_image: None, profile_music: None, animations: true, glitter: false }
    }
}

/// A closed set of string values (layout enums)
pub trait Choice: Copy + PartialEq + Sized + 'static {
    /// Every value, in display order
    const ALL: &'static [Self];

    /// Wire/display name
    fn as_str(&self) -> &'static str;

    /// Parse a wire name, ignoring case and surrounding whitespace
    fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL.iter().copied().find(|c| c.as_str().eq_ignore_ascii_case(s))
    }

    /// Next (or previous) value, wrapping around
    fn cycle(self, forward: bool) -> Self {
        let len = Self::ALL.len();
        let idx = Self::ALL.iter().position(|c| *c == self).unwrap_or(0);
        let next = if forward { (idx + 1) % len } else { (idx + len - 1) % len };
        Self::ALL[next]
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfilePosition {
    #[default]
    Left,
    Right,
    Center,
}

impl Choice for ProfilePosition {
    const ALL: &'static [Self] = &[Self::Left, Self::Right, Self::Center];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Center => "center",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MusicPlayerPosition {
    Top,
    #[default]
    Bottom,
    Sidebar,
}

impl Choice for MusicPlayerPosition {
    const ALL: &'static [Self] = &[Self::Top, Self::Bottom, Self::Sidebar];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Sidebar => "sidebar",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FriendsListPosition {
    Left,
    #[default]
    Right,
    Hidden,
}

impl Choice for FriendsListPosition {
    const ALL: &'static [Self] = &[Self::Left, Self::Right, Self::Hidden];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Hidden => "hidden",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn default_theme_matches_stock_values() {
        let theme = ThemeConfig::default();
        assert_eq!(theme.colors.primary, "#6366f1");
        assert_eq!(theme.colors.background, "#111827");
        assert_eq!(theme.fonts.heading, "Arial, sans-serif");
        assert_eq!(theme.fonts.size.large, "18px");
        assert_eq!(theme.layout.profile_position, ProfilePosition::Left);
        assert_eq!(theme.layout.music_player, MusicPlayerPosition::Bottom);
        assert_eq!(theme.layout.friends_list, FriendsListPosition::Right);
        assert_eq!(theme.layout.content_width, "800px");
        assert!(theme.customization.animations);
        assert!(!theme.customization.glitter);
        assert_eq!(theme.customization.background_image, None);
    }

    #[test]
    fn theme_serializes_with_camel_case_keys() {
        let value = serde_json::to_value(ThemeConfig::default()).unwrap();
        assert_eq!(value["layout"]["profilePosition"], json!("left"));
        assert_eq!(value["layout"]["musicPlayer"], json!("bottom"));
        assert_eq!(value["layout"]["friendsList"], json!("right"));
        assert_eq!(value["layout"]["contentWidth"], json!("800px"));
        assert_eq!(value["customization"]["backgroundImage"], json!(null));
        assert_eq!(value["customization"]["profileMusic"], json!(null));
        assert_eq!(value["fonts"]["size"]["medium"], json!("14px"));
    }

    #[test]
    fn from_value_repairs_partial_json() {
        let theme = ThemeConfig::from_value(&json!({
            "colors": { "primary": "#ff0000" },
            "layout": { "profilePosition": "center" }
        }));
        assert_eq!(theme.colors.primary, "#ff0000");
        assert_eq!(theme.colors.secondary, "#8b5cf6");
        assert_eq!(theme.layout.profile_position, ProfilePosition::Center);
        assert_eq!(theme.layout.content_width, "800px");
    }

    #[test]
    fn from_value_of_non_object_is_default() {
        assert_eq!(ThemeConfig::from_value(&json!("nope")), ThemeConfig::default());
        assert_eq!(ThemeConfig::from_value(&json!(null)), ThemeConfig::default());
    }

    #[test]
    fn choice_parse_and_cycle() {
        assert_eq!(ProfilePosition::parse(" Center "), Some(ProfilePosition::Center));
        assert_eq!(ProfilePosition::parse("top"), None);
        assert_eq!(FriendsListPosition::Hidden.cycle(true), FriendsListPosition::Left);
        assert_eq!(MusicPlayerPosition::Top.cycle(false), MusicPlayerPosition::Sidebar);
    }

    #[test]
    fn pretty_json_round_trips() {
        let theme = ThemeConfig::default();
        let parsed: ThemeConfig = serde_json::from_str(&theme.to_pretty_json()).unwrap();
        assert_eq!(parsed, theme);
    }
}
