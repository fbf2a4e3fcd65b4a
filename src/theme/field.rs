//! Addressable theme leaves for form editing

use serde_json::{Value, json};

use super::{Choice, FONT_OPTIONS, PartialThemeConfig, ThemeConfig, WIDTH_OPTIONS};

/// How a field is edited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text color (hex or CSS name)
    Color,
    /// Font family, free text or one of [`FONT_OPTIONS`]
    FontFamily,
    /// CSS length
    Length,
    /// Closed set of layout values
    Choice,
    /// Content width, free text or one of [`WIDTH_OPTIONS`]
    Width,
    /// Nullable URL
    Url,
    /// Boolean flag
    Toggle,
}

/// One editable leaf of a [`ThemeConfig`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeField {
    Primary,
    Secondary,
    Accent,
    Background,
    Text,
    Border,
    HeadingFont,
    BodyFont,
    SizeSmall,
    SizeMedium,
    SizeLarge,
    ProfilePosition,
    MusicPlayer,
    FriendsList,
    ContentWidth,
    BackgroundImage,
    ProfileMusic,
    Animations,
    Glitter,
}

impl ThemeField {
    /// Every field, in form order
    pub const ALL: &'static [ThemeField] = &[
        Self::Primary,
        Self::Secondary,
        Self::Accent,
        Self::Background,
        Self::Text,
        Self::Border,
        Self::HeadingFont,
        Self::BodyFont,
        Self::SizeSmall,
        Self::SizeMedium,
        Self::SizeLarge,
        Self::ProfilePosition,
        Self::MusicPlayer,
        Self::FriendsList,
        Self::ContentWidth,
        Self::BackgroundImage,
        Self::ProfileMusic,
        Self::Animations,
        Self::Glitter,
    ];

    /// Section heading shown above the field
    pub fn section(&self) -> &'static str {
        self.path().0
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Primary => "Primary",
            Self::Secondary => "Secondary",
            Self::Accent => "Accent",
            Self::Background => "Background",
            Self::Text => "Text",
            Self::Border => "Border",
            Self::HeadingFont => "Heading font",
            Self::BodyFont => "Body font",
            Self::SizeSmall => "Small size",
            Self::SizeMedium => "Medium size",
            Self::SizeLarge => "Large size",
            Self::ProfilePosition => "Profile position",
            Self::MusicPlayer => "Music player",
            Self::FriendsList => "Friends list",
            Self::ContentWidth => "Content width",
            Self::BackgroundImage => "Background image",
            Self::ProfileMusic => "Profile music",
            Self::Animations => "Animations",
            Self::Glitter => "Glitter",
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Primary
            | Self::Secondary
            | Self::Accent
            | Self::Background
            | Self::Text
            | Self::Border => FieldKind::Color,
            Self::HeadingFont | Self::BodyFont => FieldKind::FontFamily,
            Self::SizeSmall | Self::SizeMedium | Self::SizeLarge => FieldKind::Length,
            Self::ProfilePosition | Self::MusicPlayer | Self::FriendsList => FieldKind::Choice,
            Self::ContentWidth => FieldKind::Width,
            Self::BackgroundImage | Self::ProfileMusic => FieldKind::Url,
            Self::Animations | Self::Glitter => FieldKind::Toggle,
        }
    }

    /// JSON location: (section, optional sub-object, key)
    fn path(&self) -> (&'static str, Option<&'static str>, &'static str) {
        match self {
            Self::Primary => ("colors", None, "primary"),
            Self::Secondary => ("colors", None, "secondary"),
            Self::Accent => ("colors", None, "accent"),
            Self::Background => ("colors", None, "background"),
            Self::Text => ("colors", None, "text"),
            Self::Border => ("colors", None, "border"),
            Self::HeadingFont => ("fonts", None, "heading"),
            Self::BodyFont => ("fonts", None, "body"),
            Self::SizeSmall => ("fonts", Some("size"), "small"),
            Self::SizeMedium => ("fonts", Some("size"), "medium"),
            Self::SizeLarge => ("fonts", Some("size"), "large"),
            Self::ProfilePosition => ("layout", None, "profilePosition"),
            Self::MusicPlayer => ("layout", None, "musicPlayer"),
            Self::FriendsList => ("layout", None, "friendsList"),
            Self::ContentWidth => ("layout", None, "contentWidth"),
            Self::BackgroundImage => ("customization", None, "backgroundImage"),
            Self::ProfileMusic => ("customization", None, "profileMusic"),
            Self::Animations => ("customization", None, "animations"),
            Self::Glitter => ("customization", None, "glitter"),
        }
    }

    /// Current value, formatted for display and as the starting edit buffer
    pub fn value(&self, theme: &ThemeConfig) -> String {
        let c = &theme.colors;
        let f = &theme.fonts;
        let l = &theme.layout;
        let x = &theme.customization;
        match self {
            Self::Primary => c.primary.clone(),
            Self::Secondary => c.secondary.clone(),
            Self::Accent => c.accent.clone(),
            Self::Background => c.background.clone(),
            Self::Text => c.text.clone(),
            Self::Border => c.border.clone(),
            Self::HeadingFont => f.heading.clone(),
            Self::BodyFont => f.body.clone(),
            Self::SizeSmall => f.size.small.clone(),
            Self::SizeMedium => f.size.medium.clone(),
            Self::SizeLarge => f.size.large.clone(),
            Self::ProfilePosition => l.profile_position.as_str().to_string(),
            Self::MusicPlayer => l.music_player.as_str().to_string(),
            Self::FriendsList => l.friends_list.as_str().to_string(),
            Self::ContentWidth => l.content_width.clone(),
            Self::BackgroundImage => x.background_image.clone().unwrap_or_default(),
            Self::ProfileMusic => x.profile_music.clone().unwrap_or_default(),
            Self::Animations => x.animations.to_string(),
            Self::Glitter => x.glitter.to_string(),
        }
    }

    /// A one-leaf partial theme carrying `input` for this field
    ///
    /// The leaf goes through the same lenient JSON path as any other
    /// incoming theme, so an invalid value yields an empty partial.
    pub fn partial(&self, input: &str) -> PartialThemeConfig {
        let input = input.trim();
        let leaf = match self.kind() {
            FieldKind::Toggle => match input.to_ascii_lowercase().as_str() {
                "true" | "on" | "yes" | "1" => json!(true),
                "false" | "off" | "no" | "0" => json!(false),
                _ => Value::Null,
            },
            FieldKind::Url if input.is_empty() || input.eq_ignore_ascii_case("none") => {
                Value::Null
            }
            _ => json!(input),
        };

        if leaf.is_null() && self.kind() != FieldKind::Url {
            return PartialThemeConfig::default();
        }

        let (section, sub, key) = self.path();
        let value = match sub {
            Some(sub) => json!({ section: { sub: { key: leaf } } }),
            None => json!({ section: { key: leaf } }),
        };
        PartialThemeConfig::from_value(&value)
    }

    /// Next option for fields with a known value list, `None` for free text
    pub fn cycle(&self, theme: &ThemeConfig, forward: bool) -> Option<String> {
        let l = &theme.layout;
        let next = match self {
            Self::ProfilePosition => l.profile_position.cycle(forward).as_str().to_string(),
            Self::MusicPlayer => l.music_player.cycle(forward).as_str().to_string(),
            Self::FriendsList => l.friends_list.cycle(forward).as_str().to_string(),
            Self::HeadingFont | Self::BodyFont => {
                cycle_option(FONT_OPTIONS, &self.value(theme), forward)
            }
            Self::ContentWidth => cycle_option(WIDTH_OPTIONS, &self.value(theme), forward),
            Self::Animations => (!theme.customization.animations).to_string(),
            Self::Glitter => (!theme.customization.glitter).to_string(),
            _ => return None,
        };
        Some(next)
    }
}

fn cycle_option(options: &[&str], current: &str, forward: bool) -> String {
    let len = options.len();
    let next = match options.iter().position(|o| o.eq_ignore_ascii_case(current)) {
        Some(idx) if forward => (idx + 1) % len,
        Some(idx) => (idx + len - 1) % len,
        None => 0,
    };
    options[next].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::{FriendsListPosition, merge};

    #[test]
    fn every_field_has_a_value_on_the_default_theme() {
        let theme = ThemeConfig::default();
        for field in ThemeField::ALL {
            let value = field.value(&theme);
            if field.kind() != FieldKind::Url {
                assert!(!value.is_empty(), "{:?} should have a value", field);
            }
        }
    }

    #[test]
    fn partial_targets_a_single_leaf() {
        let base = ThemeConfig::default();
        let merged = merge(&base, &ThemeField::SizeMedium.partial("15px"));
        assert_eq!(merged.fonts.size.medium, "15px");
        assert_eq!(merged.fonts.size.small, base.fonts.size.small);
        assert_eq!(merged.colors, base.colors);
    }

    #[test]
    fn partial_rejects_out_of_domain_choice() {
        assert!(ThemeField::FriendsList.partial("upside-down").is_empty());
        let merged = merge(&ThemeConfig::default(), &ThemeField::FriendsList.partial("hidden"));
        assert_eq!(merged.layout.friends_list, FriendsListPosition::Hidden);
    }

    #[test]
    fn partial_toggle_and_url_inputs() {
        let mut base = ThemeConfig::default();
        base.customization.profile_music = Some("https://music.test/song.mp3".into());

        let merged = merge(&base, &ThemeField::Glitter.partial("on"));
        assert!(merged.customization.glitter);

        assert!(ThemeField::Glitter.partial("maybe").is_empty());

        let cleared = merge(&base, &ThemeField::ProfileMusic.partial(""));
        assert_eq!(cleared.customization.profile_music, None);
    }

    #[test]
    fn cycle_walks_known_options() {
        let theme = ThemeConfig::default();
        assert_eq!(ThemeField::ProfilePosition.cycle(&theme, true).as_deref(), Some("right"));
        assert_eq!(ThemeField::ContentWidth.cycle(&theme, true).as_deref(), Some("1000px"));
        assert_eq!(
            ThemeField::HeadingFont.cycle(&theme, true).as_deref(),
            Some("Georgia, serif")
        );
        assert_eq!(ThemeField::Glitter.cycle(&theme, true).as_deref(), Some("true"));
        assert_eq!(ThemeField::Primary.cycle(&theme, true), None);
    }

    #[test]
    fn cycle_from_custom_value_starts_at_first_option() {
        let mut theme = ThemeConfig::default();
        theme.layout.content_width = "73ch".into();
        assert_eq!(ThemeField::ContentWidth.cycle(&theme, false).as_deref(), Some("600px"));
    }
}
