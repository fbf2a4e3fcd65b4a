//! Partial themes built leniently from untrusted JSON

use serde_json::{Map, Value};

use super::{
    Choice, Colors, Customization, FontSizes, Fonts, FriendsListPosition, Layout,
    MusicPlayerPosition, ProfilePosition, ThemeConfig,
};

/// A theme where every leaf may be absent
///
/// Nothing here is validated beyond shape: a leaf of the wrong JSON type, an
/// empty string, or an enum value outside its domain is simply dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialThemeConfig {
    pub colors: PartialColors,
    pub fonts: PartialFonts,
    pub layout: PartialLayout,
    pub customization: PartialCustomization,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialColors {
    pub primary: Option<String>,
    pub secondary: Option<String>,
    pub accent: Option<String>,
    pub background: Option<String>,
    pub text: Option<String>,
    pub border: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialFonts {
    pub heading: Option<String>,
    pub body: Option<String>,
    pub size: PartialFontSizes,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialFontSizes {
    pub small: Option<String>,
    pub medium: Option<String>,
    pub large: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialLayout {
    pub profile_position: Option<ProfilePosition>,
    pub music_player: Option<MusicPlayerPosition>,
    pub friends_list: Option<FriendsListPosition>,
    pub content_width: Option<String>,
}

/// `Some(None)` on a URL field is an explicit "unset"
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialCustomization {
    pub background_image: Option<Option<String>>,
    pub profile_music: Option<Option<String>>,
    pub animations: Option<bool>,
    pub glitter: Option<bool>,
}

impl PartialThemeConfig {
    /// Extract whatever is usable from a JSON value
    pub fn from_value(value: &Value) -> Self {
        let Some(root) = value.as_object() else {
            return Self::default();
        };

        let colors = section(root, "colors");
        let fonts = section(root, "fonts");
        let size = fonts.and_then(|f| section(f, "size"));
        let layout = section(root, "layout");
        let customization = section(root, "customization");

        Self {
            colors: PartialColors {
                primary: text(colors, "primary"),
                secondary: text(colors, "secondary"),
                accent: text(colors, "accent"),
                background: text(colors, "background"),
                text: text(colors, "text"),
                border: text(colors, "border"),
            },
            fonts: PartialFonts {
                heading: text(fonts, "heading"),
                body: text(fonts, "body"),
                size: PartialFontSizes {
                    small: text(size, "small"),
                    medium: text(size, "medium"),
                    large: text(size, "large"),
                },
            },
            layout: PartialLayout {
                profile_position: choice(layout, "profilePosition"),
                music_player: choice(layout, "musicPlayer"),
                friends_list: choice(layout, "friendsList"),
                content_width: text(layout, "contentWidth"),
            },
            customization: PartialCustomization {
                background_image: nullable_text(customization, "backgroundImage"),
                profile_music: nullable_text(customization, "profileMusic"),
                animations: flag(customization, "animations"),
                glitter: flag(customization, "glitter"),
            },
        }
    }

    /// Parse JSON text
    ///
    /// Syntax errors are reported; shape problems are repaired silently.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(text)?;
        Ok(Self::from_value(&value))
    }

    /// Check whether no leaf is present
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl From<&ThemeConfig> for PartialThemeConfig {
    fn from(theme: &ThemeConfig) -> Self {
        let ThemeConfig { colors, fonts, layout, customization } = theme.clone();
        let Colors { primary, secondary, accent, background, text, border } = colors;
        let Fonts { heading, body, size: FontSizes { small, medium, large } } = fonts;
        let Layout { profile_position, music_player, friends_list, content_width } = layout;
        let Customization { background_image, profile_music, animations, glitter } =
            customization;

        Self {
            colors: PartialColors {
                primary: Some(primary),
                secondary: Some(secondary),
                accent: Some(accent),
                background: Some(background),
                text: Some(text),
                border: Some(border),
            },
            fonts: PartialFonts {
                heading: Some(heading),
                body: Some(body),
                size: PartialFontSizes {
                    small: Some(small),
                    medium: Some(medium),
                    large: Some(large),
                },
            },
            layout: PartialLayout {
                profile_position: Some(profile_position),
                music_player: Some(music_player),
                friends_list: Some(friends_list),
                content_width: Some(content_width),
            },
            customization: PartialCustomization {
                background_image: Some(background_image),
                profile_music: Some(profile_music),
                animations: Some(animations),
                glitter: Some(glitter),
            },
        }
    }
}

fn section<'a>(parent: &'a Map<String, Value>, key: &str) -> Option<&'a Map<String, Value>> {
    parent.get(key).and_then(Value::as_object)
}

fn text(section: Option<&Map<String, Value>>, key: &str) -> Option<String> {
    let s = section?.get(key)?.as_str()?.trim();
    (!s.is_empty()).then(|| s.to_string())
}

fn nullable_text(section: Option<&Map<String, Value>>, key: &str) -> Option<Option<String>> {
    match section?.get(key)? {
        Value::Null => Some(None),
        Value::String(s) if s.trim().is_empty() => Some(None),
        Value::String(s) => Some(Some(s.trim().to_string())),
        _ => None,
    }
}

fn flag(section: Option<&Map<String, Value>>, key: &str) -> Option<bool> {
    section?.get(key)?.as_bool()
}

fn choice<C: Choice>(section: Option<&Map<String, Value>>, key: &str) -> Option<C> {
    C::parse(section?.get(key)?.as_str()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn empty_object_is_empty_partial() {
        assert!(PartialThemeConfig::from_value(&json!({})).is_empty());
        assert!(PartialThemeConfig::from_value(&json!([1, 2, 3])).is_empty());
    }

    #[test]
    fn wrong_types_are_dropped() {
        let partial = PartialThemeConfig::from_value(&json!({
            "colors": { "primary": 42, "accent": "#abcdef", "text": "" },
            "fonts": { "size": "huge" },
            "layout": { "profilePosition": "diagonal", "friendsList": "hidden" },
            "customization": { "animations": "yes", "glitter": true }
        }));

        assert_eq!(partial.colors.primary, None);
        assert_eq!(partial.colors.accent.as_deref(), Some("#abcdef"));
        assert_eq!(partial.colors.text, None);
        assert_eq!(partial.fonts.size, PartialFontSizes::default());
        assert_eq!(partial.layout.profile_position, None);
        assert_eq!(partial.layout.friends_list, Some(FriendsListPosition::Hidden));
        assert_eq!(partial.customization.animations, None);
        assert_eq!(partial.customization.glitter, Some(true));
    }

    #[test]
    fn null_url_is_an_explicit_unset() {
        let partial = PartialThemeConfig::from_value(&json!({
            "customization": { "backgroundImage": null, "profileMusic": "https://x.test/a.mp3" }
        }));
        assert_eq!(partial.customization.background_image, Some(None));
        assert_eq!(
            partial.customization.profile_music,
            Some(Some("https://x.test/a.mp3".to_string()))
        );
    }

    #[test]
    fn missing_url_is_absent() {
        let partial = PartialThemeConfig::from_value(&json!({ "customization": {} }));
        assert_eq!(partial.customization.background_image, None);
    }

    #[test]
    fn from_json_reports_syntax_errors() {
        assert!(PartialThemeConfig::from_json("{ not json").is_err());
        assert!(PartialThemeConfig::from_json(r#"{"colors":{"primary":"red"}}"#).is_ok());
    }

    #[test]
    fn full_theme_converts_to_full_partial() {
        let partial = PartialThemeConfig::from(&ThemeConfig::default());
        assert_eq!(partial.colors.border.as_deref(), Some("#374151"));
        assert_eq!(partial.customization.background_image, Some(None));
        assert_eq!(partial.layout.music_player, Some(MusicPlayerPosition::Bottom));
    }
}
