//! Live preview of unsaved theme edits
//!
//! A [`PreviewSession`] is owned by whatever is editing (the editor form or
//! the generator panel). It holds the theme as it was when editing started
//! and the draft being changed. The renderer is handed the session's
//! [`Palette`] explicitly, so nothing outside the session sees the draft.

use super::{Palette, PartialThemeConfig, ThemeConfig, ThemeField, merge};

#[derive(Debug, Clone)]
pub struct PreviewSession {
    original: ThemeConfig,
    draft: ThemeConfig,
    palette: Palette,
}

impl PreviewSession {
    /// Start previewing on top of `theme`
    pub fn begin(theme: &ThemeConfig) -> Self {
        Self { original: theme.clone(), draft: theme.clone(), palette: Palette::from_theme(theme) }
    }

    pub fn draft(&self) -> &ThemeConfig {
        &self.draft
    }

    pub fn original(&self) -> &ThemeConfig {
        &self.original
    }

    /// Palette of the draft, recomputed on every change
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn is_modified(&self) -> bool {
        self.draft != self.original
    }

    /// Overlay a partial theme on the draft
    pub fn apply(&mut self, partial: &PartialThemeConfig) {
        let next = merge(&self.draft, partial);
        self.replace(next);
    }

    /// Set one field from text input
    ///
    /// Returns false when the input was rejected and the draft is unchanged.
    pub fn set_field(&mut self, field: ThemeField, input: &str) -> bool {
        let partial = field.partial(input);
        if partial.is_empty() {
            return false;
        }
        self.apply(&partial);
        true
    }

    /// Swap in a whole new draft (generator output)
    pub fn replace(&mut self, theme: ThemeConfig) {
        self.palette = Palette::from_theme(&theme);
        self.draft = theme;
    }

    /// Throw away edits
    pub fn reset(&mut self) {
        let original = self.original.clone();
        self.replace(original);
    }

    /// After a save, the persisted theme becomes the new baseline
    pub fn rebase(&mut self, saved: &ThemeConfig) {
        self.original = saved.clone();
        self.replace(saved.clone());
    }

    /// Named render variables for the draft
    pub fn variables(&self) -> Vec<(&'static str, String)> {
        render_variables(&self.draft)
    }
}

/// Flatten a theme into named render variables (`--theme-primary`, ...)
///
/// Unset URLs render as `none`.
pub fn render_variables(theme: &ThemeConfig) -> Vec<(&'static str, String)> {
    ThemeField::ALL
        .iter()
        .map(|field| {
            let value = field.value(theme);
            let value = if value.is_empty() { "none".to_string() } else { value };
            (variable_name(*field), value)
        })
        .collect()
}

fn variable_name(field: ThemeField) -> &'static str {
    match field {
        ThemeField::Primary => "--theme-primary",
        ThemeField::Secondary => "--theme-secondary",
        ThemeField::Accent => "--theme-accent",
        ThemeField::Background => "--theme-background",
        ThemeField::Text => "--theme-text",
        ThemeField::Border => "--theme-border",
        ThemeField::HeadingFont => "--theme-font-heading",
        ThemeField::BodyFont => "--theme-font-body",
        ThemeField::SizeSmall => "--theme-font-size-small",
        ThemeField::SizeMedium => "--theme-font-size-medium",
        ThemeField::SizeLarge => "--theme-font-size-large",
        ThemeField::ProfilePosition => "--theme-profile-position",
        ThemeField::MusicPlayer => "--theme-music-player",
        ThemeField::FriendsList => "--theme-friends-list",
        ThemeField::ContentWidth => "--theme-content-width",
        ThemeField::BackgroundImage => "--theme-background-image",
        ThemeField::ProfileMusic => "--theme-profile-music",
        ThemeField::Animations => "--theme-animations",
        ThemeField::Glitter => "--theme-glitter",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use ratatui::style::Color;

    #[test]
    fn edits_stay_in_the_draft() {
        let saved = ThemeConfig::default();
        let mut session = PreviewSession::begin(&saved);
        assert!(!session.is_modified());

        assert!(session.set_field(ThemeField::Background, "#ffffff"));
        assert!(session.is_modified());
        assert_eq!(session.draft().colors.background, "#ffffff");
        assert_eq!(session.original(), &saved);
        assert_eq!(session.palette().bg_primary, Color::Rgb(255, 255, 255));
    }

    #[test]
    fn rejected_input_leaves_draft_alone() {
        let mut session = PreviewSession::begin(&ThemeConfig::default());
        assert!(!session.set_field(ThemeField::MusicPlayer, "floating"));
        assert!(!session.is_modified());
    }

    #[test]
    fn reset_and_rebase() {
        let mut session = PreviewSession::begin(&ThemeConfig::default());
        session.set_field(ThemeField::Glitter, "true");
        session.reset();
        assert_eq!(session.draft(), &ThemeConfig::default());

        let mut saved = ThemeConfig::default();
        saved.colors.accent = "gold".into();
        session.rebase(&saved);
        assert!(!session.is_modified());
        assert_eq!(session.palette().highlight, Color::Rgb(255, 215, 0));
    }

    #[test]
    fn render_variables_cover_every_field() {
        let vars = render_variables(&ThemeConfig::default());
        assert_eq!(vars.len(), ThemeField::ALL.len());
        assert_eq!(vars[0], ("--theme-primary", "#6366f1".to_string()));
        assert!(vars.contains(&("--theme-background-image", "none".to_string())));
        assert!(vars.contains(&("--theme-glitter", "false".to_string())));
    }
}
