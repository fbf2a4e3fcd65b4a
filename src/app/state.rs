//! Application state definitions

use std::time::Instant;

use crate::generator::{EXAMPLE_PROMPTS, GeneratedTheme, GenerationSource};
use crate::page::PageError;
use crate::studio::{ProfileView, parse_theme_json};
use crate::theme::{Palette, PreviewSession, ThemeConfig, ThemeField};

/// Which screen is currently displayed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Screen {
    #[default]
    Landing,
    Profile,
    Editor,
    Generator,
    Help,
}

/// Single-line text buffer with a character cursor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    pub text: String,
    /// Cursor position as a character index
    pub cursor: usize,
}

impl TextInput {
    /// Replace the contents and put the cursor at the end
    pub fn set(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.cursor = self.char_count();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Convert character index to byte index
    fn char_to_byte_index(&self, char_idx: usize) -> usize {
        self.text.char_indices().nth(char_idx).map(|(i, _)| i).unwrap_or(self.text.len())
    }

    fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Insert a character at cursor
    pub fn insert_char(&mut self, c: char) {
        let byte_idx = self.char_to_byte_index(self.cursor);
        self.text.insert(byte_idx, c);
        self.cursor += 1;
    }

    /// Delete character before cursor
    pub fn delete_char(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let byte_idx = self.char_to_byte_index(self.cursor);
            self.text.remove(byte_idx);
        }
    }

    /// Delete character at cursor
    pub fn delete_char_forward(&mut self) {
        if self.cursor < self.char_count() {
            let byte_idx = self.char_to_byte_index(self.cursor);
            self.text.remove(byte_idx);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.char_count() {
            self.cursor += 1;
        }
    }

    pub fn move_start(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.char_count();
    }
}

/// Command line mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CommandMode {
    /// Command line hidden or showing status
    #[default]
    Normal,
    /// Accepting : commands
    Command,
}

/// State for the command line input
#[derive(Debug, Clone, Default)]
pub struct CommandLineState {
    /// Current mode
    pub mode: CommandMode,
    /// Input buffer
    pub input: TextInput,
    /// Status/error message to display (when not in input mode)
    pub message: Option<String>,
    /// Whether message is an error
    pub is_error: bool,
    /// Command history
    pub history: Vec<String>,
    /// Current history index when navigating
    pub history_index: Option<usize>,
}

impl CommandLineState {
    /// Maximum number of history entries to keep
    const MAX_HISTORY: usize = 1000;

    /// Start command mode
    pub fn enter_command_mode(&mut self) {
        self.mode = CommandMode::Command;
        self.input.clear();
        self.message = None;
        self.history_index = None;
    }

    /// Start command mode with a partially typed command
    pub fn enter_with(&mut self, prefix: &str) {
        self.enter_command_mode();
        self.input.set(prefix);
    }

    /// Exit input mode
    pub fn exit_input_mode(&mut self) {
        self.mode = CommandMode::Normal;
        self.input.clear();
    }

    /// Set a status message
    pub fn set_message(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
        self.is_error = false;
    }

    /// Set an error message
    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
        self.is_error = true;
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }

    /// Get the current input with prefix
    pub fn display_text(&self) -> String {
        match self.mode {
            CommandMode::Normal => self.message.clone().unwrap_or_default(),
            CommandMode::Command => format!(":{}", self.input.text),
        }
    }

    pub fn is_input_mode(&self) -> bool {
        self.mode == CommandMode::Command
    }

    pub fn add_to_history(&mut self, cmd: String) {
        if !cmd.is_empty() && self.history.last() != Some(&cmd) {
            if self.history.len() >= Self::MAX_HISTORY {
                self.history.remove(0);
            }
            self.history.push(cmd);
        }
    }

    /// Navigate history up
    pub fn history_up(&mut self) {
        if self.history.is_empty() {
            return;
        }
        match self.history_index {
            None => {
                self.history_index = Some(self.history.len() - 1);
            }
            Some(i) if i > 0 => {
                self.history_index = Some(i - 1);
            }
            _ => {}
        }
        if let Some(i) = self.history_index {
            self.input.set(self.history[i].clone());
        }
    }

    /// Navigate history down
    pub fn history_down(&mut self) {
        if let Some(i) = self.history_index {
            if i + 1 < self.history.len() {
                self.history_index = Some(i + 1);
                self.input.set(self.history[i + 1].clone());
            } else {
                self.history_index = None;
                self.input.clear();
            }
        }
    }
}

/// The profile on screen and its saved theme
#[derive(Debug, Clone, Default)]
pub struct ProfileState {
    pub view: Option<ProfileView>,
    /// Theme the page is rendered with when no preview is active
    pub theme: ThemeConfig,
    pub palette: Palette,
    /// Scroll offset of the posts column
    pub scroll_offset: usize,
    /// A fetch is in flight
    pub loading: bool,
}

impl ProfileState {
    pub fn set_view(&mut self, view: ProfileView) {
        self.set_theme(view.theme());
        self.view = Some(view);
        self.scroll_offset = 0;
        self.loading = false;
    }

    /// New saved theme, e.g. after a save or revert
    pub fn set_theme(&mut self, theme: ThemeConfig) {
        self.palette = Palette::from_theme(&theme);
        self.theme = theme;
    }

    /// Whether the signed-in user may edit this page
    pub fn editable(&self) -> bool {
        self.view.as_ref().is_some_and(|v| v.editable)
    }
}

/// State for the theme editor form
#[derive(Debug, Clone, Default)]
pub struct EditorState {
    /// Index into [`ThemeField::ALL`]
    pub selected: usize,
    /// Whether the selected field's buffer is being typed into
    pub editing: bool,
    pub buffer: TextInput,
    /// Scroll offset for short terminals
    pub scroll_offset: usize,
    /// Visible height in rows (updated on render)
    pub visible_height: usize,
}

impl EditorState {
    pub fn selected_field(&self) -> ThemeField {
        ThemeField::ALL[self.selected.min(ThemeField::ALL.len() - 1)]
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < ThemeField::ALL.len() {
            self.selected += 1;
        }
        self.ensure_selection_visible();
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
        self.ensure_selection_visible();
    }

    pub fn select(&mut self, index: usize) {
        self.selected = index.min(ThemeField::ALL.len() - 1);
        self.ensure_selection_visible();
    }

    /// Ensure the selected field is visible by adjusting scroll offset
    pub fn ensure_selection_visible(&mut self) {
        if self.selected < self.scroll_offset {
            self.scroll_offset = self.selected;
        }
        let visible = self.visible_height;
        if visible > 0 && self.selected >= self.scroll_offset + visible {
            self.scroll_offset = self.selected + 1 - visible;
        }
    }

    /// Start typing into the selected field, seeded with its value
    pub fn begin_edit(&mut self, theme: &ThemeConfig) {
        self.buffer.set(self.selected_field().value(theme));
        self.editing = true;
    }

    pub fn cancel_edit(&mut self) {
        self.editing = false;
        self.buffer.clear();
    }
}

/// State for the prompt-driven generator panel
#[derive(Debug, Clone, Default)]
pub struct GeneratorState {
    pub prompt: TextInput,
    /// Highlighted entry of [`EXAMPLE_PROMPTS`]
    pub example: Option<usize>,
    /// A generation request is in flight
    pub pending: bool,
    /// Id of the newest request; results tagged with an older id are stale
    pub request_id: u64,
    /// Which generator produced the current draft
    pub last_source: Option<GenerationSource>,
}

impl GeneratorState {
    /// Mark a request as in flight and return the id its result must carry
    pub fn begin_request(&mut self) -> u64 {
        self.request_id += 1;
        self.pending = true;
        self.request_id
    }

    /// Forget the in-flight request so its result is dropped
    pub fn cancel_request(&mut self) {
        self.pending = false;
        self.request_id += 1;
    }

    /// Whether a result tagged `id` answers the request still in flight
    pub fn is_current(&self, id: u64) -> bool {
        self.pending && self.request_id == id
    }

    /// Move through the example prompts, copying the choice into the prompt
    pub fn cycle_example(&mut self, forward: bool) {
        let len = EXAMPLE_PROMPTS.len();
        let next = match self.example {
            Some(i) if forward => (i + 1) % len,
            Some(i) => (i + len - 1) % len,
            None if forward => 0,
            None => len - 1,
        };
        self.example = Some(next);
        self.prompt.set(EXAMPLE_PROMPTS[next]);
    }
}

/// State for the landing animation
#[derive(Debug, Clone)]
pub struct LandingAnimation {
    /// When the animation started
    pub start_time: Instant,

    /// Current animation frame (50ms per frame)
    pub current_frame: usize,

    /// Whether animation is complete (ready for input)
    pub complete: bool,
}

impl Default for LandingAnimation {
    fn default() -> Self {
        Self { start_time: Instant::now(), current_frame: 0, complete: false }
    }
}

impl LandingAnimation {
    /// Frame timing constants
    pub const MS_PER_FRAME: u128 = 50;
    pub const STARS_END_FRAME: usize = 30;
    pub const PAUSE_END_FRAME: usize = 40;
    pub const TEXT_END_FRAME: usize = 60;
    pub const TAGLINE_END_FRAME: usize = 70;

    pub const TITLE: &'static str = "SKYSPACE";

    /// Advance the animation based on elapsed time
    pub fn tick(&mut self) {
        let elapsed_ms = self.start_time.elapsed().as_millis();
        self.current_frame = (elapsed_ms / Self::MS_PER_FRAME) as usize;
        self.complete = self.current_frame >= Self::TAGLINE_END_FRAME;
    }

    /// How much of the star field is lit (0.0 to 1.0)
    pub fn stars_progress(&self) -> f32 {
        if self.current_frame >= Self::STARS_END_FRAME {
            1.0
        } else {
            self.current_frame as f32 / Self::STARS_END_FRAME as f32
        }
    }

    /// How many characters of the title to show
    pub fn title_chars(&self) -> usize {
        let len = Self::TITLE.len();
        if self.current_frame < Self::PAUSE_END_FRAME {
            0
        } else if self.current_frame >= Self::TEXT_END_FRAME {
            len
        } else {
            let text_frame = self.current_frame - Self::PAUSE_END_FRAME;
            let span = (Self::TEXT_END_FRAME - Self::PAUSE_END_FRAME) as f32;
            ((text_frame as f32 / span) * len as f32).min(len as f32) as usize
        }
    }

    pub fn show_tagline(&self) -> bool {
        self.current_frame >= Self::TEXT_END_FRAME
    }
}

/// Full application state
#[derive(Debug, Default)]
pub struct AppState {
    /// Current screen
    pub screen: Screen,

    /// Screen to go back to when help closes
    pub return_screen: Screen,

    /// Landing animation state
    pub landing_animation: LandingAnimation,

    pub profile: ProfileState,

    pub editor: EditorState,

    pub generator: GeneratorState,

    /// Unsaved draft shared by the editor and the generator
    pub preview: Option<PreviewSession>,

    /// Command line state
    pub command_line: CommandLineState,

    /// Animation clock for glitter, advanced every frame
    pub tick: u64,

    /// Handle of the signed-in account, for the header
    pub signed_in: Option<String>,

    /// Which generator `a` will use
    pub ai_status: String,
}

impl AppState {
    /// Theme on screen: the draft while previewing, else the saved theme
    pub fn theme(&self) -> &ThemeConfig {
        match &self.preview {
            Some(session) => session.draft(),
            None => &self.profile.theme,
        }
    }

    pub fn palette(&self) -> &Palette {
        match &self.preview {
            Some(session) => session.palette(),
            None => &self.profile.palette,
        }
    }

    /// The preview, started from the saved theme if none is active
    pub fn preview_mut(&mut self) -> &mut PreviewSession {
        let saved = &self.profile.theme;
        self.preview.get_or_insert_with(|| PreviewSession::begin(saved))
    }

    /// Drop the draft so the saved theme shows again
    pub fn close_preview(&mut self) {
        self.preview = None;
        self.editor.cancel_edit();
        self.generator.cancel_request();
        self.generator.last_source = None;
    }

    /// Apply a finished generation to the draft
    ///
    /// Returns false when the request was cancelled or superseded.
    pub fn accept_generated(&mut self, id: u64, generated: GeneratedTheme) -> bool {
        if !self.generator.is_current(id) || self.preview.is_none() {
            return false;
        }
        self.generator.pending = false;
        self.generator.last_source = Some(generated.source);
        self.preview_mut().replace(generated.theme);
        true
    }

    /// Merge theme JSON over the open draft
    pub fn import_theme_json(&mut self, text: &str) -> Result<(), PageError> {
        let Some(session) = self.preview.as_mut() else {
            return Err(PageError::Validation("Open the editor before importing".to_string()));
        };
        let theme = parse_theme_json(text, session.draft())?;
        session.replace(theme);
        Ok(())
    }

    pub fn is_previewing(&self) -> bool {
        self.preview.as_ref().is_some_and(|p| p.is_modified())
    }

    pub fn show_help(&mut self) {
        if self.screen != Screen::Help {
            self.return_screen = self.screen;
        }
        self.screen = Screen::Help;
    }

    pub fn close_help(&mut self) {
        self.screen = match self.return_screen {
            Screen::Help | Screen::Landing => Screen::Profile,
            other => other,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn text_input_edits_by_character() {
        let mut input = TextInput::default();
        input.set("héllo");
        assert_eq!(input.cursor, 5);
        input.move_left();
        input.delete_char();
        assert_eq!(input.text, "hélo");
        input.move_start();
        input.delete_char_forward();
        input.insert_char('H');
        assert_eq!(input.text, "Hélo");
        assert_eq!(input.cursor, 1);
    }

    #[test]
    fn history_navigation() {
        let mut cmd = CommandLineState::default();
        cmd.add_to_history("open alice.test".into());
        cmd.add_to_history("open alice.test".into());
        cmd.add_to_history("edit".into());
        assert_eq!(cmd.history.len(), 2);

        cmd.enter_command_mode();
        cmd.history_up();
        assert_eq!(cmd.input.text, "edit");
        cmd.history_up();
        assert_eq!(cmd.input.text, "open alice.test");
        assert_eq!(cmd.input.cursor, 15);
        cmd.history_down();
        cmd.history_down();
        assert!(cmd.input.is_empty());
        assert_eq!(cmd.display_text(), ":");
    }

    #[test]
    fn editor_selection_scrolls() {
        let mut editor = EditorState { visible_height: 5, ..Default::default() };
        for _ in 0..7 {
            editor.select_next();
        }
        assert_eq!(editor.selected, 7);
        assert_eq!(editor.scroll_offset, 3);

        editor.select(0);
        assert_eq!(editor.scroll_offset, 0);

        editor.select(usize::MAX);
        assert_eq!(editor.selected_field(), ThemeField::Glitter);
    }

    #[test]
    fn example_cycling_wraps() {
        let mut generator = GeneratorState::default();
        generator.cycle_example(false);
        assert_eq!(generator.example, Some(EXAMPLE_PROMPTS.len() - 1));
        generator.cycle_example(true);
        assert_eq!(generator.example, Some(0));
        assert_eq!(generator.prompt.text, EXAMPLE_PROMPTS[0]);
    }

    #[test]
    fn preview_overrides_saved_palette_until_closed() {
        let mut state = AppState::default();
        let mut saved = ThemeConfig::default();
        saved.colors.background = "#000000".into();
        state.profile.set_theme(saved.clone());

        state.preview_mut().set_field(ThemeField::Background, "#ffffff");
        assert!(state.is_previewing());
        assert_eq!(state.theme().colors.background, "#ffffff");

        state.close_preview();
        assert_eq!(state.theme(), &saved);
        assert_eq!(state.palette(), &Palette::from_theme(&saved));
    }

    fn generated(background: &str) -> GeneratedTheme {
        let mut theme = ThemeConfig::default();
        theme.colors.background = background.into();
        GeneratedTheme { theme, source: GenerationSource::Keywords }
    }

    #[test]
    fn closing_the_draft_cancels_generation() {
        let mut state = AppState::default();
        state.preview_mut();
        let id = state.generator.begin_request();
        state.close_preview();
        assert!(!state.generator.pending);

        // Reopened before the old result landed
        state.preview_mut();
        assert!(!state.accept_generated(id, generated("#123456")));
        assert_eq!(state.theme(), &ThemeConfig::default());

        let id = state.generator.begin_request();
        assert!(state.accept_generated(id, generated("#654321")));
        assert!(!state.generator.pending);
        assert_eq!(state.theme().colors.background, "#654321");
        assert_eq!(state.generator.last_source, Some(GenerationSource::Keywords));
    }

    #[test]
    fn newer_request_supersedes_older_result() {
        let mut state = AppState::default();
        state.preview_mut();
        let old = state.generator.begin_request();
        state.generator.cancel_request();
        let new = state.generator.begin_request();
        assert!(!state.accept_generated(old, generated("#111111")));
        assert!(state.generator.pending);
        assert!(state.accept_generated(new, generated("#222222")));
    }

    #[test]
    fn import_fills_missing_fields_from_the_draft() {
        let mut state = AppState::default();
        let mut own = ThemeConfig::default();
        own.colors.text = "#abcdef".into();
        own.customization.glitter = true;
        state.profile.set_theme(own);
        state.preview_mut();

        state.import_theme_json(r##"{"colors": {"background": "#000000"}}"##).unwrap();
        let theme = state.theme();
        assert_eq!(theme.colors.background, "#000000");
        assert_eq!(theme.colors.text, "#abcdef");
        assert!(theme.customization.glitter);
    }

    #[test]
    fn import_needs_an_open_draft() {
        let mut state = AppState::default();
        let err = state.import_theme_json(r#"{"colors": {}}"#).unwrap_err();
        assert!(matches!(err, PageError::Validation(_)));
        assert!(state.preview.is_none());
    }

    #[test]
    fn landing_title_reveals_fully() {
        let mut anim = LandingAnimation::default();
        assert_eq!(anim.title_chars(), 0);
        anim.current_frame = LandingAnimation::TEXT_END_FRAME;
        assert_eq!(anim.title_chars(), LandingAnimation::TITLE.len());
        assert!(anim.show_tagline());
    }

    #[test]
    fn help_returns_to_previous_screen() {
        let mut state = AppState { screen: Screen::Editor, ..Default::default() };
        state.show_help();
        state.show_help();
        state.close_help();
        assert_eq!(state.screen, Screen::Editor);
    }
}
