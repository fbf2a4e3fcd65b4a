//! Application state and event handling

pub mod command;
pub mod input;
pub mod state;

use std::io::{self, Stdout};

use anyhow::{Context, Result};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc;
use tracing::{error, warn};

use crate::claude::ClaudeModel;
use crate::generator::{GeneratedTheme, generate_with_ai};
use crate::page::Page;
use crate::studio::Studio;
use crate::theme::Palette;
use crate::ui;
use command::{Command, ParseResult, parse_command};
use input::{Action, control_action, key_with_modifier_to_action};
use state::{AppState, Screen, TextInput};

/// Results of work that runs off the key handler
enum AppEvent {
    Generated { id: u64, generated: GeneratedTheme },
}

/// The main application
pub struct App {
    /// Pages, session and network clients
    studio: Studio,

    /// Current application state
    state: AppState,

    /// Terminal backend
    terminal: Terminal<CrosstermBackend<Stdout>>,

    events_tx: mpsc::UnboundedSender<AppEvent>,
    events_rx: mpsc::UnboundedReceiver<AppEvent>,
}

impl App {
    /// Create a new application instance
    pub fn new(studio: Studio) -> Result<Self> {
        let terminal = Self::setup_terminal()?;
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let mut app = Self { studio, state: AppState::default(), terminal, events_tx, events_rx };
        app.sync_status();
        Ok(app)
    }

    /// Set up the terminal for TUI rendering
    fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(terminal)
    }

    /// Restore the terminal to its original state
    fn restore_terminal(&mut self) -> Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
        self.terminal.show_cursor()?;
        Ok(())
    }

    fn draw(&mut self) -> Result<()> {
        self.terminal.draw(|frame| ui::draw(frame, &mut self.state))?;
        Ok(())
    }

    /// Run the application main loop
    pub async fn run(&mut self) -> Result<()> {
        // Set up panic hook to restore terminal
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
            original_hook(panic_info);
        }));

        loop {
            self.draw()?;

            if event::poll(std::time::Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        match self.handle_key(key).await {
                            Ok(true) => break,
                            Ok(false) => {}
                            Err(e) => {
                                error!("Error handling key: {:#}", e);
                                self.state.command_line.set_error(format!("{:#}", e));
                            }
                        }
                    }
                }
            }

            while let Ok(event) = self.events_rx.try_recv() {
                self.handle_event(event);
            }

            // Update animations
            if self.state.screen == Screen::Landing {
                self.state.landing_animation.tick();
            }
            if self.state.theme().customization.animations {
                self.state.tick = self.state.tick.wrapping_add(1);
            }
        }

        self.restore_terminal()?;
        Ok(())
    }

    /// Refresh the header fields that come from the studio
    fn sync_status(&mut self) {
        self.state.signed_in = self.studio.session().handle().map(String::from);
        self.state.ai_status = self.studio.ai_status();
    }

    /// Handle a key press, returns true if should exit
    async fn handle_key(&mut self, key: KeyEvent) -> Result<bool> {
        if self.state.command_line.is_input_mode() {
            return self.handle_command_key(key).await;
        }

        match self.state.screen {
            Screen::Landing => {
                self.state.screen = Screen::Profile;
                self.open_start_profile().await;
                Ok(false)
            }
            Screen::Profile => self.handle_profile_key(key).await,
            Screen::Editor => self.handle_editor_key(key),
            Screen::Generator => {
                self.handle_generator_key(key);
                Ok(false)
            }
            Screen::Help => {
                self.state.close_help();
                Ok(false)
            }
        }
    }

    fn action(&self, key: KeyEvent) -> Option<Action> {
        key_with_modifier_to_action(key.code, key.modifiers, self.studio.config().vim_mode)
    }

    /// Actions shared by every screen that is not typing into a field
    fn handle_common(&mut self, action: Action) -> Result<bool> {
        match action {
            Action::Command => self.state.command_line.enter_command_mode(),
            Action::Open => self.state.command_line.enter_with("open "),
            Action::Help => self.state.show_help(),
            Action::Yank => self.yank()?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    async fn handle_profile_key(&mut self, key: KeyEvent) -> Result<bool> {
        let Some(action) = self.action(key) else {
            return Ok(false);
        };

        if self.handle_common(action)? {
            return Ok(false);
        }

        let profile = &mut self.state.profile;
        match action {
            Action::Down => profile.scroll_offset += 1,
            Action::Up => profile.scroll_offset = profile.scroll_offset.saturating_sub(1),
            Action::PageDown => profile.scroll_offset += 5,
            Action::PageUp => profile.scroll_offset = profile.scroll_offset.saturating_sub(5),
            Action::Top => profile.scroll_offset = 0,
            Action::Edit => self.start_editing(Screen::Editor, false).await,
            Action::Generate => self.start_editing(Screen::Generator, false).await,
            _ => {}
        }
        Ok(false)
    }

    fn handle_editor_key(&mut self, key: KeyEvent) -> Result<bool> {
        if self.state.editor.editing {
            self.handle_field_input(key);
            return Ok(false);
        }

        let Some(action) = self.action(key) else {
            return Ok(false);
        };

        if self.handle_common(action)? {
            return Ok(false);
        }

        match action {
            Action::Down => self.state.editor.select_next(),
            Action::Up => self.state.editor.select_prev(),
            Action::Top => self.state.editor.select(0),
            Action::Bottom => self.state.editor.select(usize::MAX),
            Action::NextOption | Action::PrevOption => {
                let field = self.state.editor.selected_field();
                let forward = action == Action::NextOption;
                if let Some(next) = field.cycle(self.state.theme(), forward) {
                    self.state.preview_mut().set_field(field, &next);
                }
            }
            Action::Select => {
                let theme = self.state.theme().clone();
                self.state.editor.begin_edit(&theme);
            }
            Action::Generate => self.state.screen = Screen::Generator,
            Action::Save => self.save_draft(),
            Action::ResetDraft => self.reset_draft(),
            Action::Back => self.close_editing(),
            _ => {}
        }
        Ok(false)
    }

    /// Typing into the selected editor field
    fn handle_field_input(&mut self, key: KeyEvent) {
        let editor = &mut self.state.editor;
        match key.code {
            KeyCode::Esc => editor.cancel_edit(),
            KeyCode::Enter => self.commit_field(),
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.commit_field();
                self.save_draft();
            }
            _ => edit_text(&mut editor.buffer, key),
        }
    }

    fn commit_field(&mut self) {
        let field = self.state.editor.selected_field();
        let value = self.state.editor.buffer.text.clone();
        self.state.editor.cancel_edit();

        if self.state.preview_mut().set_field(field, &value) {
            self.state.command_line.clear_message();
        } else {
            self.state
                .command_line
                .set_error(format!("Invalid value for {}: {}", field.label(), value.trim()));
        }
    }

    fn handle_generator_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match control_action(key.code) {
                Some(Action::Save) => self.save_draft(),
                Some(Action::ResetDraft) => self.reset_draft(),
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Esc => self.close_editing(),
            KeyCode::Tab => self.state.screen = Screen::Editor,
            KeyCode::Up => self.state.generator.cycle_example(false),
            KeyCode::Down => self.state.generator.cycle_example(true),
            KeyCode::Enter => {
                let prompt = self.state.generator.prompt.text.trim().to_string();
                if !prompt.is_empty() {
                    self.request_generation(prompt);
                }
            }
            _ => {
                edit_text(&mut self.state.generator.prompt, key);
                self.state.generator.example = None;
            }
        }
    }

    async fn handle_command_key(&mut self, key: KeyEvent) -> Result<bool> {
        let cmd = &mut self.state.command_line;
        match key.code {
            KeyCode::Esc => cmd.exit_input_mode(),
            KeyCode::Enter => {
                let line = cmd.input.text.clone();
                // Keep app passwords out of history
                if !line.trim_start().starts_with("login") {
                    cmd.add_to_history(line.clone());
                }
                cmd.exit_input_mode();
                return self.run_command_line(&line).await;
            }
            KeyCode::Backspace if cmd.input.is_empty() => cmd.exit_input_mode(),
            KeyCode::Up => cmd.history_up(),
            KeyCode::Down => cmd.history_down(),
            _ => edit_text(&mut cmd.input, key),
        }
        Ok(false)
    }

    async fn run_command_line(&mut self, line: &str) -> Result<bool> {
        let cmd = match parse_command(line) {
            ParseResult::Ok(cmd) => cmd,
            ParseResult::UnknownCommand(name) => {
                self.state.command_line.set_error(format!("Unknown command: {}", name));
                return Ok(false);
            }
            ParseResult::MissingArgument(usage) => {
                self.state.command_line.set_error(format!("Missing argument: :{}", usage));
                return Ok(false);
            }
            ParseResult::InvalidArgument(msg) => {
                self.state.command_line.set_error(msg);
                return Ok(false);
            }
        };

        let quit = self.execute(cmd).await?;
        self.sync_status();
        Ok(quit)
    }

    /// Run a parsed command, returns true if should exit
    async fn execute(&mut self, cmd: Command) -> Result<bool> {
        match cmd {
            Command::Open(actor) => self.open_profile(&actor).await,
            Command::Edit => self.start_editing(Screen::Editor, true).await,
            Command::Generate(prompt) => {
                self.start_editing(Screen::Generator, true).await;
                if self.state.screen == Screen::Generator {
                    self.state.generator.prompt.set(prompt.clone());
                    self.request_generation(prompt);
                }
            }
            Command::Save => self.save_draft(),
            Command::Discard => self.close_editing(),
            Command::Revert => self.revert(),
            Command::Import(path) => {
                let text = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read {:?}", path))?;
                self.start_editing(Screen::Editor, true).await;
                if self.state.preview.is_some() {
                    self.state.import_theme_json(&text)?;
                    self.state
                        .command_line
                        .set_message(format!("Imported {:?}. :save to keep it", path));
                }
            }
            Command::Export(path) => {
                std::fs::write(&path, self.state.theme().to_pretty_json())
                    .with_context(|| format!("Failed to write {:?}", path))?;
                self.state.command_line.set_message(format!("Exported theme to {:?}", path));
            }
            Command::Yank => self.yank()?,
            Command::Login { handle, password } => {
                self.state.command_line.set_message(format!("Signing in as {}...", handle));
                self.draw()?;
                let page = self.studio.login(&handle, &password).await?;
                self.open_profile(page.did.as_str()).await;
                self.state.command_line.set_message(format!("Signed in as @{}", handle));
            }
            Command::Logout => {
                self.studio.logout()?;
                self.state.close_preview();
                if let Some(view) = self.state.profile.view.as_mut() {
                    view.editable = false;
                }
                self.state.screen = Screen::Profile;
                self.state.command_line.set_message("Signed out");
            }
            Command::ClaudeKey(key) => {
                self.studio.set_api_key(&key)?;
                self.state.command_line.set_message("API key stored in system keyring");
            }
            Command::ClaudeModel(name) => match ClaudeModel::parse(&name) {
                Some(model) => {
                    self.studio.set_model(model)?;
                    self.state
                        .command_line
                        .set_message(format!("Using {}", model.display_name()));
                }
                None => {
                    let names: Vec<_> =
                        ClaudeModel::all().iter().map(|m| m.display_name()).collect();
                    self.state.command_line.set_error(format!(
                        "Unknown model {}. Available: {}",
                        name,
                        names.join(", ")
                    ));
                }
            },
            Command::Ai(enabled) => {
                self.studio.set_ai_enabled(enabled)?;
                let msg = if enabled { "AI generation on" } else { "AI generation off" };
                self.state.command_line.set_message(msg);
            }
            Command::Help => self.state.show_help(),
            Command::Quit => return Ok(true),
            Command::Nop => self.state.command_line.clear_message(),
        }
        Ok(false)
    }

    /// Open the signed-in page, else the last viewed one
    async fn open_start_profile(&mut self) {
        let start = match self.studio.session().did() {
            Some(did) => Some(did.to_string()),
            None => self.studio.session().last_profile.clone(),
        };

        match start {
            Some(actor) => self.open_profile(&actor).await,
            None => self.state.command_line.set_message(
                "Welcome! :login <handle> <app-password> to edit your page, or :open <handle>",
            ),
        }
    }

    async fn open_profile(&mut self, actor: &str) {
        self.state.profile.loading = true;
        self.state.command_line.set_message(format!("Loading {}...", actor));
        if let Err(e) = self.draw() {
            warn!("Failed to draw loading state: {}", e);
        }

        match self.studio.load_profile(actor).await {
            Ok(view) => {
                self.state.close_preview();
                let cmd = &mut self.state.command_line;
                match (&view.load_error, view.editable) {
                    (Some(err), _) => cmd.set_error(format!("Some profile data is missing: {err}")),
                    (None, true) => cmd.set_message("Your page. e to edit, a to generate"),
                    (None, false) => {
                        cmd.set_message(format!("Viewing {} (read-only)", view.title()))
                    }
                }
                self.state.profile.set_view(view);
                self.state.screen = Screen::Profile;
            }
            Err(e) => {
                self.state.profile.loading = false;
                self.state.command_line.set_error(format!("{:#}", e));
            }
        }
    }

    /// Enter the editor or generator on the signed-in user's page
    ///
    /// From a key press on someone else's page this only shows a notice.
    /// From a command it switches to the user's own page first.
    async fn start_editing(&mut self, screen: Screen, switch_to_own: bool) {
        if !self.state.profile.editable() {
            let own = self.studio.session().did().cloned();
            match own {
                None => {
                    self.state
                        .command_line
                        .set_error("Log in to edit your page: :login <handle> <app-password>");
                    return;
                }
                Some(did) if switch_to_own => {
                    self.open_profile(did.as_str()).await;
                    if !self.state.profile.editable() {
                        return;
                    }
                }
                Some(_) => {
                    let title = self.state.profile.view.as_ref().map(|v| v.title());
                    self.state.command_line.set_error(format!(
                        "Read-only: {} belongs to someone else. :edit opens your own page",
                        title.unwrap_or_else(|| "this page".to_string())
                    ));
                    return;
                }
            }
        }

        self.state.preview_mut();
        self.state.screen = screen;
    }

    fn request_generation(&mut self, prompt: String) {
        if self.state.generator.pending {
            self.state.command_line.set_message("Still generating...");
            return;
        }

        let service = self.studio.generator(false);
        let current = self.state.theme().clone();
        let tx = self.events_tx.clone();
        let id = self.state.generator.begin_request();
        self.state.command_line.set_message("Generating theme...");

        tokio::spawn(async move {
            let generated = generate_with_ai(&prompt, Some(&current), service.as_ref()).await;
            let _ = tx.send(AppEvent::Generated { id, generated });
        });
    }

    fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Generated { id, generated } => {
                let source = generated.source;
                // Dropped if the draft was closed while the request ran
                if !self.state.accept_generated(id, generated) {
                    return;
                }
                self.state.command_line.set_message(format!(
                    "Generated with {}. Ctrl-S to save, Esc to discard",
                    source.label()
                ));
            }
        }
    }

    fn save_draft(&mut self) {
        let Some(draft) = self.state.preview.as_ref().map(|p| p.draft().clone()) else {
            self.state.command_line.set_message("Nothing to save");
            return;
        };

        match self.studio.save_theme(draft) {
            Ok(page) => {
                if let Some(session) = self.state.preview.as_mut() {
                    session.rebase(&page.current_theme);
                }
                self.show_saved(page);
                self.state.command_line.set_message("Theme saved");
            }
            Err(e) => {
                error!("Failed to save theme: {}", e);
                let hint =
                    if e.is_retryable() { ". Your draft is kept, try :save again" } else { "" };
                self.state.command_line.set_error(format!("Save failed: {}{}", e, hint));
            }
        }
    }

    fn revert(&mut self) {
        match self.studio.revert() {
            Ok(page) => {
                self.state.close_preview();
                self.show_saved(page);
                self.state.command_line.set_message("Reverted to the previous theme");
            }
            Err(e) => self.state.command_line.set_error(format!("Revert failed: {}", e)),
        }
    }

    /// Reflect a persisted page in the profile view if it is on screen
    fn show_saved(&mut self, page: Page) {
        let profile = &mut self.state.profile;
        if let Some(view) = profile.view.as_mut().filter(|v| v.did == page.did) {
            profile.theme = page.current_theme.clone();
            profile.palette = Palette::from_theme(&page.current_theme);
            view.page = Some(page);
        }
    }

    fn reset_draft(&mut self) {
        if let Some(session) = self.state.preview.as_mut() {
            session.reset();
            self.state.command_line.set_message("Draft reset to the saved theme");
        }
    }

    /// Leave the editor or generator, restoring the saved theme
    fn close_editing(&mut self) {
        if self.state.is_previewing() {
            self.state.command_line.set_message("Changes discarded");
        }
        self.state.close_preview();
        self.state.screen = Screen::Profile;
    }

    fn yank(&mut self) -> Result<()> {
        let json = self.state.theme().to_pretty_json();
        let mut clipboard = arboard::Clipboard::new().context("Clipboard unavailable")?;
        clipboard.set_text(json).context("Failed to copy to clipboard")?;
        self.state.command_line.set_message("Theme JSON copied to clipboard");
        Ok(())
    }
}

/// Line-editing keys shared by every text input
fn edit_text(input: &mut TextInput, key: KeyEvent) {
    match key.code {
        KeyCode::Backspace => input.delete_char(),
        KeyCode::Delete => input.delete_char_forward(),
        KeyCode::Left => input.move_left(),
        KeyCode::Right => input.move_right(),
        KeyCode::Home => input.move_start(),
        KeyCode::End => input.move_end(),
        KeyCode::Char(c) => input.insert_char(c),
        _ => {}
    }
}

impl Drop for App {
    fn drop(&mut self) {
        let _ = self.restore_terminal();
    }
}
