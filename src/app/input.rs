//! Event handling utilities

use crossterm::event::{KeyCode, KeyModifiers};

/// Vim-style key mapping (basic, without modifiers)
pub fn vim_key_to_action(key: KeyCode) -> Option<Action> {
    match key {
        KeyCode::Char('j') => Some(Action::Down),
        KeyCode::Char('k') => Some(Action::Up),
        KeyCode::Char('h') => Some(Action::PrevOption),
        KeyCode::Char('l') => Some(Action::NextOption),
        KeyCode::Char('g') => Some(Action::Top),
        KeyCode::Char('G') => Some(Action::Bottom),
        _ => plain_key_to_action(key),
    }
}

/// Keys that work with or without vim mode
pub fn plain_key_to_action(key: KeyCode) -> Option<Action> {
    match key {
        KeyCode::Down => Some(Action::Down),
        KeyCode::Up => Some(Action::Up),
        KeyCode::Left | KeyCode::BackTab => Some(Action::PrevOption),
        KeyCode::Right | KeyCode::Tab => Some(Action::NextOption),
        KeyCode::Home => Some(Action::Top),
        KeyCode::End => Some(Action::Bottom),
        KeyCode::PageDown => Some(Action::PageDown),
        KeyCode::PageUp => Some(Action::PageUp),
        KeyCode::Enter => Some(Action::Select),
        KeyCode::Esc => Some(Action::Back),
        KeyCode::Char(':') => Some(Action::Command),
        KeyCode::Char('?') => Some(Action::Help),
        KeyCode::Char('e') => Some(Action::Edit),
        KeyCode::Char('a') => Some(Action::Generate),
        KeyCode::Char('o') => Some(Action::Open),
        KeyCode::Char('y') => Some(Action::Yank),
        // Note: 'q' intentionally not mapped - use :q command to quit
        _ => None,
    }
}

/// Key mapping with modifiers (for Ctrl combinations)
pub fn key_with_modifier_to_action(
    key: KeyCode,
    modifiers: KeyModifiers,
    vim_mode: bool,
) -> Option<Action> {
    if modifiers.contains(KeyModifiers::CONTROL) {
        control_action(key)
    } else if vim_mode {
        vim_key_to_action(key)
    } else {
        plain_key_to_action(key)
    }
}

/// Ctrl combinations, also honored while typing into a text field
pub fn control_action(key: KeyCode) -> Option<Action> {
    match key {
        KeyCode::Char('s') => Some(Action::Save),
        KeyCode::Char('r') => Some(Action::ResetDraft),
        KeyCode::Char('d') => Some(Action::PageDown),
        KeyCode::Char('u') => Some(Action::PageUp),
        _ => None,
    }
}

/// Actions that can be taken in the app
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    // Navigation
    Up,
    Down,
    Top,
    Bottom,
    PageUp,
    PageDown,

    // Option cycling for enum, font and toggle fields
    NextOption,
    PrevOption,

    // Selection
    Select,
    Back,

    // Screens
    Edit,
    Generate,
    Open,
    Help,
    Command,

    // Draft
    Save,
    ResetDraft,
    Yank,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vim_j_maps_to_down() {
        assert_eq!(vim_key_to_action(KeyCode::Char('j')), Some(Action::Down));
    }

    #[test]
    fn unknown_key_returns_none() {
        assert_eq!(vim_key_to_action(KeyCode::Char('x')), None);
        assert_eq!(vim_key_to_action(KeyCode::Char('q')), None);
    }

    #[test]
    fn tab_cycles_options() {
        assert_eq!(plain_key_to_action(KeyCode::Tab), Some(Action::NextOption));
        assert_eq!(plain_key_to_action(KeyCode::BackTab), Some(Action::PrevOption));
        assert_eq!(vim_key_to_action(KeyCode::Char('l')), Some(Action::NextOption));
    }

    #[test]
    fn vim_letters_ignored_without_vim_mode() {
        let none = KeyModifiers::NONE;
        assert_eq!(key_with_modifier_to_action(KeyCode::Char('j'), none, false), None);
        assert_eq!(
            key_with_modifier_to_action(KeyCode::Char('j'), none, true),
            Some(Action::Down)
        );
        assert_eq!(
            key_with_modifier_to_action(KeyCode::Down, none, false),
            Some(Action::Down)
        );
    }

    #[test]
    fn ctrl_s_saves() {
        assert_eq!(
            key_with_modifier_to_action(KeyCode::Char('s'), KeyModifiers::CONTROL, true),
            Some(Action::Save)
        );
        assert_eq!(control_action(KeyCode::Char('r')), Some(Action::ResetDraft));
    }
}
