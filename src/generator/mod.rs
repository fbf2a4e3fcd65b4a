//! Text-to-theme generation
//!
//! Two paths produce a theme from a free-text description: the offline
//! keyword mapper and Claude. The AI path always degrades to the keyword
//! mapper, so callers get a complete theme either way.

mod ai;
mod keywords;

pub use ai::{
    GenerationError, TextGenerator, generate_with_ai, parse_response, system_prompt, user_prompt,
};
pub use keywords::generate_from_prompt;

use crate::theme::ThemeConfig;

/// Prompts offered in the generator panel
pub const EXAMPLE_PROMPTS: &[&str] = &[
    "Dark mode with purple accents and glitter effects",
    "Ocean theme with blue colors and large fonts",
    "Retro MySpace with bright colors and Comic Sans font",
    "Minimalist design with centered layout and no animations",
    "Forest theme with green colors and serif fonts",
    "Sunset theme with orange and pink gradients",
    "Professional theme with clean layout and monospace fonts",
    "Playful theme with rainbow colors and fun animations",
];

/// Which generator produced a theme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationSource {
    Ai,
    Keywords,
}

impl GenerationSource {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ai => "Claude",
            Self::Keywords => "keyword matching",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedTheme {
    pub theme: ThemeConfig,
    pub source: GenerationSource,
}
