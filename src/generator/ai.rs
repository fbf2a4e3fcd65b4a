//! Claude-backed theme generation with keyword fallback

use std::future::Future;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use super::{GeneratedTheme, GenerationSource, generate_from_prompt};
use crate::claude::ClaudeError;
use crate::theme::{FONT_OPTIONS, PartialThemeConfig, ThemeConfig, WIDTH_OPTIONS, resolve};

/// Code-fence markers the model sometimes wraps its answer in
static FENCE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"```(?:json)?\s*").unwrap());

/// A service that turns a system and user prompt into raw text
pub trait TextGenerator {
    fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> impl Future<Output = Result<String, ClaudeError>> + Send;
}

/// Reasons the AI path could not produce a theme
///
/// None of these reach the user as failures: [`generate_with_ai`] logs them
/// and falls back to the keyword mapper.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("No API key configured")]
    MissingCredentials,

    #[error("Generation service failed: {0}")]
    Service(#[from] ClaudeError),

    #[error("Invalid JSON response from AI: {0}")]
    InvalidResponse(String),
}

/// Instruction describing the exact theme shape and allowed values
pub fn system_prompt() -> String {
    let quote = |options: &[&str]| {
        options.iter().map(|o| format!("\"{}\"", o)).collect::<Vec<_>>().join(", ")
    };

    format!(
        r##"You are a MySpace-style theme generator. Convert user descriptions into JSON theme configurations.

IMPORTANT: Return ONLY a valid JSON object, no additional text or markdown formatting.

Theme structure:
{{
  "colors": {{
    "primary": "#hex",
    "secondary": "#hex",
    "accent": "#hex",
    "background": "#hex",
    "text": "#hex",
    "border": "#hex"
  }},
  "fonts": {{
    "heading": "font-family",
    "body": "font-family",
    "size": {{
      "small": "px",
      "medium": "px",
      "large": "px"
    }}
  }},
  "layout": {{
    "profilePosition": "left|right|center",
    "musicPlayer": "top|bottom|sidebar",
    "friendsList": "left|right|hidden",
    "contentWidth": "px"
  }},
  "customization": {{
    "backgroundImage": "url or null",
    "profileMusic": "url or null",
    "animations": boolean,
    "glitter": boolean
  }}
}}

Font options: {}
Width options: {}"##,
        quote(FONT_OPTIONS),
        quote(WIDTH_OPTIONS)
    )
}

/// Request text: the current theme plus what the user asked for
pub fn user_prompt(prompt: &str, current: &ThemeConfig) -> String {
    format!(
        "Current theme: {}\n\nUser request: \"{}\"\n\nGenerate a theme that matches this \
         description. Modify the current theme based on the user's request.",
        current.to_pretty_json(),
        prompt
    )
}

fn clean_response(raw: &str) -> String {
    FENCE_RE.replace_all(raw.trim(), "").trim().to_string()
}

/// Parse model output into a complete theme
///
/// Fences are stripped, then the text must be one JSON object. Whatever it
/// carries is merged over `current` and the defaults.
pub fn parse_response(
    raw: &str,
    current: Option<&ThemeConfig>,
) -> Result<ThemeConfig, GenerationError> {
    let cleaned = clean_response(raw);
    let value: Value = serde_json::from_str(&cleaned)
        .map_err(|e| GenerationError::InvalidResponse(e.to_string()))?;

    if !value.is_object() {
        return Err(GenerationError::InvalidResponse("expected a JSON object".to_string()));
    }

    Ok(resolve(current, &PartialThemeConfig::from_value(&value)))
}

async fn request_theme<G: TextGenerator>(
    prompt: &str,
    current: Option<&ThemeConfig>,
    service: Option<&G>,
) -> Result<ThemeConfig, GenerationError> {
    let service = service.ok_or(GenerationError::MissingCredentials)?;
    let base = current.cloned().unwrap_or_default();

    let raw = service.generate(&system_prompt(), &user_prompt(prompt, &base)).await?;
    debug!(len = raw.len(), "Received AI theme response");

    parse_response(&raw, Some(&base))
}

/// Generate with Claude when available, otherwise by keyword matching
///
/// Never fails. The returned [`GenerationSource`] says which path produced
/// the theme.
pub async fn generate_with_ai<G: TextGenerator>(
    prompt: &str,
    current: Option<&ThemeConfig>,
    service: Option<&G>,
) -> GeneratedTheme {
    match request_theme(prompt, current, service).await {
        Ok(theme) => GeneratedTheme { theme, source: GenerationSource::Ai },
        Err(e) => {
            warn!("AI theme generation unavailable, falling back to keywords: {}", e);
            GeneratedTheme {
                theme: generate_from_prompt(prompt, current),
                source: GenerationSource::Keywords,
            }
        }
    }
}
