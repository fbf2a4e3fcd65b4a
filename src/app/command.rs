//! Command parsing for the command line

use std::path::PathBuf;

/// Parsed command from the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Open a profile: :open <did|handle>
    Open(String),
    /// Edit the signed-in user's theme: :edit
    Edit,
    /// Generate a theme from a description: :generate <prompt>
    Generate(String),
    /// Persist the draft: :save or :apply
    Save,
    /// Throw the draft away: :discard
    Discard,
    /// Swap current and previous themes: :revert
    Revert,
    /// Load theme JSON into the draft: :import <path>
    Import(PathBuf),
    /// Write the on-screen theme as JSON: :export <path>
    Export(PathBuf),
    /// Copy the on-screen theme JSON to the clipboard: :yank
    Yank,
    /// Sign in: :login <handle> <app-password>
    Login { handle: String, password: String },
    /// Sign out: :logout
    Logout,
    /// Set Claude API key: :claude-key <api-key>
    ClaudeKey(String),
    /// Set Claude model: :claude-model <haiku|sonnet|opus>
    ClaudeModel(String),
    /// Toggle AI generation: :ai on|off
    Ai(bool),
    /// Show help: :help or :h
    Help,
    /// Quit the application: :q or :quit
    Quit,
    /// Clear message: (empty command)
    Nop,
}

/// Result of parsing a command
#[derive(Debug)]
pub enum ParseResult {
    /// Successfully parsed command
    Ok(Command),
    /// Unknown command
    UnknownCommand(String),
    /// Command needs an argument
    MissingArgument(String),
    /// Argument present but not usable
    InvalidArgument(String),
}

/// Parse a command string (without the leading :)
pub fn parse_command(input: &str) -> ParseResult {
    let input = input.trim();

    if input.is_empty() {
        return ParseResult::Ok(Command::Nop);
    }

    // Split into command and arguments
    let mut parts = input.splitn(2, char::is_whitespace);
    let cmd = parts.next().unwrap_or("");
    let args = parts.next().map(|s| s.trim()).unwrap_or("");

    let needs = |name: &str, build: fn(&str) -> Command| {
        if args.is_empty() {
            ParseResult::MissingArgument(name.to_string())
        } else {
            ParseResult::Ok(build(args))
        }
    };

    match cmd.to_lowercase().as_str() {
        "open" | "o" => needs("open", |a| Command::Open(a.to_string())),
        "edit" | "e" => ParseResult::Ok(Command::Edit),
        "generate" | "gen" | "g" => needs("generate", |a| Command::Generate(a.to_string())),
        "save" | "apply" | "w" => ParseResult::Ok(Command::Save),
        "discard" | "reset" => ParseResult::Ok(Command::Discard),
        "revert" | "undo" => ParseResult::Ok(Command::Revert),
        "import" => needs("import", |a| Command::Import(PathBuf::from(a))),
        "export" => needs("export", |a| Command::Export(PathBuf::from(a))),
        "yank" | "y" => ParseResult::Ok(Command::Yank),
        "login" => parse_login(args),
        "logout" => ParseResult::Ok(Command::Logout),
        "claude-key" | "ck" => needs("claude-key", |a| Command::ClaudeKey(a.to_string())),
        "claude-model" | "cm" => needs("claude-model", |a| Command::ClaudeModel(a.to_string())),
        "ai" => match args.to_lowercase().as_str() {
            "" => ParseResult::MissingArgument("ai".to_string()),
            "on" | "true" => ParseResult::Ok(Command::Ai(true)),
            "off" | "false" => ParseResult::Ok(Command::Ai(false)),
            other => {
                ParseResult::InvalidArgument(format!("ai: expected on or off, got {}", other))
            }
        },
        "quit" | "q" => ParseResult::Ok(Command::Quit),
        "help" | "h" | "?" => ParseResult::Ok(Command::Help),
        _ => ParseResult::UnknownCommand(cmd.to_string()),
    }
}

fn parse_login(args: &str) -> ParseResult {
    let mut parts = args.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some(handle), Some(password)) => ParseResult::Ok(Command::Login {
            handle: handle.to_string(),
            password: password.to_string(),
        }),
        _ => ParseResult::MissingArgument("login <handle> <app-password>".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_quit_command() {
        assert!(matches!(parse_command("q"), ParseResult::Ok(Command::Quit)));
        assert!(matches!(parse_command("quit"), ParseResult::Ok(Command::Quit)));
        assert!(matches!(parse_command("Q"), ParseResult::Ok(Command::Quit)));
    }

    #[test]
    fn parse_help_command() {
        assert!(matches!(parse_command("help"), ParseResult::Ok(Command::Help)));
        assert!(matches!(parse_command("?"), ParseResult::Ok(Command::Help)));
    }

    #[test]
    fn parse_open_command() {
        match parse_command("open alice.bsky.social") {
            ParseResult::Ok(Command::Open(actor)) => assert_eq!(actor, "alice.bsky.social"),
            _ => panic!("Expected Open command"),
        }
        assert!(matches!(parse_command("open"), ParseResult::MissingArgument(_)));
    }

    #[test]
    fn generate_keeps_the_whole_prompt() {
        match parse_command("generate Dark mode with  glitter") {
            ParseResult::Ok(Command::Generate(prompt)) => {
                assert_eq!(prompt, "Dark mode with  glitter");
            }
            _ => panic!("Expected Generate command"),
        }
    }

    #[test]
    fn save_and_apply_are_aliases() {
        assert!(matches!(parse_command("save"), ParseResult::Ok(Command::Save)));
        assert!(matches!(parse_command("apply"), ParseResult::Ok(Command::Save)));
        assert!(matches!(parse_command("w"), ParseResult::Ok(Command::Save)));
    }

    #[test]
    fn parse_import_export() {
        match parse_command("import ./theme.json") {
            ParseResult::Ok(Command::Import(path)) => {
                assert_eq!(path, PathBuf::from("./theme.json"));
            }
            _ => panic!("Expected Import command"),
        }
        assert!(matches!(parse_command("export"), ParseResult::MissingArgument(_)));
    }

    #[test]
    fn parse_login_needs_both_parts() {
        match parse_command("login alice.test abcd-efgh") {
            ParseResult::Ok(Command::Login { handle, password }) => {
                assert_eq!(handle, "alice.test");
                assert_eq!(password, "abcd-efgh");
            }
            _ => panic!("Expected Login command"),
        }
        assert!(matches!(parse_command("login alice.test"), ParseResult::MissingArgument(_)));
    }

    #[test]
    fn parse_ai_toggle() {
        assert!(matches!(parse_command("ai on"), ParseResult::Ok(Command::Ai(true))));
        assert!(matches!(parse_command("ai OFF"), ParseResult::Ok(Command::Ai(false))));
        assert!(matches!(parse_command("ai maybe"), ParseResult::InvalidArgument(_)));
        assert!(matches!(parse_command("ai"), ParseResult::MissingArgument(_)));
    }

    #[test]
    fn parse_unknown_command() {
        assert!(matches!(parse_command("unknown"), ParseResult::UnknownCommand(_)));
    }

    #[test]
    fn parse_empty_is_nop() {
        assert!(matches!(parse_command(""), ParseResult::Ok(Command::Nop)));
        assert!(matches!(parse_command("   "), ParseResult::Ok(Command::Nop)));
    }
}
