use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use skyspace::theme::render_variables;
use skyspace::{App, Config, Studio};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "skyspace")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in to Bluesky with an app password
    Login {
        /// Handle, e.g. alice.bsky.social
        handle: String,
        /// App password (prefer the environment variable)
        #[arg(short, long, env = "SKYSPACE_APP_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the signed-in identity
    Logout,
    /// Show the signed-in identity
    Whoami,
    /// Print a page record as JSON
    Show {
        /// DID or handle (defaults to your own page)
        actor: Option<String>,
        /// Print the resolved CSS variables instead
        #[arg(long)]
        vars: bool,
    },
    /// Generate a theme from a description
    Generate {
        prompt: String,
        /// Skip Claude and use keyword matching
        #[arg(long)]
        offline: bool,
        /// Save the result as your current theme
        #[arg(long)]
        save: bool,
    },
    /// Merge a theme JSON file over your current theme and save it
    Apply {
        file: PathBuf,
    },
    /// Swap your current and previous themes
    Revert,
    /// Theme history maintenance
    History {
        #[command(subcommand)]
        command: HistoryCommands,
    },
    /// Store a Claude API key in the system keyring
    ClaudeKey {
        key: String,
        /// Verify the key with a minimal request
        #[arg(long)]
        check: bool,
    },
}

#[derive(Subcommand)]
enum HistoryCommands {
    /// Overwrite the previous theme without touching the current one
    SetPrevious {
        file: PathBuf,
    },
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| "skyspace=info".into())
}

/// CLI commands log to stderr
fn init_stderr_logging() {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

/// The TUI owns the terminal, so logs go to a file
fn init_file_logging() -> Result<()> {
    let path = Config::log_path()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {:?}", parent))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {:?}", path))?;

    tracing_subscriber::registry()
        .with(env_filter())
        .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        .init();
    Ok(())
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        // Launch TUI
        init_file_logging()?;
        let mut app = App::new(Studio::open()?)?;
        return app.run().await;
    };

    init_stderr_logging();
    let mut studio = Studio::open()?;

    match command {
        Commands::Login { handle, password } => {
            let page = studio.login(&handle, &password).await?;
            println!("Signed in as @{} ({})", handle.trim_start_matches('@'), page.did);
        }
        Commands::Logout => {
            studio.logout()?;
            println!("Signed out");
        }
        Commands::Whoami => match (studio.session().handle(), studio.session().did()) {
            (Some(handle), Some(did)) => println!("@{} ({})", handle, did),
            _ => println!("Not signed in"),
        },
        Commands::Show { actor, vars } => {
            let page = match actor {
                Some(actor) => studio.load_profile(&actor).await?.page,
                None => Some(studio.own_page()?),
            };
            let Some(page) = page else {
                bail!("No page yet (the default theme applies)");
            };
            if vars {
                for (name, value) in render_variables(&page.current_theme) {
                    println!("{}: {};", name, value);
                }
            } else {
                println!("{}", serde_json::to_string_pretty(&page)?);
            }
        }
        Commands::Generate { prompt, offline, save } => {
            let current = studio.current_theme()?;
            let generated = studio.generate(&prompt, current.as_ref(), offline).await;
            eprintln!("Generated with {}", generated.source.label());
            if save {
                let page = studio.save_theme(generated.theme)?;
                println!("{}", page.current_theme.to_pretty_json());
            } else {
                println!("{}", generated.theme.to_pretty_json());
            }
        }
        Commands::Apply { file } => {
            let page = studio.apply_theme_json(&read_file(&file)?)?;
            println!("{}", page.current_theme.to_pretty_json());
        }
        Commands::Revert => {
            let page = studio.revert()?;
            println!("{}", page.current_theme.to_pretty_json());
        }
        Commands::History { command: HistoryCommands::SetPrevious { file } } => {
            let base = studio.own_page()?.current_theme;
            let theme = skyspace::studio::parse_theme_json(&read_file(&file)?, &base)?;
            studio.set_previous_theme(theme)?;
            println!("Previous theme updated");
        }
        Commands::ClaudeKey { key, check } => {
            studio.set_api_key(&key)?;
            println!("Claude API key stored");
            if check {
                studio.check_api_key().await?;
                println!("Claude accepted the key");
            }
        }
    }

    Ok(())
}
