//! Course Recommender CLI
//!
//! Terminal front end for the course-recommendation API: a screen picker,
//! form prompts, and rendered results.

mod app;
mod prompt;

use std::io::{self, IsTerminal};
use std::path::Path;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use course_client::{Config, ScreenKind, Screens};
use course_render::OutputFormat;
use tracing_subscriber::EnvFilter;

use crate::app::App;
use crate::prompt::Prompter;

/// How screen output is printed.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum Format {
    /// Aligned plain text
    #[default]
    Text,
    /// Markdown
    Markdown,
    /// Pretty-printed JSON
    Json,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Text => Self::Text,
            Format::Markdown => Self::Markdown,
            Format::Json => Self::Json,
        }
    }
}

/// Course Recommender - course lookup, enrollment, and job-based recommendations
///
/// Talks to a course-recommendation backend over HTTP. Pick a screen from the
/// menu, fill in its form, and the result is printed below it.
#[derive(Parser, Debug)]
#[command(name = "course-recommender")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file (default: course-recommender.json in current directory)
    #[arg(short, long, value_name = "FILE")]
    config: Option<String>,

    /// Backend origin, e.g. http://localhost:8000
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Output format for screen results
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Run a single screen (label or menu number) and exit
    #[arg(short, long, value_name = "SCREEN")]
    screen: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if args.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    tracing::debug!(config = ?args.config, "Config file");

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let mut config = load_config(args.config.as_deref())?;

    if let Some(ref base_url) = args.base_url {
        config.base_url.clone_from(base_url);
    }
    if let Some(timeout) = args.timeout {
        config.timeout_secs = timeout;
    }

    // Re-validate after overrides
    config.normalize();
    config.validate()?;

    tracing::info!(base_url = %config.base_url, timeout_secs = config.timeout_secs, "Using backend");

    let screen = args
        .screen
        .as_deref()
        .map(str::parse::<ScreenKind>)
        .transpose()?;

    let screens = Screens::new(&config)?;
    let stdin = io::stdin();
    let masked = stdin.is_terminal();
    let prompter = Prompter::new(stdin.lock(), io::stdout().lock()).masked(masked);
    let mut app = App::new(screens, prompter, args.format.into());

    match screen {
        Some(kind) => {
            app.run_screen(kind).await?;
        }
        None => app.run_menu().await?,
    }
    tracing::debug!(user_id = ?app.session().current_user_id(), "Session ended");
    Ok(())
}

/// Loads configuration from the specified path or default location.
fn load_config(config_path: Option<&str>) -> anyhow::Result<Config> {
    match config_path {
        Some(path_str) => {
            let path = Path::new(path_str);
            if !path.exists() {
                anyhow::bail!(
                    "Config file not found: '{}'\n\nSuggestion: Check the path or remove the --config flag to use defaults",
                    path.display()
                );
            }
            Config::load_from_file(path).map_err(|e| anyhow::anyhow!("{e}"))
        }
        None => Config::load().map_err(|e| anyhow::anyhow!("{e}")),
    }
}
