//! KubeAdjust CLI
//!
//! A command-line tool for evaluating namespace snapshots, viewing
//! resource status badges and managing display preferences.

mod client;
mod commands;
mod config;
mod output;

use advisor_lib::Severity;
use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{prefs, status, suggest};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const DEFAULT_API_URL: &str = "http://localhost:8080";

/// KubeAdjust CLI
#[derive(Parser)]
#[command(name = "kadj")]
#[command(author, version, about = "KubeAdjust resource sizing suggestions", long_about = None)]
pub struct Cli {
    /// Advisor endpoint URL (can also be set via KADJ_API_URL env var)
    #[arg(long, env = "KADJ_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Path to the preferences file
    #[arg(long, env = "KADJ_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, short, default_value = "table", global = true)]
    pub format: output::OutputFormat,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute sizing suggestions for a namespace snapshot
    Suggest {
        /// Workloads JSON file (snapshot document or list of workloads)
        #[arg(long, short)]
        workloads: PathBuf,

        /// Usage history JSON file
        #[arg(long)]
        history: Option<PathBuf>,

        /// Look-back window the history covers (1h, 6h, 24h, 7d)
        #[arg(long)]
        window: Option<String>,

        /// Only show these severities (repeatable)
        #[arg(long)]
        only: Vec<Severity>,

        /// Group suggestions by resource
        #[arg(long)]
        group: bool,

        /// Evaluate on the advisor service instead of in-process
        #[arg(long)]
        remote: bool,

        /// Ignore the hidden severities preference
        #[arg(long)]
        show_hidden: bool,
    },

    /// Show per-resource status badges
    Status {
        /// Workloads JSON file
        #[arg(long, short)]
        workloads: PathBuf,
    },

    /// Manage display preferences
    #[command(subcommand)]
    Prefs(PrefsCommands),
}

#[derive(Subcommand)]
pub enum PrefsCommands {
    /// Show current preferences
    Show,

    /// Hide a severity from `suggest`
    Hide {
        /// danger, warning or overkill
        severity: Severity,
    },

    /// Show a hidden severity again
    Unhide {
        /// danger, warning or overkill
        severity: Severity,
    },

    /// Clear all hidden severities
    Reset,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config_path = config::Config::path(cli.config.as_deref())?;

    match cli.command {
        Commands::Suggest {
            workloads,
            history,
            window,
            only,
            group,
            remote,
            show_hidden,
        } => {
            let settings = config::Config::load(&config_path)?;
            let api_url = cli
                .api_url
                .or_else(|| settings.api_url.clone())
                .unwrap_or_else(|| DEFAULT_API_URL.to_string());
            let args = suggest::SuggestArgs {
                workloads,
                history,
                window,
                only,
                group,
                remote,
                show_hidden,
            };
            suggest::run(&args, &settings, &api_url, cli.format).await?;
        }
        Commands::Status { workloads } => {
            status::run(&workloads, cli.format)?;
        }
        Commands::Prefs(prefs_cmd) => match prefs_cmd {
            PrefsCommands::Show => prefs::show(&config_path, cli.format)?,
            PrefsCommands::Hide { severity } => prefs::hide(&config_path, severity)?,
            PrefsCommands::Unhide { severity } => prefs::unhide(&config_path, severity)?,
            PrefsCommands::Reset => prefs::reset(&config_path)?,
        },
    }

    Ok(())
}
