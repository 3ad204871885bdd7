//! # tnsync
//!
//! Command-line entry point for the Todoist → Notion sync.
//!
//! ## Usage
//!
//! ```bash
//! tnsync --config ./config/tnsync.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `tnsync sync` | Create and update Notion pages from active Todoist tasks |
//! | `tnsync index` | Print the task id → page id mapping read from Notion |
//! | `tnsync sources` | Show whether each service is configured |
//!
//! Credentials are read from `TODOIST_KEY` and `NOTION_KEY`; a `.env` file in
//! the working directory is loaded first.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use todoist_notion_sync::config;
use todoist_notion_sync::progress::ProgressMode;
use todoist_notion_sync::sources;
use todoist_notion_sync::sync;

/// One-way sync of active Todoist tasks into a Notion database.
#[derive(Parser)]
#[command(
    name = "tnsync",
    about = "One-way sync of active Todoist tasks into a Notion database",
    version
)]
struct Cli {
    /// Path to configuration file (TOML). Optional; defaults apply when absent.
    #[arg(long, global = true, default_value = "./config/tnsync.toml")]
    config: PathBuf,

    /// Log debug output to stderr (overridden by `RUST_LOG`).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one sync.
    ///
    /// Reads every page of the Notion database, fetches active top-level
    /// Todoist tasks, creates pages for new tasks and updates the rest.
    /// Exits non-zero if any task failed to sync.
    Sync {
        /// Show what would be created and updated without writing.
        #[arg(long)]
        dry_run: bool,

        /// Maximum Notion writes in flight (overrides `sync.concurrency`).
        #[arg(long)]
        concurrency: Option<usize>,

        /// Progress output on stderr. Defaults to `human` on a TTY, else `off`.
        #[arg(long, value_enum)]
        progress: Option<ProgressMode>,
    },

    /// Print the task id → page id mapping read from the Notion database.
    Index,

    /// Show whether Todoist and Notion are configured.
    Sources,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let _ = dotenvy::dotenv();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Sync {
            dry_run,
            concurrency,
            progress,
        } => {
            let cfg = config::load_config(&cli.config)?;
            let progress = progress.unwrap_or_else(ProgressMode::default_for_tty);
            let report = sync::run_sync(&cfg, dry_run, concurrency, progress).await?;
            if !report.is_success() {
                anyhow::bail!("{} task(s) failed to sync", report.failures.len());
            }
        }
        Commands::Index => {
            let cfg = config::load_config(&cli.config)?;
            sync::run_index(&cfg).await?;
        }
        Commands::Sources => {
            let cfg = config::read_config(&cli.config)?;
            sources::list_sources(&cfg)?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
