use crate::types::{LogLevel, OutputFormat, StatusFilter};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mastrace")]
#[command(about = "Reconstruct multi-agent sessions from runtime logging snapshots", long_about = None)]
#[command(version)]
pub struct Cli {
    /// SQLite snapshot to read (defaults to `default_snapshot` from config)
    #[arg(long, global = true)]
    pub snapshot: Option<PathBuf>,

    #[arg(long, default_value = "plain", global = true)]
    pub format: OutputFormat,

    /// Overrides `log_level` from config; RUST_LOG overrides both
    #[arg(long, global = true)]
    pub log_level: Option<LogLevel>,

    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    Session {
        #[command(subcommand)]
        command: SessionCommand,
    },

    /// Snapshot-wide cost and token breakdowns
    Analytics {
        /// Number of most expensive sessions to show
        #[arg(long)]
        top: Option<usize>,
    },
}

#[derive(Subcommand)]
pub enum SessionCommand {
    /// Per-session metrics, newest first
    List {
        #[arg(long)]
        status: Option<StatusFilter>,

        #[arg(long, default_value = "50")]
        limit: usize,
    },

    /// Metrics and chronological timeline of one session
    Show {
        session_id: String,
    },

    /// Conversation view of one session
    Flow {
        session_id: String,

        /// Preview length of message content (defaults to `preview_chars` from config)
        #[arg(long)]
        preview_chars: Option<usize>,
    },
}
