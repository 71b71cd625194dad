use super::args::{Cli, Commands, SessionCommand};
use super::handlers;
use crate::config::Config;
use crate::logging::init_logging;
use anyhow::{Result, bail};
use mastrace_engine::reconstruct;
use mastrace_index::Snapshot;
use std::path::PathBuf;
use tracing::info;

pub fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;

    let level = cli
        .log_level
        .map(|l| l.to_string())
        .unwrap_or_else(|| config.log_level.clone());
    init_logging(&level);

    let snapshot_path = resolve_snapshot_path(cli.snapshot, &config)?;
    let snapshot = Snapshot::open(&snapshot_path)?;
    info!(
        path = %snapshot_path.display(),
        rows = snapshot.tables().total_rows(),
        "loaded snapshot"
    );

    let reconstruction = reconstruct(snapshot.tables())?;

    match cli.command {
        Commands::Session { command } => match command {
            SessionCommand::List { status, limit } => {
                handlers::session_list::handle(&reconstruction, status, limit, cli.format)
            }
            SessionCommand::Show { session_id } => {
                handlers::session_show::handle(&reconstruction, &session_id, cli.format)
            }
            SessionCommand::Flow {
                session_id,
                preview_chars,
            } => handlers::session_flow::handle(
                &reconstruction,
                &session_id,
                preview_chars.unwrap_or(config.preview_chars),
                cli.format,
            ),
        },

        Commands::Analytics { top } => handlers::analytics::handle(
            &reconstruction,
            top.unwrap_or(config.top_sessions),
            cli.format,
        ),
    }
}

fn resolve_snapshot_path(explicit: Option<PathBuf>, config: &Config) -> Result<PathBuf> {
    match explicit.or_else(|| config.default_snapshot.clone()) {
        Some(path) => Ok(path),
        None => bail!("No snapshot given; pass --snapshot or set default_snapshot in config"),
    }
}
