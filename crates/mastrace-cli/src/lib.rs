// NOTE: mastrace pipeline
//
// snapshot file → mastrace-index (typed rows) → mastrace-engine (timelines,
// metrics, analytics) → presentation (view models → console/json/csv).
// Every command reloads and reconstructs the snapshot from scratch; nothing
// is cached between runs.

mod args;
mod commands;
pub mod config;
mod handlers;
pub mod logging;
pub mod presentation;
pub mod types;

pub use args::{Cli, Commands, SessionCommand};
pub use commands::run;
