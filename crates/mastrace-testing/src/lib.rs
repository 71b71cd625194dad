//! Testing infrastructure for mastrace integration tests.
//!
//! - `SnapshotBuilder`: writes runtime logging databases row by row
//! - `TestWorld`: isolated environment that runs the CLI against a snapshot
//! - `assertions`: checks over the CLI's JSON output
//! - `fixtures`: ready-made multi-session snapshots

pub mod assertions;
pub mod fixtures;
pub mod snapshot;
pub mod world;

pub use snapshot::SnapshotBuilder;
pub use world::{CliResult, TestWorld};
