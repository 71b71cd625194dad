// Snapshot loader
// Reads the six runtime logging tables into typed rows; no interpretation

mod error;
mod row;
pub mod schema;
mod snapshot;

// Public API
pub use error::{Error, Result};
pub use row::parse_timestamp;
pub use schema::REQUIRED_TABLES;
pub use snapshot::Snapshot;
