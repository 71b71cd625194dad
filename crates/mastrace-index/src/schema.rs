use rusqlite::Connection;

use crate::{Error, Result};

pub const AGENTS: &str = "agents";
pub const EVENTS: &str = "events";
pub const CHAT_COMPLETIONS: &str = "chat_completions";
pub const FUNCTION_CALLS: &str = "function_calls";
pub const OAI_CLIENTS: &str = "oai_clients";
pub const OAI_WRAPPERS: &str = "oai_wrappers";

/// Tables every snapshot must contain, in load order.
pub const REQUIRED_TABLES: [&str; 6] = [
    AGENTS,
    EVENTS,
    CHAT_COMPLETIONS,
    FUNCTION_CALLS,
    OAI_CLIENTS,
    OAI_WRAPPERS,
];

// NOTE: Schema-on-read
//
// The runtime logger has added columns over time (source_name, latency).
// The loader never checks columns, only tables: every column is looked up
// by name and an absent one reads as NULL.

/// Fail with the first required table the snapshot lacks.
pub fn ensure_tables(conn: &Connection) -> Result<()> {
    for table in REQUIRED_TABLES {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [table],
            |row| row.get(0),
        )?;
        if count == 0 {
            return Err(Error::MissingTable(table));
        }
    }
    Ok(())
}
