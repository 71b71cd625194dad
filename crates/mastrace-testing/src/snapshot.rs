//! Fixture database writer.
//!
//! Mirrors what the runtime logger writes: one SQLite file holding six
//! tables, ids stored as text, timestamps as `YYYY-MM-DD HH:MM:SS.ffffff`
//! and JSON payloads as text.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use mastrace_types::{
    AgentRecord, ChatCompletionRecord, ClientRecord, EventRecord, FunctionCallRecord,
    WrapperRecord,
};
use rusqlite::{Connection, params};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Current runtime logger schema.
pub const RUNTIME_LOG_SCHEMA: &str = r#"
CREATE TABLE agents (
    id INTEGER PRIMARY KEY,
    agent_id TEXT,
    wrapper_id TEXT,
    session_id TEXT,
    source_name TEXT,
    agent_class_name TEXT,
    init_args TEXT,
    timestamp DATETIME
);

CREATE TABLE events (
    event_id INTEGER PRIMARY KEY,
    source_id TEXT,
    source_name TEXT,
    event_name TEXT,
    agent_module TEXT DEFAULT NULL,
    agent_class_name TEXT DEFAULT NULL,
    session_id TEXT,
    json_state TEXT,
    timestamp DATETIME
);

CREATE TABLE chat_completions (
    id INTEGER PRIMARY KEY,
    invocation_id TEXT,
    client_id TEXT,
    wrapper_id TEXT,
    session_id TEXT,
    source_name TEXT,
    request TEXT,
    response TEXT,
    is_cached INTEGER,
    cost REAL,
    latency REAL,
    start_time DATETIME,
    end_time DATETIME
);

CREATE TABLE function_calls (
    source_id TEXT,
    source_name TEXT,
    function_name TEXT,
    args TEXT DEFAULT NULL,
    returns TEXT DEFAULT NULL,
    timestamp DATETIME
);

CREATE TABLE oai_clients (
    id INTEGER PRIMARY KEY,
    client_id TEXT,
    wrapper_id TEXT,
    session_id TEXT,
    class TEXT,
    init_args TEXT,
    timestamp DATETIME
);

CREATE TABLE oai_wrappers (
    id INTEGER PRIMARY KEY,
    wrapper_id TEXT,
    session_id TEXT,
    init_args TEXT,
    timestamp DATETIME
);
"#;

/// Fluent writer for snapshot databases.
///
/// # Example
/// ```no_run
/// use mastrace_testing::SnapshotBuilder;
/// use mastrace_types::WrapperRecord;
///
/// let dir = tempfile::TempDir::new().unwrap();
/// let mut builder = SnapshotBuilder::create(dir.path().join("runtime.db")).unwrap();
/// builder.wrapper(&WrapperRecord::default()).unwrap();
/// ```
pub struct SnapshotBuilder {
    conn: Connection,
    path: PathBuf,
}

impl SnapshotBuilder {
    /// Create a database at `path` with the full runtime logger schema.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self> {
        let builder = Self::empty(path)?;
        builder
            .conn
            .execute_batch(RUNTIME_LOG_SCHEMA)
            .context("Failed to create runtime log schema")?;
        Ok(builder)
    }

    /// Create a database at `path` without any tables.
    pub fn empty(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let conn = Connection::open(&path)
            .with_context(|| format!("Failed to create fixture database: {}", path.display()))?;
        Ok(Self { conn, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run arbitrary SQL, for rows the typed inserts cannot express.
    pub fn execute(&mut self, sql: &str) -> Result<&mut Self> {
        self.conn.execute_batch(sql)?;
        Ok(self)
    }

    pub fn agent(&mut self, row: &AgentRecord) -> Result<&mut Self> {
        self.conn.execute(
            "INSERT INTO agents (agent_id, wrapper_id, session_id, source_name, agent_class_name,
                                 init_args, timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                row.agent_id.as_ref().map(|id| id.as_str()),
                row.wrapper_id.as_ref().map(|id| id.as_str()),
                row.session_id.as_ref().map(|id| id.as_str()),
                row.source_name,
                row.agent_class_name,
                json_text(&row.init_args),
                time_text(row.timestamp),
            ],
        )?;
        Ok(self)
    }

    pub fn event(&mut self, row: &EventRecord) -> Result<&mut Self> {
        self.conn.execute(
            "INSERT INTO events (source_id, source_name, event_name, session_id, json_state,
                                 timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                row.source_id.as_ref().map(|id| id.as_str()),
                row.source_name,
                row.event_name,
                row.session_id.as_ref().map(|id| id.as_str()),
                json_text(&row.json_state),
                time_text(row.timestamp),
            ],
        )?;
        Ok(self)
    }

    pub fn chat_completion(&mut self, row: &ChatCompletionRecord) -> Result<&mut Self> {
        self.conn.execute(
            "INSERT INTO chat_completions (invocation_id, client_id, wrapper_id, session_id,
                                           source_name, request, response, is_cached, cost,
                                           latency, start_time, end_time)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                row.invocation_id.as_ref().map(|id| id.as_str()),
                row.client_id.as_ref().map(|id| id.as_str()),
                row.wrapper_id.as_ref().map(|id| id.as_str()),
                row.session_id.as_ref().map(|id| id.as_str()),
                row.source_name,
                json_text(&row.request),
                json_text(&row.response),
                row.is_cached,
                row.cost,
                row.latency,
                time_text(row.start_time),
                time_text(row.end_time),
            ],
        )?;
        Ok(self)
    }

    pub fn function_call(&mut self, row: &FunctionCallRecord) -> Result<&mut Self> {
        self.conn.execute(
            "INSERT INTO function_calls (source_id, source_name, function_name, args, returns,
                                         timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                row.source_id.as_ref().map(|id| id.as_str()),
                row.source_name,
                row.function_name,
                json_text(&row.args),
                json_text(&row.returns),
                time_text(row.timestamp),
            ],
        )?;
        Ok(self)
    }

    pub fn client(&mut self, row: &ClientRecord) -> Result<&mut Self> {
        self.conn.execute(
            "INSERT INTO oai_clients (client_id, wrapper_id, session_id, class, init_args,
                                      timestamp)
             VALUES (?1, ?2, ?3, 'OpenAIClient', ?4, ?5)",
            params![
                row.client_id.as_ref().map(|id| id.as_str()),
                row.wrapper_id.as_ref().map(|id| id.as_str()),
                row.session_id.as_ref().map(|id| id.as_str()),
                json_text(&row.init_args),
                time_text(row.timestamp),
            ],
        )?;
        Ok(self)
    }

    pub fn wrapper(&mut self, row: &WrapperRecord) -> Result<&mut Self> {
        self.conn.execute(
            "INSERT INTO oai_wrappers (wrapper_id, session_id, init_args, timestamp)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                row.wrapper_id.as_ref().map(|id| id.as_str()),
                row.session_id.as_ref().map(|id| id.as_str()),
                json_text(&row.init_args),
                time_text(row.timestamp),
            ],
        )?;
        Ok(self)
    }
}

// `Value::Null` is the records' "no value" and is written as SQL NULL
fn json_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

fn time_text(ts: Option<DateTime<Utc>>) -> Option<String> {
    ts.map(|t| t.format("%Y-%m-%d %H:%M:%S%.6f").to_string())
}
