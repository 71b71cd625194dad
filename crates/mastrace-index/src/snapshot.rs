use std::path::{Path, PathBuf};

use mastrace_types::{
    AgentRecord, ChatCompletionRecord, ClientRecord, EventRecord, FunctionCallRecord,
    SnapshotTables, WrapperRecord,
};
use rusqlite::{Connection, OpenFlags, Row};
use tracing::debug;

use crate::row::Columns;
use crate::schema::{self, ensure_tables};
use crate::{Error, Result};

/// Fully loaded runtime logging snapshot.
#[derive(Debug, Clone)]
pub struct Snapshot {
    path: Option<PathBuf>,
    tables: SnapshotTables,
}

impl Snapshot {
    /// Open `path` read-only and load all six tables.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::NotFound(path.to_path_buf()));
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        let tables = load_tables(&conn)?;
        debug!(path = %path.display(), rows = tables.total_rows(), "loaded snapshot");

        Ok(Self {
            path: Some(path.to_path_buf()),
            tables,
        })
    }

    /// Load from an already open connection (in-memory databases, tests).
    pub fn from_connection(conn: &Connection) -> Result<Self> {
        Ok(Self {
            path: None,
            tables: load_tables(conn)?,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn tables(&self) -> &SnapshotTables {
        &self.tables
    }

    pub fn into_tables(self) -> SnapshotTables {
        self.tables
    }
}

fn load_tables(conn: &Connection) -> Result<SnapshotTables> {
    ensure_tables(conn)?;

    Ok(SnapshotTables {
        agents: read_table(conn, schema::AGENTS, agent_row)?,
        events: read_table(conn, schema::EVENTS, event_row)?,
        chat_completions: read_table(conn, schema::CHAT_COMPLETIONS, chat_completion_row)?,
        function_calls: read_table(conn, schema::FUNCTION_CALLS, function_call_row)?,
        clients: read_table(conn, schema::OAI_CLIENTS, client_row)?,
        wrappers: read_table(conn, schema::OAI_WRAPPERS, wrapper_row)?,
    })
}

fn read_table<T>(
    conn: &Connection,
    table: &'static str,
    map: fn(&Columns, &Row<'_>) -> rusqlite::Result<T>,
) -> Result<Vec<T>> {
    let mut stmt = conn.prepare(&format!("SELECT * FROM {}", table))?;
    let columns = Columns::new(table, &stmt);

    let rows = stmt
        .query_map([], |row| map(&columns, row))?
        .collect::<rusqlite::Result<Vec<T>>>()?;

    debug!(table, rows = rows.len(), "read table");
    Ok(rows)
}

fn agent_row(c: &Columns, row: &Row<'_>) -> rusqlite::Result<AgentRecord> {
    Ok(AgentRecord {
        session_id: c.id(row, "session_id")?,
        agent_id: c.id(row, "agent_id")?,
        wrapper_id: c.id(row, "wrapper_id")?,
        timestamp: c.timestamp(row, "timestamp")?,
        init_args: c.json(row, "init_args")?,
        agent_class_name: c.text(row, "agent_class_name")?,
        source_name: c.text(row, "source_name")?,
    })
}

fn event_row(c: &Columns, row: &Row<'_>) -> rusqlite::Result<EventRecord> {
    Ok(EventRecord {
        session_id: c.id(row, "session_id")?,
        source_id: c.id(row, "source_id")?,
        timestamp: c.timestamp(row, "timestamp")?,
        event_name: c.text(row, "event_name")?,
        json_state: c.json(row, "json_state")?,
        source_name: c.text(row, "source_name")?,
    })
}

fn chat_completion_row(c: &Columns, row: &Row<'_>) -> rusqlite::Result<ChatCompletionRecord> {
    Ok(ChatCompletionRecord {
        session_id: c.id(row, "session_id")?,
        client_id: c.id(row, "client_id")?,
        wrapper_id: c.id(row, "wrapper_id")?,
        invocation_id: c.id(row, "invocation_id")?,
        start_time: c.timestamp(row, "start_time")?,
        end_time: c.timestamp(row, "end_time")?,
        request: c.json(row, "request")?,
        response: c.json(row, "response")?,
        cost: c.real(row, "cost")?,
        latency: c.real(row, "latency")?,
        is_cached: c.flag(row, "is_cached")?,
        source_name: c.text(row, "source_name")?,
    })
}

fn function_call_row(c: &Columns, row: &Row<'_>) -> rusqlite::Result<FunctionCallRecord> {
    Ok(FunctionCallRecord {
        source_id: c.id(row, "source_id")?,
        timestamp: c.timestamp(row, "timestamp")?,
        function_name: c.text(row, "function_name")?,
        args: c.json(row, "args")?,
        returns: c.json(row, "returns")?,
        source_name: c.text(row, "source_name")?,
    })
}

fn client_row(c: &Columns, row: &Row<'_>) -> rusqlite::Result<ClientRecord> {
    Ok(ClientRecord {
        session_id: c.id(row, "session_id")?,
        client_id: c.id(row, "client_id")?,
        wrapper_id: c.id(row, "wrapper_id")?,
        timestamp: c.timestamp(row, "timestamp")?,
        init_args: c.json(row, "init_args")?,
    })
}

fn wrapper_row(c: &Columns, row: &Row<'_>) -> rusqlite::Result<WrapperRecord> {
    Ok(WrapperRecord {
        session_id: c.id(row, "session_id")?,
        wrapper_id: c.id(row, "wrapper_id")?,
        timestamp: c.timestamp(row, "timestamp")?,
        init_args: c.json(row, "init_args")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mastrace_types::{ComponentId, SessionId};
    use serde_json::json;

    fn minimal_schema(conn: &Connection) {
        conn.execute_batch(
            r#"
            CREATE TABLE agents (session_id TEXT, agent_id INTEGER, wrapper_id INTEGER,
                                 timestamp TEXT, init_args TEXT, agent_class_name TEXT);
            CREATE TABLE events (session_id TEXT, source_id INTEGER, timestamp TEXT,
                                 event_name TEXT, json_state TEXT);
            CREATE TABLE chat_completions (session_id TEXT, client_id INTEGER,
                                 invocation_id TEXT, start_time TEXT, end_time TEXT,
                                 request TEXT, response TEXT, cost REAL, is_cached INTEGER);
            CREATE TABLE function_calls (source_id INTEGER, timestamp TEXT,
                                 function_name TEXT, args TEXT, returns TEXT);
            CREATE TABLE oai_clients (session_id TEXT, client_id INTEGER, wrapper_id INTEGER,
                                 timestamp TEXT, init_args TEXT);
            CREATE TABLE oai_wrappers (session_id TEXT, wrapper_id INTEGER, timestamp TEXT,
                                 init_args TEXT);
            "#,
        )
        .unwrap();
    }

    #[test]
    fn test_integer_ids_and_missing_columns() {
        let conn = Connection::open_in_memory().unwrap();
        minimal_schema(&conn);
        conn.execute(
            "INSERT INTO agents VALUES ('S1', 7, 140234, '2024-05-01 10:00:00', '{\"name\": \"CEO\"}', 'AssistantAgent')",
            [],
        )
        .unwrap();

        let tables = Snapshot::from_connection(&conn).unwrap().into_tables();
        let agent = &tables.agents[0];

        assert_eq!(agent.session_id, Some(SessionId::from("S1")));
        assert_eq!(agent.agent_id, Some(ComponentId::from("7")));
        assert_eq!(agent.wrapper_id, Some(ComponentId::from("140234")));
        assert_eq!(agent.init_args, json!({"name": "CEO"}));
        assert_eq!(agent.source_name, None);
        assert!(agent.timestamp.is_some());
    }

    #[test]
    fn test_malformed_values_are_recovered() {
        let conn = Connection::open_in_memory().unwrap();
        minimal_schema(&conn);
        conn.execute(
            "INSERT INTO events VALUES ('', 1, 'not a time', 'received_message', '{broken')",
            [],
        )
        .unwrap();

        let tables = Snapshot::from_connection(&conn).unwrap().into_tables();
        let event = &tables.events[0];

        assert_eq!(event.session_id, None);
        assert_eq!(event.timestamp, None);
        assert_eq!(event.json_state, json!({}));
    }

    #[test]
    fn test_cached_flag_and_cost() {
        let conn = Connection::open_in_memory().unwrap();
        minimal_schema(&conn);
        conn.execute(
            "INSERT INTO chat_completions VALUES ('S1', 3, 'I1', '2024-05-01 10:00:00',
             '2024-05-01 10:00:02', '{}', '{}', 0.25, 1)",
            [],
        )
        .unwrap();

        let tables = Snapshot::from_connection(&conn).unwrap().into_tables();
        let completion = &tables.chat_completions[0];

        assert!(completion.is_cached);
        assert_eq!(completion.cost, Some(0.25));
        assert_eq!(completion.latency, None);
    }
}
