use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::domain::{ComponentId, InvocationId, SessionId};

// Typed rows of the six snapshot tables.
//
// Every column is optional because the runtime logger writes NULL freely.
// JSON text columns are already parsed: a NULL, empty or malformed column
// arrives here as an empty object, never as an error.

/// Row of the `agents` table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgentRecord {
    pub session_id: Option<SessionId>,
    pub agent_id: Option<ComponentId>,
    pub wrapper_id: Option<ComponentId>,
    pub timestamp: Option<DateTime<Utc>>,
    pub init_args: Value,
    pub agent_class_name: Option<String>,
    pub source_name: Option<String>,
}

/// Row of the `events` table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventRecord {
    pub session_id: Option<SessionId>,
    pub source_id: Option<ComponentId>,
    pub timestamp: Option<DateTime<Utc>>,
    pub event_name: Option<String>,
    pub json_state: Value,
    pub source_name: Option<String>,
}

/// Row of the `chat_completions` table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatCompletionRecord {
    pub session_id: Option<SessionId>,
    pub client_id: Option<ComponentId>,
    pub wrapper_id: Option<ComponentId>,
    pub invocation_id: Option<InvocationId>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub request: Value,
    pub response: Value,
    pub cost: Option<f64>,
    pub latency: Option<f64>,
    pub is_cached: bool,
    pub source_name: Option<String>,
}

/// Row of the `function_calls` table.
///
/// Carries no session column; the owning session is found through
/// `source_id`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FunctionCallRecord {
    pub source_id: Option<ComponentId>,
    pub timestamp: Option<DateTime<Utc>>,
    pub function_name: Option<String>,
    pub args: Value,
    pub returns: Value,
    pub source_name: Option<String>,
}

/// Row of the `oai_clients` table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientRecord {
    pub session_id: Option<SessionId>,
    pub client_id: Option<ComponentId>,
    pub wrapper_id: Option<ComponentId>,
    pub timestamp: Option<DateTime<Utc>>,
    pub init_args: Value,
}

/// Row of the `oai_wrappers` table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WrapperRecord {
    pub session_id: Option<SessionId>,
    pub wrapper_id: Option<ComponentId>,
    pub timestamp: Option<DateTime<Utc>>,
    pub init_args: Value,
}

/// All six tables of one snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapshotTables {
    pub agents: Vec<AgentRecord>,
    pub events: Vec<EventRecord>,
    pub chat_completions: Vec<ChatCompletionRecord>,
    pub function_calls: Vec<FunctionCallRecord>,
    pub clients: Vec<ClientRecord>,
    pub wrappers: Vec<WrapperRecord>,
}

impl SnapshotTables {
    pub fn total_rows(&self) -> usize {
        self.agents.len()
            + self.events.len()
            + self.chat_completions.len()
            + self.function_calls.len()
            + self.clients.len()
            + self.wrappers.len()
    }
}

/// Parse a JSON text column.
///
/// NULL, empty and malformed text all yield an empty object.
pub fn parse_json_field(raw: Option<&str>) -> Value {
    match raw {
        Some(text) if !text.trim().is_empty() => {
            serde_json::from_str(text).unwrap_or_else(|_| empty_object())
        }
        _ => empty_object(),
    }
}

pub fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}
