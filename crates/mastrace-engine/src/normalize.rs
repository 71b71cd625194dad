use mastrace_types::{
    AgentRecord, ClientRecord, EventDetails, EventRecord, FunctionCallRecord, SnapshotTables,
    UnifiedEvent, WrapperRecord,
};
use tracing::debug;

use crate::enrich::{EnrichedCompletion, request_model};
use crate::resolve::IdentityMap;

/// Source name given to client and wrapper configuration events.
pub const SYSTEM_SOURCE: &str = "System";

const UNKNOWN: &str = "Unknown";
const RECEIVED_MESSAGE: &str = "received_message";

// NOTE: Production order
//
// Events are emitted table by table: agents, events, chat-completion pairs,
// function calls, clients, wrappers. The aggregator's stable sort keeps this
// order among events with identical timestamps. That is the only tie-break
// there is; nothing else orders simultaneous events.

/// Convert every snapshot row into unified events.
///
/// `completions` is the enriched form of `tables.chat_completions`; llm events
/// are built from it so that they carry the normalized source name.
pub fn normalize_events(
    tables: &SnapshotTables,
    completions: &[EnrichedCompletion],
    identity: &IdentityMap,
) -> Vec<UnifiedEvent> {
    let mut events = Vec::with_capacity(tables.total_rows() + completions.len());

    events.extend(tables.agents.iter().map(agent_event));
    events.extend(tables.events.iter().map(message_event));
    for completion in completions {
        if let Some((start, end)) = completion_events(completion) {
            events.push(start);
            events.push(end);
        }
    }
    events.extend(
        tables
            .function_calls
            .iter()
            .filter_map(|row| function_call_event(row, identity)),
    );
    events.extend(tables.clients.iter().map(client_event));
    events.extend(tables.wrappers.iter().map(wrapper_event));

    debug!(
        rows = tables.total_rows(),
        events = events.len(),
        "normalized snapshot rows"
    );

    events
}

/// Agent row → `agent_config`, sourced by the agent's wrapper id.
pub fn agent_event(row: &AgentRecord) -> UnifiedEvent {
    UnifiedEvent {
        timestamp: row.timestamp,
        session_id: row.session_id.clone(),
        source_name: row.source_name.clone().unwrap_or_else(|| "Agent".to_string()),
        source_id: row.wrapper_id.clone(),
        invocation_id: None,
        details: EventDetails::AgentConfig {
            config: row.init_args.clone(),
            class_name: row
                .agent_class_name
                .clone()
                .unwrap_or_else(|| UNKNOWN.to_string()),
            agent_id: row.agent_id.clone(),
        },
    }
}

/// Events row → `event_received_message` or `event_other`.
pub fn message_event(row: &EventRecord) -> UnifiedEvent {
    let event_name = row
        .event_name
        .clone()
        .unwrap_or_else(|| UNKNOWN.to_string());
    let data = row.json_state.clone();

    let details = if row.event_name.as_deref() == Some(RECEIVED_MESSAGE) {
        EventDetails::EventReceivedMessage { event_name, data }
    } else {
        EventDetails::EventOther { event_name, data }
    };

    UnifiedEvent {
        timestamp: row.timestamp,
        session_id: row.session_id.clone(),
        source_name: row
            .source_name
            .clone()
            .unwrap_or_else(|| UNKNOWN.to_string()),
        source_id: row.source_id.clone(),
        invocation_id: None,
        details,
    }
}

/// Chat completion → `llm_call_start` + `llm_call_end`.
///
/// Both halves or neither: a row missing either timestamp is dropped whole so
/// that no timeline holds an unmatched start or end. NULL client or
/// invocation ids are carried through as absent.
pub fn completion_events(completion: &EnrichedCompletion) -> Option<(UnifiedEvent, UnifiedEvent)> {
    let row = &completion.record;
    let source_id = row.client_id.clone();
    let invocation_id = row.invocation_id.clone();
    let (start_time, end_time) = (row.start_time?, row.end_time?);

    let source_name = completion
        .source_name
        .clone()
        .unwrap_or_else(|| UNKNOWN.to_string());

    let start = UnifiedEvent {
        timestamp: Some(start_time),
        session_id: row.session_id.clone(),
        source_name: source_name.clone(),
        source_id: source_id.clone(),
        invocation_id: invocation_id.clone(),
        details: EventDetails::LlmCallStart {
            request: row.request.clone(),
            model: request_model(&row.request),
            wrapper_id: row.wrapper_id.clone(),
        },
    };

    let end = UnifiedEvent {
        timestamp: Some(end_time),
        session_id: row.session_id.clone(),
        source_name,
        source_id,
        invocation_id,
        details: EventDetails::LlmCallEnd {
            response: row.response.clone(),
            cost: row.cost.unwrap_or(0.0),
            latency: row.latency.unwrap_or(0.0),
            is_cached: row.is_cached,
            wrapper_id: row.wrapper_id.clone(),
        },
    };

    Some((start, end))
}

/// Function call → `function_call`, attributed through the identity map.
pub fn function_call_event(
    row: &FunctionCallRecord,
    identity: &IdentityMap,
) -> Option<UnifiedEvent> {
    let source_id = row.source_id.clone()?;
    let Some(session_id) = identity.session_for(&source_id).cloned() else {
        debug!(source_id = %source_id, "dropping function call with unresolved source");
        return None;
    };

    Some(UnifiedEvent {
        timestamp: row.timestamp,
        session_id: Some(session_id),
        source_name: row
            .source_name
            .clone()
            .unwrap_or_else(|| UNKNOWN.to_string()),
        source_id: Some(source_id),
        invocation_id: None,
        details: EventDetails::FunctionCall {
            function_name: row
                .function_name
                .clone()
                .unwrap_or_else(|| UNKNOWN.to_string()),
            args: row.args.clone(),
            returns: row.returns.clone(),
        },
    })
}

pub fn client_event(row: &ClientRecord) -> UnifiedEvent {
    UnifiedEvent {
        timestamp: row.timestamp,
        session_id: row.session_id.clone(),
        source_name: SYSTEM_SOURCE.to_string(),
        source_id: row.client_id.clone(),
        invocation_id: None,
        details: EventDetails::ClientConfig {
            config: row.init_args.clone(),
            wrapper_id: row.wrapper_id.clone(),
        },
    }
}

pub fn wrapper_event(row: &WrapperRecord) -> UnifiedEvent {
    UnifiedEvent {
        timestamp: row.timestamp,
        session_id: row.session_id.clone(),
        source_name: SYSTEM_SOURCE.to_string(),
        source_id: row.wrapper_id.clone(),
        invocation_id: None,
        details: EventDetails::WrapperConfig {
            config: row.init_args.clone(),
        },
    }
}
