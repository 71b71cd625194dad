use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::ids::SessionId;
use crate::event::{EventType, UnifiedEvent};

/// Chronological event sequence of one session.
///
/// Built once by the session aggregator and read-only afterwards. Every event
/// carries a timestamp and this timeline's session id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionTimeline {
    session_id: SessionId,
    events: Vec<UnifiedEvent>,
}

impl SessionTimeline {
    /// Wrap events already sorted ascending by timestamp.
    pub fn new(session_id: SessionId, events: Vec<UnifiedEvent>) -> Self {
        debug_assert!(
            events
                .windows(2)
                .all(|pair| pair[0].timestamp <= pair[1].timestamp),
            "timeline events must be sorted by timestamp"
        );
        Self { session_id, events }
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn events(&self) -> &[UnifiedEvent] {
        &self.events
    }

    pub fn iter(&self) -> std::slice::Iter<'_, UnifiedEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        self.events.iter().filter_map(|e| e.timestamp).min()
    }

    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        self.events.iter().filter_map(|e| e.timestamp).max()
    }
}

impl<'a> IntoIterator for &'a SessionTimeline {
    type Item = &'a UnifiedEvent;
    type IntoIter = std::slice::Iter<'a, UnifiedEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

/// Terminal state of a session as inferred from its messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionStatus {
    #[default]
    Completed,
    Failed,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Completed => "Completed",
            SessionStatus::Failed => "Failed",
        }
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Summary of one session.
///
/// Timing, status and participant sets come from the timeline; `total_cost`
/// and `total_tokens` come from the chat-completion table directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionMetrics {
    pub session_id: SessionId,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_seconds: f64,
    pub status: SessionStatus,
    pub event_counts: BTreeMap<EventType, usize>,
    pub participants: BTreeSet<String>,
    pub functions: BTreeSet<String>,
    pub models: BTreeSet<String>,
    pub total_cost: f64,
    pub total_tokens: i64,
}

impl SessionMetrics {
    pub fn count(&self, event_type: EventType) -> usize {
        self.event_counts.get(&event_type).copied().unwrap_or(0)
    }

    pub fn num_messages(&self) -> usize {
        self.count(EventType::EventReceivedMessage)
    }

    pub fn num_llm_calls(&self) -> usize {
        self.count(EventType::LlmCallStart)
    }

    pub fn num_function_calls(&self) -> usize {
        self.count(EventType::FunctionCall)
    }
}
