use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::details::{EventDetails, EventType};
use crate::domain::{ComponentId, InvocationId, SessionId};

// NOTE: Unified event shape
//
// Six snapshot tables are folded into this one shape. `timestamp` and
// `session_id` stay optional here: the normalizer emits what the rows carry,
// and the session aggregator is the single place that drops events lacking
// either. Anything that reaches a SessionTimeline has both.

/// One entry of the reconstructed narrative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnifiedEvent {
    pub timestamp: Option<DateTime<Utc>>,

    pub session_id: Option<SessionId>,

    /// Display name of the emitting component
    pub source_name: String,

    /// Absent when the row's component-id column is NULL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<ComponentId>,

    /// Links llm_call_start to its llm_call_end
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invocation_id: Option<InvocationId>,

    /// Event type and payload (flattened enum)
    #[serde(flatten)]
    pub details: EventDetails,
}

impl UnifiedEvent {
    pub fn event_type(&self) -> EventType {
        self.details.event_type()
    }
}
