// Engine module - session reconstruction and correlation
// Sits between typed snapshot rows (types) and the CLI presentation layer

pub mod aggregate;
pub mod analytics;
pub mod conversation;
pub mod enrich;
pub mod error;
pub mod metrics;
pub mod normalize;
pub mod resolve;

pub use aggregate::aggregate_sessions;
pub use analytics::{SessionCost, SnapshotAnalytics, analyze_snapshot};
pub use conversation::{
    ConversationMessage, DEFAULT_PREVIEW_CHARS, MessageKind, conversation_flow, role_of,
};
pub use enrich::{EnrichedCompletion, TokenCounts, enrich_completions};
pub use error::{Error, Result};
pub use metrics::{
    calculate_session_metrics, completion_count, completion_totals, indicates_failure,
    timeline_call_count, timeline_cost,
};
pub use normalize::{SYSTEM_SOURCE, normalize_events};
pub use resolve::{ConfigTable, IdentityMap, RESOLUTION_ORDER, resolve_identities};

use std::collections::BTreeMap;

use mastrace_types::{SessionId, SessionMetrics, SessionTimeline, SnapshotTables};
use tracing::debug;

/// Everything derived from one snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconstruction {
    pub completions: Vec<EnrichedCompletion>,
    pub identity: IdentityMap,
    pub timelines: BTreeMap<SessionId, SessionTimeline>,
    pub metrics: BTreeMap<SessionId, SessionMetrics>,
}

impl Reconstruction {
    pub fn timeline(&self, session_id: &SessionId) -> Option<&SessionTimeline> {
        self.timelines.get(session_id)
    }

    pub fn session_metrics(&self, session_id: &SessionId) -> Option<&SessionMetrics> {
        self.metrics.get(session_id)
    }

    pub fn analytics(&self) -> SnapshotAnalytics {
        analyze_snapshot(&self.completions)
    }
}

// Façade API - stable entry point for the CLI layer

/// Run the full pipeline: enrich → resolve → normalize → aggregate → metrics.
///
/// Only a malformed usage value fails the run; every other anomaly drops the
/// affected record and processing continues.
pub fn reconstruct(tables: &SnapshotTables) -> Result<Reconstruction> {
    let completions = enrich_completions(&tables.chat_completions)?;
    let identity = resolve_identities(&tables.agents, &tables.clients, &tables.wrappers);
    let events = normalize_events(tables, &completions, &identity);
    let timelines = aggregate_sessions(events);

    let metrics: BTreeMap<SessionId, SessionMetrics> = timelines
        .iter()
        .filter_map(|(session_id, timeline)| {
            calculate_session_metrics(session_id, timeline, &completions)
                .map(|m| (session_id.clone(), m))
        })
        .collect();

    debug!(
        sessions = timelines.len(),
        identities = identity.len(),
        completions = completions.len(),
        "reconstructed snapshot"
    );

    Ok(Reconstruction {
        completions,
        identity,
        timelines,
        metrics,
    })
}
