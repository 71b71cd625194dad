use std::collections::{BTreeMap, BTreeSet};

use chrono::{NaiveDate, Timelike};
use mastrace_types::SessionId;
use serde::Serialize;

use crate::enrich::EnrichedCompletion;

/// Cost attributed to one session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionCost {
    pub session_id: SessionId,
    pub cost: f64,
}

/// Snapshot-wide aggregates over the chat-completion table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SnapshotAnalytics {
    pub total_sessions: usize,
    pub total_llm_calls: usize,
    pub total_cost: f64,
    /// Descending by cost, ties by session id
    pub cost_by_session: Vec<SessionCost>,
    pub daily_cost: BTreeMap<NaiveDate, f64>,
    pub tokens_by_model: BTreeMap<String, i64>,
    /// Hour of day (0-23, UTC) → tokens
    pub hourly_tokens: BTreeMap<u32, i64>,
}

impl SnapshotAnalytics {
    /// The `n` most expensive sessions.
    pub fn top_sessions(&self, n: usize) -> &[SessionCost] {
        &self.cost_by_session[..n.min(self.cost_by_session.len())]
    }
}

pub fn analyze_snapshot(completions: &[EnrichedCompletion]) -> SnapshotAnalytics {
    let mut sessions = BTreeSet::new();
    let mut per_session: BTreeMap<SessionId, f64> = BTreeMap::new();
    let mut analytics = SnapshotAnalytics {
        total_llm_calls: completions.len(),
        ..Default::default()
    };

    for completion in completions {
        let cost = completion.cost();
        analytics.total_cost += cost;

        if let Some(session_id) = &completion.record.session_id {
            sessions.insert(session_id.clone());
            *per_session.entry(session_id.clone()).or_insert(0.0) += cost;
        }

        *analytics
            .tokens_by_model
            .entry(completion.model())
            .or_insert(0) += completion.tokens.total;

        // date and hour groupings need a start time
        if let Some(start) = completion.record.start_time {
            *analytics.daily_cost.entry(start.date_naive()).or_insert(0.0) += cost;
            *analytics.hourly_tokens.entry(start.hour()).or_insert(0) += completion.tokens.total;
        }
    }

    let mut cost_by_session: Vec<SessionCost> = per_session
        .into_iter()
        .map(|(session_id, cost)| SessionCost { session_id, cost })
        .collect();
    // stable: equal costs stay in session-id order from the BTreeMap
    cost_by_session.sort_by(|a, b| b.cost.total_cmp(&a.cost));

    analytics.total_sessions = sessions.len();
    analytics.cost_by_session = cost_by_session;
    analytics
}
