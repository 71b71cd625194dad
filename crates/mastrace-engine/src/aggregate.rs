use std::collections::BTreeMap;

use mastrace_types::{SessionId, SessionTimeline, UnifiedEvent};
use tracing::debug;

/// Partition unified events into per-session timelines.
///
/// 1. drop events without a timestamp
/// 2. stable sort by timestamp (equal timestamps keep production order)
/// 3. drop events without a session id, bucket the rest by session
///
/// Sessions that end up with no events are absent from the result.
pub fn aggregate_sessions(events: Vec<UnifiedEvent>) -> BTreeMap<SessionId, SessionTimeline> {
    let produced = events.len();

    let mut timed: Vec<UnifiedEvent> = events
        .into_iter()
        .filter(|e| e.timestamp.is_some())
        .collect();
    timed.sort_by_key(|e| e.timestamp);

    let mut buckets: BTreeMap<SessionId, Vec<UnifiedEvent>> = BTreeMap::new();
    let mut kept = 0usize;
    for event in timed {
        let Some(session_id) = event.session_id.clone() else {
            continue;
        };
        buckets.entry(session_id).or_default().push(event);
        kept += 1;
    }

    debug!(
        produced,
        kept,
        sessions = buckets.len(),
        "aggregated events into sessions"
    );

    buckets
        .into_iter()
        .map(|(session_id, events)| {
            let timeline = SessionTimeline::new(session_id.clone(), events);
            (session_id, timeline)
        })
        .collect()
}
