use std::collections::{BTreeMap, BTreeSet};

use mastrace_types::{
    EventDetails, EventType, SessionId, SessionMetrics, SessionStatus, SessionTimeline,
};
use serde_json::Value;

use crate::enrich::EnrichedCompletion;

const FAILURE_MARKER: &str = "exitcode";

/// Whether a received-message payload signals a failed run.
///
/// Substring heuristic over the payload rendered as JSON: code-execution
/// replies embed `exitcode: 1 (execution failed)`. Any message that merely
/// mentions the word also matches.
pub fn indicates_failure(data: &Value) -> bool {
    data.to_string().contains(FAILURE_MARKER)
}

/// Summarize one session.
///
/// Returns `None` for an empty timeline. Cost and token totals are read from
/// `completions` filtered by session id, not from the timeline's llm events.
pub fn calculate_session_metrics(
    session_id: &SessionId,
    timeline: &SessionTimeline,
    completions: &[EnrichedCompletion],
) -> Option<SessionMetrics> {
    let start_time = timeline.start_time()?;
    let end_time = timeline.end_time()?;
    let duration_seconds =
        (end_time - start_time).num_microseconds().unwrap_or(i64::MAX) as f64 / 1_000_000.0;

    let mut event_counts: BTreeMap<EventType, usize> = BTreeMap::new();
    let mut participants = BTreeSet::new();
    let mut functions = BTreeSet::new();
    let mut models = BTreeSet::new();
    let mut status = SessionStatus::Completed;

    for event in timeline {
        *event_counts.entry(event.event_type()).or_insert(0) += 1;
        participants.insert(event.source_name.clone());

        match &event.details {
            EventDetails::FunctionCall { function_name, .. } => {
                functions.insert(function_name.clone());
            }
            EventDetails::LlmCallStart { model, .. } => {
                models.insert(model.clone());
            }
            EventDetails::EventReceivedMessage { data, .. } => {
                if indicates_failure(data) {
                    status = SessionStatus::Failed;
                }
            }
            _ => {}
        }
    }

    let (total_cost, total_tokens) = completion_totals(session_id, completions);

    Some(SessionMetrics {
        session_id: session_id.clone(),
        start_time,
        end_time,
        duration_seconds,
        status,
        event_counts,
        participants,
        functions,
        models,
        total_cost,
        total_tokens,
    })
}

/// Cost and token sums of a session's chat-completion rows.
pub fn completion_totals(session_id: &SessionId, completions: &[EnrichedCompletion]) -> (f64, i64) {
    completions
        .iter()
        .filter(|c| c.record.session_id.as_ref() == Some(session_id))
        .fold((0.0, 0), |(cost, tokens), c| {
            (cost + c.cost(), tokens + c.tokens.total)
        })
}

/// Cost summed over the timeline's `llm_call_end` events.
///
/// The narrative-side counterpart of [`completion_totals`]; the two agree
/// whenever every completion row of the session made it into the timeline.
pub fn timeline_cost(timeline: &SessionTimeline) -> f64 {
    timeline
        .iter()
        .filter_map(|e| match &e.details {
            EventDetails::LlmCallEnd { cost, .. } => Some(*cost),
            _ => None,
        })
        .sum()
}

/// Number of `llm_call_end` events in the timeline.
pub fn timeline_call_count(timeline: &SessionTimeline) -> usize {
    timeline
        .iter()
        .filter(|e| e.event_type() == EventType::LlmCallEnd)
        .count()
}

/// Number of chat-completion rows attributed to the session.
pub fn completion_count(session_id: &SessionId, completions: &[EnrichedCompletion]) -> usize {
    completions
        .iter()
        .filter(|c| c.record.session_id.as_ref() == Some(session_id))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use mastrace_types::{ComponentId, UnifiedEvent};
    use serde_json::json;

    fn event(second: u32, name: &str, details: EventDetails) -> UnifiedEvent {
        UnifiedEvent {
            timestamp: Some(Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, second).unwrap()),
            session_id: Some(SessionId::from("S1")),
            source_name: name.to_string(),
            source_id: Some(ComponentId::from(name)),
            invocation_id: None,
            details,
        }
    }

    fn received(second: u32, data: Value) -> UnifiedEvent {
        event(
            second,
            "CTO",
            EventDetails::EventReceivedMessage {
                event_name: "received_message".to_string(),
                data,
            },
        )
    }

    fn timeline(events: Vec<UnifiedEvent>) -> SessionTimeline {
        SessionTimeline::new(SessionId::from("S1"), events)
    }

    #[test]
    fn test_indicates_failure() {
        assert!(indicates_failure(
            &json!({"message": {"content": "exitcode: 1 (execution failed)"}})
        ));
        assert!(!indicates_failure(&json!({"message": "all good"})));
        assert!(indicates_failure(&json!({"exitcode": 0})));
    }

    #[test]
    fn test_status_flips_on_exitcode_message() {
        let failed = timeline(vec![
            received(0, json!({"content": "hello"})),
            received(5, json!({"content": "exitcode: 1 (execution failed)"})),
        ]);
        let metrics = calculate_session_metrics(&SessionId::from("S1"), &failed, &[]).unwrap();
        assert_eq!(metrics.status, SessionStatus::Failed);

        let fine = timeline(vec![received(0, json!({"content": "hello"}))]);
        let metrics = calculate_session_metrics(&SessionId::from("S1"), &fine, &[]).unwrap();
        assert_eq!(metrics.status, SessionStatus::Completed);
    }

    #[test]
    fn test_exitcode_outside_received_messages_is_ignored() {
        let t = timeline(vec![event(
            0,
            "CTO",
            EventDetails::EventOther {
                event_name: "reply_func_executed".to_string(),
                data: json!({"content": "exitcode: 1"}),
            },
        )]);
        let metrics = calculate_session_metrics(&SessionId::from("S1"), &t, &[]).unwrap();
        assert_eq!(metrics.status, SessionStatus::Completed);
    }

    #[test]
    fn test_single_pass_accumulation() {
        let t = timeline(vec![
            received(0, json!({})),
            event(
                1,
                "CTO",
                EventDetails::FunctionCall {
                    function_name: "lookup".to_string(),
                    args: json!({}),
                    returns: json!({}),
                },
            ),
            event(
                2,
                "CEO",
                EventDetails::FunctionCall {
                    function_name: "lookup".to_string(),
                    args: json!({}),
                    returns: json!({}),
                },
            ),
            event(
                3,
                "CEO",
                EventDetails::LlmCallStart {
                    request: json!({}),
                    model: "gpt-4".to_string(),
                    wrapper_id: None,
                },
            ),
        ]);
        let metrics = calculate_session_metrics(&SessionId::from("S1"), &t, &[]).unwrap();

        assert_eq!(metrics.num_messages(), 1);
        assert_eq!(metrics.num_function_calls(), 2);
        assert_eq!(metrics.num_llm_calls(), 1);
        assert_eq!(metrics.functions, BTreeSet::from(["lookup".to_string()]));
        assert_eq!(
            metrics.participants,
            BTreeSet::from(["CEO".to_string(), "CTO".to_string()])
        );
        assert_eq!(metrics.models, BTreeSet::from(["gpt-4".to_string()]));
        assert_eq!(metrics.duration_seconds, 3.0);
    }

    #[test]
    fn test_empty_timeline_yields_no_metrics() {
        let t = timeline(Vec::new());
        assert!(calculate_session_metrics(&SessionId::from("S1"), &t, &[]).is_none());
    }
}
