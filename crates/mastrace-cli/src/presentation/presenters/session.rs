use mastrace_engine::{ConversationMessage, MessageKind};
use mastrace_types::{EventDetails, SessionMetrics, SessionStatus, SessionTimeline, UnifiedEvent};
use serde_json::Value;

use crate::presentation::formatters::{format_cost, format_time_of_day, format_timestamp, one_line};
use crate::presentation::view_models::{
    CommandResultViewModel, ConversationViewModel, FilterSummary, Guidance, MessageRow,
    SessionDetailViewModel, SessionListViewModel, SessionSummaryRow, StatusBadge, TimelineRow,
};
use crate::types::StatusFilter;

const SUMMARY_CHARS: usize = 120;

pub fn summary_row(m: &SessionMetrics) -> SessionSummaryRow {
    SessionSummaryRow {
        session_id: m.session_id.to_string(),
        start_time: format_timestamp(&m.start_time),
        end_time: format_timestamp(&m.end_time),
        duration_seconds: m.duration_seconds,
        status: m.status.to_string(),
        num_messages: m.num_messages(),
        num_llm_calls: m.num_llm_calls(),
        num_function_calls: m.num_function_calls(),
        total_cost: m.total_cost,
        total_tokens: m.total_tokens,
        participants: m.participants.iter().cloned().collect(),
    }
}

/// Newest session first; equal start times by session id.
pub fn present_session_list<'a>(
    metrics: impl IntoIterator<Item = &'a SessionMetrics>,
    status: Option<StatusFilter>,
    limit: usize,
) -> CommandResultViewModel<SessionListViewModel> {
    let mut matching: Vec<&SessionMetrics> = metrics
        .into_iter()
        .filter(|m| status.is_none_or(|s| s.matches(m.status)))
        .collect();
    matching.sort_by(|a, b| {
        b.start_time
            .cmp(&a.start_time)
            .then_with(|| a.session_id.cmp(&b.session_id))
    });

    let total_count = matching.len();
    let sessions: Vec<SessionSummaryRow> =
        matching.into_iter().take(limit).map(summary_row).collect();
    let shown = sessions.len();

    let content = SessionListViewModel {
        sessions,
        total_count,
        applied_filters: FilterSummary {
            status: status.map(|s| s.to_string()),
            limit,
        },
    };

    let mut result = CommandResultViewModel::new(content);
    if total_count == 0 {
        result = result.with_badge(StatusBadge::info("No sessions found"));
    } else {
        let label = if total_count == 1 {
            "1 session found".to_string()
        } else {
            format!("{} sessions found", total_count)
        };
        result = result.with_badge(StatusBadge::success(label));

        if shown < total_count {
            result = result.with_suggestion(
                Guidance::new(format!(
                    "Showing first {} sessions, use --limit to see more",
                    shown
                ))
                .with_command(format!("mastrace session list --limit {}", total_count)),
            );
        }
    }
    result
}

pub fn present_session_detail(
    metrics: &SessionMetrics,
    timeline: &SessionTimeline,
) -> CommandResultViewModel<SessionDetailViewModel> {
    let content = SessionDetailViewModel {
        session: summary_row(metrics),
        event_counts: metrics
            .event_counts
            .iter()
            .map(|(event_type, count)| (event_type.to_string(), *count))
            .collect(),
        functions: metrics.functions.iter().cloned().collect(),
        models: metrics.models.iter().cloned().collect(),
        timeline: timeline.iter().map(timeline_row).collect(),
    };

    let badge = match metrics.status {
        SessionStatus::Completed => {
            StatusBadge::success(format!("Session {} completed", metrics.session_id))
        }
        SessionStatus::Failed => {
            StatusBadge::warning(format!("Session {} failed", metrics.session_id))
        }
    };

    CommandResultViewModel::new(content)
        .with_badge(badge)
        .with_suggestion(
            Guidance::new("Follow the conversation")
                .with_command(format!("mastrace session flow {}", metrics.session_id)),
        )
}

fn timeline_row(event: &UnifiedEvent) -> TimelineRow {
    TimelineRow {
        timestamp: event
            .timestamp
            .as_ref()
            .map(format_timestamp)
            .unwrap_or_default(),
        event_type: event.event_type().to_string(),
        source_name: event.source_name.clone(),
        invocation_id: event.invocation_id.as_ref().map(|id| id.to_string()),
        summary: event_summary(&event.details),
    }
}

fn event_summary(details: &EventDetails) -> String {
    match details {
        EventDetails::AgentConfig { class_name, .. } => format!("class {}", class_name),
        EventDetails::EventReceivedMessage { data, .. } => message_text(data)
            .map(|text| one_line(&text, SUMMARY_CHARS))
            .unwrap_or_default(),
        EventDetails::EventOther { event_name, .. } => event_name.clone(),
        EventDetails::LlmCallStart { model, .. } => format!("model {}", model),
        EventDetails::LlmCallEnd {
            cost,
            latency,
            is_cached,
            ..
        } => {
            let cached = if *is_cached { ", cached" } else { "" };
            format!("cost {}, latency {:.2}s{}", format_cost(*cost), latency, cached)
        }
        EventDetails::FunctionCall { function_name, .. } => format!("{}()", function_name),
        EventDetails::ClientConfig { .. } => "client config".to_string(),
        EventDetails::WrapperConfig { .. } => "wrapper config".to_string(),
    }
}

fn message_text(data: &Value) -> Option<String> {
    data.get("content")
        .or_else(|| data.get("message").and_then(|m| m.get("content")))
        .or_else(|| data.get("message"))
        .map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
}

pub fn present_conversation(
    session_id: &str,
    messages: Vec<ConversationMessage>,
) -> CommandResultViewModel<ConversationViewModel> {
    let count = messages.len();
    let rows = messages
        .into_iter()
        .map(|m| MessageRow {
            timestamp: m.timestamp.as_ref().map(format_time_of_day),
            sender: m.sender,
            receiver: m.receiver,
            role: m.role,
            kind: match m.kind {
                MessageKind::Message => "message".to_string(),
                MessageKind::Function => "function".to_string(),
            },
            content: m.content,
            full_content: m.full_content,
        })
        .collect();

    let badge = if count == 0 {
        StatusBadge::info("No conversation messages")
    } else {
        StatusBadge::success(format!("{} messages", count))
    };

    CommandResultViewModel::new(ConversationViewModel {
        session_id: session_id.to_string(),
        messages: rows,
    })
    .with_badge(badge)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use mastrace_types::SessionId;
    use std::collections::{BTreeMap, BTreeSet};

    fn metrics(id: &str, day: u32, status: SessionStatus) -> SessionMetrics {
        let start = Utc.with_ymd_and_hms(2024, 5, day, 10, 0, 0).unwrap();
        SessionMetrics {
            session_id: SessionId::from(id),
            start_time: start,
            end_time: start,
            duration_seconds: 0.0,
            status,
            event_counts: BTreeMap::new(),
            participants: BTreeSet::new(),
            functions: BTreeSet::new(),
            models: BTreeSet::new(),
            total_cost: 0.0,
            total_tokens: 0,
        }
    }

    #[test]
    fn test_list_is_newest_first_and_limited() {
        let all = [
            metrics("old", 1, SessionStatus::Completed),
            metrics("new", 3, SessionStatus::Completed),
            metrics("mid", 2, SessionStatus::Failed),
        ];
        let result = present_session_list(&all, None, 2);
        let ids: Vec<&str> = result
            .content
            .sessions
            .iter()
            .map(|s| s.session_id.as_str())
            .collect();

        assert_eq!(ids, ["new", "mid"]);
        assert_eq!(result.content.total_count, 3);
        assert_eq!(result.suggestions.len(), 1);
    }

    #[test]
    fn test_status_filter() {
        let all = [
            metrics("a", 1, SessionStatus::Completed),
            metrics("b", 2, SessionStatus::Failed),
        ];
        let result = present_session_list(&all, Some(StatusFilter::Failed), 50);

        assert_eq!(result.content.sessions.len(), 1);
        assert_eq!(result.content.sessions[0].session_id, "b");
        assert_eq!(result.content.applied_filters.status.as_deref(), Some("failed"));
    }

    #[test]
    fn test_llm_end_summary() {
        let details = EventDetails::LlmCallEnd {
            response: Value::Null,
            cost: 0.02,
            latency: 1.5,
            is_cached: true,
            wrapper_id: None,
        };
        assert_eq!(event_summary(&details), "cost $0.0200, latency 1.50s, cached");
    }

    #[test]
    fn test_conversation_view_model_shape() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 5).unwrap();
        let messages = vec![
            ConversationMessage {
                timestamp: Some(at),
                sender: "product_manager_CTO".to_string(),
                receiver: "CEO".to_string(),
                role: "CTO".to_string(),
                content: "Draft...".to_string(),
                full_content: "Draft the plan".to_string(),
                kind: MessageKind::Message,
                source_name: "CEO".to_string(),
            },
            ConversationMessage {
                timestamp: None,
                sender: "CEO".to_string(),
                receiver: "System".to_string(),
                role: "CEO".to_string(),
                content: "Function call: lookup".to_string(),
                full_content: "{}".to_string(),
                kind: MessageKind::Function,
                source_name: "CEO".to_string(),
            },
        ];

        let result = present_conversation("S1", messages);
        insta::assert_json_snapshot!(result, @r###"
        {
          "badge": {
            "level": "success",
            "label": "2 messages"
          },
          "content": {
            "session_id": "S1",
            "messages": [
              {
                "timestamp": "10:00:05",
                "sender": "product_manager_CTO",
                "receiver": "CEO",
                "role": "CTO",
                "kind": "message",
                "content": "Draft...",
                "full_content": "Draft the plan"
              },
              {
                "timestamp": null,
                "sender": "CEO",
                "receiver": "System",
                "role": "CEO",
                "kind": "function",
                "content": "Function call: lookup",
                "full_content": "{}"
              }
            ]
          }
        }
        "###);
    }
}
