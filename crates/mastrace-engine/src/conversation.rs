use chrono::{DateTime, Utc};
use mastrace_types::{EventDetails, SessionTimeline, UnifiedEvent};
use serde::Serialize;
use serde_json::Value;

use crate::normalize::SYSTEM_SOURCE;

pub const DEFAULT_PREVIEW_CHARS: usize = 300;

const ELLIPSIS: &str = "...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Message,
    Function,
}

/// One line of a session's conversation, as a reader would follow it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversationMessage {
    pub timestamp: Option<DateTime<Utc>>,
    pub sender: String,
    pub receiver: String,
    pub role: String,
    /// Preview, cut to the configured limit
    pub content: String,
    pub full_content: String,
    pub kind: MessageKind,
    pub source_name: String,
}

/// Extract the conversation carried by a timeline.
///
/// Received messages, request messages of llm calls, response choices and
/// function calls each contribute lines; other event types contribute none.
pub fn conversation_flow(
    timeline: &SessionTimeline,
    preview_chars: usize,
) -> Vec<ConversationMessage> {
    let mut out = Vec::new();
    for event in timeline {
        match &event.details {
            EventDetails::EventReceivedMessage { data, .. } => {
                out.extend(received_message(event, data, preview_chars));
            }
            EventDetails::LlmCallStart { request, .. } => {
                out.extend(request_messages(event, request, preview_chars));
            }
            EventDetails::LlmCallEnd { response, .. } => {
                out.extend(response_messages(event, response, preview_chars));
            }
            EventDetails::FunctionCall { function_name, .. } => {
                out.push(ConversationMessage {
                    timestamp: event.timestamp,
                    sender: event.source_name.clone(),
                    receiver: SYSTEM_SOURCE.to_string(),
                    role: role_of(&event.source_name).to_string(),
                    content: format!("Function call: {}", function_name),
                    full_content: serde_json::to_string(&event.details).unwrap_or_default(),
                    kind: MessageKind::Function,
                    source_name: event.source_name.clone(),
                });
            }
            _ => {}
        }
    }
    out
}

/// Role of a participant name: the segment after its last `_`.
///
/// `"product_manager_CTO"` → `"CTO"`; names without `_` are their own role.
pub fn role_of(name: &str) -> &str {
    name.rsplit('_').next().unwrap_or(name)
}

/// Cut `text` to at most `limit` characters, marking the cut with `...`.
pub fn preview(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    // too short for a marker: plain cut
    if limit < ELLIPSIS.len() {
        return text.chars().take(limit).collect();
    }
    let mut cut: String = text.chars().take(limit - ELLIPSIS.len()).collect();
    cut.push_str(ELLIPSIS);
    cut
}

fn received_message(
    event: &UnifiedEvent,
    data: &Value,
    limit: usize,
) -> Option<ConversationMessage> {
    let direct = data.get("content").map(text_of).unwrap_or_default();
    let content = if direct.is_empty() {
        data.get("message")
            .and_then(|m| m.get("content"))
            .map(text_of)
            .unwrap_or_default()
    } else {
        direct
    };
    if content.is_empty() {
        return None;
    }

    let sender = data
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or(&event.source_name)
        .to_string();

    Some(ConversationMessage {
        timestamp: event.timestamp,
        role: role_of(&sender).to_string(),
        sender,
        receiver: event.source_name.clone(),
        content: preview(&content, limit),
        full_content: content,
        kind: MessageKind::Message,
        source_name: event.source_name.clone(),
    })
}

fn request_messages(
    event: &UnifiedEvent,
    request: &Value,
    limit: usize,
) -> Vec<ConversationMessage> {
    let Some(messages) = request.get("messages").and_then(Value::as_array) else {
        return Vec::new();
    };

    messages
        .iter()
        .filter(|m| m.is_object())
        .map(|m| {
            let role = m
                .get("role")
                .and_then(Value::as_str)
                .unwrap_or(SYSTEM_SOURCE)
                .to_string();
            let content = m.get("content").map(text_of).unwrap_or_default();
            ConversationMessage {
                timestamp: event.timestamp,
                sender: role.clone(),
                receiver: event.source_name.clone(),
                role,
                content: preview(&content, limit),
                full_content: content,
                kind: MessageKind::Message,
                source_name: event.source_name.clone(),
            }
        })
        .collect()
}

fn response_messages(
    event: &UnifiedEvent,
    response: &Value,
    limit: usize,
) -> Vec<ConversationMessage> {
    let Some(choices) = response.get("choices").and_then(Value::as_array) else {
        return Vec::new();
    };

    choices
        .iter()
        .filter_map(|choice| choice.get("message"))
        .filter(|message| !is_blank(message))
        .map(|message| {
            let content = message.get("content").map(text_of).unwrap_or_default();
            ConversationMessage {
                timestamp: event.timestamp,
                sender: event.source_name.clone(),
                receiver: SYSTEM_SOURCE.to_string(),
                role: role_of(&event.source_name).to_string(),
                content: preview(&content, limit),
                full_content: content,
                kind: MessageKind::Message,
                source_name: event.source_name.clone(),
            }
        })
        .collect()
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use mastrace_types::{ComponentId, SessionId};
    use serde_json::json;

    fn event(second: u32, source: &str, details: EventDetails) -> UnifiedEvent {
        UnifiedEvent {
            timestamp: Some(Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, second).unwrap()),
            session_id: Some(SessionId::from("S1")),
            source_name: source.to_string(),
            source_id: Some(ComponentId::from("W1")),
            invocation_id: None,
            details,
        }
    }

    fn flow(events: Vec<UnifiedEvent>) -> Vec<ConversationMessage> {
        conversation_flow(
            &SessionTimeline::new(SessionId::from("S1"), events),
            DEFAULT_PREVIEW_CHARS,
        )
    }

    #[test]
    fn test_role_of() {
        assert_eq!(role_of("product_manager_CTO"), "CTO");
        assert_eq!(role_of("CEO"), "CEO");
        assert_eq!(role_of("trailing_"), "");
    }

    #[test]
    fn test_preview_truncation() {
        let long = "x".repeat(301);
        let cut = preview(&long, 300);
        assert_eq!(cut.chars().count(), 300);
        assert!(cut.ends_with("..."));
        assert_eq!(&cut[..297], &long[..297]);

        let exact = "y".repeat(300);
        assert_eq!(preview(&exact, 300), exact);
    }

    #[test]
    fn test_preview_never_exceeds_tiny_limits() {
        assert_eq!(preview("abcdef", 2), "ab");
        assert_eq!(preview("abcdef", 0), "");
        assert_eq!(preview("abcdef", 3), "...");
        assert_eq!(preview("abcdef", 4), "a...");
    }

    #[test]
    fn test_received_message_falls_back_to_nested_content() {
        let messages = flow(vec![
            event(
                0,
                "assistant_CTO",
                EventDetails::EventReceivedMessage {
                    event_name: "received_message".to_string(),
                    data: json!({"message": {"content": "nested"}, "name": "user_CEO"}),
                },
            ),
            event(
                1,
                "assistant_CTO",
                EventDetails::EventReceivedMessage {
                    event_name: "received_message".to_string(),
                    data: json!({"content": ""}),
                },
            ),
        ]);

        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].content, "nested");
        assert_eq!(messages[0].sender, "user_CEO");
        assert_eq!(messages[0].role, "CEO");
        assert_eq!(messages[0].receiver, "assistant_CTO");
    }

    #[test]
    fn test_llm_call_contributes_request_and_response_lines() {
        let messages = flow(vec![
            event(
                0,
                "CTO",
                EventDetails::LlmCallStart {
                    request: json!({"messages": [
                        {"role": "system", "content": "be brief"},
                        {"content": "no role"}
                    ]}),
                    model: "gpt-4".to_string(),
                    wrapper_id: None,
                },
            ),
            event(
                2,
                "CTO",
                EventDetails::LlmCallEnd {
                    response: json!({"choices": [{"message": {"content": "ok"}}]}),
                    cost: 0.0,
                    latency: 0.0,
                    is_cached: false,
                    wrapper_id: None,
                },
            ),
        ]);

        let lines: Vec<(&str, &str, &str)> = messages
            .iter()
            .map(|m| (m.sender.as_str(), m.receiver.as_str(), m.content.as_str()))
            .collect();
        assert_eq!(
            lines,
            [
                ("system", "CTO", "be brief"),
                ("System", "CTO", "no role"),
                ("CTO", "System", "ok"),
            ]
        );
    }

    #[test]
    fn test_function_call_line() {
        let messages = flow(vec![event(
            0,
            "coder_Engineer",
            EventDetails::FunctionCall {
                function_name: "lookup".to_string(),
                args: json!({"q": 1}),
                returns: json!(null),
            },
        )]);

        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].kind, MessageKind::Function);
        assert_eq!(messages[0].content, "Function call: lookup");
        assert_eq!(messages[0].role, "Engineer");
        assert!(messages[0].full_content.contains("\"function_name\":\"lookup\""));
    }
}
