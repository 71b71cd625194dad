use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::ComponentId;

/// Event payload variants, one per unified event type.
///
/// Each variant carries only what consumers of that type read; the nested
/// `Value` fields are the parsed JSON columns and stay opaque to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "details")]
#[serde(rename_all = "snake_case")]
pub enum EventDetails {
    /// Agent instantiation (agents table)
    AgentConfig {
        config: Value,
        class_name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        agent_id: Option<ComponentId>,
    },

    /// `received_message` row of the events table
    EventReceivedMessage { event_name: String, data: Value },

    /// Any other row of the events table
    EventOther { event_name: String, data: Value },

    /// Request half of a chat completion
    LlmCallStart {
        request: Value,
        model: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        wrapper_id: Option<ComponentId>,
    },

    /// Response half of a chat completion
    LlmCallEnd {
        response: Value,
        cost: f64,
        latency: f64,
        is_cached: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        wrapper_id: Option<ComponentId>,
    },

    /// Tool invocation (function_calls table)
    FunctionCall {
        function_name: String,
        args: Value,
        returns: Value,
    },

    /// OpenAI client instantiation (oai_clients table)
    ClientConfig {
        config: Value,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        wrapper_id: Option<ComponentId>,
    },

    /// OpenAI wrapper instantiation (oai_wrappers table)
    WrapperConfig { config: Value },
}

/// Discriminant of [`EventDetails`], used for counting and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    AgentConfig,
    EventReceivedMessage,
    EventOther,
    LlmCallStart,
    LlmCallEnd,
    FunctionCall,
    ClientConfig,
    WrapperConfig,
}

impl EventType {
    pub const ALL: [EventType; 8] = [
        EventType::AgentConfig,
        EventType::EventReceivedMessage,
        EventType::EventOther,
        EventType::LlmCallStart,
        EventType::LlmCallEnd,
        EventType::FunctionCall,
        EventType::ClientConfig,
        EventType::WrapperConfig,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::AgentConfig => "agent_config",
            EventType::EventReceivedMessage => "event_received_message",
            EventType::EventOther => "event_other",
            EventType::LlmCallStart => "llm_call_start",
            EventType::LlmCallEnd => "llm_call_end",
            EventType::FunctionCall => "function_call",
            EventType::ClientConfig => "client_config",
            EventType::WrapperConfig => "wrapper_config",
        }
    }

    /// Configuration events describe infrastructure rather than conversation.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            EventType::AgentConfig | EventType::ClientConfig | EventType::WrapperConfig
        )
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl EventDetails {
    pub fn event_type(&self) -> EventType {
        match self {
            EventDetails::AgentConfig { .. } => EventType::AgentConfig,
            EventDetails::EventReceivedMessage { .. } => EventType::EventReceivedMessage,
            EventDetails::EventOther { .. } => EventType::EventOther,
            EventDetails::LlmCallStart { .. } => EventType::LlmCallStart,
            EventDetails::LlmCallEnd { .. } => EventType::LlmCallEnd,
            EventDetails::FunctionCall { .. } => EventType::FunctionCall,
            EventDetails::ClientConfig { .. } => EventType::ClientConfig,
            EventDetails::WrapperConfig { .. } => EventType::WrapperConfig,
        }
    }
}
