//! Ready-made snapshots.
//!
//! `two_session_snapshot` writes two runs on different days:
//! - `run-alpha`: CEO agent, one completion (0.02, 100 tokens), one `lookup`
//!   call and both infrastructure rows; completes normally
//! - `run-beta`: Engineer agent, one completion (0.05, 40 tokens) and a
//!   received message reporting `exitcode: 1`; fails

use anyhow::Result;
use chrono::{DateTime, TimeZone, Utc};
use mastrace_types::{
    AgentRecord, ChatCompletionRecord, ClientRecord, ComponentId, EventRecord,
    FunctionCallRecord, InvocationId, SessionId, WrapperRecord,
};
use serde_json::json;
use std::path::Path;

use crate::SnapshotBuilder;

pub const ALPHA: &str = "run-alpha";
pub const BETA: &str = "run-beta";

pub fn ts(day: u32, hour: u32, minute: u32, second: u32) -> Option<DateTime<Utc>> {
    Utc.with_ymd_and_hms(2024, 5, day, hour, minute, second).single()
}

pub fn two_session_snapshot(path: &Path) -> Result<SnapshotBuilder> {
    let mut builder = SnapshotBuilder::create(path)?;
    write_alpha(&mut builder)?;
    write_beta(&mut builder)?;
    Ok(builder)
}

fn write_alpha(b: &mut SnapshotBuilder) -> Result<()> {
    let session = Some(SessionId::from(ALPHA));

    b.wrapper(&WrapperRecord {
        session_id: session.clone(),
        wrapper_id: Some(ComponentId::from("W1")),
        timestamp: ts(1, 9, 59, 58),
        init_args: json!({"config_list": [{"model": "gpt-4"}]}),
    })?
    .client(&ClientRecord {
        session_id: session.clone(),
        client_id: Some(ComponentId::from("C1")),
        wrapper_id: Some(ComponentId::from("W1")),
        timestamp: ts(1, 9, 59, 59),
        init_args: json!({"model": "gpt-4"}),
    })?
    .agent(&AgentRecord {
        session_id: session.clone(),
        agent_id: Some(ComponentId::from("A1")),
        wrapper_id: Some(ComponentId::from("W1")),
        timestamp: ts(1, 10, 0, 0),
        init_args: json!({"name": "CEO", "system_message": "You lead."}),
        agent_class_name: Some("AssistantAgent".to_string()),
        source_name: Some("CEO".to_string()),
    })?
    .event(&EventRecord {
        session_id: session.clone(),
        source_id: Some(ComponentId::from("A1")),
        timestamp: ts(1, 10, 0, 1),
        event_name: Some("received_message".to_string()),
        json_state: json!({"message": {"content": "Draft the launch plan"}, "name": "product_manager_CTO"}),
        source_name: Some("CEO".to_string()),
    })?
    .chat_completion(&ChatCompletionRecord {
        session_id: session.clone(),
        client_id: Some(ComponentId::from("C1")),
        wrapper_id: Some(ComponentId::from("W1")),
        invocation_id: Some(InvocationId::from("I1")),
        start_time: ts(1, 10, 0, 2),
        end_time: ts(1, 10, 0, 4),
        request: json!({
            "model": "gpt-4",
            "messages": [{"role": "user", "content": "Draft the launch plan"}]
        }),
        response: json!({
            "choices": [{"message": {"role": "assistant", "content": "Launch plan ready"}}],
            "usage": {"total_tokens": 100, "prompt_tokens": 70, "completion_tokens": 30}
        }),
        cost: Some(0.02),
        latency: Some(2.0),
        is_cached: false,
        source_name: Some(" ceo ".to_string()),
    })?
    .function_call(&FunctionCallRecord {
        source_id: Some(ComponentId::from("W1")),
        timestamp: ts(1, 10, 0, 5),
        function_name: Some("lookup".to_string()),
        args: json!({"query": "launch date"}),
        returns: json!("2024-06-01"),
        source_name: Some("CEO".to_string()),
    })?;
    Ok(())
}

fn write_beta(b: &mut SnapshotBuilder) -> Result<()> {
    let session = Some(SessionId::from(BETA));

    b.agent(&AgentRecord {
        session_id: session.clone(),
        agent_id: Some(ComponentId::from("A2")),
        wrapper_id: Some(ComponentId::from("W2")),
        timestamp: ts(2, 14, 0, 0),
        init_args: json!({"name": "Engineer"}),
        agent_class_name: Some("AssistantAgent".to_string()),
        source_name: Some("Engineer".to_string()),
    })?
    .chat_completion(&ChatCompletionRecord {
        session_id: session.clone(),
        client_id: Some(ComponentId::from("C2")),
        wrapper_id: Some(ComponentId::from("W2")),
        invocation_id: Some(InvocationId::from("I2")),
        start_time: ts(2, 14, 0, 1),
        end_time: ts(2, 14, 0, 2),
        request: json!({"model": "gpt-4o-mini", "messages": []}),
        response: json!({"usage": {"total_tokens": 40, "prompt_tokens": 30, "completion_tokens": 10}}),
        cost: Some(0.05),
        latency: Some(1.0),
        is_cached: true,
        source_name: Some("engineer".to_string()),
    })?
    .event(&EventRecord {
        session_id: session,
        source_id: Some(ComponentId::from("A2")),
        timestamp: ts(2, 14, 0, 5),
        event_name: Some("received_message".to_string()),
        json_state: json!({
            "message": {"content": "exitcode: 1 (execution failed)"},
            "name": "user_proxy"
        }),
        source_name: Some("Engineer".to_string()),
    })?;
    Ok(())
}
