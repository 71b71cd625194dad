//! Assertions over the CLI's `--format json` output.
//!
//! Every command prints a `CommandResultViewModel`, so the payload sits
//! under `content`.

use anyhow::{Context, Result};
use serde_json::Value;

fn sessions(json: &Value) -> Result<&Vec<Value>> {
    json["content"]["sessions"]
        .as_array()
        .context("Expected 'content.sessions' array in JSON")
}

/// Assert that JSON output contains expected number of sessions.
pub fn assert_session_count(json: &Value, expected: usize) -> Result<()> {
    let sessions = sessions(json)?;

    if sessions.len() != expected {
        anyhow::bail!("Expected {} sessions, got {}", expected, sessions.len());
    }

    Ok(())
}

/// Assert the listed session ids, in order.
pub fn assert_session_order(json: &Value, expected: &[&str]) -> Result<()> {
    let ids = sessions(json)?
        .iter()
        .enumerate()
        .map(|(i, s)| {
            s["session_id"]
                .as_str()
                .with_context(|| format!("Session {} missing session_id", i))
        })
        .collect::<Result<Vec<&str>>>()?;

    if ids != expected {
        anyhow::bail!("Expected sessions {:?}, got {:?}", expected, ids);
    }

    Ok(())
}

/// Assert that every listed session has the given status label.
pub fn assert_all_sessions_have_status(json: &Value, status: &str) -> Result<()> {
    for (i, session) in sessions(json)?.iter().enumerate() {
        let actual = session["status"]
            .as_str()
            .with_context(|| format!("Session {} missing status", i))?;

        if actual != status {
            anyhow::bail!("Session {} has status {} but expected {}", i, actual, status);
        }
    }

    Ok(())
}

/// Assert that the conversation contains a message whose full content
/// includes `needle`.
pub fn assert_flow_mentions(json: &Value, needle: &str) -> Result<()> {
    let messages = json["content"]["messages"]
        .as_array()
        .context("Expected 'content.messages' array in JSON")?;

    let found = messages.iter().any(|m| {
        m["full_content"]
            .as_str()
            .is_some_and(|content| content.contains(needle))
    });

    if !found {
        anyhow::bail!("No message mentions {:?}", needle);
    }

    Ok(())
}
