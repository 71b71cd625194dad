use mastrace_types::{ChatCompletionRecord, InvocationId};
use serde::Serialize;
use serde_json::Value;

use crate::{Error, Result};

/// Token counts read from a response's `usage` object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TokenCounts {
    pub total: i64,
    pub prompt: i64,
    pub completion: i64,
}

/// Chat-completion row with its derived numeric columns.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedCompletion {
    pub record: ChatCompletionRecord,
    /// Trimmed, upper-cased `source_name`
    pub source_name: Option<String>,
    /// `end_time - start_time` in seconds
    pub duration_seconds: Option<f64>,
    pub tokens: TokenCounts,
    pub cost_per_token: f64,
    pub completion_ratio: f64,
}

impl EnrichedCompletion {
    pub fn cost(&self) -> f64 {
        self.record.cost.unwrap_or(0.0)
    }

    /// Model named in the request, `"Unknown"` when absent.
    pub fn model(&self) -> String {
        request_model(&self.record.request)
    }
}

pub(crate) fn request_model(request: &Value) -> String {
    request
        .get("model")
        .and_then(Value::as_str)
        .unwrap_or("Unknown")
        .to_string()
}

/// Derive durations, token counts and ratios for every chat-completion row.
///
/// Fails on the first usage value that cannot be read as an integer; that
/// points at an upstream writer bug, not at a missing value.
pub fn enrich_completions(records: &[ChatCompletionRecord]) -> Result<Vec<EnrichedCompletion>> {
    records.iter().map(enrich_completion).collect()
}

pub fn enrich_completion(record: &ChatCompletionRecord) -> Result<EnrichedCompletion> {
    let duration_seconds = match (record.start_time, record.end_time) {
        (Some(start), Some(end)) => Some(signed_seconds(end - start)),
        _ => None,
    };

    let tokens = extract_tokens(&record.response, record.invocation_id.as_ref())?;
    let cost = record.cost.unwrap_or(0.0);

    let (cost_per_token, completion_ratio) = if tokens.total > 0 {
        (
            cost / tokens.total as f64,
            tokens.completion as f64 / tokens.total as f64,
        )
    } else {
        (0.0, 0.0)
    };

    Ok(EnrichedCompletion {
        record: record.clone(),
        source_name: record
            .source_name
            .as_deref()
            .map(|name| name.trim().to_uppercase()),
        duration_seconds,
        tokens,
        cost_per_token,
        completion_ratio,
    })
}

fn signed_seconds(delta: chrono::TimeDelta) -> f64 {
    delta.num_microseconds().unwrap_or(i64::MAX) as f64 / 1_000_000.0
}

fn extract_tokens(response: &Value, invocation: Option<&InvocationId>) -> Result<TokenCounts> {
    let usage = match response.get("usage") {
        None | Some(Value::Null) => return Ok(TokenCounts::default()),
        Some(Value::Object(usage)) => usage,
        Some(other) => {
            return Err(Error::InvalidUsageFormat {
                invocation_id: invocation.cloned(),
                field: "usage".to_string(),
                value: other.to_string(),
            });
        }
    };

    let field = |name: &str| -> Result<i64> {
        match usage.get(name) {
            None => Ok(0),
            Some(value) => coerce_count(value).ok_or_else(|| Error::InvalidUsageFormat {
                invocation_id: invocation.cloned(),
                field: name.to_string(),
                value: value.to_string(),
            }),
        }
    };

    Ok(TokenCounts {
        total: field("total_tokens")?,
        prompt: field("prompt_tokens")?,
        completion: field("completion_tokens")?,
    })
}

/// Integer coercion for usage values.
///
/// Accepts integers, finite floats (truncated), booleans and numeric strings.
fn coerce_count(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::Bool(b) => Some(i64::from(*b)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
