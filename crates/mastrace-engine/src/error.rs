use std::fmt;

use mastrace_types::InvocationId;

/// Result type for mastrace-engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the engine layer
///
/// Per-record anomalies (bad JSON, missing columns, unresolved ids) are
/// recovered where they occur and never show up here.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A chat-completion `usage` value is present but not an integer
    InvalidUsageFormat {
        invocation_id: Option<InvocationId>,
        field: String,
        value: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidUsageFormat {
                invocation_id,
                field,
                value,
            } => {
                let invocation = invocation_id
                    .as_ref()
                    .map(|id| id.as_str())
                    .unwrap_or("<none>");
                write!(
                    f,
                    "Invalid usage format: usage.{} = {} in chat completion {} is not an integer",
                    field, value, invocation
                )
            }
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_usage_message_names_field_and_invocation() {
        let err = Error::InvalidUsageFormat {
            invocation_id: Some(InvocationId::new("I1")),
            field: "total_tokens".to_string(),
            value: "\"abc\"".to_string(),
        };
        let msg = err.to_string();

        assert!(msg.starts_with("Invalid usage format:"));
        assert!(msg.contains("usage.total_tokens"));
        assert!(msg.contains("I1"));
    }
}
