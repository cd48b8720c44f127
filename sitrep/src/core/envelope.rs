//! The uniform result envelope every gatherer returns.
//!
//! Consumers depend on the serialized shape only: `source`, `status`, exactly
//! one of `data`/`reason`/`error`, and `timestamp`. The one-of property holds
//! by construction because the three states are enum variants, not optional
//! fields.

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

/// Terminal output of one gatherer invocation.
#[derive(Debug, Clone, Serialize)]
pub struct GathererResult<T> {
    /// Gatherer identity (`beads`, `graphite`, `github`).
    pub source: &'static str,
    #[serde(flatten)]
    pub outcome: GathererOutcome<T>,
    /// Capture instant, RFC 3339 in UTC with millisecond precision.
    pub timestamp: String,
}

/// The three-state outcome carried inside [`GathererResult`].
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum GathererOutcome<T> {
    /// The gatherer ran to completion; `data` is the source-specific payload.
    Success { data: T },
    /// A precondition was not met (tool missing, wrong directory). Not an
    /// error: the consumer learns why this source has nothing to say.
    Unavailable { reason: String },
    /// The gatherer ran but could not produce a payload.
    Error { error: String },
}

impl<T> GathererResult<T> {
    pub fn success(source: &'static str, data: T) -> Self {
        Self::finish(source, GathererOutcome::Success { data })
    }

    pub fn unavailable(source: &'static str, reason: impl Into<String>) -> Self {
        Self::finish(
            source,
            GathererOutcome::Unavailable {
                reason: reason.into(),
            },
        )
    }

    pub fn error(source: &'static str, error: impl Into<String>) -> Self {
        Self::finish(
            source,
            GathererOutcome::Error {
                error: error.into(),
            },
        )
    }

    fn finish(source: &'static str, outcome: GathererOutcome<T>) -> Self {
        Self {
            source,
            outcome,
            timestamp: capture_timestamp(),
        }
    }
}

/// The instant a result was captured, formatted for the envelope.
pub fn capture_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::*;
    use crate::core::time::parse_timestamp;

    /// Object keys, in serde_json's sorted order.
    fn keys(value: &Value) -> Vec<&str> {
        value
            .as_object()
            .expect("envelope is an object")
            .keys()
            .map(String::as_str)
            .collect()
    }

    #[test]
    fn success_carries_data_and_nothing_else() {
        let result = GathererResult::success("beads", vec!["x"]);
        let json = serde_json::to_value(&result).expect("serializes");

        assert_eq!(json["status"], "success");
        assert_eq!(json["source"], "beads");
        assert_eq!(json["data"][0], "x");
        assert_eq!(keys(&json), ["data", "source", "status", "timestamp"]);
    }

    #[test]
    fn unavailable_carries_reason_only() {
        let result = GathererResult::<()>::unavailable("graphite", "gt CLI not installed");
        let json = serde_json::to_value(&result).expect("serializes");

        assert_eq!(json["status"], "unavailable");
        assert_eq!(json["reason"], "gt CLI not installed");
        assert_eq!(keys(&json), ["reason", "source", "status", "timestamp"]);
    }

    #[test]
    fn error_carries_message_only() {
        let result = GathererResult::<()>::error("graphite", "Failed to parse gt output");
        let json = serde_json::to_value(&result).expect("serializes");

        assert_eq!(json["status"], "error");
        assert_eq!(json["error"], "Failed to parse gt output");
        assert_eq!(keys(&json), ["error", "source", "status", "timestamp"]);
    }

    #[test]
    fn timestamp_is_rfc3339_utc() {
        let result = GathererResult::success("beads", ());
        assert!(result.timestamp.ends_with('Z'), "got: {}", result.timestamp);
        assert!(parse_timestamp(&result.timestamp).is_some());
    }
}
