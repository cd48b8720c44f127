//! Time-constraint parsing and client-side age filtering.
//!
//! A constraint is `<integer><unit>` with unit `h`, `d`, or `w` (case
//! sensitive). It converts to a [`Duration`] for age comparisons and to a
//! relative-time string for tools that take native since flags.

use std::time::Duration;

use chrono::{DateTime, Utc};

/// A time-constraint string that does not match `<positive integer><h|d|w>`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time constraint {input:?}: expected a positive integer followed by h, d, or w")]
pub struct InvalidConstraint {
    pub input: String,
}

const SECS_PER_HOUR: u64 = 3600;

/// Parse a constraint like `24h`, `7d`, or `2w` into a duration.
///
/// Empty input, a non-numeric or zero magnitude, and an unknown unit are all
/// rejected; a leading minus sign fails the numeric parse. Nothing is clamped.
pub fn parse_constraint(input: &str) -> Result<Duration, InvalidConstraint> {
    let invalid = || InvalidConstraint {
        input: input.to_string(),
    };

    let mut chars = input.chars();
    let unit = chars.next_back().ok_or_else(invalid)?;
    let magnitude: u64 = chars.as_str().parse().map_err(|_| invalid())?;
    if magnitude == 0 {
        return Err(invalid());
    }

    let hours = match unit {
        'h' => magnitude,
        'd' => magnitude.saturating_mul(24),
        'w' => magnitude.saturating_mul(24 * 7),
        _ => return Err(invalid()),
    };
    Ok(Duration::from_secs(hours.saturating_mul(SECS_PER_HOUR)))
}

/// Render a window as a git `--since` expression.
///
/// The constraint grammar only produces whole hours, so the expression is
/// always `"<n> hours ago"`.
pub fn git_since(window: Duration) -> String {
    let hours = window.as_secs() / SECS_PER_HOUR;
    format!("{hours} hours ago")
}

/// Parse an RFC 3339 timestamp, normalizing to UTC. Returns `None` on any
/// malformed input.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

/// Keep the records whose timestamp falls within `window` of `now`.
///
/// `timestamp` extracts the instant to judge a record by; records without a
/// usable timestamp are dropped. Future timestamps count as within the
/// window. Order is preserved, nothing else changes.
pub fn filter_recent<T>(
    items: Vec<T>,
    window: Duration,
    now: DateTime<Utc>,
    timestamp: impl Fn(&T) -> Option<DateTime<Utc>>,
) -> Vec<T> {
    items
        .into_iter()
        .filter(|item| match timestamp(item) {
            Some(t) => match (now - t).to_std() {
                Ok(age) => age <= window,
                Err(_) => true,
            },
            None => false,
        })
        .collect()
}
