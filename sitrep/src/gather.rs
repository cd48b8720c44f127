//! Shared plumbing for per-source gatherers.
//!
//! Fatality is declared per call, not implied by check order: every
//! data-fetching call carries a [`CallClass`] and goes through [`settle`],
//! so extending a gatherer with a new call cannot silently change which
//! failures are fatal.

use std::thread::ScopedJoinHandle;

use tracing::warn;

/// How a gatherer treats one data-fetching call's failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallClass {
    /// No meaningful payload exists without this call; its failure fails the
    /// whole gatherer.
    Required,
    /// Failure substitutes an empty value. The absence is structural (an
    /// empty list, an empty name), not flagged per field.
    BestEffort,
}

/// Settle one call's outcome according to its class.
///
/// `Required` failures pass through for the gatherer to turn into an error
/// envelope; `BestEffort` failures collapse to `T::default()` with a warning.
pub fn settle<T: Default>(
    class: CallClass,
    call: &str,
    outcome: Result<T, String>,
) -> Result<T, String> {
    match (class, outcome) {
        (_, Ok(value)) => Ok(value),
        (CallClass::Required, Err(message)) => Err(message),
        (CallClass::BestEffort, Err(message)) => {
            warn!(call, error = %message, "substituting empty result for failed call");
            Ok(T::default())
        }
    }
}

/// Join one fan-out thread, settling a panic as that call's failure.
pub fn join_call<T>(call: &str, handle: ScopedJoinHandle<'_, Result<T, String>>) -> Result<T, String> {
    handle
        .join()
        .unwrap_or_else(|_| Err(format!("{call} thread panicked")))
}
