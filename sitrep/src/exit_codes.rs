//! Stable exit codes for sitrep CLI commands.
//!
//! A completed envelope always exits [`OK`], whatever its status: an
//! `unavailable` or `error` envelope is data for the consumer, not a process
//! failure. Argument-parsing failures exit through clap's own usage code (2)
//! before any envelope exists.

/// Command produced its result (any envelope status counts).
pub const OK: i32 = 0;
/// Command failed before or outside envelope production, or `sitrep validate`
/// found errors.
pub const INVALID: i32 = 1;
