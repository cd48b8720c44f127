//! Developer-workflow status gathering.
//!
//! This crate collects issue-tracker state, stacked-branch topology, and PR/CI
//! state from external command-line tools and normalizes everything into one
//! envelope shape for downstream reporting. The architecture enforces a strict
//! separation:
//!
//! - **[`core`]**: Pure, deterministic logic (time parsing, stack
//!   reconstruction, envelope assembly). No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting operations (subprocess execution, tool
//!   wrappers). Behind trait seams to enable mocking in tests.
//!
//! Orchestration modules ([`beads`], [`graphite`], [`github`], [`report`],
//! [`validate`]) coordinate core logic with I/O to implement CLI commands.

pub mod beads;
pub mod core;
pub mod exit_codes;
pub mod gather;
pub mod github;
pub mod graphite;
pub mod io;
pub mod logging;
pub mod report;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod validate;
