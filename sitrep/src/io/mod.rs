//! I/O helpers for the gatherer commands.

pub mod beads;
pub mod git;
pub mod github;
pub mod graphite;
pub mod process;
