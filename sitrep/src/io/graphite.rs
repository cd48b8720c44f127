//! Graphite (`gt`) adapter.
//!
//! Raw output only: the branch log and state text feed the reconstruction
//! engine in `core::stack`, which owns all parsing. Failure stays a value so
//! the gatherer can decide between fallback and error.

use std::path::Path;

use crate::io::process::{CmdOutput, CommandRunner};

/// Wrapper for executing gt commands in a working directory.
#[derive(Debug, Clone, Copy)]
pub struct Graphite<'a, R> {
    runner: &'a R,
    cwd: Option<&'a Path>,
}

impl<'a, R: CommandRunner> Graphite<'a, R> {
    pub fn new(runner: &'a R, cwd: Option<&'a Path>) -> Self {
        Self { runner, cwd }
    }

    /// PATH probe via `which`.
    pub fn installed(&self) -> bool {
        self.runner.run("which", &["gt"], self.cwd).success
    }

    /// The structured branch log, the primary data source.
    pub fn log_json(&self) -> CmdOutput {
        self.runner.run("gt", &["log", "--json"], self.cwd)
    }

    /// Human-oriented state text, the fallback when the log command fails.
    pub fn state(&self) -> CmdOutput {
        self.runner.run("gt", &["state"], self.cwd)
    }
}
