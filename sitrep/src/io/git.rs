//! Git adapter for repository probes and history queries.
//!
//! The gatherers only ask git two questions: are we inside a repository, and
//! how many commits landed within the reporting window. Both answers degrade
//! gracefully, so every method here is infallible.

use std::path::Path;

use tracing::debug;

use crate::io::process::CommandRunner;

/// Wrapper for executing git commands in a working directory.
#[derive(Debug, Clone, Copy)]
pub struct Git<'a, R> {
    runner: &'a R,
    cwd: Option<&'a Path>,
}

impl<'a, R: CommandRunner> Git<'a, R> {
    pub fn new(runner: &'a R, cwd: Option<&'a Path>) -> Self {
        Self { runner, cwd }
    }

    /// True when the working directory is inside a git repository.
    pub fn in_repository(&self) -> bool {
        self.runner
            .run("git", &["rev-parse", "--git-dir"], self.cwd)
            .success
    }

    /// Count commits reachable from HEAD newer than `since` (a relative
    /// expression like `24 hours ago`). Informational: any failure counts as
    /// zero.
    pub fn commit_count_since(&self, since: &str) -> usize {
        let since_arg = format!("--since={since}");
        let out = self
            .runner
            .run("git", &["log", &since_arg, "--oneline"], self.cwd);
        if !out.success {
            debug!(stderr = %out.stderr, "git log failed, counting zero commits");
            return 0;
        }
        out.stdout.lines().filter(|l| !l.trim().is_empty()).count()
    }
}
