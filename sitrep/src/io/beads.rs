//! Beads (`bd`) issue-tracker adapter.
//!
//! Every data call goes through `bd [--workspace-root <w>] <args> --json`
//! and decodes the machine-readable output. Failures come back as the error
//! strings the envelope reports verbatim: the child's stderr (or an exit
//! notice) for a nonzero exit, a parse message carrying the raw stdout for
//! undecodable output.

use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::core::types::{BeadsIssue, BeadsStats};
use crate::io::process::CommandRunner;

/// Wrapper for executing bd commands against one workspace.
#[derive(Debug, Clone, Copy)]
pub struct Beads<'a, R> {
    runner: &'a R,
    workspace: Option<&'a Path>,
}

impl<'a, R: CommandRunner> Beads<'a, R> {
    pub fn new(runner: &'a R, workspace: Option<&'a Path>) -> Self {
        Self { runner, workspace }
    }

    /// True when the tracker has been initialized for this workspace: the
    /// issue database exists under `.beads/`.
    pub fn initialized(&self) -> bool {
        let root = self.workspace.unwrap_or_else(|| Path::new("."));
        root.join(".beads").join("issues.db").exists()
    }

    pub fn stats(&self) -> Result<BeadsStats, String> {
        self.call(&["stats"])
    }

    pub fn in_progress(&self) -> Result<Vec<BeadsIssue>, String> {
        self.call(&["list", "--status=in_progress", "--limit=10"])
    }

    pub fn ready(&self) -> Result<Vec<BeadsIssue>, String> {
        self.call(&["ready", "--limit=10"])
    }

    pub fn blocked(&self) -> Result<Vec<BeadsIssue>, String> {
        self.call(&["blocked"])
    }

    pub fn recently_closed(&self) -> Result<Vec<BeadsIssue>, String> {
        self.call(&["list", "--status=closed", "--limit=20"])
    }

    fn call<T: DeserializeOwned>(&self, args: &[&str]) -> Result<T, String> {
        let workspace = self.workspace.map(|w| w.display().to_string());
        let mut full = Vec::new();
        if let Some(ref w) = workspace {
            full.push("--workspace-root");
            full.push(w.as_str());
        }
        full.extend_from_slice(args);
        full.push("--json");

        let out = self.runner.run("bd", &full, None);
        if !out.success {
            return Err(out.failure_text("bd"));
        }
        serde_json::from_str(&out.stdout).map_err(|err| {
            debug!(%err, "undecodable bd payload");
            format!("Failed to parse bd output: {}", out.stdout)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedRunner;

    #[test]
    fn initialized_requires_the_issue_database() {
        let temp = tempfile::tempdir().expect("tempdir");
        let runner = ScriptedRunner::new();

        let tracker = Beads::new(&runner, Some(temp.path()));
        assert!(!tracker.initialized());

        std::fs::create_dir_all(temp.path().join(".beads")).expect("mkdir");
        std::fs::write(temp.path().join(".beads/issues.db"), b"").expect("write");
        assert!(tracker.initialized());
    }

    #[test]
    fn calls_append_json_and_workspace_flags() {
        let runner = ScriptedRunner::new().ok("bd --workspace-root /work/demo stats --json", "{}");
        let tracker = Beads::new(&runner, Some(Path::new("/work/demo")));

        let stats = tracker.stats().expect("scripted stats");
        assert_eq!(stats, BeadsStats::default());
        assert_eq!(runner.calls(), ["bd --workspace-root /work/demo stats --json"]);
    }

    #[test]
    fn nonzero_exit_reports_stderr_verbatim() {
        let runner = ScriptedRunner::new().fail("bd blocked --json", "fatal: no database\n");
        let tracker = Beads::new(&runner, None);

        let err = tracker.blocked().expect_err("scripted failure");
        assert_eq!(err, "fatal: no database\n");
    }

    #[test]
    fn silent_nonzero_exit_reports_the_code() {
        let runner = ScriptedRunner::new().fail("bd ready --limit=10 --json", "");
        let tracker = Beads::new(&runner, None);

        let err = tracker.ready().expect_err("scripted failure");
        assert_eq!(err, "bd exited with code 1");
    }

    #[test]
    fn undecodable_stdout_reports_a_parse_error_with_the_output() {
        let runner = ScriptedRunner::new().ok("bd stats --json", "Usage: bd [command]");
        let tracker = Beads::new(&runner, None);

        let err = tracker.stats().expect_err("not json");
        assert_eq!(err, "Failed to parse bd output: Usage: bd [command]");
    }

    #[test]
    fn issue_lists_decode() {
        let raw = r#"[{
            "id": "sr-3",
            "title": "cache invalidation",
            "status": "blocked",
            "issue_type": "feature",
            "priority": 1,
            "labels": ["backend"],
            "created_at": "2025-06-01T00:00:00Z",
            "updated_at": "2025-06-03T00:00:00Z",
            "dependency_count": 2,
            "dependent_count": 0
        }]"#;
        let runner = ScriptedRunner::new().ok("bd blocked --json", raw);
        let tracker = Beads::new(&runner, None);

        let blocked = tracker.blocked().expect("decodes");
        assert_eq!(blocked.len(), 1);
        assert_eq!(blocked[0].id, "sr-3");
        assert_eq!(blocked[0].dependency_count, 2);
    }
}
