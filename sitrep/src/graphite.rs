//! The graphite gatherer: branch and stack status from the `gt` CLI.
//!
//! Prefers the structured `gt log --json` output and falls back to parsing
//! `gt state` text only when the log command itself fails. A log command
//! that succeeds but prints unparseable JSON is an error, not a fallback:
//! the tool is present and answering, so silently degrading would hide
//! a real contract change.

use std::path::Path;

use tracing::{debug, instrument};

use crate::core::envelope::GathererResult;
use crate::core::stack::{self, GraphiteData};
use crate::core::time::{git_since, parse_constraint};
use crate::io::git::Git;
use crate::io::graphite::Graphite;
use crate::io::process::CommandRunner;

pub const SOURCE: &str = "graphite";

#[instrument(skip_all, fields(constraint = time))]
pub fn gather<R: CommandRunner>(
    runner: &R,
    time: &str,
    cwd: Option<&Path>,
) -> GathererResult<GraphiteData> {
    let gt = Graphite::new(runner, cwd);
    let git = Git::new(runner, cwd);

    if !gt.installed() {
        return GathererResult::unavailable(SOURCE, "gt CLI not installed");
    }
    if !git.in_repository() {
        return GathererResult::unavailable(SOURCE, "Not in a git repository");
    }

    let window = match parse_constraint(time) {
        Ok(window) => window,
        Err(err) => return GathererResult::error(SOURCE, err.to_string()),
    };

    let Some(data) = reconstruct_state(&gt) else {
        return GathererResult::error(SOURCE, "Failed to parse gt output");
    };

    let recent_commits = git.commit_count_since(&git_since(window));
    debug!(
        recent_commits,
        branches = data.branches.len(),
        stacks = data.stacks.len(),
        "reconstructed graphite state"
    );

    GathererResult::success(SOURCE, data)
}

/// Rebuild the branch forest from whichever `gt` surface answers.
///
/// `None` means neither surface yielded usable state: either both commands
/// failed, or the structured log succeeded with JSON we cannot read.
fn reconstruct_state<R: CommandRunner>(gt: &Graphite<'_, R>) -> Option<GraphiteData> {
    let log = gt.log_json();
    if log.success {
        return match stack::from_log_json(&log.stdout) {
            Ok(data) => Some(data),
            Err(err) => {
                debug!(error = %err, "gt log --json output did not parse");
                None
            }
        };
    }

    let state = gt.state();
    if state.success {
        Some(stack::from_state_text(&state.stdout))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::envelope::GathererOutcome;
    use crate::test_support::ScriptedRunner;

    const LOG: &str = r#"[
        {"branch": "main", "parent": null},
        {"branch": "feat-a", "parent": "main", "isCurrent": true, "commitCount": 2},
        {"branch": "feat-b", "parent": "feat-a", "commitCount": 1}
    ]"#;

    fn with_probes(runner: ScriptedRunner) -> ScriptedRunner {
        runner
            .ok("which gt", "/usr/local/bin/gt\n")
            .ok("git rev-parse --git-dir", ".git\n")
            .ok("git log --since=24 hours ago --oneline", "abc123 tidy\n")
    }

    #[test]
    fn missing_cli_is_unavailable() {
        let runner = ScriptedRunner::new();

        let result = gather(&runner, "24h", None);
        match result.outcome {
            GathererOutcome::Unavailable { reason } => {
                assert_eq!(reason, "gt CLI not installed");
            }
            other => panic!("expected unavailable, got {other:?}"),
        }
    }

    #[test]
    fn outside_a_repository_is_unavailable() {
        let runner = ScriptedRunner::new().ok("which gt", "/usr/local/bin/gt\n");

        let result = gather(&runner, "24h", None);
        match result.outcome {
            GathererOutcome::Unavailable { reason } => {
                assert_eq!(reason, "Not in a git repository");
            }
            other => panic!("expected unavailable, got {other:?}"),
        }
    }

    #[test]
    fn bad_constraint_is_an_error_envelope() {
        let runner = ScriptedRunner::new()
            .ok("which gt", "/usr/local/bin/gt\n")
            .ok("git rev-parse --git-dir", ".git\n");

        let result = gather(&runner, "24x", None);
        match result.outcome {
            GathererOutcome::Error { error } => assert!(error.contains("\"24x\""), "got: {error}"),
            other => panic!("expected error, got {other:?}"),
        }
    }

    #[test]
    fn structured_log_builds_the_forest() {
        let runner = with_probes(ScriptedRunner::new()).ok("gt log --json", LOG);

        let result = gather(&runner, "24h", None);
        match result.outcome {
            GathererOutcome::Success { data } => {
                assert_eq!(data.current_branch, "feat-a");
                assert_eq!(data.stacks, [["main", "feat-a", "feat-b"]]);
            }
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[test]
    fn falls_back_to_state_text_when_log_fails() {
        let runner = with_probes(ScriptedRunner::new())
            .fail("gt log --json", "unknown flag: --json\n")
            .ok("gt state", "  ◉  feat-x\n  ○  main\n");

        let result = gather(&runner, "24h", None);
        match result.outcome {
            GathererOutcome::Success { data } => {
                assert_eq!(data.current_branch, "feat-x");
                assert_eq!(data.stacks, [["feat-x", "main"]]);
            }
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[test]
    fn unparseable_log_json_is_an_error_not_a_fallback() {
        let runner = with_probes(ScriptedRunner::new()).ok("gt log --json", "gt v1.4.0 {");

        let result = gather(&runner, "24h", None);
        match result.outcome {
            GathererOutcome::Error { error } => {
                assert_eq!(error, "Failed to parse gt output");
            }
            other => panic!("expected error, got {other:?}"),
        }
        let calls = runner.calls();
        assert!(
            !calls.iter().any(|c| c == "gt state"),
            "state fallback must not run after a successful log command: {calls:?}"
        );
    }

    #[test]
    fn both_surfaces_failing_is_an_error() {
        let runner = with_probes(ScriptedRunner::new())
            .fail("gt log --json", "")
            .fail("gt state", "corrupt metadata\n");

        let result = gather(&runner, "24h", None);
        match result.outcome {
            GathererOutcome::Error { error } => {
                assert_eq!(error, "Failed to parse gt output");
            }
            other => panic!("expected error, got {other:?}"),
        }
    }

    #[test]
    fn commit_activity_uses_the_requested_window() {
        let runner = ScriptedRunner::new()
            .ok("which gt", "/usr/local/bin/gt\n")
            .ok("git rev-parse --git-dir", ".git\n")
            .ok("gt log --json", "[]")
            .ok("git log --since=336 hours ago --oneline", "");

        let result = gather(&runner, "2w", None);
        assert!(matches!(result.outcome, GathererOutcome::Success { .. }));
        assert!(runner
            .calls()
            .iter()
            .any(|c| c == "git log --since=336 hours ago --oneline"));
    }
}
