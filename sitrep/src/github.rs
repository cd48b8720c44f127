//! The github gatherer: open PRs and recent workflow runs via the `gh` CLI.

use std::path::Path;
use std::thread;
use std::time::Duration;

use chrono::Utc;
use tracing::instrument;

use crate::core::envelope::GathererResult;
use crate::core::time::{filter_recent, parse_constraint, parse_timestamp};
use crate::core::types::{GitHubData, GitHubPr, WorkflowRun};
use crate::gather::{join_call, settle, CallClass};
use crate::io::git::Git;
use crate::io::github::Gh;
use crate::io::process::CommandRunner;

pub const SOURCE: &str = "github";

/// The PR list is the payload this gatherer exists for, so its failure is
/// the gatherer's failure. The repo name and workflow runs are garnish and
/// degrade to empty.
#[instrument(skip_all, fields(constraint = time))]
pub fn gather<R: CommandRunner>(
    runner: &R,
    time: &str,
    cwd: Option<&Path>,
) -> GathererResult<GitHubData> {
    let gh = Gh::new(runner, cwd);
    let git = Git::new(runner, cwd);

    if !gh.installed() {
        return GathererResult::unavailable(SOURCE, "gh CLI not installed");
    }
    if !git.in_repository() {
        return GathererResult::unavailable(SOURCE, "Not in a git repository");
    }

    let window = match parse_constraint(time) {
        Ok(window) => window,
        Err(err) => return GathererResult::error(SOURCE, err.to_string()),
    };

    let fetched = fetch(&gh);
    match assemble(fetched, window) {
        Ok(data) => GathererResult::success(SOURCE, data),
        Err(message) => GathererResult::error(SOURCE, message),
    }
}

struct Fetched {
    repo: Result<String, String>,
    open_prs: Result<Vec<GitHubPr>, String>,
    recent_runs: Result<Vec<WorkflowRun>, String>,
}

fn fetch<R: CommandRunner>(gh: &Gh<'_, R>) -> Fetched {
    thread::scope(|s| {
        let repo = s.spawn(|| gh.repo_name());
        let open_prs = s.spawn(|| gh.open_prs());
        let recent_runs = s.spawn(|| gh.recent_runs());

        Fetched {
            repo: join_call("repo view", repo),
            open_prs: join_call("pr list", open_prs),
            recent_runs: join_call("run list", recent_runs),
        }
    })
}

fn assemble(fetched: Fetched, window: Duration) -> Result<GitHubData, String> {
    let open_prs = settle(CallClass::Required, "pr list", fetched.open_prs)?;
    let repo = settle(CallClass::BestEffort, "repo view", fetched.repo)?;
    let runs = settle(CallClass::BestEffort, "run list", fetched.recent_runs)?;

    let recent_runs = filter_recent(runs, window, Utc::now(), |run: &WorkflowRun| {
        parse_timestamp(&run.created_at)
    });

    Ok(GitHubData {
        repo,
        open_prs,
        recent_runs,
    })
}
