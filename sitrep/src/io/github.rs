//! GitHub (`gh`) adapter for PR and workflow-run state.
//!
//! Field lists are pinned so `gh` returns exactly the shapes in
//! `core::types`; decoding failures surface the raw stdout the same way the
//! other adapters do.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::core::types::{GitHubPr, WorkflowRun};
use crate::io::process::CommandRunner;

/// Field lists passed to `gh --json`, kept in one place so the decode types
/// in [`crate::core::types`] stay in sync with what we request.
pub const PR_FIELDS: &str =
    "number,title,state,isDraft,author,updatedAt,url,headRefName,statusCheckRollup,reviewDecision";
pub const RUN_FIELDS: &str = "name,status,conclusion,createdAt,url";

/// Wrapper for executing gh commands in a working directory.
#[derive(Debug, Clone, Copy)]
pub struct Gh<'a, R> {
    runner: &'a R,
    cwd: Option<&'a Path>,
}

impl<'a, R: CommandRunner> Gh<'a, R> {
    pub fn new(runner: &'a R, cwd: Option<&'a Path>) -> Self {
        Self { runner, cwd }
    }

    /// PATH probe via `which`.
    pub fn installed(&self) -> bool {
        self.runner.run("which", &["gh"], self.cwd).success
    }

    pub fn open_prs(&self) -> Result<Vec<GitHubPr>, String> {
        self.call(&["pr", "list", "--json", PR_FIELDS, "--limit", "20"])
    }

    pub fn recent_runs(&self) -> Result<Vec<WorkflowRun>, String> {
        self.call(&["run", "list", "--json", RUN_FIELDS, "--limit", "20"])
    }

    pub fn repo_name(&self) -> Result<String, String> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct RepoView {
            name_with_owner: String,
        }

        let view: RepoView = self.call(&["repo", "view", "--json", "nameWithOwner"])?;
        Ok(view.name_with_owner)
    }

    fn call<T: DeserializeOwned>(&self, args: &[&str]) -> Result<T, String> {
        let out = self.runner.run("gh", args, self.cwd);
        if !out.success {
            return Err(out.failure_text("gh"));
        }
        serde_json::from_str(&out.stdout).map_err(|err| {
            debug!(%err, "undecodable gh payload");
            format!("Failed to parse gh output: {}", out.stdout)
        })
    }
}
