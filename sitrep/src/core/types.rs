//! Wire types for the gatherer payloads.
//!
//! These mirror what the external tools emit and what the envelope promises
//! downstream. Issue fields keep the tracker's snake_case keys; payload-level
//! keys are camelCase. Optional fields are omitted from output, never null
//! (the one exception is a workflow run's `conclusion`, which is a required
//! nullable key).

use serde::{Deserialize, Serialize};

use crate::core::envelope::GathererResult;
use crate::core::stack::GraphiteData;

/// Issue lifecycle state as the tracker reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueStatus {
    Open,
    InProgress,
    Blocked,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueType {
    Bug,
    Feature,
    Task,
    Epic,
    Chore,
}

/// One issue from the tracker. `dependency_count`/`dependent_count` summarize
/// blocking relationships; the full dependency graph is not reconstructed
/// here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeadsIssue {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: IssueStatus,
    pub issue_type: IssueType,
    /// Ordinal 0 (highest) through 4.
    pub priority: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(default)]
    pub labels: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<String>,
    #[serde(default)]
    pub dependency_count: u32,
    #[serde(default)]
    pub dependent_count: u32,
}

/// Aggregate counts from the tracker's `stats` call. Missing counts decode
/// as zero so older tracker builds stay readable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BeadsStats {
    pub total: u32,
    pub open: u32,
    pub in_progress: u32,
    pub blocked: u32,
    pub closed: u32,
    pub ready: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_lead_time: Option<f64>,
}

/// Payload of the `beads` gatherer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BeadsData {
    pub stats: BeadsStats,
    pub in_progress: Vec<BeadsIssue>,
    pub ready: Vec<BeadsIssue>,
    pub blocked: Vec<BeadsIssue>,
    pub recently_closed: Vec<BeadsIssue>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PrState {
    Open,
    Closed,
    Merged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewDecision {
    Approved,
    ChangesRequested,
    ReviewRequired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CheckState {
    Success,
    Failure,
    Pending,
    Expected,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckContext {
    pub name: String,
    pub state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conclusion: Option<String>,
}

/// Combined CI state of one PR's head commit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckRollup {
    pub state: CheckState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contexts: Option<Vec<CheckContext>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrAuthor {
    pub login: String,
}

/// One pull request as `gh pr list --json` reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitHubPr {
    pub number: u64,
    pub title: String,
    pub state: PrState,
    pub is_draft: bool,
    pub author: PrAuthor,
    pub updated_at: String,
    pub url: String,
    pub head_ref_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_check_rollup: Option<CheckRollup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_decision: Option<ReviewDecision>,
}

/// One workflow run as `gh run list --json` reports it. `conclusion` is null
/// until the run finishes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowRun {
    pub name: String,
    pub status: String,
    pub conclusion: Option<String>,
    pub created_at: String,
    pub url: String,
}

/// Payload of the `github` gatherer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GitHubData {
    pub repo: String,
    #[serde(rename = "openPRs")]
    pub open_prs: Vec<GitHubPr>,
    pub recent_runs: Vec<WorkflowRun>,
}

/// Aggregate output of `sitrep all`: every gatherer's envelope under one
/// roof. A gatherer's failure lives inside its envelope; the report itself
/// always assembles.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SitrepReport {
    /// The raw constraint string the run was invoked with.
    pub time_constraint: String,
    pub timestamp: String,
    pub sources: Vec<&'static str>,
    pub results: SitrepResults,
}

#[derive(Debug, Clone, Serialize)]
pub struct SitrepResults {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graphite: Option<GathererResult<GraphiteData>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github: Option<GathererResult<GitHubData>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beads: Option<GathererResult<BeadsData>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(id: &str) -> BeadsIssue {
        BeadsIssue {
            id: id.to_string(),
            title: "fix the widget".to_string(),
            description: None,
            status: IssueStatus::Closed,
            issue_type: IssueType::Bug,
            priority: 2,
            assignee: None,
            labels: Vec::new(),
            created_at: "2025-06-01T00:00:00Z".to_string(),
            updated_at: "2025-06-02T00:00:00Z".to_string(),
            closed_at: Some("2025-06-02T00:00:00Z".to_string()),
            dependency_count: 0,
            dependent_count: 1,
        }
    }

    #[test]
    fn issue_keys_stay_snake_case_and_optionals_are_omitted() {
        let json = serde_json::to_value(issue("sr-1")).expect("serializes");
        assert_eq!(json["issue_type"], "bug");
        assert_eq!(json["status"], "closed");
        assert!(json.get("description").is_none());
        assert!(json.get("assignee").is_none());
    }

    #[test]
    fn issue_deserializes_tracker_output_with_missing_counts() {
        let raw = r#"{
            "id": "sr-9",
            "title": "flaky test",
            "status": "in_progress",
            "issue_type": "task",
            "priority": 1,
            "created_at": "2025-06-01T00:00:00Z",
            "updated_at": "2025-06-01T00:00:00Z"
        }"#;
        let parsed: BeadsIssue = serde_json::from_str(raw).expect("lenient parse");
        assert_eq!(parsed.status, IssueStatus::InProgress);
        assert_eq!(parsed.dependency_count, 0);
        assert!(parsed.labels.is_empty());
    }

    #[test]
    fn beads_payload_keys_are_camel_case() {
        let data = BeadsData {
            stats: BeadsStats::default(),
            in_progress: vec![issue("sr-1")],
            ready: Vec::new(),
            blocked: Vec::new(),
            recently_closed: Vec::new(),
        };
        let json = serde_json::to_value(&data).expect("serializes");
        assert!(json.get("inProgress").is_some());
        assert!(json.get("recentlyClosed").is_some());
        assert!(json.get("in_progress").is_none());
    }

    #[test]
    fn pr_deserializes_gh_output() {
        let raw = r#"{
            "number": 42,
            "title": "Add retry to uploader",
            "state": "OPEN",
            "isDraft": false,
            "author": {"login": "june"},
            "updatedAt": "2025-06-09T10:00:00Z",
            "url": "https://github.com/acme/widgets/pull/42",
            "headRefName": "retry-uploads",
            "statusCheckRollup": {"state": "PENDING"},
            "reviewDecision": null
        }"#;
        let pr: GitHubPr = serde_json::from_str(raw).expect("parses");
        assert_eq!(pr.state, PrState::Open);
        assert_eq!(pr.author.login, "june");
        assert_eq!(
            pr.status_check_rollup.as_ref().expect("rollup present").state,
            CheckState::Pending
        );
        assert!(pr.review_decision.is_none());
    }

    #[test]
    fn run_conclusion_serializes_as_null_while_running() {
        let run = WorkflowRun {
            name: "ci".to_string(),
            status: "in_progress".to_string(),
            conclusion: None,
            created_at: "2025-06-09T10:00:00Z".to_string(),
            url: "https://github.com/acme/widgets/actions/runs/1".to_string(),
        };
        let json = serde_json::to_value(&run).expect("serializes");
        assert!(json["conclusion"].is_null());
        assert_eq!(json["createdAt"], "2025-06-09T10:00:00Z");
    }

    #[test]
    fn github_payload_uses_the_upper_case_pr_key() {
        let data = GitHubData {
            repo: "acme/widgets".to_string(),
            open_prs: Vec::new(),
            recent_runs: Vec::new(),
        };
        let json = serde_json::to_value(&data).expect("serializes");
        assert!(json.get("openPRs").is_some());
        assert!(json.get("recentRuns").is_some());
    }
}
