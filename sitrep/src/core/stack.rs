//! Branch/stack reconstruction from stacked-branch tool output.
//!
//! The tool reports branch state in one of two forms: a structured JSON log
//! (preferred) or human-oriented state text (fallback). Either way this
//! module rebuilds a parent→children forest and partitions it into stacks,
//! one per root, each ordered root-first. Branches live in a flat vector
//! keyed by a name→index map; `parent` and `children` hold names, never
//! owned links, so the forest invariant stays checkable on its own.

use std::collections::{HashMap, VecDeque};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The distinguished integration branch all stacks are rooted against.
pub const TRUNK: &str = "main";

/// PR lifecycle state attached to a branch.
///
/// `Ready` is part of the wire vocabulary even though the log mapping never
/// produces it; the tool's structured log does not distinguish ready from
/// open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrStatus {
    Draft,
    Open,
    Ready,
    Merged,
    Closed,
}

/// One branch in the reconstructed forest.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pr_number: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pr_status: Option<PrStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pr_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Rebuilt on every run from the parent references, in input order.
    pub children: Vec<String>,
    pub is_current: bool,
    pub needs_restack: bool,
    pub needs_submit: bool,
    pub commit_count: u64,
}

/// Payload of the `graphite` gatherer: the reconstructed forest plus its
/// partition into stacks.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphiteData {
    /// When no branch is flagged current this falls back to [`TRUNK`], a
    /// sentinel meaning "unknown". The trunk may not even be in the set.
    pub current_branch: String,
    pub trunk: String,
    pub branches: Vec<Branch>,
    pub stacks: Vec<Vec<String>>,
}

/// Flat branch storage plus the name→index map the traversals run against.
#[derive(Default)]
struct BranchSet {
    branches: Vec<Branch>,
    index: HashMap<String, usize>,
}

impl BranchSet {
    /// Insert keeping first position: a duplicate name replaces the earlier
    /// record in place instead of reordering it.
    fn insert(&mut self, branch: Branch) {
        match self.index.get(&branch.name) {
            Some(&i) => self.branches[i] = branch,
            None => {
                self.index.insert(branch.name.clone(), self.branches.len());
                self.branches.push(branch);
            }
        }
    }
}

/// Rebuild branch state from the structured JSON log.
///
/// Fails only when `raw` is not JSON at all. A JSON value of the wrong shape
/// degrades per field instead: a non-array input means zero branches, and
/// entries coerce leniently (`branch`/`name` aliases, `isCurrent`/`current`
/// aliases, commit count from `commitCount` or the length of an embedded
/// `commits` array, empty-string parent treated as absent). The last entry
/// flagged current wins; with none, the current branch is the trunk.
pub fn from_log_json(raw: &str) -> Result<GraphiteData, serde_json::Error> {
    let value: Value = serde_json::from_str(raw)?;
    let entries = value.as_array().map(Vec::as_slice).unwrap_or_default();

    let mut set = BranchSet::default();
    let mut current_branch = TRUNK.to_string();

    for entry in entries {
        let branch = branch_from_entry(entry);
        if branch.is_current {
            current_branch = branch.name.clone();
        }
        set.insert(branch);
    }

    // Second pass: resolve parent names and append children in input order.
    for i in 0..set.branches.len() {
        let Some(parent) = set.branches[i].parent.clone() else {
            continue;
        };
        let child = set.branches[i].name.clone();
        if let Some(&p) = set.index.get(&parent) {
            set.branches[p].children.push(child);
        }
    }

    let stacks = partition_stacks(&set);
    Ok(GraphiteData {
        current_branch,
        trunk: TRUNK.to_string(),
        branches: set.branches,
        stacks,
    })
}

fn branch_from_entry(entry: &Value) -> Branch {
    let pr = &entry["pr"];

    let name = non_empty_str(&entry["branch"])
        .or_else(|| non_empty_str(&entry["name"]))
        .unwrap_or_default()
        .to_string();

    let commit_count = entry["commitCount"]
        .as_u64()
        .filter(|&n| n > 0)
        .or_else(|| entry["commits"].as_array().map(|c| c.len() as u64))
        .unwrap_or(0);

    Branch {
        name,
        pr_number: pr["number"].as_u64(),
        pr_status: pr_status_from(
            non_empty_str(&pr["state"]),
            pr["isDraft"].as_bool().unwrap_or(false),
        ),
        pr_url: pr["url"].as_str().map(str::to_string),
        parent: non_empty_str(&entry["parent"]).map(str::to_string),
        children: Vec::new(),
        is_current: entry["isCurrent"].as_bool().unwrap_or(false)
            || entry["current"].as_bool().unwrap_or(false),
        needs_restack: entry["needsRestack"].as_bool().unwrap_or(false),
        needs_submit: entry["needsSubmit"].as_bool().unwrap_or(false),
        commit_count,
    }
}

fn non_empty_str(value: &Value) -> Option<&str> {
    value.as_str().filter(|s| !s.is_empty())
}

/// Map the tool's PR state string. The draft flag wins over the state; an
/// unrecognized non-empty state counts as open.
fn pr_status_from(state: Option<&str>, is_draft: bool) -> Option<PrStatus> {
    let state = state?;
    if is_draft {
        return Some(PrStatus::Draft);
    }
    Some(match state.to_ascii_lowercase().as_str() {
        "merged" => PrStatus::Merged,
        "closed" => PrStatus::Closed,
        _ => PrStatus::Open,
    })
}

/// Partition the forest into stacks, one per root, each in BFS order.
///
/// A root is a branch with no parent, a parent equal to the trunk, or a
/// parent missing from the set (a dangling reference is a root, not an
/// error). One visited set spans all traversals, so even a corrupt input
/// where two roots reach the same branch terminates, with the first root
/// keeping the branch.
fn partition_stacks(set: &BranchSet) -> Vec<Vec<String>> {
    let roots = set.branches.iter().enumerate().filter_map(|(i, b)| {
        let is_root = match &b.parent {
            None => true,
            Some(p) => p == TRUNK || !set.index.contains_key(p),
        };
        is_root.then_some(i)
    });

    let mut stacks = Vec::new();
    let mut visited = vec![false; set.branches.len()];

    for root in roots {
        if visited[root] {
            continue;
        }

        let mut stack = Vec::new();
        let mut queue = VecDeque::from([root]);
        while let Some(i) = queue.pop_front() {
            if visited[i] {
                continue;
            }
            visited[i] = true;
            stack.push(set.branches[i].name.clone());
            for child in &set.branches[i].children {
                if let Some(&c) = set.index.get(child) {
                    queue.push_back(c);
                }
            }
        }

        if !stack.is_empty() {
            stacks.push(stack);
        }
    }

    stacks
}

/// Rebuild branch state from the tool's human-oriented state text.
///
/// A branch line carries a marker glyph (◉ or ● for the current branch, ○ or
/// ◐ otherwise) followed by the branch name. `needs_restack`/`needs_submit`
/// come from substring containment of "restack"/"submit" anywhere on the
/// line, a best-effort heuristic that false-positives when a branch name or
/// PR title contains those words. Text output carries no relationship or PR
/// data, so the result is one flat stack of every recognized branch in line
/// order.
pub fn from_state_text(text: &str) -> GraphiteData {
    use std::sync::LazyLock;
    static BRANCH_LINE: LazyLock<regex::Regex> =
        LazyLock::new(|| regex::Regex::new(r"[◉○●◐]\s+(\S+)").unwrap());

    let mut branches = Vec::new();
    let mut current_branch = TRUNK.to_string();

    for line in text.lines() {
        let Some(caps) = BRANCH_LINE.captures(line) else {
            continue;
        };
        let name = caps[1].to_string();
        let is_current = line.contains('◉') || line.contains('●');
        if is_current {
            current_branch = name.clone();
        }

        branches.push(Branch {
            name,
            is_current,
            needs_restack: line.contains("restack"),
            needs_submit: line.contains("submit"),
            ..Branch::default()
        });
    }

    let stacks = if branches.is_empty() {
        Vec::new()
    } else {
        vec![branches.iter().map(|b| b.name.clone()).collect()]
    };

    GraphiteData {
        current_branch,
        trunk: TRUNK.to_string(),
        branches,
        stacks,
    }
}
