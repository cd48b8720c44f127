//! Test-only helpers: a scripted command runner and tracker fixtures.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use crate::core::types::{BeadsIssue, IssueStatus, IssueType};
use crate::io::process::{CmdOutput, CommandRunner};

/// Command fake keyed by the rendered command line (program plus args
/// joined with single spaces). Commands with no script behave like a
/// missing binary, so availability probes fail without special casing.
pub struct ScriptedRunner {
    outputs: HashMap<String, CmdOutput>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self {
            outputs: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Script a successful invocation printing `stdout`.
    pub fn ok(mut self, command: &str, stdout: &str) -> Self {
        self.outputs.insert(
            command.to_string(),
            CmdOutput {
                success: true,
                code: Some(0),
                stdout: stdout.to_string(),
                stderr: String::new(),
            },
        );
        self
    }

    /// Script an invocation failing with exit code 1 and `stderr`.
    pub fn fail(mut self, command: &str, stderr: &str) -> Self {
        self.outputs.insert(
            command.to_string(),
            CmdOutput {
                success: false,
                code: Some(1),
                stdout: String::new(),
                stderr: stderr.to_string(),
            },
        );
        self
    }

    /// Every command line run so far, in invocation order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }
}

impl Default for ScriptedRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, program: &str, args: &[&str], _cwd: Option<&Path>) -> CmdOutput {
        let command = if args.is_empty() {
            program.to_string()
        } else {
            format!("{program} {}", args.join(" "))
        };
        self.calls.lock().expect("calls lock").push(command.clone());
        match self.outputs.get(&command) {
            Some(output) => output.clone(),
            None => CmdOutput {
                success: false,
                code: None,
                stdout: String::new(),
                stderr: format!("failed to spawn {program}: no script for {command:?}"),
            },
        }
    }
}

/// A temporary workspace with an initialized tracker database.
pub fn beads_workspace() -> tempfile::TempDir {
    let temp = tempfile::tempdir().expect("tempdir");
    std::fs::create_dir_all(temp.path().join(".beads")).expect("create .beads");
    std::fs::write(temp.path().join(".beads/issues.db"), b"").expect("write issues.db");
    temp
}

/// An issue with deterministic defaults; closed when `closed_at` is given.
pub fn issue_fixture(id: &str, closed_at: Option<&str>) -> BeadsIssue {
    BeadsIssue {
        id: id.to_string(),
        title: format!("{id} title"),
        description: None,
        status: if closed_at.is_some() {
            IssueStatus::Closed
        } else {
            IssueStatus::InProgress
        },
        issue_type: IssueType::Task,
        priority: 2,
        assignee: None,
        labels: Vec::new(),
        created_at: "2026-08-01T00:00:00Z".to_string(),
        updated_at: "2026-08-01T00:00:00Z".to_string(),
        closed_at: closed_at.map(str::to_string),
        dependency_count: 0,
        dependent_count: 0,
    }
}
