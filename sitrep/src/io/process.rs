//! Subprocess execution where failure is a value, never a panic or an `Err`.
//!
//! Gatherers probe for tools that are frequently absent and call tools that
//! frequently exit nonzero; both outcomes are ordinary data for the envelope.
//! No timeout is enforced here; a caller wrapping a run with a deadline owns
//! termination of a hung child.

use std::path::Path;
use std::process::Command;

use tracing::{debug, warn};

/// Captured child process outcome.
///
/// `success` means exit code zero. A spawn failure (missing binary) also
/// lands here as `success: false` with the OS error text in `stderr` and no
/// exit code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmdOutput {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CmdOutput {
    /// Failure text for error envelopes: the child's stderr verbatim when it
    /// wrote any, otherwise an exit notice naming `program`.
    pub fn failure_text(&self, program: &str) -> String {
        if !self.stderr.is_empty() {
            return self.stderr.clone();
        }
        match self.code {
            Some(code) => format!("{program} exited with code {code}"),
            None => format!("{program} terminated by signal"),
        }
    }
}

/// Seam for subprocess execution so gatherers run against fakes in tests.
///
/// `Sync` because gatherers fan independent calls out across scoped threads
/// sharing one runner.
pub trait CommandRunner: Sync {
    /// Run `program` with `args` to completion, in `cwd` when given.
    fn run(&self, program: &str, args: &[&str], cwd: Option<&Path>) -> CmdOutput;
}

/// Runs commands on the real system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str], cwd: Option<&Path>) -> CmdOutput {
        let mut cmd = Command::new(program);
        cmd.args(args);
        if let Some(dir) = cwd {
            cmd.current_dir(dir);
        }

        debug!(program, ?args, "running command");
        match cmd.output() {
            Ok(out) => {
                let output = CmdOutput {
                    success: out.status.success(),
                    code: out.status.code(),
                    stdout: String::from_utf8_lossy(&out.stdout).into_owned(),
                    stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
                };
                debug!(program, success = output.success, code = ?output.code, "command finished");
                output
            }
            Err(err) => {
                warn!(program, err = %err, "failed to spawn command");
                CmdOutput {
                    success: false,
                    code: None,
                    stdout: String::new(),
                    stderr: format!("failed to spawn {program}: {err}"),
                }
            }
        }
    }
}
