//! Developer situation-report CLI.
//!
//! Gathers status from local development tools (beads issue tracker, gt
//! branch stacks, gh PRs and workflow runs) into JSON envelopes on stdout.
//! Tool absence and tool failure are data inside the envelope, so every
//! completed report exits zero; nonzero exits are reserved for argument
//! errors and for failures producing the report itself.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use sitrep::io::process::SystemRunner;
use sitrep::{beads, exit_codes, github, graphite, logging, report, validate};

#[derive(Parser)]
#[command(
    name = "sitrep",
    version,
    about = "Situation report for the local development workspace"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Report issue-tracker status from the beads database.
    Beads {
        /// Look-back window, <int><h|d|w> (e.g. 24h, 7d, 2w).
        #[arg(short, long, default_value = "24h")]
        time: String,
        /// Workspace directory holding .beads/ (defaults to the current directory).
        #[arg(short, long)]
        workspace: Option<PathBuf>,
    },
    /// Report branch and stack status from the gt CLI.
    Graphite {
        /// Look-back window, <int><h|d|w> (e.g. 24h, 7d, 2w).
        #[arg(short, long, default_value = "24h")]
        time: String,
        /// Working directory for gt and git calls.
        #[arg(short, long)]
        workspace: Option<PathBuf>,
    },
    /// Report open PRs and recent workflow runs from the gh CLI.
    Github {
        /// Look-back window, <int><h|d|w> (e.g. 24h, 7d, 2w).
        #[arg(short, long, default_value = "24h")]
        time: String,
        /// Working directory for gh and git calls.
        #[arg(short, long)]
        workspace: Option<PathBuf>,
    },
    /// Run every gatherer and emit one aggregate report.
    All {
        /// Look-back window, <int><h|d|w> (e.g. 24h, 7d, 2w).
        #[arg(short, long, default_value = "24h")]
        time: String,
        /// Workspace directory for every gatherer's subprocess calls.
        #[arg(short, long)]
        workspace: Option<PathBuf>,
    },
    /// Validate a plugin-marketplace working tree.
    Validate {
        /// Marketplace root directory.
        #[arg(default_value = ".")]
        root: PathBuf,
    },
}

fn main() {
    logging::init();
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::INVALID);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    let runner = SystemRunner;
    match cli.command {
        Command::Beads { time, workspace } => {
            print_json(&beads::gather(&runner, &time, workspace.as_deref()))?;
            Ok(exit_codes::OK)
        }
        Command::Graphite { time, workspace } => {
            print_json(&graphite::gather(&runner, &time, workspace.as_deref()))?;
            Ok(exit_codes::OK)
        }
        Command::Github { time, workspace } => {
            print_json(&github::gather(&runner, &time, workspace.as_deref()))?;
            Ok(exit_codes::OK)
        }
        Command::All { time, workspace } => {
            print_json(&report::gather_all(&runner, &time, workspace.as_deref()))?;
            Ok(exit_codes::OK)
        }
        Command::Validate { root } => cmd_validate(&root),
    }
}

fn cmd_validate(root: &Path) -> Result<i32> {
    let report = validate::validate_marketplace(root)?;
    for error in &report.errors {
        println!("error: {error}");
    }
    for warning in &report.warnings {
        println!("warning: {warning}");
    }
    if report.passed() {
        println!("Validation passed with {} warning(s)", report.warnings.len());
        Ok(exit_codes::OK)
    } else {
        println!(
            "Validation failed: {} error(s), {} warning(s)",
            report.errors.len(),
            report.warnings.len()
        );
        Ok(exit_codes::INVALID)
    }
}

/// Serialize to pretty-printed JSON on stdout with a trailing newline.
fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let payload = serde_json::to_string_pretty(value).context("serialize json")?;
    println!("{payload}");
    Ok(())
}
