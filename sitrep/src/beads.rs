//! The beads gatherer: local issue-tracker status.
//!
//! Pipeline: tracker-initialized probe, time-constraint parse, five
//! concurrent tracker calls, settle by call class, assemble the payload.
//! Stats is the one Required call; each list substitutes empty on failure.
//! The closed list is filtered client-side because the tracker's own
//! filters cannot express "closed within the window".

use std::path::Path;
use std::thread;
use std::time::Duration;

use chrono::Utc;
use tracing::instrument;

use crate::core::envelope::GathererResult;
use crate::core::time::{filter_recent, parse_constraint, parse_timestamp};
use crate::core::types::{BeadsData, BeadsIssue, BeadsStats};
use crate::gather::{join_call, settle, CallClass};
use crate::io::beads::Beads;
use crate::io::process::CommandRunner;

pub const SOURCE: &str = "beads";

/// Gather tracker status into an envelope. Infallible: every outcome,
/// including tool failure, is an envelope.
#[instrument(skip_all, fields(constraint = time))]
pub fn gather<R: CommandRunner>(
    runner: &R,
    time: &str,
    workspace: Option<&Path>,
) -> GathererResult<BeadsData> {
    let tracker = Beads::new(runner, workspace);

    if !tracker.initialized() {
        return GathererResult::unavailable(
            SOURCE,
            "Beads not initialized (.beads/ directory not found)",
        );
    }

    let window = match parse_constraint(time) {
        Ok(window) => window,
        Err(err) => return GathererResult::error(SOURCE, err.to_string()),
    };

    let fetched = fetch(&tracker);
    match assemble(fetched, window) {
        Ok(data) => GathererResult::success(SOURCE, data),
        Err(message) => GathererResult::error(SOURCE, message),
    }
}

/// Raw outcomes of the five tracker calls, before classification.
struct Fetched {
    stats: Result<BeadsStats, String>,
    in_progress: Result<Vec<BeadsIssue>, String>,
    ready: Result<Vec<BeadsIssue>, String>,
    blocked: Result<Vec<BeadsIssue>, String>,
    closed: Result<Vec<BeadsIssue>, String>,
}

/// Fan the independent tracker calls out and join them all; one call's
/// failure never cancels its siblings.
fn fetch<R: CommandRunner>(tracker: &Beads<'_, R>) -> Fetched {
    thread::scope(|s| {
        let stats = s.spawn(|| tracker.stats());
        let in_progress = s.spawn(|| tracker.in_progress());
        let ready = s.spawn(|| tracker.ready());
        let blocked = s.spawn(|| tracker.blocked());
        let closed = s.spawn(|| tracker.recently_closed());

        Fetched {
            stats: join_call("stats", stats),
            in_progress: join_call("in_progress list", in_progress),
            ready: join_call("ready list", ready),
            blocked: join_call("blocked list", blocked),
            closed: join_call("closed list", closed),
        }
    })
}

fn assemble(fetched: Fetched, window: Duration) -> Result<BeadsData, String> {
    let stats = settle(CallClass::Required, "stats", fetched.stats)?;
    let in_progress = settle(CallClass::BestEffort, "in_progress list", fetched.in_progress)?;
    let ready = settle(CallClass::BestEffort, "ready list", fetched.ready)?;
    let blocked = settle(CallClass::BestEffort, "blocked list", fetched.blocked)?;
    let closed = settle(CallClass::BestEffort, "closed list", fetched.closed)?;

    let recently_closed = filter_recent(closed, window, Utc::now(), |issue: &BeadsIssue| {
        let raw = issue.closed_at.as_deref().unwrap_or(&issue.updated_at);
        parse_timestamp(raw)
    });

    Ok(BeadsData {
        stats,
        in_progress,
        ready,
        blocked,
        recently_closed,
    })
}
