//! The aggregate report: every gatherer run concurrently, one document out.

use std::path::Path;
use std::thread::{self, ScopedJoinHandle};

use tracing::instrument;

use crate::core::envelope::{capture_timestamp, GathererResult};
use crate::core::types::{SitrepReport, SitrepResults};
use crate::io::process::CommandRunner;
use crate::{beads, github, graphite};

/// Run all gatherers against one workspace. Failure stays inside each
/// gatherer's envelope; even a panicking gatherer settles to an error
/// envelope, so the report itself always assembles.
#[instrument(skip_all, fields(constraint = time))]
pub fn gather_all<R: CommandRunner>(
    runner: &R,
    time: &str,
    workspace: Option<&Path>,
) -> SitrepReport {
    let (graphite, github, beads) = thread::scope(|s| {
        let graphite = s.spawn(|| graphite::gather(runner, time, workspace));
        let github = s.spawn(|| github::gather(runner, time, workspace));
        let beads = s.spawn(|| beads::gather(runner, time, workspace));
        (
            join_envelope(graphite, graphite::SOURCE),
            join_envelope(github, github::SOURCE),
            join_envelope(beads, beads::SOURCE),
        )
    });

    SitrepReport {
        time_constraint: time.to_string(),
        timestamp: capture_timestamp(),
        sources: vec![graphite::SOURCE, github::SOURCE, beads::SOURCE],
        results: SitrepResults {
            graphite: Some(graphite),
            github: Some(github),
            beads: Some(beads),
        },
    }
}

fn join_envelope<T>(
    handle: ScopedJoinHandle<'_, GathererResult<T>>,
    source: &'static str,
) -> GathererResult<T> {
    handle
        .join()
        .unwrap_or_else(|_| GathererResult::error(source, format!("{source} gatherer panicked")))
}
