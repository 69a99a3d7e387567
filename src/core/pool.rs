//! Worker pool and scan orchestration
//!
//! The discovery walker runs on a blocking thread and feeds repository roots
//! into the work queue. A fixed pool of async workers pulls paths off the
//! queue, probes each repository, fast-forwards it when it is behind and
//! emits one report line. The walker owns the only queue sender, so the
//! queue closes exactly once, when the walk ends, whether it succeeded or
//! not.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::config::{ScanOptions, MIN_WORKERS};
use super::discovery::{validate_base_dir, RepoWalker};
use super::queue::{work_queue, QueueReceiver, QueueSender};
use super::report::{format_status_line, format_unresolved_line, ReportSink};
use crate::error::DiscoveryError;
use crate::git::{probe, pull, Vcs};

/// Per-worker counters, owned by the worker and summed after it exits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerTally {
    /// Repositories taken off the queue
    pub probed: usize,
    /// Fast-forward attempts on repositories found behind
    pub pulls: usize,
    /// Repositories reported with a `??` line
    pub unresolved: usize,
    /// Status lines emitted
    pub reported: usize,
}

impl WorkerTally {
    fn merge(&mut self, other: WorkerTally) {
        self.probed += other.probed;
        self.pulls += other.pulls;
        self.unresolved += other.unresolved;
        self.reported += other.reported;
    }
}

/// Outcome of a completed scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Repository roots handed to the queue by the walker
    pub discovered: usize,
    /// Number of workers that ran
    pub workers: usize,
    /// Combined worker counters
    pub totals: WorkerTally,
}

/// Scans `base` for repositories and reports on each one
///
/// Fails before any work starts if `base` is not an existing directory, and
/// fails the whole run if the tree walk hits an I/O error. Per-repository
/// failures only produce `??` lines.
pub async fn scan(
    base: &Path,
    options: &ScanOptions,
    vcs: Arc<dyn Vcs>,
    sink: Arc<dyn ReportSink>,
) -> Result<ScanSummary> {
    validate_base_dir(base)?;
    run_pool(RepoWalker::new(base), options, vcs, sink).await
}

/// Runs the worker pool over repository roots produced by `source`
///
/// `source` is drained on a blocking thread. On the first error from it the
/// queue is closed, in-flight workers are aborted and the error returned.
pub async fn run_pool<I>(
    source: I,
    options: &ScanOptions,
    vcs: Arc<dyn Vcs>,
    sink: Arc<dyn ReportSink>,
) -> Result<ScanSummary>
where
    I: IntoIterator<Item = Result<PathBuf, DiscoveryError>>,
    I::IntoIter: Send + 'static,
{
    let workers = options.workers.max(MIN_WORKERS);
    let (sender, receiver) = work_queue(options.queue_capacity());

    tracing::debug!(workers, "starting worker pool");
    let handles: Vec<_> = (0..workers)
        .map(|id| {
            tokio::spawn(run_worker(
                id,
                receiver.clone(),
                Arc::clone(&vcs),
                Arc::clone(&sink),
                options.show_all,
            ))
        })
        .collect();
    drop(receiver);

    let roots = source.into_iter();
    let walk = tokio::task::spawn_blocking(move || feed_queue(roots, sender)).await;

    let discovered = match walk {
        Ok(Ok(discovered)) => discovered,
        Ok(Err(e)) => {
            abort_workers(handles).await;
            return Err(e).context("repository discovery failed");
        }
        Err(e) => {
            abort_workers(handles).await;
            return Err(e).context("repository discovery task panicked");
        }
    };

    let mut totals = WorkerTally::default();
    for result in futures::future::join_all(handles).await {
        totals.merge(result.context("worker task failed")?);
    }

    let summary = ScanSummary {
        discovered,
        workers,
        totals,
    };
    tracing::info!(
        discovered = summary.discovered,
        probed = totals.probed,
        reported = totals.reported,
        unresolved = totals.unresolved,
        pulls = totals.pulls,
        "scan complete"
    );
    Ok(summary)
}

/// Pushes every root into the queue, then closes it
///
/// Returns how many roots were queued, or the first discovery error.
fn feed_queue<I>(roots: I, sender: QueueSender) -> Result<usize, DiscoveryError>
where
    I: Iterator<Item = Result<PathBuf, DiscoveryError>>,
{
    let mut discovered = 0;
    let mut outcome = Ok(());

    for root in roots {
        match root {
            Ok(path) => {
                if sender.push_blocking(path).is_err() {
                    // Every worker is gone; nobody is left to report
                    break;
                }
                discovered += 1;
            }
            Err(e) => {
                outcome = Err(e);
                break;
            }
        }
    }

    sender.close();
    outcome.map(|()| discovered)
}

async fn abort_workers(handles: Vec<tokio::task::JoinHandle<WorkerTally>>) {
    for handle in &handles {
        handle.abort();
    }
    // Wait until aborted tasks are gone so their git children are killed
    let _ = futures::future::join_all(handles).await;
}

async fn run_worker(
    id: usize,
    queue: QueueReceiver,
    vcs: Arc<dyn Vcs>,
    sink: Arc<dyn ReportSink>,
    show_all: bool,
) -> WorkerTally {
    let mut tally = WorkerTally::default();
    tracing::debug!(worker = id, "worker started");

    while let Some(path) = queue.recv().await {
        if let Some(line) = check_repo(vcs.as_ref(), &path, show_all, &mut tally).await {
            sink.emit(&line);
        }
    }

    tracing::debug!(worker = id, ?tally, "worker finished");
    tally
}

/// Probes one repository, fast-forwarding it first if it is behind
///
/// Returns the line to print, if any.
async fn check_repo(
    vcs: &dyn Vcs,
    path: &Path,
    show_all: bool,
    tally: &mut WorkerTally,
) -> Option<String> {
    tally.probed += 1;

    let mut status = match probe(vcs, path).await {
        Ok(status) => status,
        Err(e) => {
            tally.unresolved += 1;
            return Some(format_unresolved_line(path, &e));
        }
    };

    if status.is_behind() {
        tally.pulls += 1;
        tracing::debug!(path = %path.display(), behind = status.behind, "fast-forwarding");
        if let Err(e) = pull(vcs, path).await {
            tracing::debug!(path = %path.display(), error = %e, "fast-forward failed");
        }
        status = match probe(vcs, path).await {
            Ok(status) => status,
            Err(e) => {
                tally.unresolved += 1;
                return Some(format_unresolved_line(path, &e));
            }
        };
    }

    if show_all || !status.is_clean() {
        tally.reported += 1;
        Some(format_status_line(&status, path))
    } else {
        None
    }
}
