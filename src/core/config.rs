//! Configuration constants and settings

use std::time::Duration;

/// Name of the metadata entry that marks a repository root
pub const METADATA_DIR_NAME: &str = ".git";

/// Work queue slots per worker; keeps the walker a little ahead of the pool
pub const QUEUE_CAPACITY_PER_WORKER: usize = 4;

/// Lower bound on the worker count, whatever was requested
pub const MIN_WORKERS: usize = 1;

/// Determines the worker count from the `--par` flag and system resources
///
/// An explicit value is clamped to at least one worker. Otherwise one worker
/// per available processing unit.
pub fn resolve_worker_count(par: Option<usize>) -> usize {
    match par {
        Some(n) => n.max(MIN_WORKERS),
        None => num_cpus::get().max(MIN_WORKERS),
    }
}

/// Options controlling one scan run
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Print every probed repository, including clean ones
    pub show_all: bool,
    /// Value of `--pull`; pulling when behind happens regardless
    pub pull: bool,
    /// Number of concurrent workers
    pub workers: usize,
    /// Optional limit on each git invocation
    pub timeout: Option<Duration>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            show_all: false,
            pull: false,
            workers: resolve_worker_count(None),
            timeout: None,
        }
    }
}

impl ScanOptions {
    /// Bounded capacity of the work queue for these options
    pub fn queue_capacity(&self) -> usize {
        self.workers.max(MIN_WORKERS) * QUEUE_CAPACITY_PER_WORKER
    }
}
