//! Public API for the core module.
//!
//! This module provides the stable public API for core functionality including:
//! - Repository discovery
//! - The work queue between discovery and the workers
//! - The worker pool and scan orchestration
//! - Report formatting and output sinks
//! - Configuration utilities
//!
//! Internal implementation details are not exposed through this API.

// Discovery
pub use super::discovery::{find_repos_from_path, validate_base_dir, RepoWalker};

// Work queue
pub use super::queue::{work_queue, QueueClosed, QueueReceiver, QueueSender};

// Orchestration
pub use super::pool::{run_pool, scan, ScanSummary, WorkerTally};

// Reporting
pub use super::report::{
    format_status_line, format_unresolved_line, MemorySink, ReportSink, StdoutSink,
    UNRESOLVED_CODE,
};

// Configuration
pub use super::config::{
    resolve_worker_count, ScanOptions, METADATA_DIR_NAME, MIN_WORKERS, QUEUE_CAPACITY_PER_WORKER,
};
