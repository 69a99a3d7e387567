//! Report line formatting and output sinks

use std::fmt::Display;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use crate::git::RepoStatus;
use crate::utils::single_line;

/// Prefix of the line printed for a repository that could not be probed
pub const UNRESOLVED_CODE: &str = "??";

/// Formats the `<code> <path>` line for a probed repository
pub fn format_status_line(status: &RepoStatus, path: &Path) -> String {
    format!("{status} {}", path.display())
}

/// Formats the `?? <path>: <error>` line for an unresolved repository
pub fn format_unresolved_line(path: &Path, error: &dyn Display) -> String {
    format!(
        "{UNRESOLVED_CODE} {}: {}",
        path.display(),
        single_line(&error.to_string())
    )
}

/// Destination for report lines
///
/// Workers call [`ReportSink::emit`] concurrently; each call must write the
/// line atomically.
pub trait ReportSink: Send + Sync {
    fn emit(&self, line: &str);
}

/// Writes report lines to standard output
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl ReportSink for StdoutSink {
    fn emit(&self, line: &str) {
        let mut out = std::io::stdout().lock();
        // A closed stdout (e.g. piped into `head`) is not worth failing a worker for
        if let Err(e) = writeln!(out, "{line}") {
            tracing::debug!(error = %e, "failed to write report line");
        }
    }
}

/// Keeps report lines in memory; useful for embedding and tests
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the captured lines, sorted, for order-independent comparison
    pub fn sorted_lines(&self) -> Vec<String> {
        let mut lines = self.lines();
        lines.sort();
        lines
    }

    /// Returns the captured lines in emission order
    pub fn lines(&self) -> Vec<String> {
        match self.lines.lock() {
            Ok(lines) => lines.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl ReportSink for MemorySink {
    fn emit(&self, line: &str) {
        let mut lines = match self.lines.lock() {
            Ok(lines) => lines,
            Err(poisoned) => poisoned.into_inner(),
        };
        lines.push(line.to_string());
    }
}
