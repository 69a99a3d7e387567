//! Error types for gitscan
//!
//! Discovery errors are fatal to a run. Git errors are scoped to a single
//! repository and end up on that repository's `??` report line.

use std::path::PathBuf;
use thiserror::Error;

use crate::utils::single_line;

/// Errors raised while locating repositories under the base directory
#[derive(Error, Debug)]
pub enum DiscoveryError {
    /// The base directory does not exist
    #[error("base directory '{0}' does not exist")]
    MissingBase(PathBuf),

    /// The base directory exists but cannot be inspected
    #[error("cannot access base directory '{path}'")]
    InaccessibleBase {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The base path exists but is not a directory
    #[error("'{0}' is not a directory")]
    NotADirectory(PathBuf),

    /// The tree walk hit an I/O error (permission, vanished entry, loop)
    #[error("failed to walk '{path}'")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// Errors from a single invocation of the git executable
#[derive(Error, Debug)]
pub enum GitError {
    /// The git process could not be started at all
    #[error("failed to run git: {0}")]
    Spawn(#[from] std::io::Error),

    /// git ran and exited unsuccessfully
    #[error("git {command} {}", describe_failure(.code, .stderr))]
    Failed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    /// git did not finish within the configured timeout
    #[error("git {command} timed out after {secs} seconds")]
    TimedOut { command: String, secs: u64 },
}

fn describe_failure(code: &Option<i32>, stderr: &str) -> String {
    let exit = match code {
        Some(code) => format!("exited with {code}"),
        None => "was terminated by a signal".to_string(),
    };
    let detail = single_line(stderr);
    if detail.is_empty() {
        exit
    } else {
        format!("{exit}: {detail}")
    }
}
