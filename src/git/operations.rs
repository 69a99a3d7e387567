//! Git command execution and repository probing

use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;
use tokio::process::Command;

use super::status::{parse_porcelain_v2, RepoStatus};
use crate::error::GitError;

// Git command arguments
const GIT_REMOTE_UPDATE_ARGS: &[&str] = &["remote", "update"];
const GIT_STATUS_PORCELAIN_V2_ARGS: &[&str] = &["status", "--porcelain=2", "--branch"];
const GIT_PULL_FF_ONLY_ARGS: &[&str] = &["pull", "--ff-only"];

/// Runs a git command in the specified directory and returns its stdout
///
/// A non-zero exit becomes [`GitError::Failed`] carrying git's stderr. With
/// `timeout` set, the child is killed and [`GitError::TimedOut`] returned
/// once it elapses; with `None` the call waits indefinitely.
pub async fn run_git(
    path: &Path,
    args: &[&str],
    timeout: Option<Duration>,
) -> Result<String, GitError> {
    let command = args.join(" ");
    tracing::debug!(path = %path.display(), %command, "running git");

    let mut cmd = Command::new("git");
    cmd.args(args).current_dir(path).kill_on_drop(true);

    let output = match timeout {
        Some(limit) => match tokio::time::timeout(limit, cmd.output()).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(GitError::TimedOut {
                    command,
                    secs: limit.as_secs(),
                })
            }
        },
        None => cmd.output().await?,
    };

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    } else {
        Err(GitError::Failed {
            command,
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// The version-control operations a probe needs
///
/// [`GitCli`] drives the real `git` executable; tests substitute scripted
/// implementations.
#[async_trait]
pub trait Vcs: Send + Sync {
    /// Refreshes remote-tracking refs without touching the working tree
    async fn refresh_remotes(&self, path: &Path) -> Result<(), GitError>;

    /// Returns the raw `status --porcelain=2 --branch` report
    async fn status_report(&self, path: &Path) -> Result<String, GitError>;

    /// Fast-forwards the current branch from upstream, failing on divergence
    async fn pull_fast_forward(&self, path: &Path) -> Result<(), GitError>;
}

/// [`Vcs`] backed by the `git` command-line tool
#[derive(Debug, Clone, Default)]
pub struct GitCli {
    timeout: Option<Duration>,
}

impl GitCli {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a per-invocation timeout to every git command
    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl Vcs for GitCli {
    async fn refresh_remotes(&self, path: &Path) -> Result<(), GitError> {
        run_git(path, GIT_REMOTE_UPDATE_ARGS, self.timeout).await?;
        Ok(())
    }

    async fn status_report(&self, path: &Path) -> Result<String, GitError> {
        run_git(path, GIT_STATUS_PORCELAIN_V2_ARGS, self.timeout).await
    }

    async fn pull_fast_forward(&self, path: &Path) -> Result<(), GitError> {
        run_git(path, GIT_PULL_FF_ONLY_ARGS, self.timeout).await?;
        Ok(())
    }
}

/// Probes a repository: refreshes remotes, then parses its status report
///
/// A failed remote refresh only sets `remote_error`; the status is still
/// read from whatever tracking refs exist locally. Failing to obtain the
/// status report fails the probe.
pub async fn probe<V: Vcs + ?Sized>(vcs: &V, path: &Path) -> Result<RepoStatus, GitError> {
    let remote_error = match vcs.refresh_remotes(path).await {
        Ok(()) => false,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "remote refresh failed");
            true
        }
    };

    let report = vcs.status_report(path).await?;
    Ok(parse_porcelain_v2(&report, remote_error))
}

/// Requests a fast-forward-only update of the current branch
///
/// The caller decides what a failure means; the worker pool ignores it and
/// re-probes instead.
pub async fn pull<V: Vcs + ?Sized>(vcs: &V, path: &Path) -> Result<(), GitError> {
    vcs.pull_fast_forward(path).await
}
