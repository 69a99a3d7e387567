//! Public API for git operations.
//!
//! This module provides the stable public API for git-related functionality:
//! - The repository status model and its two-character code
//! - Probing a repository and fast-forwarding it
//! - The [`Vcs`] seam used to swap the real `git` for a scripted one
//!
//! ## Example: Probing a repository
//!
//! ```rust,no_run
//! use gitscan::git::{probe, GitCli};
//! use std::path::Path;
//!
//! async fn check(path: &Path) {
//!     match probe(&GitCli::new(), path).await {
//!         Ok(status) => println!("{status} {}", path.display()),
//!         Err(e) => println!("?? {}: {e}", path.display()),
//!     }
//! }
//! ```

// Status
pub use super::status::{parse_porcelain_v2, RepoStatus};

// Operations
pub use super::operations::{probe, pull, run_git, GitCli, Vcs};
