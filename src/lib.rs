//! # gitscan
//!
//! `gitscan` walks a directory tree, finds every git working copy in it and
//! prints a compact status line for each one. It powers the `gitscan` CLI.
//!
//! ## Core Features
//!
//! - **Pruned Discovery**: Repository roots are found depth-first; the walk
//!   never descends into a repository it has already found.
//! - **Concurrent Probing**: A fixed pool of workers refreshes remotes and
//!   reads `git status --porcelain=2 --branch` for each repository.
//! - **Fast-Forward**: Repositories behind their upstream are updated with
//!   `git pull --ff-only` and probed again.
//!
//! ## Status codes
//!
//! Each line starts with two characters. The first is `D` when the working
//! tree is dirty. The second is `E` (remote unreachable), `*` (diverged),
//! `+` (ahead) or `-` (behind). Repositories that could not be read are
//! printed as `?? <path>: <error>`.
//!
//! ## Example
//!
//! ```rust,no_run
//! use gitscan::core::{scan, ScanOptions, StdoutSink};
//! use gitscan::git::GitCli;
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let options = ScanOptions::default();
//!     scan(Path::new("."), &options, Arc::new(GitCli::new()), Arc::new(StdoutSink)).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod error;
pub mod git;
pub mod utils;
