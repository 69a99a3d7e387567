//! Repository discovery
//!
//! A depth-first walk that yields each repository root once and never
//! descends into a repository it has already found.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::config::METADATA_DIR_NAME;
use crate::error::DiscoveryError;

/// Lazy iterator over the repository roots found under a base directory
///
/// The "last detected root" cursor is owned by this walker alone, so
/// independent walks never share it. After the first traversal error the
/// iterator yields that error and then ends.
pub struct RepoWalker {
    entries: walkdir::IntoIter,
    last_root: Option<PathBuf>,
    failed: bool,
}

impl RepoWalker {
    /// Creates a walker rooted at `base`
    ///
    /// Entries are visited in file-name order so the emission order is
    /// stable for a given filesystem snapshot. Symlinks are not followed.
    pub fn new(base: impl AsRef<Path>) -> Self {
        let entries = WalkDir::new(base.as_ref())
            .follow_links(false)
            .sort_by_file_name()
            .into_iter();

        Self {
            entries,
            last_root: None,
            failed: false,
        }
    }

    fn inside_last_root(&self, path: &Path) -> bool {
        match &self.last_root {
            Some(root) => path != root && path.starts_with(root),
            None => false,
        }
    }
}

impl Iterator for RepoWalker {
    type Item = Result<PathBuf, DiscoveryError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        loop {
            let entry = match self.entries.next()? {
                Ok(entry) => entry,
                Err(source) => {
                    self.failed = true;
                    let path = source
                        .path()
                        .map(Path::to_path_buf)
                        .unwrap_or_default();
                    return Some(Err(DiscoveryError::Walk { path, source }));
                }
            };

            if self.inside_last_root(entry.path()) {
                // Prune: a directory's subtree, or the rest of a file's parent
                self.entries.skip_current_dir();
                continue;
            }

            if entry.file_name() == METADATA_DIR_NAME {
                if entry.file_type().is_dir() {
                    self.entries.skip_current_dir();
                }
                if let Some(root) = entry.path().parent() {
                    let root = root.to_path_buf();
                    self.last_root = Some(root.clone());
                    tracing::debug!(path = %root.display(), "found repository");
                    return Some(Ok(root));
                }
            }
        }
    }
}

/// Collects every repository root under `search_path`
///
/// Stops at the first traversal error; no partial result is returned.
pub fn find_repos_from_path(search_path: impl AsRef<Path>) -> Result<Vec<PathBuf>, DiscoveryError> {
    RepoWalker::new(search_path).collect()
}

/// Checks that `base` exists and is a directory before any work starts
pub fn validate_base_dir(base: &Path) -> Result<(), DiscoveryError> {
    match std::fs::metadata(base) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(DiscoveryError::NotADirectory(base.to_path_buf())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(DiscoveryError::MissingBase(base.to_path_buf()))
        }
        Err(source) => Err(DiscoveryError::InaccessibleBase {
            path: base.to_path_buf(),
            source,
        }),
    }
}
