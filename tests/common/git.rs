//! Git testing utilities

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::process::Command;

fn git(path: &Path, args: &[&str]) -> Result<()> {
    let output = Command::new("git").args(args).current_dir(path).output()?;
    if !output.status.success() {
        anyhow::bail!(
            "git {} failed: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr)
        );
    }
    Ok(())
}

/// Sets up a git repository with user config
/// Returns Ok(()) on success, or an error if git is not available
pub fn setup_git_repo(path: &Path) -> Result<()> {
    git(path, &["init", "-q"])?;
    configure_user(path)
}

fn configure_user(path: &Path) -> Result<()> {
    git(path, &["config", "user.name", "Test User"])?;
    git(path, &["config", "user.email", "test@example.com"])?;
    // Disable commit signing for tests
    git(path, &["config", "commit.gpgsign", "false"])?;
    Ok(())
}

/// Creates a test commit in the repository
pub fn create_test_commit(path: &Path, file_name: &str, content: &str, message: &str) -> Result<()> {
    std::fs::write(path.join(file_name), content)?;
    git(path, &["add", file_name])?;
    git(path, &["commit", "-q", "-m", message])
}

/// Clones `source` into `dest` and configures the test user there
pub fn clone_repo(source: &Path, dest: &Path) -> Result<()> {
    let parent = dest.parent().unwrap_or(dest);
    let (Some(source), Some(dest)) = (source.to_str(), dest.to_str()) else {
        anyhow::bail!("non UTF-8 test path");
    };
    git(parent, &["clone", "-q", source, dest])?;
    configure_user(Path::new(dest))
}

/// Creates `<root>/upstream` with one commit and a clone of it at `<root>/<name>`
///
/// Returns (upstream path, clone path).
pub fn setup_upstream_and_clone(root: &Path, name: &str) -> Result<(PathBuf, PathBuf)> {
    let upstream = root.join("upstream");
    if !upstream.exists() {
        std::fs::create_dir_all(&upstream)?;
        setup_git_repo(&upstream)?;
        create_test_commit(&upstream, "README.md", "# upstream", "Initial commit")?;
    }

    let clone = root.join(name);
    clone_repo(&upstream, &clone)?;
    Ok((upstream, clone))
}

/// Checks if git is available in the system
pub fn is_git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}
