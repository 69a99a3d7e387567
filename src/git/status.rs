//! Repository status model and porcelain v2 parsing

use std::fmt;

/// Prefix of the branch tracking line in `git status --porcelain=2 --branch`
const BRANCH_AB_PREFIX: &str = "# branch.ab ";
/// Prefix shared by every header line in porcelain v2 output
const HEADER_PREFIX: &str = "# ";

/// Summary of one repository's sync state, produced fresh by each probe
///
/// `behind` follows git's own convention and is stored as a non-positive
/// number, so the all-zero value means "no divergence".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct RepoStatus {
    /// Any tracked or untracked file differs from the last commit
    pub dirty: bool,
    /// Refreshing from the remote failed
    pub remote_error: bool,
    /// Commits on the local branch that upstream lacks (>= 0)
    pub ahead: i64,
    /// Negated count of upstream commits missing locally (<= 0)
    pub behind: i64,
}

impl RepoStatus {
    /// Returns true when every field holds its zero value
    pub fn is_clean(&self) -> bool {
        *self == RepoStatus::default()
    }

    /// Returns true when upstream has commits the local branch lacks
    pub fn is_behind(&self) -> bool {
        self.behind < 0
    }

    /// Returns the two-character status code
    ///
    /// The first character is `D` for a dirty working tree. The second is,
    /// in priority order: `E` remote error, `*` diverged, `+` ahead,
    /// `-` behind.
    pub fn code(&self) -> [char; 2] {
        let dirty = if self.dirty { 'D' } else { ' ' };
        let sync = if self.remote_error {
            'E'
        } else if self.ahead > 0 && self.behind < 0 {
            '*'
        } else if self.ahead > 0 {
            '+'
        } else if self.behind < 0 {
            '-'
        } else {
            ' '
        };
        [dirty, sync]
    }
}

impl fmt::Display for RepoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [first, second] = self.code();
        write!(f, "{first}{second}")
    }
}

/// Parses `git status --porcelain=2 --branch` output into a status
///
/// Malformed ahead/behind counters fall back to zero instead of failing the
/// parse; any line that is not a header marks the repository dirty.
pub fn parse_porcelain_v2(output: &str, remote_error: bool) -> RepoStatus {
    let mut status = RepoStatus {
        remote_error,
        ..RepoStatus::default()
    };

    for line in output.lines() {
        if line.is_empty() {
            continue;
        }
        if line.starts_with(BRANCH_AB_PREFIX) {
            let mut fields = line.split_whitespace().skip(2);
            status.ahead = parse_counter(fields.next());
            status.behind = parse_counter(fields.next());
        } else if line.starts_with(HEADER_PREFIX) {
            continue;
        } else {
            status.dirty = true;
        }
    }

    status
}

fn parse_counter(field: Option<&str>) -> i64 {
    field.and_then(|f| f.parse().ok()).unwrap_or(0)
}
