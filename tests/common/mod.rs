//! Common test utilities and helpers
#![allow(dead_code, unused_imports)]

pub mod git;

pub use self::git::{
    clone_repo, create_test_commit, is_git_available, setup_git_repo, setup_upstream_and_clone,
};
