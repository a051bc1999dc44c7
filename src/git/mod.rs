//! Git operations abstraction layer
//!
//! This module provides a trait-based abstraction over the git operations the
//! release driver needs, allowing for multiple implementations including real
//! repositories and a mock implementation for testing.
//!
//! # Overview
//!
//! The primary abstraction is the [Repository] trait. The concrete
//! implementations include:
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [mock::MockRepository]: A mock implementation for testing
//!
//! Most code should depend on the [Repository] trait rather than concrete
//! implementations to enable easy testing and flexibility.

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use std::path::Path;

use crate::error::Result;

/// Common git operation trait for abstraction
///
/// All implementors must be `Send + Sync` to allow safe sharing across
/// threads. Implementations map underlying errors (like `git2::Error`) to the
/// appropriate [crate::error::ReleaseError] variants.
pub trait Repository: Send + Sync {
    /// Get the short name of the currently checked-out branch.
    ///
    /// # Returns
    /// * `Ok(String)` - Branch name (e.g., "main")
    /// * `Err` - If HEAD is detached or unreadable
    fn current_branch(&self) -> Result<String>;

    /// List working-tree paths that differ from HEAD.
    ///
    /// Includes staged, unstaged, and untracked entries. An empty list means
    /// the working tree is clean.
    fn dirty_paths(&self) -> Result<Vec<String>>;

    /// Fetch remote-tracking refs and tags from a remote.
    ///
    /// Updates the remote-tracking refs only; the local branch is never
    /// moved. Callers treat a failed fetch as a warning and fall back to
    /// local tracking data.
    fn fetch(&self, remote: &str, branch: &str) -> Result<()>;

    /// Commits the local branch is ahead of and behind its upstream.
    ///
    /// # Returns
    /// * `Ok(Some((ahead, behind)))` - Divergence counts against the upstream
    /// * `Ok(None)` - If the branch has no upstream configured
    /// * `Err` - If the branch doesn't exist or a git error occurs
    fn upstream_divergence(&self, branch: &str) -> Result<Option<(usize, usize)>>;

    /// Stage the given paths and commit them on HEAD.
    ///
    /// Paths are relative to the repository work directory. Only the named
    /// paths are staged.
    fn commit_paths(&self, paths: &[&Path], message: &str) -> Result<()>;

    /// Whether a tag with this name already exists.
    fn tag_exists(&self, name: &str) -> Result<bool>;

    /// Create a lightweight tag on the current HEAD commit.
    fn create_tag(&self, name: &str) -> Result<()>;

    /// Push the branch and the tag to a remote in one operation.
    ///
    /// # Arguments
    /// * `remote` - Name of the remote (e.g., "origin")
    /// * `branch` - Branch to push
    /// * `tag` - Tag to push alongside the branch
    fn push(&self, remote: &str, branch: &str, tag: &str) -> Result<()>;
}
