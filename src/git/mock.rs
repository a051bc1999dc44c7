use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::error::{ReleaseError, Result};
use crate::git::Repository;

/// Shared operation journal for asserting cross-object call ordering in tests.
///
/// The same journal can be handed to a [MockRepository] and a
/// [crate::command::MockRunner] so a test can check, for example, that the
/// deploy command ran before any push.
pub type Journal = Arc<Mutex<Vec<String>>>;

/// Create an empty shared journal
pub fn new_journal() -> Journal {
    Arc::new(Mutex::new(Vec::new()))
}

/// Mock repository for testing without actual git operations
///
/// Starts out as a releasable repository: on branch "main", clean working
/// tree, upstream in sync. Setters degrade that state for failure-path tests.
pub struct MockRepository {
    branch: String,
    dirty: Vec<String>,
    upstream: Option<(usize, usize)>,
    tags: Mutex<Vec<String>>,
    fail_fetch: bool,
    fail_push: bool,
    journal: Journal,
}

impl MockRepository {
    /// Create a clean, in-sync mock repository on branch "main"
    pub fn new() -> Self {
        MockRepository {
            branch: "main".to_string(),
            dirty: Vec::new(),
            upstream: Some((0, 0)),
            tags: Mutex::new(Vec::new()),
            fail_fetch: false,
            fail_push: false,
            journal: new_journal(),
        }
    }

    /// Use a shared journal so ordering can be asserted across mocks
    pub fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = journal;
        self
    }

    /// Set the checked-out branch name
    pub fn set_branch(&mut self, branch: impl Into<String>) {
        self.branch = branch.into();
    }

    /// Mark working-tree paths as modified
    pub fn set_dirty(&mut self, paths: &[&str]) {
        self.dirty = paths.iter().map(|p| p.to_string()).collect();
    }

    /// Set the ahead/behind counts against the upstream
    pub fn set_upstream(&mut self, ahead: usize, behind: usize) {
        self.upstream = Some((ahead, behind));
    }

    /// Remove the upstream configuration entirely
    pub fn clear_upstream(&mut self) {
        self.upstream = None;
    }

    /// Pre-populate an existing tag
    pub fn add_tag(&mut self, name: impl Into<String>) {
        self.tags.lock().unwrap().push(name.into());
    }

    /// Make fetch fail
    pub fn fail_fetch(&mut self) {
        self.fail_fetch = true;
    }

    /// Make push fail
    pub fn fail_push(&mut self) {
        self.fail_push = true;
    }

    /// Snapshot of the recorded operations
    pub fn journal_entries(&self) -> Vec<String> {
        self.journal.lock().unwrap().clone()
    }

    fn record(&self, entry: String) {
        self.journal.lock().unwrap().push(entry);
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn current_branch(&self) -> Result<String> {
        Ok(self.branch.clone())
    }

    fn dirty_paths(&self) -> Result<Vec<String>> {
        Ok(self.dirty.clone())
    }

    fn fetch(&self, remote: &str, branch: &str) -> Result<()> {
        if self.fail_fetch {
            return Err(ReleaseError::preflight(format!(
                "Failed to fetch from remote '{}'",
                remote
            )));
        }
        self.record(format!("fetch {}/{}", remote, branch));
        Ok(())
    }

    fn upstream_divergence(&self, _branch: &str) -> Result<Option<(usize, usize)>> {
        Ok(self.upstream)
    }

    fn commit_paths(&self, paths: &[&Path], message: &str) -> Result<()> {
        self.record(format!(
            "commit [{}] {}",
            paths
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", "),
            message
        ));
        Ok(())
    }

    fn tag_exists(&self, name: &str) -> Result<bool> {
        Ok(self.tags.lock().unwrap().iter().any(|t| t == name))
    }

    fn create_tag(&self, name: &str) -> Result<()> {
        self.tags.lock().unwrap().push(name.to_string());
        self.record(format!("tag {}", name));
        Ok(())
    }

    fn push(&self, remote: &str, branch: &str, tag: &str) -> Result<()> {
        if self.fail_push {
            return Err(ReleaseError::command(format!(
                "Failed to push '{}' and '{}'",
                branch, tag
            )));
        }
        self.record(format!("push {} {} {}", remote, branch, tag));
        Ok(())
    }
}
