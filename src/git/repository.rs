use std::path::Path;

use git2::{BranchType, Repository as Git2Repo};

use crate::error::{ReleaseError, Result};

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)
            .map_err(|e| ReleaseError::preflight(format!("Not in a git repository: {}", e)))?;

        Ok(Git2Repository { repo })
    }
}

/// Credential callbacks shared by fetch and push.
///
/// Tries SSH keys from ~/.ssh/ in order of preference, then the SSH agent,
/// then whatever default credentials libgit2 can find.
fn remote_callbacks<'a>() -> git2::RemoteCallbacks<'a> {
    let mut callbacks = git2::RemoteCallbacks::new();
    callbacks.credentials(|_url, username_from_url, allowed_types| {
        if allowed_types.contains(git2::CredentialType::SSH_KEY) {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            let key_paths = vec![
                format!("{}/.ssh/id_ed25519", home),
                format!("{}/.ssh/id_rsa", home),
                format!("{}/.ssh/id_ecdsa", home),
            ];

            for key_path in key_paths {
                let path = std::path::Path::new(&key_path);
                if path.exists() {
                    if let Ok(cred) =
                        git2::Cred::ssh_key(username_from_url.unwrap_or("git"), None, path, None)
                    {
                        return Ok(cred);
                    }
                }
            }

            if let Ok(cred) = git2::Cred::ssh_key_from_agent(username_from_url.unwrap_or("git")) {
                return Ok(cred);
            }
        }

        git2::Cred::default()
    });
    callbacks
}

impl super::Repository for Git2Repository {
    fn current_branch(&self) -> Result<String> {
        let head = self.repo.head()?;

        if !head.is_branch() {
            return Err(ReleaseError::preflight(
                "HEAD is detached - check out a branch before releasing",
            ));
        }

        head.shorthand()
            .map(|s| s.to_string())
            .ok_or_else(|| ReleaseError::preflight("Branch name is not valid UTF-8"))
    }

    fn dirty_paths(&self) -> Result<Vec<String>> {
        let mut opts = git2::StatusOptions::new();
        opts.include_untracked(true)
            .recurse_untracked_dirs(true)
            .exclude_submodules(true);

        let statuses = self.repo.statuses(Some(&mut opts))?;

        Ok(statuses
            .iter()
            .filter(|entry| !entry.status().is_ignored())
            .filter_map(|entry| entry.path().map(|p| p.to_string()))
            .collect())
    }

    fn fetch(&self, remote_name: &str, _branch: &str) -> Result<()> {
        let mut remote = self.repo.find_remote(remote_name).map_err(|_| {
            ReleaseError::preflight(format!("Remote '{}' not found", remote_name))
        })?;

        let mut fetch_options = git2::FetchOptions::new();
        fetch_options.remote_callbacks(remote_callbacks());

        // Update remote-tracking branches and tags only. The local branch is
        // left alone so the divergence check reflects reality, not a merge we
        // performed behind the operator's back.
        let refspec_heads = format!("+refs/heads/*:refs/remotes/{}/*", remote_name);
        let refspecs = &[refspec_heads.as_str(), "+refs/tags/*:refs/tags/*"];

        remote
            .fetch(refspecs, Some(&mut fetch_options), None)
            .map_err(|e| {
                ReleaseError::preflight(format!(
                    "Failed to fetch from remote '{}': {}",
                    remote_name, e
                ))
            })?;

        Ok(())
    }

    fn upstream_divergence(&self, branch_name: &str) -> Result<Option<(usize, usize)>> {
        let branch = self
            .repo
            .find_branch(branch_name, BranchType::Local)
            .map_err(|e| {
                ReleaseError::preflight(format!("Cannot find branch '{}': {}", branch_name, e))
            })?;

        let upstream = match branch.upstream() {
            Ok(upstream) => upstream,
            Err(e) if e.code() == git2::ErrorCode::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let local_oid = branch.get().target().ok_or_else(|| {
            ReleaseError::preflight(format!("Branch '{}' has no target", branch_name))
        })?;
        let upstream_oid = upstream.get().target().ok_or_else(|| {
            ReleaseError::preflight(format!("Upstream of '{}' has no target", branch_name))
        })?;

        let (ahead, behind) = self.repo.graph_ahead_behind(local_oid, upstream_oid)?;
        Ok(Some((ahead, behind)))
    }

    fn commit_paths(&self, paths: &[&Path], message: &str) -> Result<()> {
        let mut index = self.repo.index()?;
        for path in paths {
            index.add_path(path)?;
        }
        index.write()?;

        let tree_id = index.write_tree()?;
        let tree = self.repo.find_tree(tree_id)?;
        let signature = self.repo.signature()?;
        let parent = self.repo.head()?.peel_to_commit()?;

        self.repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &[&parent],
        )?;

        Ok(())
    }

    fn tag_exists(&self, name: &str) -> Result<bool> {
        let reference_name = format!("refs/tags/{}", name);

        match self.repo.find_reference(&reference_name) {
            Ok(_) => Ok(true),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(false),
            Err(e) => Err(ReleaseError::Tag(format!(
                "Cannot look up tag '{}': {}",
                name, e
            ))),
        }
    }

    fn create_tag(&self, name: &str) -> Result<()> {
        let head = self.repo.head()?.peel_to_commit()?;
        self.repo
            .tag_lightweight(name, head.as_object(), false)
            .map_err(|e| ReleaseError::Tag(format!("Cannot create tag '{}': {}", name, e)))?;
        Ok(())
    }

    fn push(&self, remote_name: &str, branch: &str, tag: &str) -> Result<()> {
        let mut remote = self.repo.find_remote(remote_name).map_err(|_| {
            ReleaseError::preflight(format!("Remote '{}' not found", remote_name))
        })?;

        let mut push_options = git2::PushOptions::new();
        let mut callbacks = remote_callbacks();

        // Catch per-reference rejections that the push call itself reports as
        // success.
        callbacks.push_update_reference(|refname, status| {
            if let Some(status) = status {
                eprintln!("Warning: Could not update reference {}: {}", refname, status);
                Err(git2::Error::from_str(&format!(
                    "Push failed for {}",
                    refname
                )))
            } else {
                Ok(())
            }
        });

        push_options.remote_callbacks(callbacks);

        let refspecs = [
            format!("refs/heads/{}:refs/heads/{}", branch, branch),
            format!("refs/tags/{}:refs/tags/{}", tag, tag),
        ];
        let refspec_strs: Vec<&str> = refspecs.iter().map(|s| s.as_str()).collect();

        match remote.push(&refspec_strs, Some(&mut push_options)) {
            Ok(_) => Ok(()),
            Err(e) => {
                if e.class() == git2::ErrorClass::Net {
                    Err(ReleaseError::command(format!(
                        "Network error during push: {}",
                        e
                    )))
                } else if e.class() == git2::ErrorClass::Reference {
                    Err(ReleaseError::command(format!(
                        "Reference error during push: {}",
                        e
                    )))
                } else {
                    Err(ReleaseError::command(format!(
                        "Failed to push '{}' and '{}': {}",
                        branch, tag, e
                    )))
                }
            }
        }
    }
}

// SAFETY: Git2Repository wraps git2::Repository which is Send. The release
// driver performs all repository operations from a single thread; Sync is
// required only to satisfy the Repository trait bound shared with the mock.
unsafe impl Sync for Git2Repository {}
