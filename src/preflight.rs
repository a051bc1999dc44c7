//! Release preconditions.
//!
//! Every check here is fatal for a real release and advisory for a dry run.

use std::fmt;

use crate::command::{split_command, CommandRunner};
use crate::config::Config;
use crate::error::Result;
use crate::git::Repository;
use crate::release::ReleaseOptions;

/// A failed release precondition.
#[derive(Debug, Clone, PartialEq)]
pub enum PreflightIssue {
    /// A required external command is not on PATH
    MissingCommand { program: String },
    /// Working tree has local modifications or untracked files
    DirtyWorkingTree { paths: Vec<String> },
    /// The branch has no remote-tracking upstream configured
    NoUpstream { branch: String },
    /// The branch and its upstream have diverged
    BranchOutOfSync {
        branch: String,
        ahead: usize,
        behind: usize,
    },
}

impl fmt::Display for PreflightIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreflightIssue::MissingCommand { program } => {
                write!(f, "Required command '{}' not found on PATH", program)
            }
            PreflightIssue::DirtyWorkingTree { paths } => {
                let shown: Vec<&str> = paths.iter().take(5).map(|p| p.as_str()).collect();
                let suffix = if paths.len() > 5 {
                    format!(" and {} more", paths.len() - 5)
                } else {
                    String::new()
                };
                write!(
                    f,
                    "Working tree is not clean: {}{}",
                    shown.join(", "),
                    suffix
                )
            }
            PreflightIssue::NoUpstream { branch } => {
                write!(f, "Branch '{}' has no upstream configured", branch)
            }
            PreflightIssue::BranchOutOfSync {
                branch,
                ahead,
                behind,
            } => {
                write!(
                    f,
                    "Branch '{}' is not in sync with its upstream ({} ahead, {} behind)",
                    branch, ahead, behind
                )
            }
        }
    }
}

/// Run every precondition check and collect the failures.
///
/// Command availability is checked for each external command the selected
/// options will actually invoke. Repository checks cover cleanliness and
/// upstream synchronization of the given branch.
pub fn run_checks(
    repo: &dyn Repository,
    runner: &dyn CommandRunner,
    config: &Config,
    opts: &ReleaseOptions,
    branch: &str,
) -> Result<Vec<PreflightIssue>> {
    let mut issues = Vec::new();

    let mut required = vec![&config.commands.lock, &config.commands.compile];
    if !opts.no_deploy {
        required.push(&config.commands.deploy);
    }

    for argv in required {
        let (program, _) = split_command(argv)?;
        if !runner.is_available(program) {
            // The same program may back several commands; report it once
            let issue = PreflightIssue::MissingCommand {
                program: program.to_string(),
            };
            if !issues.contains(&issue) {
                issues.push(issue);
            }
        }
    }

    let dirty = repo.dirty_paths()?;
    if !dirty.is_empty() {
        issues.push(PreflightIssue::DirtyWorkingTree { paths: dirty });
    }

    match repo.upstream_divergence(branch)? {
        None => {
            issues.push(PreflightIssue::NoUpstream {
                branch: branch.to_string(),
            });
        }
        Some((0, 0)) => {}
        Some((ahead, behind)) => {
            issues.push(PreflightIssue::BranchOutOfSync {
                branch: branch.to_string(),
                ahead,
                behind,
            });
        }
    }

    Ok(issues)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::MockRunner;
    use crate::git::MockRepository;

    fn default_opts() -> ReleaseOptions {
        ReleaseOptions {
            deploy_only: false,
            dry_run: false,
            no_deploy: false,
            no_push: false,
        }
    }

    #[test]
    fn test_clean_repo_passes() {
        let repo = MockRepository::new();
        let runner = MockRunner::new();

        let issues =
            run_checks(&repo, &runner, &Config::default(), &default_opts(), "main").unwrap();
        assert!(issues.is_empty());
    }

    #[test]
    fn test_dirty_tree_reported() {
        let mut repo = MockRepository::new();
        repo.set_dirty(&["pyproject.toml", "notes.txt"]);
        let runner = MockRunner::new();

        let issues =
            run_checks(&repo, &runner, &Config::default(), &default_opts(), "main").unwrap();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].to_string().contains("not clean"));
        assert!(issues[0].to_string().contains("pyproject.toml"));
    }

    #[test]
    fn test_missing_upstream_reported() {
        let mut repo = MockRepository::new();
        repo.clear_upstream();
        let runner = MockRunner::new();

        let issues =
            run_checks(&repo, &runner, &Config::default(), &default_opts(), "main").unwrap();
        assert_eq!(
            issues,
            vec![PreflightIssue::NoUpstream {
                branch: "main".to_string()
            }]
        );
    }

    #[test]
    fn test_diverged_branch_reported() {
        let mut repo = MockRepository::new();
        repo.set_upstream(2, 1);
        let runner = MockRunner::new();

        let issues =
            run_checks(&repo, &runner, &Config::default(), &default_opts(), "main").unwrap();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].to_string().contains("2 ahead, 1 behind"));
    }

    #[test]
    fn test_missing_command_reported_once() {
        let repo = MockRepository::new();
        let mut runner = MockRunner::new();
        // uv backs both the lock and compile commands
        runner.mark_missing("uv");

        let issues =
            run_checks(&repo, &runner, &Config::default(), &default_opts(), "main").unwrap();
        assert_eq!(
            issues,
            vec![PreflightIssue::MissingCommand {
                program: "uv".to_string()
            }]
        );
    }

    #[test]
    fn test_deploy_command_skipped_with_no_deploy() {
        let repo = MockRepository::new();
        let mut runner = MockRunner::new();
        runner.mark_missing("reflex");

        let mut opts = default_opts();
        opts.no_deploy = true;

        let issues = run_checks(&repo, &runner, &Config::default(), &opts, "main").unwrap();
        assert!(issues.is_empty());
    }

    #[test]
    fn test_dirty_tree_display_truncates() {
        let issue = PreflightIssue::DirtyWorkingTree {
            paths: (0..8).map(|i| format!("file{}.py", i)).collect(),
        };
        let msg = issue.to_string();
        assert!(msg.contains("file4.py"));
        assert!(msg.contains("and 3 more"));
        assert!(!msg.contains("file5.py"));
    }
}
