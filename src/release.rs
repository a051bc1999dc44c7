//! The release workflow.
//!
//! A single linear sequence of guarded steps. Every step assumes the previous
//! one succeeded; the first failure aborts the whole release. The push step
//! runs strictly after a successful deploy, so a broken deploy leaves the
//! release commit and tag local instead of visible upstream.

use std::path::Path;

use crate::command::{split_command, CommandRunner};
use crate::config::Config;
use crate::error::{ReleaseError, Result};
use crate::git::Repository;
use crate::manifest;
use crate::preflight;
use crate::ui;
use crate::version::Version;

/// Flags selecting which steps of the release run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReleaseOptions {
    /// Run only the deploy step
    pub deploy_only: bool,

    /// Preview mode - don't change the manifest, repository, or anything else
    pub dry_run: bool,

    /// Skip the deploy step
    pub no_deploy: bool,

    /// Skip pushing the release commit and tag
    pub no_push: bool,
}

/// What a release run actually did
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseOutcome {
    /// Version in the manifest before the release
    pub old_version: Option<Version>,

    /// Version released
    pub new_version: Option<Version>,

    /// Tag created for the release
    pub tag: Option<String>,

    /// Whether the deploy command ran successfully
    pub deployed: bool,

    /// Whether the release commit and tag were pushed
    pub pushed: bool,
}

impl ReleaseOutcome {
    fn empty() -> Self {
        ReleaseOutcome {
            old_version: None,
            new_version: None,
            tag: None,
            deployed: false,
            pushed: false,
        }
    }
}

/// Run the release workflow.
///
/// `requested_version` is the operator's entry from the version prompt; when
/// absent the suggested patch bump of the current manifest version is used.
/// Validation failures, precondition failures, and external command failures
/// all abort with an error - there is no retry and no rollback.
pub fn run_release(
    opts: &ReleaseOptions,
    config: &Config,
    repo: &dyn Repository,
    runner: &dyn CommandRunner,
    requested_version: Option<&str>,
) -> Result<ReleaseOutcome> {
    if opts.deploy_only {
        return run_deploy_only(opts, config, runner);
    }

    let branch = repo.current_branch()?;

    ui::display_status(&format!(
        "Fetching latest data from remote '{}'...",
        config.git.remote
    ));
    if let Err(e) = repo.fetch(&config.git.remote, &branch) {
        ui::display_warning(&format!(
            "Could not fetch from remote: {}. Using local tracking data.",
            e
        ));
    }

    let issues = preflight::run_checks(repo, runner, config, opts, &branch)?;
    if !issues.is_empty() {
        if opts.dry_run {
            for issue in &issues {
                ui::display_warning(&issue.to_string());
            }
        } else {
            for issue in &issues {
                ui::display_error(&issue.to_string());
            }
            return Err(ReleaseError::preflight(format!(
                "{} release precondition(s) failed",
                issues.len()
            )));
        }
    }

    let current = manifest::read_version(&config.paths.manifest)?;
    let new_version = match requested_version {
        Some(raw) => Version::parse(raw)?,
        None => current.next_patch(),
    };

    if new_version <= current {
        return Err(ReleaseError::version(format!(
            "New version {} must be greater than current version {}",
            new_version, current
        )));
    }

    let tag = config.tag_name(&new_version);
    if repo.tag_exists(&tag)? {
        return Err(ReleaseError::tag(format!("Tag '{}' already exists", tag)));
    }

    ui::display_version_change(&current, &new_version, &tag);

    if opts.dry_run {
        ui::display_release_plan(&plan_steps(opts, config, &branch, &new_version, &tag));
        return Ok(ReleaseOutcome {
            old_version: Some(current),
            new_version: Some(new_version),
            tag: Some(tag),
            deployed: false,
            pushed: false,
        });
    }

    manifest::write_version(&config.paths.manifest, &current, &new_version)?;
    ui::display_success(&format!(
        "Updated {} to {}",
        config.paths.manifest.display(),
        new_version
    ));

    run_command(runner, &config.commands.lock)?;
    run_command(runner, &config.commands.compile)?;

    let commit_message = config.commit_message(&tag);
    let paths: Vec<&Path> = vec![
        config.paths.manifest.as_path(),
        config.paths.lockfile.as_path(),
        config.paths.requirements.as_path(),
    ];
    repo.commit_paths(&paths, &commit_message)?;
    ui::display_success(&format!("Committed release: {}", commit_message));

    repo.create_tag(&tag)?;
    ui::display_success(&format!("Created tag: {}", tag));

    let mut deployed = false;
    if !opts.no_deploy {
        // A deploy failure aborts here, before push, so the commit and tag
        // stay local.
        run_command(runner, &config.commands.deploy)?;
        deployed = true;
        ui::display_success("Deploy succeeded");
    }

    let mut pushed = false;
    if !opts.no_push {
        ui::display_status(&format!(
            "Pushing {} and {} to '{}'...",
            branch, tag, config.git.remote
        ));
        repo.push(&config.git.remote, &branch, &tag)?;
        pushed = true;
        ui::display_success("Pushed release commit and tag");
    } else {
        ui::display_manual_push_instruction(&config.git.remote, &branch, &tag);
    }

    Ok(ReleaseOutcome {
        old_version: Some(current),
        new_version: Some(new_version),
        tag: Some(tag),
        deployed,
        pushed,
    })
}

/// The `--deploy-only` path: no preflight, no version bump, no commit, no push.
fn run_deploy_only(
    opts: &ReleaseOptions,
    config: &Config,
    runner: &dyn CommandRunner,
) -> Result<ReleaseOutcome> {
    let (program, _) = split_command(&config.commands.deploy)?;
    if !runner.is_available(program) {
        return Err(ReleaseError::preflight(format!(
            "Required command '{}' not found on PATH",
            program
        )));
    }

    if opts.dry_run {
        ui::display_release_plan(&[format!("Run: {}", config.commands.deploy.join(" "))]);
        return Ok(ReleaseOutcome::empty());
    }

    run_command(runner, &config.commands.deploy)?;
    ui::display_success("Deploy succeeded");

    Ok(ReleaseOutcome {
        deployed: true,
        ..ReleaseOutcome::empty()
    })
}

fn run_command(runner: &dyn CommandRunner, argv: &[String]) -> Result<()> {
    let (program, args) = split_command(argv)?;
    ui::display_status(&format!("Running: {}", argv.join(" ")));
    runner.run(program, args)
}

fn plan_steps(
    opts: &ReleaseOptions,
    config: &Config,
    branch: &str,
    new_version: &Version,
    tag: &str,
) -> Vec<String> {
    let mut steps = vec![
        format!(
            "Write version {} to {}",
            new_version,
            config.paths.manifest.display()
        ),
        format!("Run: {}", config.commands.lock.join(" ")),
        format!("Run: {}", config.commands.compile.join(" ")),
        format!(
            "Commit {}, {}, {}",
            config.paths.manifest.display(),
            config.paths.lockfile.display(),
            config.paths.requirements.display()
        ),
        format!("Create tag {}", tag),
    ];

    if !opts.no_deploy {
        steps.push(format!("Run: {}", config.commands.deploy.join(" ")));
    }
    if !opts.no_push {
        steps.push(format!(
            "Push {} and {} to '{}'",
            branch, tag, config.git.remote
        ));
    }

    steps
}
