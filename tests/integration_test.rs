use std::fs;
use std::path::Path;
use std::process::Command;

use git2::Repository as RawRepository;
use tempfile::TempDir;

use aero_release::git::{Git2Repository, Repository};

#[test]
fn test_aero_release_help() {
    let output = Command::new("cargo")
        .args(["run", "--bin", "aero-release", "--", "--help"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("aero-release"));
    assert!(stdout.contains("Release and deploy"));
    assert!(stdout.contains("--deploy-only"));
    assert!(stdout.contains("--dry-run"));
}

#[test]
fn test_aero_release_version() {
    let output = Command::new("cargo")
        .args(["run", "--bin", "aero-release", "--", "--version"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("aero-release"));
}

#[test]
fn test_contradictory_flags_rejected() {
    let output = Command::new("cargo")
        .args([
            "run",
            "--bin",
            "aero-release",
            "--",
            "--deploy-only",
            "--no-deploy",
        ])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("contradict"));
}

// Helper to set up a temporary git repo holding a pyproject.toml
fn setup_test_repo() -> TempDir {
    let temp_dir = TempDir::new().expect("Could not create temp dir");

    let repo = RawRepository::init(temp_dir.path()).expect("Could not init git repo");

    {
        let mut config = repo.config().expect("Could not get config");
        config
            .set_str("user.name", "Test User")
            .expect("Could not set user.name");
        config
            .set_str("user.email", "test@example.com")
            .expect("Could not set user.email");
    }

    let manifest = "[project]\nname = \"aero-data\"\nversion = \"0.3.1\"\n";
    fs::write(temp_dir.path().join("pyproject.toml"), manifest)
        .expect("Could not write manifest");

    let mut index = repo.index().expect("Could not get index");
    index
        .add_path(Path::new("pyproject.toml"))
        .expect("Could not add file to index");
    index.write().expect("Could not write index");

    let tree_id = index.write_tree().expect("Could not write tree");
    let tree = repo.find_tree(tree_id).expect("Could not find tree");

    repo.commit(
        Some("HEAD"),
        &repo.signature().expect("Could not get sig"),
        &repo.signature().expect("Could not get sig"),
        "Initial commit",
        &tree,
        &[],
    )
    .expect("Could not create commit");

    temp_dir
}

#[test]
fn test_open_fails_outside_git_repository() {
    let temp_dir = TempDir::new().unwrap();
    // TempDir under /tmp has no parent repo to discover, so this must fail
    let result = Git2Repository::open(temp_dir.path());
    assert!(result.is_err());
}

#[test]
fn test_clean_and_dirty_detection() {
    let temp_dir = setup_test_repo();
    let repo = Git2Repository::open(temp_dir.path()).unwrap();

    assert!(repo.dirty_paths().unwrap().is_empty());

    fs::write(temp_dir.path().join("notes.txt"), "scratch\n").unwrap();
    let dirty = repo.dirty_paths().unwrap();
    assert_eq!(dirty, vec!["notes.txt"]);

    fs::write(
        temp_dir.path().join("pyproject.toml"),
        "[project]\nname = \"aero-data\"\nversion = \"0.3.2\"\n",
    )
    .unwrap();
    let dirty = repo.dirty_paths().unwrap();
    assert_eq!(dirty.len(), 2);
    assert!(dirty.contains(&"pyproject.toml".to_string()));
}

#[test]
fn test_commit_paths_stages_only_named_files() {
    let temp_dir = setup_test_repo();
    let repo = Git2Repository::open(temp_dir.path()).unwrap();

    fs::write(
        temp_dir.path().join("pyproject.toml"),
        "[project]\nname = \"aero-data\"\nversion = \"0.3.2\"\n",
    )
    .unwrap();
    fs::write(temp_dir.path().join("unrelated.txt"), "leftover\n").unwrap();

    repo.commit_paths(&[Path::new("pyproject.toml")], "release: v0.3.2")
        .unwrap();

    // The named file is committed, the unrelated one stays dirty
    let dirty = repo.dirty_paths().unwrap();
    assert_eq!(dirty, vec!["unrelated.txt"]);

    let raw = RawRepository::open(temp_dir.path()).unwrap();
    let head = raw.head().unwrap().peel_to_commit().unwrap();
    assert_eq!(head.message().unwrap(), "release: v0.3.2");
}

#[test]
fn test_tag_creation_and_lookup() {
    let temp_dir = setup_test_repo();
    let repo = Git2Repository::open(temp_dir.path()).unwrap();

    assert!(!repo.tag_exists("v0.3.1").unwrap());
    repo.create_tag("v0.3.1").unwrap();
    assert!(repo.tag_exists("v0.3.1").unwrap());
}

#[test]
fn test_current_branch() {
    let temp_dir = setup_test_repo();
    let repo = Git2Repository::open(temp_dir.path()).unwrap();

    let branch = repo.current_branch().unwrap();
    let raw = RawRepository::open(temp_dir.path()).unwrap();
    assert_eq!(branch, raw.head().unwrap().shorthand().unwrap());
}

#[test]
fn test_upstream_divergence_without_upstream() {
    let temp_dir = setup_test_repo();
    let repo = Git2Repository::open(temp_dir.path()).unwrap();

    let branch = repo.current_branch().unwrap();
    assert_eq!(repo.upstream_divergence(&branch).unwrap(), None);
}

#[test]
fn test_upstream_divergence_with_local_remote() {
    let temp_dir = setup_test_repo();
    let remote_dir = TempDir::new().unwrap();
    RawRepository::init_bare(remote_dir.path()).unwrap();

    let raw = RawRepository::open(temp_dir.path()).unwrap();
    let branch_name = raw.head().unwrap().shorthand().unwrap().to_string();

    raw.remote("origin", remote_dir.path().to_str().unwrap())
        .unwrap();

    // Publish the branch, fetch the tracking ref back, and wire up the
    // upstream so divergence can be computed.
    let refspec = format!("refs/heads/{}:refs/heads/{}", branch_name, branch_name);
    raw.find_remote("origin")
        .unwrap()
        .push(&[refspec.as_str()], None)
        .unwrap();
    raw.find_remote("origin")
        .unwrap()
        .fetch(&[branch_name.as_str()], None, None)
        .unwrap();
    raw.find_branch(&branch_name, git2::BranchType::Local)
        .unwrap()
        .set_upstream(Some(&format!("origin/{}", branch_name)))
        .unwrap();

    let repo = Git2Repository::open(temp_dir.path()).unwrap();
    assert_eq!(
        repo.upstream_divergence(&branch_name).unwrap(),
        Some((0, 0))
    );

    // A new local commit puts the branch one ahead
    fs::write(temp_dir.path().join("pyproject.toml"), "[project]\nname = \"aero-data\"\nversion = \"0.3.2\"\n").unwrap();
    repo.commit_paths(&[Path::new("pyproject.toml")], "release: v0.3.2")
        .unwrap();
    assert_eq!(
        repo.upstream_divergence(&branch_name).unwrap(),
        Some((1, 0))
    );
}
