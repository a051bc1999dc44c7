//! Reading and rewriting the version field in `pyproject.toml`.
//!
//! Reads go through the `toml` parser so a broken manifest is caught early.
//! Writes replace only the version assignment line, keeping the rest of the
//! file byte-for-byte identical.

use std::fs;
use std::path::Path;

use crate::error::{ReleaseError, Result};
use crate::version::Version;

/// Read the current version from the manifest's `[project]` table.
pub fn read_version(path: &Path) -> Result<Version> {
    let content = fs::read_to_string(path).map_err(|e| {
        ReleaseError::manifest(format!("Cannot read '{}': {}", path.display(), e))
    })?;

    let doc: toml::Value = toml::from_str(&content).map_err(|e| {
        ReleaseError::manifest(format!("Cannot parse '{}': {}", path.display(), e))
    })?;

    let version_str = doc
        .get("project")
        .and_then(|p| p.get("version"))
        .and_then(|v| v.as_str())
        .ok_or_else(|| {
            ReleaseError::manifest(format!(
                "No [project].version field in '{}'",
                path.display()
            ))
        })?;

    Version::parse(version_str).map_err(|_| {
        ReleaseError::manifest(format!(
            "Invalid version '{}' in '{}' - expected X.Y.Z",
            version_str,
            path.display()
        ))
    })
}

/// Rewrite the manifest's version assignment from `old` to `new`.
///
/// Replaces the single `version = "old"` line. The old version must still be
/// present; if it is not, the manifest changed since it was read and the
/// release must not proceed.
pub fn write_version(path: &Path, old: &Version, new: &Version) -> Result<()> {
    let content = fs::read_to_string(path).map_err(|e| {
        ReleaseError::manifest(format!("Cannot read '{}': {}", path.display(), e))
    })?;

    let pattern = format!(
        r#"(?m)^(\s*version\s*=\s*"){}("\s*)$"#,
        regex::escape(&old.to_string())
    );
    let re = regex::Regex::new(&pattern)
        .map_err(|e| ReleaseError::manifest(format!("Invalid version pattern: {}", e)))?;

    if !re.is_match(&content) {
        return Err(ReleaseError::manifest(format!(
            "Version assignment 'version = \"{}\"' not found in '{}'",
            old,
            path.display()
        )));
    }

    let updated = re.replace(&content, format!("${{1}}{}${{2}}", new));

    fs::write(path, updated.as_bytes()).map_err(|e| {
        ReleaseError::manifest(format!("Cannot write '{}': {}", path.display(), e))
    })?;

    Ok(())
}
