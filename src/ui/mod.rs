//! User interface module - interaction (prompts) and formatting.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - This module - Interactive prompts and user input handling

use std::io::{self, Write};

use anyhow::Result;

use crate::version::Version;

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_error, display_manual_push_instruction, display_release_plan, display_status,
    display_success, display_version_change, display_warning,
};

/// Prompts for the new release version.
///
/// Shows the current version and the suggested patch bump. Empty input
/// accepts the suggestion; any other entry is returned verbatim for the
/// workflow to validate. There is no re-prompt loop - an invalid entry fails
/// the release.
///
/// # Arguments
/// * `current` - Version currently in the manifest
/// * `suggested` - Default offered when the user presses Enter
///
/// # Returns
/// * `Ok(None)` - User accepted the suggestion
/// * `Ok(Some(String))` - User entered a version string
/// * `Err` - If input error occurs
pub fn prompt_version(current: &Version, suggested: &Version) -> Result<Option<String>> {
    print!(
        "\nCurrent version: \x1b[1m{}\x1b[0m\nNew version [{}]: ",
        current, suggested
    );
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim();

    if input.is_empty() {
        Ok(None)
    } else {
        Ok(Some(input.to_string()))
    }
}
