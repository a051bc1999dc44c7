//! Pure formatting functions for UI output.
//!
//! This module contains all display/formatting logic separated from user
//! interaction.

use crate::version::Version;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("\x1b[31mERROR:\x1b[0m {}", message);
}

/// Format and print a warning message in yellow.
pub fn display_warning(message: &str) {
    eprintln!("\x1b[33m⚠ WARNING:\x1b[0m {}", message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("\x1b[32m✓\x1b[0m {}", message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("\x1b[33m→\x1b[0m {}", message);
}

/// Display the version change about to be released.
pub fn display_version_change(current: &Version, new: &Version, tag: &str) {
    println!("\n\x1b[1mRelease:\x1b[0m");
    println!("  From: \x1b[31m{}\x1b[0m", current);
    println!("  To:   \x1b[32m{}\x1b[0m ({})", new, tag);
}

/// Display the numbered plan of steps a dry run would perform.
pub fn display_release_plan(steps: &[String]) {
    println!("\n\x1b[1mDry run - the following steps would run:\x1b[0m");
    for (i, step) in steps.iter().enumerate() {
        println!("  {}. {}", i + 1, step);
    }
}

/// Display the git command needed to push the release later.
pub fn display_manual_push_instruction(remote: &str, branch: &str, tag: &str) {
    println!(
        "\n\x1b[33m→\x1b[0m To push this release later, run:\n  \x1b[36mgit push {} {} {}\x1b[0m",
        remote, branch, tag
    );
}
