//! External command execution.
//!
//! The lock, compile, and deploy steps are black-box subprocess invocations:
//! their exit status is the only signal the driver consumes. Output streams
//! straight through to the operator's terminal.

use std::process::Command;
use std::sync::Mutex;

use crate::error::{ReleaseError, Result};
use crate::git::mock::Journal;

/// Abstraction over external command execution
///
/// Mirrors the [crate::git::Repository] split: a real implementation backed
/// by `std::process` and a recording mock for tests.
pub trait CommandRunner: Send + Sync {
    /// Whether the program can be found on PATH
    fn is_available(&self, program: &str) -> bool;

    /// Run the program to completion with inherited stdio.
    ///
    /// # Returns
    /// * `Ok(())` if the command exits with status 0
    /// * `Err` if the command cannot be launched or exits non-zero
    fn run(&self, program: &str, args: &[String]) -> Result<()>;
}

/// Split a configured argv list into program and arguments
pub fn split_command(argv: &[String]) -> Result<(&str, &[String])> {
    match argv.split_first() {
        Some((program, args)) => Ok((program.as_str(), args)),
        None => Err(ReleaseError::config("Configured command is empty")),
    }
}

/// Real command runner using `std::process`
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn is_available(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }

    fn run(&self, program: &str, args: &[String]) -> Result<()> {
        let status = Command::new(program).args(args).status().map_err(|e| {
            ReleaseError::command(format!("Failed to execute {}: {}", program, e))
        })?;

        if !status.success() {
            return Err(ReleaseError::command(format!(
                "{} exited with code {}",
                program,
                status.code().unwrap_or(-1)
            )));
        }

        Ok(())
    }
}

/// Recording runner for tests
///
/// Every program is available unless marked missing; every invocation
/// succeeds unless the program is marked failing. Invocations are recorded in
/// the journal, which can be shared with a [crate::git::MockRepository].
pub struct MockRunner {
    missing: Mutex<Vec<String>>,
    failing: Mutex<Vec<String>>,
    journal: Journal,
}

impl MockRunner {
    /// Create a runner where every command is available and succeeds
    pub fn new() -> Self {
        MockRunner {
            missing: Mutex::new(Vec::new()),
            failing: Mutex::new(Vec::new()),
            journal: crate::git::mock::new_journal(),
        }
    }

    /// Use a shared journal so ordering can be asserted across mocks
    pub fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = journal;
        self
    }

    /// Mark a program as absent from PATH
    pub fn mark_missing(&mut self, program: impl Into<String>) {
        self.missing.lock().unwrap().push(program.into());
    }

    /// Make invocations of a program exit non-zero
    pub fn mark_failing(&mut self, program: impl Into<String>) {
        self.failing.lock().unwrap().push(program.into());
    }

    /// Snapshot of the recorded invocations
    pub fn journal_entries(&self) -> Vec<String> {
        self.journal.lock().unwrap().clone()
    }
}

impl Default for MockRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner for MockRunner {
    fn is_available(&self, program: &str) -> bool {
        !self.missing.lock().unwrap().iter().any(|p| p == program)
    }

    fn run(&self, program: &str, args: &[String]) -> Result<()> {
        if self.failing.lock().unwrap().iter().any(|p| p == program) {
            return Err(ReleaseError::command(format!(
                "{} exited with code 1",
                program
            )));
        }

        self.journal
            .lock()
            .unwrap()
            .push(format!("run {} {}", program, args.join(" ")));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_command() {
        let argv = vec!["uv".to_string(), "lock".to_string()];
        let (program, args) = split_command(&argv).unwrap();
        assert_eq!(program, "uv");
        assert_eq!(args, &["lock".to_string()]);
    }

    #[test]
    fn test_split_command_empty() {
        let result = split_command(&[]);
        assert!(result.unwrap_err().to_string().contains("empty"));
    }

    #[test]
    fn test_system_runner_missing_program() {
        let runner = SystemRunner;
        assert!(!runner.is_available("definitely-not-a-real-program-xyz"));

        let result = runner.run("definitely-not-a-real-program-xyz", &[]);
        assert!(result.is_err());
    }

    #[test]
    fn test_system_runner_nonzero_exit() {
        let runner = SystemRunner;
        let result = runner.run("false", &[]);
        assert!(result.unwrap_err().to_string().contains("exited with code"));
    }

    #[test]
    fn test_mock_runner_records_invocations() {
        let runner = MockRunner::new();
        runner
            .run("uv", &["lock".to_string()])
            .unwrap();

        assert_eq!(runner.journal_entries(), vec!["run uv lock"]);
    }

    #[test]
    fn test_mock_runner_failure_injection() {
        let mut runner = MockRunner::new();
        runner.mark_failing("reflex");

        assert!(runner.run("reflex", &[]).is_err());
        assert!(runner.journal_entries().is_empty());
    }

    #[test]
    fn test_mock_runner_missing_program() {
        let mut runner = MockRunner::new();
        runner.mark_missing("uv");

        assert!(!runner.is_available("uv"));
        assert!(runner.is_available("reflex"));
    }
}
