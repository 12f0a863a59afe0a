//! External command execution layer.
//!
//! The [Runner] trait abstracts every shelled-out toolchain call (fastlane,
//! agvtool, xcodebuild) so that pipelines can be exercised in tests without
//! touching the real tools:
//!
//! - [shell::ShellRunner]: real implementation via `sh -c`
//! - [mock::MockRunner]: test implementation recording invocations
//!
//! Calls block until the external process exits; no timeout is imposed, so a
//! hung tool hangs the pipeline. Release correctness depends on strict
//! sequential ordering of these calls.

pub mod mock;
pub mod shell;

pub use mock::MockRunner;
pub use shell::ShellRunner;

use crate::error::Result;

/// Captured result of a query command; callers interpret success themselves.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandOutput {
    pub success: bool,
    pub code: i32,
    pub stdout: String,
}

/// Executor for external toolchain commands.
///
/// Every implementation must log the full invocation string before running
/// the command. Effecting steps use [Runner::run] or [Runner::run_live] where
/// a non-zero exit is an error; read-only queries use [Runner::capture] and
/// interpret the output themselves (a legitimately empty result set is not a
/// failure).
pub trait Runner {
    /// Run silently. Combined stdout/stderr goes to the build log file,
    /// overwritten on each invocation. Non-zero exit is
    /// [crate::error::AppshipError::CommandFailed] naming that log file.
    fn run(&self, command: &str) -> Result<()>;

    /// Run with output streamed live to the terminal. Used for long-running
    /// uploads where the operator wants real-time feedback. Non-zero exit is
    /// an error.
    fn run_live(&self, command: &str) -> Result<()>;

    /// Run silently and capture stdout for parsing. The exit status is
    /// reported, not raised.
    fn capture(&self, command: &str) -> Result<CommandOutput>;
}
