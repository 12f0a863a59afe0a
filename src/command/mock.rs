use std::cell::RefCell;
use std::path::PathBuf;

use crate::command::{CommandOutput, Runner};
use crate::error::{AppshipError, Result};

/// Mock runner for testing pipelines without external tools.
///
/// Records every invocation in order. Commands containing a configured
/// failure substring fail; captures are answered from configured responses
/// matched by substring.
pub struct MockRunner {
    commands: RefCell<Vec<String>>,
    fail_on: Vec<String>,
    captures: Vec<(String, CommandOutput)>,
}

impl MockRunner {
    pub fn new() -> Self {
        MockRunner {
            commands: RefCell::new(Vec::new()),
            fail_on: Vec::new(),
            captures: Vec::new(),
        }
    }

    /// Make any command containing `substring` fail with exit code 1.
    pub fn fail_on(mut self, substring: impl Into<String>) -> Self {
        self.fail_on.push(substring.into());
        self
    }

    /// Answer captures of commands containing `substring` with `stdout`.
    pub fn capture_response(mut self, substring: impl Into<String>, stdout: impl Into<String>) -> Self {
        self.captures.push((
            substring.into(),
            CommandOutput {
                success: true,
                code: 0,
                stdout: stdout.into(),
            },
        ));
        self
    }

    /// Answer captures of commands containing `substring` with a failure.
    pub fn capture_failure(mut self, substring: impl Into<String>, stdout: impl Into<String>) -> Self {
        self.captures.push((
            substring.into(),
            CommandOutput {
                success: false,
                code: 1,
                stdout: stdout.into(),
            },
        ));
        self
    }

    /// All commands seen so far, in invocation order.
    pub fn invoked(&self) -> Vec<String> {
        self.commands.borrow().clone()
    }

    /// Whether any recorded command contains `substring`.
    pub fn saw(&self, substring: &str) -> bool {
        self.commands.borrow().iter().any(|c| c.contains(substring))
    }

    fn record(&self, command: &str) -> Result<()> {
        self.commands.borrow_mut().push(command.to_string());

        for needle in &self.fail_on {
            if command.contains(needle.as_str()) {
                return Err(AppshipError::CommandFailed {
                    command: command.to_string(),
                    code: 1,
                    log: PathBuf::from("command.log"),
                });
            }
        }
        Ok(())
    }
}

impl Default for MockRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl Runner for MockRunner {
    fn run(&self, command: &str) -> Result<()> {
        self.record(command)
    }

    fn run_live(&self, command: &str) -> Result<()> {
        self.record(command)
    }

    fn capture(&self, command: &str) -> Result<CommandOutput> {
        self.commands.borrow_mut().push(command.to_string());

        for (needle, response) in &self.captures {
            if command.contains(needle.as_str()) {
                return Ok(response.clone());
            }
        }

        Ok(CommandOutput {
            success: true,
            code: 0,
            stdout: String::new(),
        })
    }
}
