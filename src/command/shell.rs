use std::fs;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::command::{CommandOutput, Runner};
use crate::error::{AppshipError, Result};
use crate::ui::formatter::display_status;

/// Real command runner executing through `sh -c`.
///
/// Silent commands get their combined output written to one build log file,
/// overwritten per invocation, so a failure can always point the operator at
/// the full output of the command that broke.
pub struct ShellRunner {
    log_path: PathBuf,
}

impl ShellRunner {
    pub fn new(log_path: impl Into<PathBuf>) -> Self {
        ShellRunner {
            log_path: log_path.into(),
        }
    }

    fn spawn_captured(&self, command: &str) -> Result<std::process::Output> {
        Ok(Command::new("sh").arg("-c").arg(command).output()?)
    }

    fn write_log(&self, output: &std::process::Output) -> Result<()> {
        let mut combined = Vec::with_capacity(output.stdout.len() + output.stderr.len());
        combined.extend_from_slice(&output.stdout);
        combined.extend_from_slice(&output.stderr);
        fs::write(&self.log_path, combined)?;
        Ok(())
    }
}

impl Runner for ShellRunner {
    fn run(&self, command: &str) -> Result<()> {
        display_status(command);

        let output = self.spawn_captured(command)?;
        self.write_log(&output)?;

        if !output.status.success() {
            return Err(AppshipError::CommandFailed {
                command: command.to_string(),
                code: output.status.code().unwrap_or(-1),
                log: self.log_path.clone(),
            });
        }
        Ok(())
    }

    fn run_live(&self, command: &str) -> Result<()> {
        display_status(command);

        let status = Command::new("sh")
            .arg("-c")
            .arg(command)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()?;

        if !status.success() {
            return Err(AppshipError::CommandFailed {
                command: command.to_string(),
                code: status.code().unwrap_or(-1),
                log: self.log_path.clone(),
            });
        }
        Ok(())
    }

    fn capture(&self, command: &str) -> Result<CommandOutput> {
        display_status(command);

        let output = self.spawn_captured(command)?;
        self.write_log(&output)?;

        Ok(CommandOutput {
            success: output.status.success(),
            code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        })
    }
}
