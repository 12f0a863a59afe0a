//! Local project version state.
//!
//! The marketing version and build number live in the build system's own
//! version tracking (agvtool for Xcode projects); this module only consumes
//! get/set operations, never the storage format.

use std::cell::RefCell;

use crate::command::Runner;
use crate::error::{AppshipError, Result};

/// Accessor for the local project's marketing version and build number.
pub trait ProjectState {
    fn marketing_version(&self) -> Result<String>;

    fn build_number(&self) -> Result<u32>;

    fn set_build_number(&self, number: u32) -> Result<()>;

    fn set_marketing_version(&self, version: &str) -> Result<()>;
}

/// Xcode project state driven through agvtool.
pub struct XcodeProject<'a> {
    runner: &'a dyn Runner,
}

impl<'a> XcodeProject<'a> {
    pub fn new(runner: &'a dyn Runner) -> Self {
        XcodeProject { runner }
    }

    fn capture_terse(&self, command: &str) -> Result<String> {
        let output = self.runner.capture(command)?;
        if !output.success {
            return Err(AppshipError::CommandFailed {
                command: command.to_string(),
                code: output.code,
                log: std::path::PathBuf::from("command.log"),
            });
        }
        Ok(output.stdout)
    }
}

/// agvtool's terse marketing-version output ends each line with
/// `...=<version>`; take the value after the last `=` of the first line.
fn parse_terse_value(output: &str) -> Option<String> {
    let line = output.lines().next()?;
    let value = match line.rfind('=') {
        Some(idx) => &line[idx + 1..],
        None => line,
    };
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

impl ProjectState for XcodeProject<'_> {
    fn marketing_version(&self) -> Result<String> {
        let output = self.capture_terse("agvtool what-marketing-version -terse")?;
        parse_terse_value(&output)
            .ok_or_else(|| AppshipError::version("agvtool returned no marketing version"))
    }

    fn build_number(&self) -> Result<u32> {
        let output = self.capture_terse("agvtool what-version -terse")?;
        let value = parse_terse_value(&output)
            .ok_or_else(|| AppshipError::version("agvtool returned no build number"))?;
        value
            .parse::<u32>()
            .map_err(|_| AppshipError::version(format!("invalid build number: {}", value)))
    }

    fn set_build_number(&self, number: u32) -> Result<()> {
        self.runner
            .run(&format!("agvtool new-version -all {}", number))
    }

    fn set_marketing_version(&self, version: &str) -> Result<()> {
        self.runner
            .run(&format!("agvtool new-marketing-version {}", version))
    }
}

/// Mock project state for testing reconciliation and pipelines.
pub struct MockProject {
    version: RefCell<String>,
    build: RefCell<u32>,
}

impl MockProject {
    pub fn new(version: impl Into<String>, build: u32) -> Self {
        MockProject {
            version: RefCell::new(version.into()),
            build: RefCell::new(build),
        }
    }

    pub fn current_version(&self) -> String {
        self.version.borrow().clone()
    }

    pub fn current_build(&self) -> u32 {
        *self.build.borrow()
    }
}

impl ProjectState for MockProject {
    fn marketing_version(&self) -> Result<String> {
        Ok(self.version.borrow().clone())
    }

    fn build_number(&self) -> Result<u32> {
        Ok(*self.build.borrow())
    }

    fn set_build_number(&self, number: u32) -> Result<()> {
        *self.build.borrow_mut() = number;
        Ok(())
    }

    fn set_marketing_version(&self, version: &str) -> Result<()> {
        *self.version.borrow_mut() = version.to_string();
        Ok(())
    }
}
