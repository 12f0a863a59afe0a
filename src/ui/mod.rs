//! User interface module - interactive prompts and formatting.

use std::io::{self, Write};

pub mod formatter;

pub use formatter::{display_error, display_help, display_status, display_success, display_warning};

use crate::error::Result;
use crate::reconcile::VersionPrompt;
use crate::version::Version;

/// Interactive prompt reading the next marketing version from stdin.
pub struct ConsolePrompt;

impl VersionPrompt for ConsolePrompt {
    fn next_version(&self, local: &Version, remote: &Version) -> Result<Version> {
        println!(
            "\nVersion {} is already published (local is {}). A new marketing version is required.",
            remote, local
        );
        print!("Next version: ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        // Malformed input aborts reconciliation; no guessing.
        Version::parse(input.trim())
    }
}
