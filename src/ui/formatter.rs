//! Pure formatting functions for UI output.
//!
//! All display logic lives here, separated from interactive prompts.

use console::style;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Format and print a non-fatal warning.
pub fn display_warning(message: &str) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), message);
}

/// Display the help listing of all actions with their one-line descriptions.
pub fn display_help(actions: &[(&str, &str)]) {
    println!("{}", style("Available actions:").bold());
    for (name, description) in actions {
        println!("  {} {}", style(format!("{:<22}", name)).cyan(), description);
    }
}
