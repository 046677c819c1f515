//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically. Command echoes
//! and document paths are plain data and go through the caller's writer
//! instead.

use std::path::Path;

use colored::Colorize;

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print warning (yellow "Warning:" prefix) to stderr
pub fn warning(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

/// Print a labelled path with a presence marker (green ✓ / red ✗)
pub fn path_status(label: &str, path: &Path) {
    let marker = if path.exists() {
        "✓".green()
    } else {
        "✗".red()
    };
    println!("  {} {:<8} {}", marker, label, path.display());
}

/// Print completed file write (green label)
pub fn written(label: &str, path: &Path) {
    println!("{}: {}", label.green(), path.display());
}

/// Print section header (cyan bold)
pub fn header(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}
