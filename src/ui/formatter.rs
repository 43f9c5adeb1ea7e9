//! Pure formatting functions for UI output.
//!
//! Everything the command prints goes through here so `main` stays free of
//! styling details.

use std::path::{Path, PathBuf};

use console::style;

use crate::boundary::BoundaryWarning;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Display a boundary warning to the user.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Shows the version change.
///
/// * If updating: "From: old -> To: new"
/// * If creating: "Created: new"
pub fn display_version_change(previous: Option<&str>, next: &str) {
    match previous {
        Some(previous) => {
            println!("\n{}", style("Version Change:").bold());
            println!("  From: {}", style(previous).red());
            println!("  To:   {}", style(next).green());
        }
        None => {
            println!("\n{}", style("Initial Version:").bold());
            println!("  New version: {}", style(next).green());
        }
    }
}

/// Lists files relative to `root` when possible.
pub fn format_file_list(root: &Path, files: &[PathBuf]) -> Vec<String> {
    files
        .iter()
        .map(|path| {
            path.strip_prefix(root)
                .unwrap_or(path)
                .display()
                .to_string()
        })
        .collect()
}

/// One-line summary of a tree pass, e.g. "Updated 2 of 14 files".
pub fn format_scan_summary(changed: usize, scanned: usize, dry_run: bool) -> String {
    let verb = if dry_run { "Would update" } else { "Updated" };
    let noun = if scanned == 1 { "file" } else { "files" };
    format!("{} {} of {} {}", verb, changed, scanned, noun)
}

/// Prints the files a rewrite touched, or would touch in a dry run.
pub fn display_updated_files(root: &Path, files: &[PathBuf], scanned: usize, dry_run: bool) {
    let summary = format_scan_summary(files.len(), scanned, dry_run);
    if files.is_empty() {
        println!("{}", style(summary).dim());
        return;
    }

    println!("{}", style(format!("{}:", summary)).underlined());
    for name in format_file_list(root, files) {
        println!("  - {}", name);
    }
}
