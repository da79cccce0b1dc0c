use crate::model::Issue;
use crate::reference;
use colored::Colorize;

/// `owner/repo#N` for display, or the raw path when it cannot be parsed.
pub fn display_reference(issue: &Issue) -> String {
    reference::full_reference(&issue.resource_path).unwrap_or_else(|_| issue.resource_path.clone())
}

pub fn print_warning(message: &str) {
    println!("{} {}", "WARNING:".yellow().bold(), message);
}

pub fn print_error(message: &str) {
    eprintln!("{} {}", "error:".red().bold(), message);
}
