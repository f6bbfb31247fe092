//! Shared helper functions for CLI commands

use console::style;
use std::fmt::Display;

/// Outcome of a per-item loop (one repo, one student, ...)
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub succeeded: Vec<String>,
    pub failed: Vec<(String, String)>,
    pub skipped: Vec<String>,
}

impl BatchReport {
    pub fn ok(&mut self, item: &str, message: impl Display) {
        println!("{} {}", style("✓").green(), message);
        self.succeeded.push(item.to_string());
    }

    /// Record a failure and keep going
    pub fn fail(&mut self, item: &str, message: impl Display, error: impl Display) {
        let error = error.to_string();
        tracing::debug!(item, %error, "operation failed");
        println!("{} {}: {}", style("✗").red(), message, error);
        self.failed.push((item.to_string(), error));
    }

    /// Record an item that needed no action
    pub fn skip(&mut self, item: &str, message: impl Display) {
        println!("{} {}", style("-").dim(), message);
        self.skipped.push(item.to_string());
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    /// One-line summary, e.g. "3 succeeded, 1 failed"
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "{} succeeded, {} failed",
            self.succeeded.len(),
            self.failed.len()
        );
        if !self.skipped.is_empty() {
            summary.push_str(&format!(", {} skipped", self.skipped.len()));
        }
        summary
    }

    pub fn is_empty(&self) -> bool {
        self.succeeded.is_empty() && self.failed.is_empty() && self.skipped.is_empty()
    }
}

/// Render a list for prompts: `[alice, bob]`
pub fn format_list(items: &[String]) -> String {
    format!("[{}]", items.join(", "))
}

/// Print a heading line in the same style across commands
pub fn print_heading(text: &str) {
    println!("{}", style(text).bold());
}
