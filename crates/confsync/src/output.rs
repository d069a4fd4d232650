//! Terminal output for the sync commands.

use console::{Style, Term};

/// Terminal reporter for sync progress and results.
///
/// Status lines go to stderr; the resolved page URL goes to stdout so
/// scripts can capture it (`url=$(confsync link doc.md)`).
pub struct Output {
    status: Term,
    result: Term,
    success: Style,
    warning: Style,
    error: Style,
    url: Style,
}

impl Output {
    /// Create a new reporter.
    #[must_use]
    pub fn new() -> Self {
        Self {
            status: Term::stderr(),
            result: Term::stdout(),
            success: Style::new().green(),
            warning: Style::new().yellow(),
            error: Style::new().red(),
            url: Style::new().cyan().bold(),
        }
    }

    /// Print a progress line.
    pub fn step(&self, msg: &str) {
        let _ = self.status.write_line(msg);
    }

    /// Print a success message (green).
    pub fn success(&self, msg: &str) {
        let _ = self
            .status
            .write_line(&self.success.apply_to(msg).to_string());
    }

    /// Print a warning message (yellow).
    pub fn warning(&self, msg: &str) {
        let _ = self
            .status
            .write_line(&self.warning.apply_to(msg).to_string());
    }

    /// Print an error message (red).
    pub fn error(&self, msg: &str) {
        let _ = self.status.write_line(&self.error.apply_to(msg).to_string());
    }

    /// Print a resolved page URL (cyan bold, stdout).
    pub fn page_url(&self, url: &str) {
        let _ = self.result.write_line(&self.url.apply_to(url).to_string());
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}
