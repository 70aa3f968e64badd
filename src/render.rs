//! Terminal output for the chat front end.
//!
//! This module provides the renderer trait the binary reports through and a
//! plain-text implementation with optional ANSI styling.

use std::io::{self, Write};
use std::path::Path;

use crate::types::RequestStatus;

/// ANSI escape code for dim text (used for status lines).
const ANSI_DIM: &str = "\x1b[2m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// ANSI escape code for green text (used for exported replies).
const ANSI_GREEN: &str = "\x1b[32m";

/// ANSI escape code for red text (used for errors).
const ANSI_RED: &str = "\x1b[31m";

/// Output sink for the interaction controller's user feedback.
///
/// Methods take `&self` because submissions finish on background tasks and
/// report concurrently.
pub trait Renderer: Send + Sync {
    /// Displays the request status. An idle status prints nothing.
    fn print_status(&self, status: &RequestStatus);

    /// Displays a reply and where its document was written.
    fn print_reply(&self, text: &str, path: &Path);

    /// Displays an error message.
    fn print_error(&self, error: &str);

    /// Displays an informational message.
    fn print_info(&self, info: &str);
}

/// Plain text renderer with optional ANSI styling.
#[derive(Debug, Clone)]
pub struct PlainTextRenderer {
    use_color: bool,
}

impl PlainTextRenderer {
    /// Creates a new PlainTextRenderer with ANSI colors enabled.
    pub fn new() -> Self {
        Self { use_color: true }
    }

    /// Creates a new PlainTextRenderer with specified color setting.
    pub fn with_color(use_color: bool) -> Self {
        Self { use_color }
    }

    fn styled(&self, style: &str, text: &str) -> String {
        if self.use_color {
            format!("{style}{text}{ANSI_RESET}")
        } else {
            text.to_string()
        }
    }

    fn write_line(&self, line: &str) {
        let mut stdout = io::stdout().lock();
        let _ = writeln!(stdout, "{line}");
        let _ = stdout.flush();
    }
}

impl Default for PlainTextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for PlainTextRenderer {
    fn print_status(&self, status: &RequestStatus) {
        match status {
            RequestStatus::Idle => {}
            RequestStatus::Sent => self.write_line(&self.styled(ANSI_DIM, &status.to_string())),
            RequestStatus::Failed(_) => self.print_error(&status.to_string()),
        }
    }

    fn print_reply(&self, text: &str, path: &Path) {
        self.write_line(text);
        self.write_line(&self.styled(ANSI_GREEN, &format!("[saved {}]", path.display())));
    }

    fn print_error(&self, error: &str) {
        let line = self.styled(ANSI_RED, &format!("Error: {error}"));
        let mut stderr = io::stderr().lock();
        let _ = writeln!(stderr, "{line}");
    }

    fn print_info(&self, info: &str) {
        self.write_line(info);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renderer_default_has_color() {
        let renderer = PlainTextRenderer::new();
        assert!(renderer.use_color);
        assert_eq!(renderer.styled(ANSI_DIM, "x"), "\x1b[2mx\x1b[0m");
    }

    #[test]
    fn renderer_without_color() {
        let renderer = PlainTextRenderer::with_color(false);
        assert!(!renderer.use_color);
        assert_eq!(renderer.styled(ANSI_RED, "plain"), "plain");
    }
}
