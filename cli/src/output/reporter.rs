//! `TerminalReporter`: Presentation-layer implementation of `ProgressReporter`.
//!
//! Lets application services emit stage progress without depending on any
//! presentation type directly.

use owo_colors::OwoColorize as _;

use crate::application::ports::ProgressReporter;
use crate::output::OutputContext;

/// Terminal progress reporter that wraps an `OutputContext`.
///
/// Progress normally goes to stdout. In `--json` mode it goes to stderr so
/// stdout carries only the final document.
pub struct TerminalReporter<'a> {
    ctx: &'a OutputContext,
    stderr: bool,
}

impl<'a> TerminalReporter<'a> {
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx, stderr: false }
    }

    /// Reporter that writes to stderr.
    #[must_use]
    pub fn stderr(ctx: &'a OutputContext) -> Self {
        Self { ctx, stderr: true }
    }

    fn emit(&self, line: &str) {
        if self.stderr {
            eprintln!("{line}");
        } else {
            println!("{line}");
        }
    }
}

impl ProgressReporter for TerminalReporter<'_> {
    fn step(&self, message: &str) {
        if !self.ctx.quiet {
            self.emit(&format!("  {} {message}", "→".style(self.ctx.styles.step)));
        }
    }

    fn success(&self, message: &str) {
        if !self.ctx.quiet {
            self.emit(&format!("  {} {message}", "✓".style(self.ctx.styles.success)));
        }
    }

    fn warn(&self, message: &str) {
        if !self.ctx.quiet {
            self.emit(&format!("  {} {message}", "⚠".style(self.ctx.styles.warning)));
        }
    }
}
