//! Output formatting
//!
//! Status lines for the user and the global quiet / JSON switches. Child
//! process output does not go through here, see [`crate::infra::executor`].

use std::sync::atomic::{AtomicBool, Ordering};

use crossterm::style::Stylize;

static QUIET: AtomicBool = AtomicBool::new(false);
static JSON: AtomicBool = AtomicBool::new(false);

/// Status message prefixes
pub mod status {
    /// Success prefix (green checkmark)
    pub const SUCCESS: &str = "✓";

    /// Error prefix (red X)
    pub const ERROR: &str = "✗";

    /// Warning prefix (yellow triangle)
    pub const WARNING: &str = "⚠";

    /// Info prefix (blue circle)
    pub const INFO: &str = "ℹ";
}

/// Output switches taken from the global flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputConfig {
    pub quiet: bool,
    pub json: bool,
    pub verbose: u8,
}

impl OutputConfig {
    pub fn new(quiet: bool, json: bool, verbose: u8) -> Self {
        Self {
            quiet,
            json,
            verbose,
        }
    }

    /// Make the switches visible to the print helpers
    pub fn apply_global(self) {
        QUIET.store(self.quiet, Ordering::Relaxed);
        JSON.store(self.json, Ordering::Relaxed);
    }

    /// Default log filter when `RUST_LOG` is unset
    pub fn log_directive(self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}

/// Whether `--quiet` was given
pub fn is_quiet() -> bool {
    QUIET.load(Ordering::Relaxed)
}

/// Whether `--json` was given
pub fn is_json() -> bool {
    JSON.load(Ordering::Relaxed)
}

fn human_output() -> bool {
    !is_quiet() && !is_json()
}

pub fn print_success(message: &str) {
    if human_output() {
        println!("{} {message}", status::SUCCESS.green());
    }
}

pub fn print_info(message: &str) {
    if human_output() {
        println!("{} {message}", status::INFO.blue());
    }
}

pub fn print_warning(message: &str) {
    if !is_quiet() {
        eprintln!("{} {message}", status::WARNING.yellow());
    }
}

/// Indented detail line under a status message
pub fn print_detail(message: &str) {
    if human_output() {
        println!("  {message}");
    }
}

/// Print a fatal error and its causes to stderr
pub fn display_error(error: &anyhow::Error) {
    eprintln!("{} {error}", status::ERROR.red());
    for cause in error.chain().skip(1) {
        eprintln!("  caused by: {cause}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_directive() {
        assert_eq!(OutputConfig::new(false, false, 0).log_directive(), "warn");
        assert_eq!(OutputConfig::new(false, false, 1).log_directive(), "info");
        assert_eq!(OutputConfig::new(false, false, 3).log_directive(), "debug");
        assert_eq!(OutputConfig::new(true, false, 2).log_directive(), "error");
    }
}
