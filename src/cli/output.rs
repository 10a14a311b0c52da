//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.
//! Results go to `out`, failures to `err`; both are plain writers so
//! command output can be captured in tests.

use std::io::{self, Stderr, Stdout, Write};

use colored::Colorize;

/// Output sink for commands: a stdout-like and a stderr-like writer.
pub struct Console<O: Write, E: Write> {
    out: O,
    err: E,
}

impl Console<Stdout, Stderr> {
    pub fn stdio() -> Self {
        Self::new(io::stdout(), io::stderr())
    }
}

impl<O: Write, E: Write> Console<O, E> {
    pub fn new(out: O, err: E) -> Self {
        Self { out, err }
    }

    pub fn into_inner(self) -> (O, E) {
        (self.out, self.err)
    }

    /// Print success status (green)
    pub fn success(&mut self, msg: &(impl std::fmt::Display + ?Sized)) {
        writeln!(self.out, "{}", msg.to_string().green()).ok();
    }

    /// Print `label: value` (no color, stays grep-able)
    pub fn field(&mut self, label: &str, value: &(impl std::fmt::Display + ?Sized)) {
        writeln!(self.out, "{}: {}", label, value).ok();
    }

    /// Print plain output (no color, for data)
    pub fn info(&mut self, msg: &(impl std::fmt::Display + ?Sized)) {
        writeln!(self.out, "{}", msg).ok();
    }

    /// Print error (red) to stderr
    pub fn error(&mut self, msg: &(impl std::fmt::Display + ?Sized)) {
        writeln!(self.err, "{}", msg.to_string().red()).ok();
    }
}
