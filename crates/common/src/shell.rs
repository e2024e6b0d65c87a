//! Terminal output for user-facing messages.
//!
//! Diagnostics go through `tracing`; everything meant for the user goes through the global
//! [`Shell`], usually via the `sh_*` macros.

use clap::ValueEnum;
use parking_lot::{Mutex, MutexGuard};
use std::{
    fmt,
    io::{self, Write},
    sync::OnceLock,
};
use yansi::Paint;

static GLOBAL_SHELL: OnceLock<Mutex<Shell>> = OnceLock::new();

/// Whether to color output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Color only when writing to a terminal.
    #[default]
    Auto,
    /// Always color.
    Always,
    /// Never color.
    Never,
}

/// How much to print.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    /// Only errors.
    Quiet,
    /// Regular output.
    #[default]
    Normal,
    /// Everything, including progress notes.
    Verbose,
}

/// The global output sink.
#[derive(Debug, Default)]
pub struct Shell {
    color: ColorChoice,
    verbosity: Verbosity,
}

impl Shell {
    /// Creates a shell with the default color choice and verbosity.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a shell with the given color choice and verbosity.
    pub fn new_with(color: ColorChoice, verbosity: Verbosity) -> Self {
        Self { color, verbosity }
    }

    /// Locks and returns the global shell, initializing it on first use.
    pub fn get() -> MutexGuard<'static, Self> {
        GLOBAL_SHELL.get_or_init(|| Mutex::new(Self::new())).lock()
    }

    /// Installs this shell as the global one.
    pub fn set(self) {
        match self.color {
            ColorChoice::Always => yansi::enable(),
            ColorChoice::Never => yansi::disable(),
            ColorChoice::Auto => {}
        }
        *Self::get() = self;
    }

    /// The configured verbosity.
    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// The configured color choice.
    pub fn color_choice(&self) -> ColorChoice {
        self.color
    }

    /// Returns `true` if only errors are printed.
    pub fn is_quiet(&self) -> bool {
        self.verbosity == Verbosity::Quiet
    }

    /// Returns `true` if progress notes are printed.
    pub fn is_verbose(&self) -> bool {
        self.verbosity == Verbosity::Verbose
    }

    /// Writes to stdout unless quiet.
    pub fn print_out(&mut self, args: fmt::Arguments<'_>) -> io::Result<()> {
        if self.is_quiet() {
            return Ok(());
        }
        let mut stdout = io::stdout().lock();
        stdout.write_fmt(args)?;
        stdout.flush()
    }

    /// Writes a progress note to stderr, only when verbose.
    pub fn note(&mut self, args: fmt::Arguments<'_>) -> io::Result<()> {
        if !self.is_verbose() {
            return Ok(());
        }
        writeln!(io::stderr().lock(), "{args}")
    }

    /// Writes a warning to stderr unless quiet.
    pub fn warn(&mut self, args: fmt::Arguments<'_>) -> io::Result<()> {
        if self.is_quiet() {
            return Ok(());
        }
        writeln!(io::stderr().lock(), "{}: {args}", "Warning".yellow().bold())
    }

    /// Writes an error to stderr. Errors are printed regardless of verbosity.
    pub fn error(&mut self, args: fmt::Arguments<'_>) -> io::Result<()> {
        writeln!(io::stderr().lock(), "{}: {args}", "Error".red().bold())
    }
}
