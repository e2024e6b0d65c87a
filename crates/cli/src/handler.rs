use eyre::EyreHandler;
use itertools::Itertools;
use std::{error::Error, fmt, panic::Location};
use waveportal_common::errors::dedup_chain;

/// Env var that hands `Debug` reports to `color-eyre`, with backtraces.
pub const DEBUG_ENV: &str = "WAVEPORTAL_DEBUG";

/// Error reports of the `wave` binary.
///
/// `Display` prints the deduplicated cause chain on one line, `Debug` prints the error followed
/// by a numbered list of its causes.
pub struct Handler {
    verbose: Option<Box<dyn EyreHandler>>,
}

impl Handler {
    /// Creates a handler. `verbose` takes over `Debug` reports if set.
    pub fn new(verbose: Option<Box<dyn EyreHandler>>) -> Self {
        Self { verbose }
    }
}

impl EyreHandler for Handler {
    fn display(&self, error: &(dyn Error + 'static), f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&dedup_chain(error).into_iter().format("; "), f)
    }

    fn debug(&self, error: &(dyn Error + 'static), f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(verbose) = &self.verbose {
            return verbose.debug(error, f);
        }
        if f.alternate() {
            return fmt::Debug::fmt(error, f);
        }

        let mut causes = dedup_chain(error).into_iter();
        let Some(head) = causes.next() else { return fmt::Display::fmt(error, f) };
        f.write_str(&head)?;
        for (n, cause) in causes.enumerate() {
            if n == 0 {
                f.write_str("\n\nCaused by:")?;
            }
            write!(f, "\n  {n}: {cause}")?;
        }
        Ok(())
    }

    fn track_caller(&mut self, location: &'static Location<'static>) {
        if let Some(verbose) = &mut self.verbose {
            verbose.track_caller(location);
        }
    }
}

/// Installs the panic hook and the [`eyre`] report hook of the `wave` binary.
///
/// Panics always get the `color-eyre` report. Errors get the short [`Handler`] report unless
/// `WAVEPORTAL_DEBUG` is set.
pub fn install() {
    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default()
        .display_env_section(false)
        .panic_section("This is a bug in the wave CLI, please report it.")
        .into_hooks();
    panic_hook.install();

    let eyre_hook = eyre_hook.into_eyre_hook();
    let verbose = std::env::var_os(DEBUG_ENV).is_some();
    let hook = move |error: &(dyn Error + 'static)| -> Box<dyn EyreHandler> {
        Box::new(Handler::new(verbose.then(|| eyre_hook(error))))
    };
    if let Err(err) = eyre::set_hook(Box::new(hook)) {
        debug!(%err, "eyre hook already installed");
    }
}
