use std::path::Path;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use waveportal_config::{Config, ExtractConfigError};

/// Loads a [`Config`] layered with command line options.
pub trait LoadConfig {
    fn load_config(&self) -> Result<Config, ExtractConfigError>;
}

/// Initializes a tracing subscriber for logging to stderr.
///
/// `RUST_LOG` takes precedence. Otherwise nothing is logged, or lifecycle events at `info` when
/// `verbose` is set.
pub fn subscriber(verbose: bool) {
    let fallback = if verbose { "waveportal=info,waveportal_wallets=info" } else { "off" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

/// Loads the `.env` file of the current directory, if there is one.
///
/// Values already set in the environment are not overridden.
pub fn load_dotenv() {
    let Ok(cwd) = std::env::current_dir() else { return };
    load_dotenv_from(&cwd);
}

fn load_dotenv_from(dir: &Path) {
    let path = dir.join(".env");
    match dotenvy::from_path(&path) {
        Ok(()) => trace!(path = %path.display(), "loaded .env"),
        Err(err) if err.not_found() => {}
        Err(err) => debug!(%err, path = %path.display(), "failed to load .env"),
    }
}
