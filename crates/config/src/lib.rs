//! # waveportal-config
//!
//! WavePortal client configuration.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

#[macro_use]
extern crate tracing;

use alloy_primitives::{Address, address};
use figment::{
    Figment, Metadata, Profile, Provider,
    providers::{Env, Serialized},
    value::{Dict, Map},
};
use serde::{Deserialize, Serialize};
use std::{path::Path, time::Duration};

pub mod error;
pub use error::ExtractConfigError;

mod providers;
use providers::{TomlFileProvider, UnwrapProfileProvider};

// reexport so cli types can implement `figment::Provider` to merge their arguments
pub use figment;

/// WavePortal configuration
///
/// # Defaults
///
/// All configuration values have a default, documented on the fields below.
/// [`Config::default()`] returns the default values for the default profile, while
/// [`Config::load()`] starts from those and merges `waveportal.toml` and the environment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// The selected profile. **(default: _default_ `default`)**
    ///
    /// **Note:** This field is never serialized nor deserialized. When a
    /// `Config` is merged into a `Figment` as a `Provider`, this profile is
    /// selected on the `Figment`. When a `Config` is extracted, this field is
    /// set to the extracting Figment's selected `Profile`.
    #[serde(skip)]
    pub profile: Profile,
    /// JSON-RPC endpoint of the wallet. `None` means no wallet provider is present.
    pub rpc_url: Option<String>,
    /// Address of the deployed WavePortal contract.
    pub contract: Address,
    /// Gas limit ceiling for `wave` transactions.
    pub gas_limit: u64,
    /// Minimum number of characters a wave message must have.
    pub min_message_len: usize,
    /// Poll interval for event filters and pending transactions, in milliseconds.
    pub poll_interval: u64,
    /// Poll interval for wallet account changes, in milliseconds.
    pub account_poll_interval: u64,
}

impl Config {
    /// The default profile: "default"
    pub const DEFAULT_PROFILE: Profile = Profile::Default;

    /// The name of the config file.
    pub const FILE_NAME: &'static str = "waveportal.toml";

    /// Env var that overrides the config file path.
    pub const CONFIG_ENV: &'static str = "WAVEPORTAL_CONFIG";

    /// Env var that selects the profile.
    pub const PROFILE_ENV: &'static str = "WAVEPORTAL_PROFILE";

    /// Prefix of env vars that override config values.
    pub const ENV_PREFIX: &'static str = "WAVEPORTAL_";

    /// The WavePortal deployment the client talks to by default.
    ///
    /// `0xFABECAB1F554B4eFD0D3E399760665eD518056bC`
    pub const DEFAULT_CONTRACT: Address = address!("0xFABECAB1F554B4eFD0D3E399760665eD518056bC");

    /// Default gas limit ceiling for `wave` transactions.
    pub const DEFAULT_GAS_LIMIT: u64 = 300_000;

    /// Messages shorter than this are rejected client-side.
    pub const DEFAULT_MIN_MESSAGE_LEN: usize = 4;

    /// Returns the current `Config`, reading `waveportal.toml` from the current directory.
    pub fn load() -> Result<Self, ExtractConfigError> {
        Self::try_from(Self::figment())
    }

    /// Returns the current `Config`, reading `waveportal.toml` from `root`.
    pub fn load_with_root(root: impl AsRef<Path>) -> Result<Self, ExtractConfigError> {
        Self::try_from(Self::figment_with_root(root))
    }

    /// Attempts to extract a `Config` from `provider`, returning the result.
    ///
    /// # Example
    ///
    /// ```rust
    /// use figment::providers::{Format, Toml};
    /// use waveportal_config::Config;
    ///
    /// // Use the default `Figment`, but allow values from `other.toml` to supersede its values.
    /// let figment = Config::figment().merge(Toml::file("other.toml").nested());
    ///
    /// let config = Config::try_from(figment);
    /// ```
    pub fn try_from<T: Provider>(provider: T) -> Result<Self, ExtractConfigError> {
        trace!("load config with provider: {:?}", provider.metadata());
        let figment = Figment::from(provider);
        let mut config = figment.extract::<Self>().map_err(ExtractConfigError::new)?;
        config.profile = figment.profile().clone();
        Ok(config)
    }

    /// The default figment, rooted at the current directory.
    ///
    /// Reads from the following sources, in ascending priority order:
    ///
    ///   1. [`Config::default()`]
    ///   2. `waveportal.toml` _or_ the file named by `WAVEPORTAL_CONFIG`
    ///   3. `WAVEPORTAL_` prefixed environment variables
    ///
    /// The profile selected is the value set in `WAVEPORTAL_PROFILE`, `default` otherwise.
    pub fn figment() -> Figment {
        Self::figment_with_root(".")
    }

    /// Same as [`Config::figment`] but reads `waveportal.toml` from `root`.
    pub fn figment_with_root(root: impl AsRef<Path>) -> Figment {
        Self::default().to_figment(root.as_ref())
    }

    fn to_figment(self, root: &Path) -> Figment {
        let profile = Self::selected_profile();
        let toml = UnwrapProfileProvider::new(
            TomlFileProvider::new(Some(Self::CONFIG_ENV), root.join(Self::FILE_NAME)),
            "profile",
        );
        Figment::from(self)
            .merge(toml)
            .merge(Env::prefixed(Self::ENV_PREFIX).ignore(&["PROFILE", "CONFIG"]).global())
            .select(profile)
    }

    /// Returns the selected profile.
    ///
    /// If the `WAVEPORTAL_PROFILE` env variable is not set, this returns the `DEFAULT_PROFILE`.
    pub fn selected_profile() -> Profile {
        Profile::from_env_or(Self::PROFILE_ENV, Self::DEFAULT_PROFILE)
    }

    /// Returns `true` if a wallet endpoint is configured.
    pub fn has_wallet(&self) -> bool {
        self.rpc_url.as_deref().is_some_and(|url| !url.trim().is_empty())
    }

    /// The event filter and pending transaction poll interval.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval)
    }

    /// The wallet account poll interval.
    pub fn account_poll_interval(&self) -> Duration {
        Duration::from_millis(self.account_poll_interval)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            profile: Self::DEFAULT_PROFILE,
            rpc_url: None,
            contract: Self::DEFAULT_CONTRACT,
            gas_limit: Self::DEFAULT_GAS_LIMIT,
            min_message_len: Self::DEFAULT_MIN_MESSAGE_LEN,
            poll_interval: 1_000,
            account_poll_interval: 2_000,
        }
    }
}

impl Provider for Config {
    fn metadata(&self) -> Metadata {
        Metadata::named("WavePortal Config")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, figment::Error> {
        let mut data = Serialized::defaults(self).data()?;
        if let Some(dict) = data.remove(&Profile::Default) {
            data.insert(self.profile.clone(), dict);
        }
        Ok(data)
    }

    fn profile(&self) -> Option<Profile> {
        Some(self.profile.clone())
    }
}
