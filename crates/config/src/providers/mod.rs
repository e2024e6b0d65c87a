//! Config providers that adapt `waveportal.toml` to figment profiles.

use figment::{
    Error, Metadata, Profile, Provider,
    providers::{Env, Format, Toml},
    value::{Dict, Map, Value},
};
use std::path::{Path, PathBuf};

/// A convenience provider to retrieve a toml file.
///
/// Returns an error if the env var is set but the file does not exist. A missing default file is
/// treated as empty.
pub(crate) struct TomlFileProvider {
    pub env_var: Option<&'static str>,
    pub default: PathBuf,
}

impl TomlFileProvider {
    pub(crate) fn new(env_var: Option<&'static str>, default: impl Into<PathBuf>) -> Self {
        Self { env_var, default: default.into() }
    }

    fn env_val(&self) -> Option<String> {
        self.env_var.and_then(Env::var)
    }

    fn file(&self) -> PathBuf {
        self.env_val().map(PathBuf::from).unwrap_or_else(|| self.default.clone())
    }
}

impl Provider for TomlFileProvider {
    fn metadata(&self) -> Metadata {
        Toml::file(self.file()).nested().metadata()
    }

    fn data(&self) -> Result<Map<Profile, Dict>, Error> {
        use serde::de::Error as _;
        if let (Some(file), Some(var)) = (self.env_val(), self.env_var)
            && !Path::new(&file).exists()
        {
            return Err(Error::custom(format!(
                "Config file `{file}` set in env var `{var}` does not exist"
            )));
        }
        Toml::file(self.file()).nested().data()
    }
}

/// Unwraps the `[profile.<name>]` tables of a nested toml provider into figment profiles.
pub(crate) struct UnwrapProfileProvider<P> {
    provider: P,
    wrapping_key: Profile,
}

impl<P> UnwrapProfileProvider<P> {
    pub(crate) fn new(provider: P, wrapping_key: impl Into<Profile>) -> Self {
        Self { provider, wrapping_key: wrapping_key.into() }
    }
}

impl<P: Provider> Provider for UnwrapProfileProvider<P> {
    fn metadata(&self) -> Metadata {
        self.provider.metadata()
    }

    fn data(&self) -> Result<Map<Profile, Dict>, Error> {
        use serde::de::Error as _;
        let mut map = Map::new();
        let Some(profiles) = self.provider.data()?.remove(&self.wrapping_key) else {
            return Ok(map);
        };
        for (name, value) in profiles {
            let Value::Dict(_, dict) = value else {
                return Err(Error::custom(format!(
                    "expected a table for `[{}.{name}]`",
                    self.wrapping_key
                )));
            };
            map.insert(Profile::new(&name), dict);
        }
        Ok(map)
    }
}
