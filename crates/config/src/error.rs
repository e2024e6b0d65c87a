//! Config extraction errors.

use crate::Config;
use figment::{
    Profile, Source,
    providers::{Format, Toml},
};
use std::{error::Error, fmt};

/// A failed attempt to extract a [`Config`] from a `Figment`.
///
/// Displays every distinct problem once, with the place its value came from.
#[derive(Clone, Debug, PartialEq)]
pub struct ExtractConfigError {
    error: figment::Error,
}

impl ExtractConfigError {
    /// Wraps the figment error
    pub fn new(error: figment::Error) -> Self {
        Self { error }
    }

    /// The distinct problems, in the order they were reported.
    pub fn problems(&self) -> Vec<Problem> {
        let mut problems = Vec::<Problem>::with_capacity(self.error.count());
        for err in self.error.clone() {
            let problem = Problem::from(err);
            if !problems.contains(&problem) {
                problems.push(problem);
            }
        }
        problems
    }
}

impl fmt::Display for ExtractConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "failed to extract waveportal config:")?;
        for problem in self.problems() {
            writeln!(f, "  {problem}")?;
        }
        Ok(())
    }
}

impl Error for ExtractConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Error::source(&self.error)
    }
}

/// A single invalid setting, or a source that could not be read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Problem {
    /// Dotted setting name, like `gas_limit`. Empty when no setting is involved.
    pub setting: String,
    /// The file or env var the value came from, if known.
    pub origin: Option<String>,
    pub message: String,
}

impl From<figment::Error> for Problem {
    fn from(err: figment::Error) -> Self {
        let origin = err.metadata.as_ref().map(|meta| match &meta.source {
            Some(Source::File(path)) => path.display().to_string(),
            _ if meta.name.contains(Toml::NAME) => Config::FILE_NAME.to_string(),
            _ if err.path.is_empty() => meta.name.to_string(),
            _ => meta.interpolate(err.profile.as_ref().unwrap_or(&Profile::Default), &err.path),
        });
        Self { setting: err.path.join("."), origin, message: err.kind.to_string() }
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.setting.is_empty() {
            write!(f, "`{}`: ", self.setting)?;
        }
        f.write_str(&self.message)?;
        if let Some(origin) = &self.origin {
            write!(f, " (from {origin})")?;
        }
        Ok(())
    }
}
