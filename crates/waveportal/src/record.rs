use crate::WaveError;
use alloy_primitives::{Address, U256};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A wave as returned by `getAllWaves`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawWave {
    pub waver: Address,
    /// Unix seconds.
    pub timestamp: U256,
    pub message: String,
}

/// The arguments of a `NewWave(from, timestamp, message)` event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewWaveEvent {
    pub from: Address,
    /// Unix seconds.
    pub timestamp: U256,
    pub message: String,
}

/// A wave as shown to the user. Immutable once built.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct WaveRecord {
    address: Address,
    timestamp: DateTime<Utc>,
    message: String,
}

impl WaveRecord {
    pub fn new(address: Address, timestamp: DateTime<Utc>, message: impl Into<String>) -> Self {
        Self { address, timestamp, message: message.into() }
    }

    /// Builds a record from a contract timestamp in unix seconds.
    pub fn from_unix(
        address: Address,
        seconds: U256,
        message: impl Into<String>,
    ) -> Result<Self, WaveError> {
        let timestamp = i64::try_from(seconds)
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .ok_or(WaveError::Timestamp(seconds))?;
        Ok(Self::new(address, timestamp, message))
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn timestamp(&self) -> &DateTime<Utc> {
        &self.timestamp
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl TryFrom<RawWave> for WaveRecord {
    type Error = WaveError;

    fn try_from(wave: RawWave) -> Result<Self, Self::Error> {
        Self::from_unix(wave.waver, wave.timestamp, wave.message)
    }
}

impl TryFrom<NewWaveEvent> for WaveRecord {
    type Error = WaveError;

    fn try_from(event: NewWaveEvent) -> Result<Self, Self::Error> {
        Self::from_unix(event.from, event.timestamp, event.message)
    }
}
