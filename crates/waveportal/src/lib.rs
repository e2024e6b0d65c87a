//! # waveportal
//!
//! A client for the WavePortal contract: read the waves recorded so far, send a wave from a
//! wallet account and follow new waves as their `NewWave` events arrive.
//!
//! [`WaveView`] owns the page state and drives the wallet and the contract; renderers follow it
//! through a [`watch`](tokio::sync::watch) channel.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

#[macro_use]
extern crate tracing;

mod contract;
pub use contract::{
    ContractConnector, ContractHandle, IWavePortal, NewWaveStream, PendingWave, WaveContract,
    WavePortalClient, WavePortalConnector,
};

mod error;
pub use error::WaveError;

mod record;
pub use record::{NewWaveEvent, RawWave, WaveRecord};

pub mod render;

mod state;
pub use state::{Action, Notice, SubmitState, ViewState};

mod view;
pub use view::{ConnectOutcome, SubmitOutcome, ViewSettings, WaveView};
