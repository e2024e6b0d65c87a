use crate::broadcast_stream;
use alloy_primitives::{Address, B256, TxHash, U256};
use async_trait::async_trait;
use futures::StreamExt;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::{Notify, broadcast};
use waveportal::{
    ContractConnector, NewWaveEvent, NewWaveStream, PendingWave, RawWave, WaveContract, WaveError,
};

/// Block timestamp of the first mined wave.
const GENESIS_TIMESTAMP: u64 = 1_700_000_000;

/// A `wave` transaction as it was sent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SentWave {
    pub signer: Option<Address>,
    pub message: String,
    pub gas_limit: u64,
}

#[derive(Debug)]
struct State {
    total: U256,
    waves: Vec<RawWave>,
    calls: Vec<&'static str>,
    sent: Vec<SentWave>,
    connects: Vec<Option<Address>>,
    clock: u64,
    fail_reads: bool,
    fail_history: bool,
    fail_send: bool,
    fail_confirmation: bool,
    hold_confirmations: bool,
}

/// An in-memory WavePortal deployment.
///
/// Mined waves are appended to the history, bump the total and emit `NewWave` to every
/// subscriber. Confirmations can be held back to observe the view while a wave is pending.
#[derive(Clone, Debug)]
pub struct MockPortal {
    state: Arc<Mutex<State>>,
    events: broadcast::Sender<NewWaveEvent>,
    confirmations: Arc<Notify>,
}

impl Default for MockPortal {
    fn default() -> Self {
        Self::new()
    }
}

impl MockPortal {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(64);
        let state = State {
            total: U256::ZERO,
            waves: Vec::new(),
            calls: Vec::new(),
            sent: Vec::new(),
            connects: Vec::new(),
            clock: GENESIS_TIMESTAMP,
            fail_reads: false,
            fail_history: false,
            fail_send: false,
            fail_confirmation: false,
            hold_confirmations: false,
        };
        Self { state: Arc::new(Mutex::new(state)), events, confirmations: Arc::default() }
    }

    /// A deployment holding `waves`, with the total count matching.
    pub fn with_waves(waves: impl IntoIterator<Item = RawWave>) -> Self {
        let portal = Self::new();
        {
            let mut state = portal.state.lock();
            state.waves = waves.into_iter().collect();
            state.total = U256::from(state.waves.len());
        }
        portal
    }

    /// Overrides the value of `getTotalWaves`.
    pub fn set_total(&self, total: impl Into<U256>) {
        self.state.lock().total = total.into();
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.state.lock().fail_reads = fail;
    }

    /// Fails only `getAllWaves`.
    pub fn set_fail_history(&self, fail: bool) {
        self.state.lock().fail_history = fail;
    }

    pub fn set_fail_send(&self, fail: bool) {
        self.state.lock().fail_send = fail;
    }

    pub fn set_fail_confirmation(&self, fail: bool) {
        self.state.lock().fail_confirmation = fail;
    }

    /// Keeps submitted waves pending until [`release_confirmations`](Self::release_confirmations).
    pub fn hold_confirmations(&self) {
        self.state.lock().hold_confirmations = true;
    }

    pub fn release_confirmations(&self) {
        self.state.lock().hold_confirmations = false;
        self.confirmations.notify_waiters();
    }

    /// Emits a `NewWave` event without touching the history.
    pub fn emit(&self, from: Address, timestamp: impl Into<U256>, message: impl Into<String>) {
        let event = NewWaveEvent { from, timestamp: timestamp.into(), message: message.into() };
        let _ = self.events.send(event);
    }

    /// Contract methods called so far, by name.
    pub fn calls(&self) -> Vec<&'static str> {
        self.state.lock().calls.clone()
    }

    /// `wave` transactions sent so far.
    pub fn sent(&self) -> Vec<SentWave> {
        self.state.lock().sent.clone()
    }

    /// Signers of the bindings created so far.
    pub fn connects(&self) -> Vec<Option<Address>> {
        self.state.lock().connects.clone()
    }

    /// Number of active `NewWave` listeners.
    pub fn subscriber_count(&self) -> usize {
        self.events.receiver_count()
    }

    fn record(&self, call: &'static str) -> Result<(), WaveError> {
        let mut state = self.state.lock();
        state.calls.push(call);
        let failing = (state.fail_reads && call != "wave")
            || (state.fail_history && call == "getAllWaves");
        if failing {
            return Err(WaveError::other(format!("{call} failed")));
        }
        Ok(())
    }

    fn mine(&self, wave: &SentWave) -> Result<(), WaveError> {
        let event = {
            let mut state = self.state.lock();
            if state.fail_confirmation {
                return Err(WaveError::other("transaction dropped"));
            }
            state.clock += 1;
            let raw = RawWave {
                waver: wave.signer.unwrap_or_default(),
                timestamp: U256::from(state.clock),
                message: wave.message.clone(),
            };
            state.total += U256::from(1);
            state.waves.push(raw.clone());
            NewWaveEvent { from: raw.waver, timestamp: raw.timestamp, message: raw.message }
        };
        let _ = self.events.send(event);
        Ok(())
    }
}

impl ContractConnector for MockPortal {
    fn connect(&self, signer: Option<Address>) -> Arc<dyn WaveContract> {
        self.state.lock().connects.push(signer);
        Arc::new(Binding { portal: self.clone(), signer })
    }
}

#[derive(Debug)]
struct Binding {
    portal: MockPortal,
    signer: Option<Address>,
}

#[async_trait]
impl WaveContract for Binding {
    async fn total_waves(&self) -> Result<U256, WaveError> {
        self.portal.record("getTotalWaves")?;
        Ok(self.portal.state.lock().total)
    }

    async fn all_waves(&self) -> Result<Vec<RawWave>, WaveError> {
        self.portal.record("getAllWaves")?;
        Ok(self.portal.state.lock().waves.clone())
    }

    async fn wave(
        &self,
        message: &str,
        gas_limit: u64,
    ) -> Result<Box<dyn PendingWave>, WaveError> {
        self.portal.record("wave")?;
        let wave = SentWave { signer: self.signer, message: message.to_string(), gas_limit };
        let tx_hash = {
            let mut state = self.portal.state.lock();
            if state.fail_send {
                return Err(WaveError::other("insufficient funds for gas"));
            }
            state.sent.push(wave.clone());
            B256::with_last_byte(state.sent.len() as u8)
        };
        Ok(Box::new(Pending { portal: self.portal.clone(), wave, tx_hash }))
    }

    async fn subscribe_new_waves(&self) -> Result<NewWaveStream, WaveError> {
        self.portal.record("NewWave")?;
        let stream = broadcast_stream(self.portal.events.subscribe()).map(Ok);
        Ok(stream.boxed())
    }
}

struct Pending {
    portal: MockPortal,
    wave: SentWave,
    tx_hash: TxHash,
}

#[async_trait]
impl PendingWave for Pending {
    fn tx_hash(&self) -> TxHash {
        self.tx_hash
    }

    async fn wait(self: Box<Self>) -> Result<TxHash, WaveError> {
        loop {
            let released = self.portal.confirmations.notified();
            if !self.portal.state.lock().hold_confirmations {
                break;
            }
            released.await;
        }
        self.portal.mine(&self.wave)?;
        Ok(self.tx_hash)
    }
}
