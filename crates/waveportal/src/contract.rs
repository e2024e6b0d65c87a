//! The WavePortal contract binding and the seams the view talks to it through.

use crate::{NewWaveEvent, RawWave, WaveError};
use alloy_network::{Ethereum, ReceiptResponse};
use alloy_primitives::{Address, TxHash, U256};
use alloy_provider::{DynProvider, PendingTransactionBuilder};
use alloy_sol_types::sol;
use async_trait::async_trait;
use futures::{StreamExt, stream::BoxStream};
use parking_lot::Mutex;
use std::{fmt, sync::Arc};

sol! {
    #[sol(rpc)]
    interface IWavePortal {
        #[derive(Debug)]
        struct Wave {
            address waver;
            string message;
            uint256 timestamp;
        }

        #[derive(Debug)]
        event NewWave(address indexed from, uint256 timestamp, string message);

        function wave(string memory _message) external;
        function getAllWaves() external view returns (Wave[] memory);
        function getTotalWaves() external view returns (uint256);
    }
}

impl From<IWavePortal::Wave> for RawWave {
    fn from(wave: IWavePortal::Wave) -> Self {
        Self { waver: wave.waver, timestamp: wave.timestamp, message: wave.message }
    }
}

impl From<IWavePortal::NewWave> for NewWaveEvent {
    fn from(event: IWavePortal::NewWave) -> Self {
        Self { from: event.from, timestamp: event.timestamp, message: event.message }
    }
}

/// Live `NewWave` events, in delivery order. Dropping the stream removes the listener.
pub type NewWaveStream = BoxStream<'static, Result<NewWaveEvent, WaveError>>;

/// The WavePortal contract, bound to the signer of its writes.
#[async_trait]
pub trait WaveContract: Send + Sync + fmt::Debug {
    /// `getTotalWaves()`
    async fn total_waves(&self) -> Result<U256, WaveError>;

    /// `getAllWaves()`
    async fn all_waves(&self) -> Result<Vec<RawWave>, WaveError>;

    /// Sends `wave(message)` with the given gas limit, returning once the transaction is
    /// submitted.
    async fn wave(&self, message: &str, gas_limit: u64)
    -> Result<Box<dyn PendingWave>, WaveError>;

    /// Registers a `NewWave` listener.
    async fn subscribe_new_waves(&self) -> Result<NewWaveStream, WaveError>;
}

/// A submitted `wave` transaction.
#[async_trait]
pub trait PendingWave: Send {
    fn tx_hash(&self) -> TxHash;

    /// Waits until the transaction is included, failing if it reverted.
    async fn wait(self: Box<Self>) -> Result<TxHash, WaveError>;
}

/// Creates contract bindings that send writes from a given account.
pub trait ContractConnector: Send + Sync + fmt::Debug {
    fn connect(&self, signer: Option<Address>) -> Arc<dyn WaveContract>;
}

/// Lazily created contract binding for the active account.
///
/// The binding is created on first use and reused while the account stays the same. A different
/// account, or an explicit [`invalidate`](Self::invalidate), creates a fresh one.
#[derive(Debug)]
pub struct ContractHandle {
    connector: Arc<dyn ContractConnector>,
    current: Mutex<Option<(Option<Address>, Arc<dyn WaveContract>)>>,
}

impl ContractHandle {
    pub fn new(connector: Arc<dyn ContractConnector>) -> Self {
        Self { connector, current: Mutex::default() }
    }

    /// Returns the binding for `signer`, creating it if needed.
    pub fn get(&self, signer: Option<Address>) -> Arc<dyn WaveContract> {
        let mut current = self.current.lock();
        if let Some((account, contract)) = current.as_ref()
            && *account == signer
        {
            return contract.clone();
        }
        trace!(?signer, "creating contract binding");
        let contract = self.connector.connect(signer);
        *current = Some((signer, contract.clone()));
        contract
    }

    /// Drops the cached binding.
    pub fn invalidate(&self) {
        if self.current.lock().take().is_some() {
            trace!("invalidated contract binding");
        }
    }
}

/// Connects [`WavePortalClient`]s to a deployed contract through a shared provider.
#[derive(Clone, Debug)]
pub struct WavePortalConnector {
    provider: DynProvider,
    address: Address,
}

impl WavePortalConnector {
    pub fn new(provider: DynProvider, address: Address) -> Self {
        Self { provider, address }
    }

    pub fn address(&self) -> Address {
        self.address
    }
}

impl ContractConnector for WavePortalConnector {
    fn connect(&self, signer: Option<Address>) -> Arc<dyn WaveContract> {
        Arc::new(WavePortalClient {
            instance: IWavePortal::new(self.address, self.provider.clone()),
            signer,
        })
    }
}

/// The WavePortal contract over JSON-RPC.
///
/// Writes are sent with `eth_sendTransaction` from `signer`, so the node or wallet behind the
/// provider signs them.
#[derive(Clone, Debug)]
pub struct WavePortalClient {
    instance: IWavePortal::IWavePortalInstance<DynProvider>,
    signer: Option<Address>,
}

#[async_trait]
impl WaveContract for WavePortalClient {
    async fn total_waves(&self) -> Result<U256, WaveError> {
        Ok(self.instance.getTotalWaves().call().await?)
    }

    async fn all_waves(&self) -> Result<Vec<RawWave>, WaveError> {
        let waves = self.instance.getAllWaves().call().await?;
        Ok(waves.into_iter().map(Into::into).collect())
    }

    async fn wave(
        &self,
        message: &str,
        gas_limit: u64,
    ) -> Result<Box<dyn PendingWave>, WaveError> {
        let mut call = self.instance.wave(message.to_string()).gas(gas_limit);
        if let Some(signer) = self.signer {
            call = call.from(signer);
        }
        let pending = call.send().await?;
        Ok(Box::new(PendingWaveTx(pending)))
    }

    async fn subscribe_new_waves(&self) -> Result<NewWaveStream, WaveError> {
        let poller = self.instance.NewWave_filter().watch().await?;
        let stream = poller
            .into_stream()
            .map(|item| item.map(|(event, _log)| event.into()).map_err(WaveError::from));
        Ok(stream.boxed())
    }
}

struct PendingWaveTx(PendingTransactionBuilder<Ethereum>);

#[async_trait]
impl PendingWave for PendingWaveTx {
    fn tx_hash(&self) -> TxHash {
        *self.0.tx_hash()
    }

    async fn wait(self: Box<Self>) -> Result<TxHash, WaveError> {
        let receipt = self.0.get_receipt().await?;
        let tx_hash = receipt.transaction_hash();
        if !receipt.status() {
            return Err(WaveError::Reverted(tx_hash));
        }
        Ok(tx_hash)
    }
}
