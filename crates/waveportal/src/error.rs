use alloy_primitives::{TxHash, U256};
use alloy_provider::PendingTransactionError;
use alloy_transport::TransportError;
use waveportal_wallets::WalletError;

/// Errors of wave reads, writes and subscriptions.
#[derive(Debug, thiserror::Error)]
pub enum WaveError {
    #[error(transparent)]
    Wallet(#[from] WalletError),
    #[error(transparent)]
    Rpc(#[from] TransportError),
    #[error(transparent)]
    Contract(#[from] alloy_contract::Error),
    #[error("failed to confirm wave transaction")]
    Confirmation(#[from] PendingTransactionError),
    #[error("failed to decode NewWave event")]
    Event(#[from] alloy_sol_types::Error),
    #[error("wave transaction {0:#x} reverted")]
    Reverted(TxHash),
    #[error("wave timestamp {0} is out of range")]
    Timestamp(U256),
    #[error("{0}")]
    Other(String),
}

impl WaveError {
    /// Creates an ad-hoc error.
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}
