use crate::{AccountChanges, AccountsRequest, WalletError, WalletProvider, poll_account_changes};
use alloy_primitives::Address;
use alloy_provider::{DynProvider, Provider, ProviderBuilder};
use async_trait::async_trait;
use std::time::Duration;

/// A wallet reached over JSON-RPC, e.g. a node with unlocked accounts or a wallet bridge.
///
/// The node holds the keys: transactions sent `from` one of its accounts are signed by it, the
/// same way an injected browser wallet signs `eth_sendTransaction`.
#[derive(Clone, Debug)]
pub struct RpcWallet {
    provider: DynProvider,
    account_poll_interval: Duration,
}

impl RpcWallet {
    /// Default interval between `eth_accounts` polls.
    pub const DEFAULT_ACCOUNT_POLL_INTERVAL: Duration = Duration::from_secs(2);

    /// Wraps an existing provider.
    pub fn new(provider: DynProvider) -> Self {
        Self { provider, account_poll_interval: Self::DEFAULT_ACCOUNT_POLL_INTERVAL }
    }

    /// Connects to the given endpoint (`http(s)://`, `ws(s)://`).
    pub async fn connect(url: &str) -> Result<Self, WalletError> {
        let provider = ProviderBuilder::new()
            .connect(url)
            .await
            .map_err(|source| WalletError::Rpc { operation: "connect", source })?;
        debug!(%url, "connected to wallet endpoint");
        Ok(Self::new(provider.erased()))
    }

    /// Sets the interval between `eth_accounts` polls.
    pub fn with_account_poll_interval(mut self, interval: Duration) -> Self {
        self.account_poll_interval = interval;
        self
    }

    /// The underlying provider, shared with contract bindings.
    pub fn provider(&self) -> &DynProvider {
        &self.provider
    }
}

#[async_trait]
impl WalletProvider for RpcWallet {
    async fn request(&self, request: AccountsRequest) -> Result<Vec<Address>, WalletError> {
        let method = request.method();
        trace!(%method, "wallet request");
        self.provider
            .client()
            .request_noparams::<Vec<Address>>(method)
            .await
            .map_err(|err| WalletError::from_rpc(method, err))
    }

    fn account_changes(&self) -> AccountChanges {
        poll_account_changes(self.clone(), self.account_poll_interval)
    }
}
