use crate::broadcast_stream;
use alloy_primitives::Address;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::broadcast;
use waveportal_wallets::{AccountChanges, AccountsRequest, WalletError, WalletProvider};

#[derive(Debug, Default)]
struct State {
    authorized: Vec<Address>,
    grantable: Vec<Address>,
    reject: bool,
    unreachable: bool,
    requests: Vec<AccountsRequest>,
}

/// A wallet holding its accounts in memory.
///
/// `eth_requestAccounts` authorizes the grantable accounts unless the wallet is set to reject.
#[derive(Clone, Debug)]
pub struct MockWallet {
    state: Arc<Mutex<State>>,
    changes: broadcast::Sender<Vec<Address>>,
}

impl Default for MockWallet {
    fn default() -> Self {
        Self::new()
    }
}

impl MockWallet {
    /// A wallet with no authorized and no grantable accounts.
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(16);
        Self { state: Arc::default(), changes }
    }

    /// A wallet that already authorized `accounts`.
    pub fn authorized(accounts: impl IntoIterator<Item = Address>) -> Self {
        let wallet = Self::new();
        wallet.state.lock().authorized = accounts.into_iter().collect();
        wallet
    }

    /// Accounts granted by the next `eth_requestAccounts`.
    pub fn with_grantable(self, accounts: impl IntoIterator<Item = Address>) -> Self {
        self.state.lock().grantable = accounts.into_iter().collect();
        self
    }

    /// Rejects `eth_requestAccounts` like a user declining the prompt.
    pub fn rejecting(self) -> Self {
        self.state.lock().reject = true;
        self
    }

    /// Fails every request as if the wallet could not be reached.
    pub fn set_unreachable(&self, unreachable: bool) {
        self.state.lock().unreachable = unreachable;
    }

    /// Every request received so far.
    pub fn requests(&self) -> Vec<AccountsRequest> {
        self.state.lock().requests.clone()
    }

    /// Switches the authorized accounts and notifies `accountsChanged` listeners.
    pub fn switch_accounts(&self, accounts: impl IntoIterator<Item = Address>) {
        let accounts: Vec<_> = accounts.into_iter().collect();
        self.state.lock().authorized = accounts.clone();
        let _ = self.changes.send(accounts);
    }

    /// Number of active `accountsChanged` listeners.
    pub fn listener_count(&self) -> usize {
        self.changes.receiver_count()
    }
}

#[async_trait]
impl WalletProvider for MockWallet {
    async fn request(&self, request: AccountsRequest) -> Result<Vec<Address>, WalletError> {
        let mut state = self.state.lock();
        state.requests.push(request);
        if state.unreachable {
            return Err(WalletError::ProviderAbsent);
        }
        match request {
            AccountsRequest::Accounts => Ok(state.authorized.clone()),
            AccountsRequest::RequestAccounts if state.reject => Err(WalletError::Rejected {
                operation: "eth_requestAccounts",
                reason: "User rejected the request.".to_string(),
            }),
            AccountsRequest::RequestAccounts => {
                if state.authorized.is_empty() {
                    state.authorized = state.grantable.clone();
                }
                Ok(state.authorized.clone())
            }
        }
    }

    fn account_changes(&self) -> AccountChanges {
        broadcast_stream(self.changes.subscribe())
    }
}
