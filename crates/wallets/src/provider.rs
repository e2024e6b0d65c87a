use crate::WalletError;
use alloy_primitives::Address;
use async_trait::async_trait;
use futures::{
    StreamExt,
    stream::{self, BoxStream},
};
use serde::{Deserialize, Serialize};
use std::{fmt, time::Duration};
use tokio::time::MissedTickBehavior;

/// A stream of `accountsChanged` notifications, each carrying the full account list.
pub type AccountChanges = BoxStream<'static, Vec<Address>>;

/// The account requests of the EIP-1193 provider interface.
///
/// Reference: <https://eips.ethereum.org/EIPS/eip-1193>
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method")]
pub enum AccountsRequest {
    /// Accounts the user already authorized. Never prompts.
    #[serde(rename = "eth_accounts")]
    Accounts,
    /// Asks the user to authorize accounts. May prompt.
    #[serde(rename = "eth_requestAccounts")]
    RequestAccounts,
}

impl AccountsRequest {
    /// The JSON-RPC method name.
    pub const fn method(&self) -> &'static str {
        match self {
            Self::Accounts => "eth_accounts",
            Self::RequestAccounts => "eth_requestAccounts",
        }
    }

    /// Whether the wallet may show a permission prompt.
    pub const fn prompts(&self) -> bool {
        matches!(self, Self::RequestAccounts)
    }
}

impl fmt::Display for AccountsRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.method())
    }
}

/// A wallet that brokers account access and signs transactions sent from its accounts.
#[async_trait]
pub trait WalletProvider: Send + Sync + fmt::Debug {
    /// Sends an account request to the wallet.
    async fn request(&self, request: AccountsRequest) -> Result<Vec<Address>, WalletError>;

    /// Subscribes to account changes.
    fn account_changes(&self) -> AccountChanges;

    /// Accounts already authorized, without prompting.
    async fn accounts(&self) -> Result<Vec<Address>, WalletError> {
        self.request(AccountsRequest::Accounts).await
    }

    /// Requests account access, prompting if needed.
    async fn request_accounts(&self) -> Result<Vec<Address>, WalletError> {
        self.request(AccountsRequest::RequestAccounts).await
    }
}

/// Turns a wallet without push notifications into an [`AccountChanges`] stream by polling
/// `eth_accounts` every `interval`.
///
/// The first successful reading is always yielded, afterwards only readings that differ from the
/// previous one. Failed polls are logged and skipped.
pub fn poll_account_changes<W>(wallet: W, interval: Duration) -> AccountChanges
where
    W: WalletProvider + 'static,
{
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    stream::unfold((wallet, ticker, None), |(wallet, mut ticker, mut last)| async move {
        loop {
            ticker.tick().await;
            match wallet.accounts().await {
                Ok(accounts) if last.as_ref() != Some(&accounts) => {
                    last = Some(accounts.clone());
                    return Some((accounts, (wallet, ticker, last)));
                }
                Ok(_) => {}
                Err(err) => debug!(%err, "failed to poll wallet accounts"),
            }
        }
    })
    .boxed()
}
