//! # waveportal-wallets
//!
//! Wallet access for the WavePortal client, following the account methods of
//! [EIP-1193](https://eips.ethereum.org/EIPS/eip-1193):
//! - `eth_accounts` returns already authorized accounts without prompting
//! - `eth_requestAccounts` asks the user for access
//! - `accountsChanged` notifies about the active account

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

#[macro_use]
extern crate tracing;

pub mod error;
pub use error::WalletError;

mod provider;
pub use provider::{AccountChanges, AccountsRequest, WalletProvider, poll_account_changes};

mod rpc;
pub use rpc::RpcWallet;
