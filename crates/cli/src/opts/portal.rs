use crate::utils::LoadConfig;
use alloy_primitives::Address;
use clap::Parser;
use waveportal_config::{
    Config, ExtractConfigError,
    figment::{
        self, Metadata, Profile,
        value::{Dict, Map, Value},
    },
};

/// Where the WavePortal lives and how to reach it.
#[derive(Clone, Debug, Default, Parser)]
#[command(next_help_heading = "Portal options")]
pub struct PortalOpts {
    /// The wallet's JSON-RPC endpoint.
    ///
    /// Accounts are requested from it and waves are sent from them. Without an endpoint no
    /// wallet is available.
    #[arg(short, long = "rpc-url", env = "ETH_RPC_URL", value_name = "URL")]
    pub rpc_url: Option<String>,

    /// The WavePortal contract address.
    #[arg(long, value_name = "ADDRESS")]
    pub contract: Option<Address>,

    /// Gas limit ceiling for wave transactions.
    #[arg(long, value_name = "GAS")]
    pub gas_limit: Option<u64>,
}

impl figment::Provider for PortalOpts {
    fn metadata(&self) -> Metadata {
        Metadata::named("PortalOpts")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, figment::Error> {
        Ok(Map::from([(Config::selected_profile(), self.dict())]))
    }
}

impl PortalOpts {
    /// The options that were set, keyed like [`Config`] fields.
    pub fn dict(&self) -> Dict {
        let mut dict = Dict::new();
        if let Some(url) = self.rpc_url.as_deref().filter(|url| !url.trim().is_empty()) {
            dict.insert("rpc_url".into(), url.into());
        }
        if let Some(contract) = self.contract {
            dict.insert("contract".into(), contract.to_string().into());
        }
        if let Some(gas_limit) = self.gas_limit {
            dict.insert("gas_limit".into(), Value::from(gas_limit));
        }
        dict
    }
}

impl LoadConfig for PortalOpts {
    fn load_config(&self) -> Result<Config, ExtractConfigError> {
        Config::try_from(Config::figment().merge(self.clone()))
    }
}
