use clap::Parser;
use eyre::Result;
use waveportal::{ConnectOutcome, WaveView};
use waveportal_cli::{opts::PortalOpts, utils::LoadConfig};
use waveportal_common::sh_println;

/// CLI arguments for `wave connect`.
#[derive(Clone, Debug, Parser)]
pub struct ConnectArgs {
    #[command(flatten)]
    pub portal: PortalOpts,
}

impl ConnectArgs {
    pub async fn run(self) -> Result<()> {
        let config = self.portal.load_config()?;
        let view = WaveView::from_config(&config).await?;
        view.mount().await;
        let outcome = view.connect().await;
        let state = view.state();
        view.unmount().await;

        match outcome {
            ConnectOutcome::Connected(account) => {
                sh_println!("Connected as {account}")?;
                sh_println!("Total waves: {}", state.total_wave_count)?;
                Ok(())
            }
            ConnectOutcome::ProviderAbsent => {
                eyre::bail!("no wallet provider found, set --rpc-url or ETH_RPC_URL")
            }
            ConnectOutcome::Failed => {
                eyre::bail!("the wallet did not grant account access, run with -v for details")
            }
        }
    }
}
