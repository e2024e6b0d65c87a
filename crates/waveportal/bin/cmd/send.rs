use clap::Parser;
use eyre::Result;
use waveportal::{ConnectOutcome, SubmitOutcome, WaveView, render::render_page};
use waveportal_cli::{opts::PortalOpts, utils::LoadConfig};
use waveportal_common::{sh_note, sh_print, sh_println};

/// CLI arguments for `wave send`.
#[derive(Clone, Debug, Parser)]
pub struct SendArgs {
    /// The message to send along with the wave.
    #[arg(value_name = "MESSAGE")]
    pub message: String,

    #[command(flatten)]
    pub portal: PortalOpts,
}

impl SendArgs {
    pub async fn run(self) -> Result<()> {
        let Self { message, portal } = self;
        let config = portal.load_config()?;
        let view = WaveView::from_config(&config).await?;
        view.mount().await;

        if view.has_wallet() && !view.state().is_connected() {
            sh_note!("no authorized account, requesting access")?;
            if view.connect().await == ConnectOutcome::Failed {
                view.unmount().await;
                eyre::bail!("the wallet did not grant account access, run with -v for details");
            }
        }

        view.set_pending_message(message.as_str());
        let outcome = view.submit_wave(&message).await;
        let state = view.state();
        view.unmount().await;

        match outcome {
            SubmitOutcome::Mined(tx_hash) => {
                sh_println!("Mined {tx_hash:#x}")?;
                sh_print!("{}", render_page(&state, config.min_message_len))?;
                Ok(())
            }
            SubmitOutcome::RejectedTooShort { len, min } => {
                eyre::bail!("the message must be at least {min} characters long, got {len}")
            }
            SubmitOutcome::ProviderAbsent => {
                eyre::bail!("no wallet provider found, set --rpc-url or ETH_RPC_URL")
            }
            SubmitOutcome::Failed(err) => eyre::bail!("failed to send wave: {err}"),
        }
    }
}
