use crate::cmd::{connect::ConnectArgs, send::SendArgs, show::ShowArgs};
use clap::{Parser, Subcommand};
use waveportal_cli::opts::ShellOptions;

/// Wave at the WavePortal contract from the comfort of your command line.
#[derive(Parser)]
#[command(name = "wave", version, next_display_order = None)]
pub struct Wave {
    #[command(flatten)]
    pub shell: ShellOptions,

    #[command(subcommand)]
    pub cmd: WaveSubcommand,
}

#[derive(Subcommand)]
pub enum WaveSubcommand {
    /// Show the wave count and every wave so far.
    #[command(visible_alias = "s")]
    Show(ShowArgs),

    /// Ask the wallet for account access.
    #[command(visible_alias = "c")]
    Connect(ConnectArgs),

    /// Send a wave and wait for it to be mined.
    #[command(visible_alias = "w")]
    Send(SendArgs),
}
