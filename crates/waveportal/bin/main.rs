use clap::Parser;
use eyre::Result;
use waveportal_cli::{handler, utils};

mod args;
mod cmd;

use args::{Wave, WaveSubcommand};

fn main() -> Result<()> {
    handler::install();
    utils::load_dotenv();
    let args = Wave::parse();
    args.shell.set_global_shell();
    utils::subscriber(args.shell.verbose);
    main_args(args)
}

#[tokio::main]
async fn main_args(args: Wave) -> Result<()> {
    match args.cmd {
        WaveSubcommand::Show(cmd) => cmd.run().await,
        WaveSubcommand::Connect(cmd) => cmd.run().await,
        WaveSubcommand::Send(cmd) => cmd.run().await,
    }
}
