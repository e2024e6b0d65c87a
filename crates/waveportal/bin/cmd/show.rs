use clap::Parser;
use eyre::Result;
use std::io;
use tokio_util::sync::CancellationToken;
use waveportal::{
    WaveView,
    render::{RenderTarget, TerminalRenderer, render_until},
};
use waveportal_cli::{opts::PortalOpts, utils::LoadConfig};
use waveportal_common::{sh_println, shell::Shell};

/// CLI arguments for `wave show`.
#[derive(Clone, Debug, Parser)]
pub struct ShowArgs {
    /// Keep the page up to date as waves arrive, until Ctrl-C.
    #[arg(long, short)]
    pub watch: bool,

    /// Print the page state as JSON.
    #[arg(long, conflicts_with = "watch")]
    pub json: bool,

    #[command(flatten)]
    pub portal: PortalOpts,
}

impl ShowArgs {
    pub async fn run(self) -> Result<()> {
        let Self { watch, json, portal } = self;
        let config = portal.load_config()?;
        let view = WaveView::from_config(&config).await?;
        view.mount().await;
        let result = show(&view, watch, json, config.min_message_len).await;
        view.unmount().await;
        result
    }
}

async fn show(view: &WaveView, watch: bool, json: bool, min_message_len: usize) -> Result<()> {
    if json {
        sh_println!("{}", serde_json::to_string_pretty(&view.state())?)?;
        return Ok(());
    }

    let quiet = Shell::get().is_quiet();
    let mut renderer =
        TerminalRenderer::new(io::stdout(), min_message_len).clear_screen(watch).quiet(quiet);
    if !watch {
        renderer.render(&view.state())?;
        return Ok(());
    }

    let token = CancellationToken::new();
    tokio::select! {
        result = render_until(view.subscribe(), &mut renderer, token.clone()) => result?,
        _ = tokio::signal::ctrl_c() => token.cancel(),
    }
    Ok(())
}
