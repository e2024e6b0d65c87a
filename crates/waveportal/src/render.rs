//! Text rendering of the wave page.

use crate::{ViewState, WaveRecord};
use std::{fmt::Write as _, io};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use waveportal_common::fmt::{format_timestamp, pluralize};

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// The wave count the portal is aiming for.
pub const WAVE_GOAL: &str = "888,888";

/// Something that shows the wave page.
pub trait RenderTarget {
    fn render(&mut self, state: &ViewState) -> io::Result<()>;
}

/// Renders the page for `state`.
///
/// `min_message_len` is the hint shown next to the form.
pub fn render_page(state: &ViewState, min_message_len: usize) -> String {
    let mut page = String::new();
    let _ = writeln!(page, "👋 Hey there!");
    let _ = writeln!(
        page,
        "So far, we've got {} {}!",
        state.total_wave_count,
        pluralize(state.total_wave_count, "wave")
    );
    let _ = writeln!(page, "Can we reach {WAVE_GOAL}?");
    page.push('\n');

    match state.current_account {
        None => {
            let _ = writeln!(page, "[ Connect Wallet ]");
        }
        Some(account) => {
            let _ = writeln!(page, "Connected as {account}");
            let _ = writeln!(
                page,
                "> {} (at least {min_message_len} characters)",
                state.pending_message
            );
            if state.is_submitting() {
                let _ = writeln!(page, "[ Sending wave... ] (disabled)");
            } else {
                let _ = writeln!(page, "[ SEND IT! ]");
            }
        }
    }
    if let Some(notice) = state.notice {
        let _ = writeln!(page, "{notice}");
    }

    for wave in &state.wave_history {
        page.push('\n');
        render_wave(&mut page, wave);
    }
    page
}

fn render_wave(page: &mut String, wave: &WaveRecord) {
    let _ = writeln!(page, "Address: {}", wave.address());
    let _ = writeln!(page, "Time:    {}", format_timestamp(wave.timestamp()));
    let _ = writeln!(page, "Message: {}", wave.message());
}

/// Writes the page to a terminal, or any other writer.
#[derive(Debug)]
pub struct TerminalRenderer<W> {
    out: W,
    min_message_len: usize,
    clear: bool,
    quiet: bool,
}

impl<W: io::Write> TerminalRenderer<W> {
    pub fn new(out: W, min_message_len: usize) -> Self {
        Self { out, min_message_len, clear: false, quiet: false }
    }

    /// Writes nothing when `quiet`.
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Clears the screen before every render.
    pub fn clear_screen(mut self, clear: bool) -> Self {
        self.clear = clear;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: io::Write> RenderTarget for TerminalRenderer<W> {
    fn render(&mut self, state: &ViewState) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        if self.clear {
            self.out.write_all(CLEAR_SCREEN.as_bytes())?;
        }
        self.out.write_all(render_page(state, self.min_message_len).as_bytes())?;
        self.out.flush()
    }
}

/// Renders the current state, then every change, until `token` is cancelled or the view is
/// dropped.
pub async fn render_until<T: RenderTarget>(
    mut states: watch::Receiver<ViewState>,
    target: &mut T,
    token: CancellationToken,
) -> io::Result<()> {
    loop {
        let state = states.borrow_and_update().clone();
        target.render(&state)?;
        tokio::select! {
            biased;
            _ = token.cancelled() => return Ok(()),
            changed = states.changed() => {
                if changed.is_err() {
                    return Ok(());
                }
            }
        }
    }
}
