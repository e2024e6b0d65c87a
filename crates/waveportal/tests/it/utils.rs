use alloy_primitives::{Address, U256, address};
use std::{sync::Arc, time::Duration};
use waveportal::{RawWave, ViewSettings, ViewState, WaveView};
use waveportal_test_utils::{MockPortal, MockWallet, init_tracing};

pub const ALICE: Address = address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
pub const BOB: Address = address!("0x70997970C51812dc3A010C7d01b50e0d17dc79C8");
pub const WAVER: Address = address!("0x00000000000000000000000000000000000000a0");

pub fn view(wallet: &MockWallet, portal: &MockPortal) -> WaveView {
    view_with(wallet, portal, ViewSettings::default())
}

pub fn view_with(wallet: &MockWallet, portal: &MockPortal, settings: ViewSettings) -> WaveView {
    init_tracing();
    WaveView::new(Arc::new(wallet.clone()), Arc::new(portal.clone()), settings)
}

pub fn raw_wave(waver: Address, seconds: u64, message: &str) -> RawWave {
    RawWave { waver, timestamp: U256::from(seconds), message: message.to_string() }
}

/// Waits until the view state satisfies `f`.
pub async fn wait_for(view: &WaveView, f: impl FnMut(&ViewState) -> bool) -> ViewState {
    let mut states = view.subscribe();
    let state = tokio::time::timeout(Duration::from_secs(5), states.wait_for(f))
        .await
        .expect("timed out waiting for view state")
        .expect("view dropped");
    state.clone()
}
