use crate::utils::*;
use alloy_primitives::U256;
use chrono::DateTime;
use waveportal::{
    ConnectOutcome, Notice, SubmitOutcome, ViewSettings, ViewState, WaveRecord, WaveView,
    render::render_page,
};
use waveportal_test_utils::{MockPortal, MockWallet, init_tracing};
use waveportal_wallets::AccountsRequest;

#[tokio::test]
async fn no_wallet_shows_connect_prompt_only() {
    init_tracing();
    let view = WaveView::without_wallet(ViewSettings::default());
    view.mount().await;

    similar_asserts::assert_eq!(view.state(), ViewState::default());
    assert!(render_page(&view.state(), 4).contains("[ Connect Wallet ]"));

    assert_eq!(view.connect().await, ConnectOutcome::ProviderAbsent);
    let state = view.state();
    assert_eq!(state.notice, Some(Notice::InstallWallet));
    assert_eq!(state.current_account, None);

    view.dismiss_notice();
    assert_eq!(view.submit_wave("hello").await, SubmitOutcome::ProviderAbsent);
    let state = view.state();
    assert_eq!(state.notice, Some(Notice::InstallWallet));
    assert!(!state.is_submitting());
}

#[tokio::test]
async fn unauthorized_wallet_stays_empty() {
    let wallet = MockWallet::new().with_grantable([ALICE]);
    let portal = MockPortal::with_waves([raw_wave(WAVER, 1000, "hi")]);
    let view = view(&wallet, &portal);
    view.mount().await;

    let state = view.state();
    assert_eq!(state.current_account, None);
    assert!(state.wave_history.is_empty());
    assert_eq!(state.total_wave_count, 0);

    // never prompts on mount
    assert_eq!(wallet.requests(), vec![AccountsRequest::Accounts]);
    assert_eq!(portal.calls(), vec!["NewWave"]);
    assert_eq!(portal.subscriber_count(), 1);
}

#[tokio::test]
async fn authorized_wallet_loads_history() {
    let wallet = MockWallet::authorized([ALICE]);
    let portal = MockPortal::with_waves([raw_wave(WAVER, 1000, "hi")]);
    portal.set_total(U256::from(5u64));
    let view = view(&wallet, &portal);
    view.mount().await;

    let state = view.state();
    assert_eq!(state.current_account, Some(ALICE));
    similar_asserts::assert_eq!(
        state.wave_history,
        vec![WaveRecord::new(WAVER, DateTime::from_timestamp(1000, 0).unwrap(), "hi")]
    );
    assert_eq!(state.wave_history[0].timestamp().to_rfc3339(), "1970-01-01T00:16:40+00:00");
    assert_eq!(state.total_wave_count, 5);

    assert_eq!(portal.calls(), vec!["getAllWaves", "getTotalWaves", "NewWave"]);
    assert_eq!(portal.connects(), vec![Some(ALICE)]);
}

#[tokio::test]
async fn failed_history_keeps_account() {
    let wallet = MockWallet::authorized([ALICE]);
    let portal = MockPortal::with_waves([raw_wave(WAVER, 1000, "hi")]);
    portal.set_fail_reads(true);
    let view = view(&wallet, &portal);
    view.mount().await;

    let state = view.state();
    assert_eq!(state.current_account, Some(ALICE));
    assert!(state.wave_history.is_empty());
    assert_eq!(state.total_wave_count, 0);
    assert!(view.is_mounted());
}

#[tokio::test]
async fn failed_history_still_loads_count() {
    let wallet = MockWallet::authorized([ALICE]);
    let portal = MockPortal::with_waves([raw_wave(WAVER, 1000, "hi"), raw_wave(BOB, 1001, "yo")]);
    portal.set_fail_history(true);
    let view = view(&wallet, &portal);
    view.mount().await;

    let state = view.state();
    assert_eq!(state.current_account, Some(ALICE));
    assert!(state.wave_history.is_empty());
    assert_eq!(state.total_wave_count, 2);
    assert_eq!(portal.calls(), vec!["getAllWaves", "getTotalWaves", "NewWave"]);
}

#[tokio::test]
async fn unreachable_wallet_is_not_fatal() {
    let wallet = MockWallet::authorized([ALICE]);
    wallet.set_unreachable(true);
    let portal = MockPortal::new();
    let view = view(&wallet, &portal);
    view.mount().await;

    assert_eq!(view.state().current_account, None);
    assert_eq!(view.connect().await, ConnectOutcome::Failed);
    assert_eq!(view.state(), ViewState::default());
}

#[tokio::test]
async fn connect_adopts_first_account() {
    let wallet = MockWallet::new().with_grantable([BOB, ALICE]);
    let portal = MockPortal::with_waves([raw_wave(WAVER, 1000, "hi")]);
    portal.set_total(U256::from(3u64));
    let view = view(&wallet, &portal);
    view.mount().await;

    assert_eq!(view.connect().await, ConnectOutcome::Connected(BOB));
    let state = view.state();
    assert_eq!(state.current_account, Some(BOB));
    assert_eq!(state.total_wave_count, 3);
    // only the count is refreshed
    assert!(state.wave_history.is_empty());
    assert!(!render_page(&state, 4).contains("Connect Wallet"));

    assert_eq!(
        wallet.requests(),
        vec![AccountsRequest::Accounts, AccountsRequest::RequestAccounts]
    );
    // the subscription moved to the new account's binding
    assert_eq!(portal.connects(), vec![None, Some(BOB)]);
    assert_eq!(portal.calls(), vec!["NewWave", "NewWave", "getTotalWaves"]);
    assert_eq!(portal.subscriber_count(), 1);
}

#[tokio::test]
async fn rejected_connect_leaves_state() {
    let wallet = MockWallet::new().with_grantable([ALICE]).rejecting();
    let portal = MockPortal::new();
    let view = view(&wallet, &portal);
    view.mount().await;

    assert_eq!(view.connect().await, ConnectOutcome::Failed);
    assert_eq!(view.state(), ViewState::default());
    assert_eq!(portal.calls(), vec!["NewWave"]);
}

#[tokio::test]
async fn connect_without_accounts_fails() {
    let wallet = MockWallet::new();
    let portal = MockPortal::new();
    let view = view(&wallet, &portal);
    view.mount().await;

    assert_eq!(view.connect().await, ConnectOutcome::Failed);
    assert_eq!(view.state().current_account, None);
}

#[tokio::test]
async fn remount_starts_over() {
    let wallet = MockWallet::authorized([ALICE]);
    let portal = MockPortal::with_waves([raw_wave(WAVER, 1000, "hi")]);
    let view = view(&wallet, &portal);
    view.mount().await;
    view.on_new_wave_event(WAVER, U256::from(2000), "live".into());
    assert_eq!(view.state().wave_history.len(), 2);

    view.mount().await;
    assert_eq!(view.state().wave_history.len(), 1);
    assert_eq!(portal.subscriber_count(), 1);
    assert_eq!(wallet.listener_count(), 1);

    view.unmount().await;
    view.mount().await;
    assert!(view.is_mounted());
    assert_eq!(view.state().wave_history.len(), 1);
    assert_eq!(portal.subscriber_count(), 1);
}
