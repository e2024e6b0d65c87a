use crate::utils::*;
use waveportal_test_utils::{MockPortal, MockWallet};

#[tokio::test]
async fn switching_accounts_reloads() {
    let wallet = MockWallet::authorized([ALICE]);
    let portal = MockPortal::with_waves([raw_wave(WAVER, 1000, "hi")]);
    let view = view(&wallet, &portal);
    view.mount().await;
    view.on_new_wave_event(WAVER, alloy_primitives::U256::from(2000), "live".into());
    assert_eq!(view.state().wave_history.len(), 2);

    wallet.switch_accounts([BOB, ALICE]);
    let state = wait_for(&view, |state| {
        state.current_account == Some(BOB) && state.wave_history.len() == 1
    })
    .await;
    assert_eq!(state.wave_history[0].message(), "hi");
    assert_eq!(state.total_wave_count, 1);

    assert_eq!(portal.connects(), vec![Some(ALICE), Some(BOB)]);
    assert_eq!(portal.subscriber_count(), 1);

    // writes are now sent from the new account
    view.submit_wave("hello").await;
    assert_eq!(portal.sent()[0].signer, Some(BOB));
}

#[tokio::test]
async fn locking_the_wallet_clears_history() {
    let wallet = MockWallet::authorized([ALICE]);
    let portal = MockPortal::with_waves([raw_wave(WAVER, 1000, "hi")]);
    let view = view(&wallet, &portal);
    view.mount().await;
    let calls = portal.calls().len();

    view.on_accounts_changed(Vec::new()).await;
    let state = view.state();
    assert_eq!(state.current_account, None);
    assert!(state.wave_history.is_empty());
    // the last known count stays
    assert_eq!(state.total_wave_count, 1);
    // resubscribed, nothing fetched
    assert_eq!(portal.calls()[calls..], ["NewWave"]);
    assert_eq!(portal.subscriber_count(), 1);
}

#[tokio::test]
async fn same_account_is_ignored() {
    let wallet = MockWallet::authorized([ALICE]);
    let portal = MockPortal::with_waves([raw_wave(WAVER, 1000, "hi")]);
    let view = view(&wallet, &portal);
    view.mount().await;
    let before = view.state();
    let calls = portal.calls();

    view.on_accounts_changed(vec![ALICE, BOB]).await;
    assert_eq!(view.state(), before);
    assert_eq!(portal.calls(), calls);
    assert_eq!(portal.connects(), vec![Some(ALICE)]);
}

#[tokio::test]
async fn events_follow_the_new_subscription() {
    let wallet = MockWallet::authorized([ALICE]);
    let portal = MockPortal::new();
    let view = view(&wallet, &portal);
    view.mount().await;

    view.on_accounts_changed(vec![BOB]).await;
    assert_eq!(portal.subscriber_count(), 1);

    portal.emit(WAVER, alloy_primitives::U256::from(1000u64), "once");
    let state = wait_for(&view, |state| !state.wave_history.is_empty()).await;
    assert_eq!(state.wave_history.len(), 1);
}
