use crate::utils::*;
use alloy_primitives::U256;
use waveportal::WaveRecord;
use waveportal_test_utils::{MockPortal, MockWallet};

#[tokio::test]
async fn events_append_in_call_order() {
    let wallet = MockWallet::authorized([ALICE]);
    let portal = MockPortal::with_waves([raw_wave(WAVER, 1000, "hi")]);
    let view = view(&wallet, &portal);
    view.mount().await;

    let messages = ["one", "two", "two", "three"];
    for (i, message) in messages.iter().enumerate() {
        view.on_new_wave_event(BOB, U256::from(2000 + i), message.to_string());
    }

    let state = view.state();
    let received: Vec<_> = state.wave_history.iter().map(WaveRecord::message).collect();
    assert_eq!(received, ["hi", "one", "two", "two", "three"]);
    assert!(state.wave_history[1..].iter().all(|wave| wave.address() == BOB));
    // the count is left to the contract
    assert_eq!(state.total_wave_count, 1);
}

#[tokio::test]
async fn subscription_delivers_live_waves() {
    let wallet = MockWallet::new();
    let portal = MockPortal::new();
    let view = view(&wallet, &portal);
    view.mount().await;

    portal.emit(BOB, U256::from(1000u64), "gm");
    let state = wait_for(&view, |state| !state.wave_history.is_empty()).await;
    assert_eq!(
        state.wave_history,
        vec![WaveRecord::from_unix(BOB, U256::from(1000), "gm").unwrap()]
    );
}

#[tokio::test]
async fn unconvertible_timestamps_are_dropped() {
    let wallet = MockWallet::new();
    let portal = MockPortal::new();
    let view = view(&wallet, &portal);
    view.mount().await;

    view.on_new_wave_event(BOB, U256::MAX, "too late".into());
    assert!(view.state().wave_history.is_empty());

    portal.emit(BOB, U256::MAX, "too late");
    portal.emit(BOB, U256::from(1000u64), "on time");
    let state = wait_for(&view, |state| !state.wave_history.is_empty()).await;
    assert_eq!(state.wave_history.len(), 1);
    assert_eq!(state.wave_history[0].message(), "on time");
}

#[tokio::test]
async fn unmount_removes_listeners() {
    let wallet = MockWallet::authorized([ALICE]);
    let portal = MockPortal::with_waves([raw_wave(WAVER, 1000, "hi")]);
    let view = view(&wallet, &portal);
    view.mount().await;
    assert_eq!(portal.subscriber_count(), 1);
    assert_eq!(wallet.listener_count(), 1);

    view.unmount().await;
    assert!(!view.is_mounted());
    assert_eq!(portal.subscriber_count(), 0);
    assert_eq!(wallet.listener_count(), 0);

    let before = view.state();
    view.on_new_wave_event(BOB, U256::from(2000), "ignored".into());
    view.set_pending_message("ignored");
    portal.emit(BOB, U256::from(2000u64), "ignored");
    assert_eq!(view.state(), before);

    // unmounting twice is a no-op
    view.unmount().await;
}
