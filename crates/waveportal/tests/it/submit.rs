use crate::utils::*;
use tokio::sync::mpsc;
use waveportal::{SubmitOutcome, SubmitState, ViewSettings, WaveView};
use waveportal_test_utils::{MockPortal, MockWallet, SentWave};

/// Reports every change of the submit state.
fn submit_transitions(view: &WaveView) -> mpsc::UnboundedReceiver<SubmitState> {
    let mut states = view.subscribe();
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        let mut last = states.borrow_and_update().submit;
        while states.changed().await.is_ok() {
            let submit = states.borrow_and_update().submit;
            if submit != last {
                last = submit;
                if tx.send(submit).is_err() {
                    break;
                }
            }
        }
    });
    rx
}

#[tokio::test]
async fn short_messages_are_not_sent() {
    let wallet = MockWallet::authorized([ALICE]);
    let portal = MockPortal::new();
    let view = view(&wallet, &portal);
    view.mount().await;
    view.set_pending_message("hey");
    let calls = portal.calls();

    for (message, len) in [("", 0), ("a", 1), ("hey", 3), ("👋👋👋", 3)] {
        assert_eq!(
            view.submit_wave(message).await,
            SubmitOutcome::RejectedTooShort { len, min: 4 },
            "{message:?}"
        );
    }

    let state = view.state();
    assert_eq!(state.pending_message, "hey");
    assert_eq!(state.submit, SubmitState::Idle);
    assert!(portal.sent().is_empty());
    assert_eq!(portal.calls(), calls);
}

#[tokio::test]
async fn length_counts_characters() {
    let wallet = MockWallet::authorized([ALICE]);
    let portal = MockPortal::new();
    let view = view(&wallet, &portal);
    view.mount().await;

    let outcome = view.submit_wave("👋👋👋👋").await;
    assert!(matches!(outcome, SubmitOutcome::Mined(_)), "{outcome:?}");
    assert_eq!(portal.sent()[0].message, "👋👋👋👋");
}

#[tokio::test]
async fn submit_mines_and_refreshes_count() {
    let wallet = MockWallet::authorized([ALICE]);
    let portal = MockPortal::with_waves([raw_wave(WAVER, 1000, "hi")]);
    let view = view(&wallet, &portal);
    view.mount().await;
    view.set_pending_message("hello");

    let outcome = view.submit_wave("hello").await;
    let SubmitOutcome::Mined(tx_hash) = outcome else { panic!("not mined: {outcome:?}") };
    assert!(!tx_hash.is_zero());

    assert_eq!(
        portal.sent(),
        vec![SentWave { signer: Some(ALICE), message: "hello".into(), gas_limit: 300_000 }]
    );
    let calls = portal.calls();
    assert_eq!(calls[calls.len() - 3..], ["getTotalWaves", "wave", "getTotalWaves"]);

    let state = view.state();
    assert_eq!(state.total_wave_count, 2);
    assert_eq!(state.pending_message, "");
    assert!(!state.is_submitting());

    // the mined wave arrives through the subscription
    let state = wait_for(&view, |state| state.wave_history.len() == 2).await;
    assert_eq!(state.wave_history[1].address(), ALICE);
    assert_eq!(state.wave_history[1].message(), "hello");
}

#[tokio::test]
async fn pending_message_clears_before_confirmation() {
    let wallet = MockWallet::authorized([ALICE]);
    let portal = MockPortal::new();
    let view = view(&wallet, &portal);
    view.mount().await;
    view.set_pending_message("hello");
    portal.hold_confirmations();

    let submit = tokio::spawn({
        let view = view.clone();
        async move { view.submit_wave("hello").await }
    });

    let state = wait_for(&view, |state| state.pending_message.is_empty()).await;
    assert!(state.is_submitting());
    assert_eq!(state.total_wave_count, 0);
    assert_eq!(portal.sent().len(), 1);

    portal.release_confirmations();
    assert!(matches!(submit.await.unwrap(), SubmitOutcome::Mined(_)));
    let state = view.state();
    assert!(!state.is_submitting());
    assert_eq!(state.total_wave_count, 1);
}

#[tokio::test]
async fn failed_confirmation_settles() {
    let wallet = MockWallet::authorized([ALICE]);
    let portal = MockPortal::new();
    portal.set_fail_confirmation(true);
    portal.hold_confirmations();
    let view = view(&wallet, &portal);
    view.mount().await;
    view.set_pending_message("hello");

    let submit = tokio::spawn({
        let view = view.clone();
        async move { view.submit_wave("hello").await }
    });
    wait_for(&view, |state| state.is_submitting()).await;

    portal.release_confirmations();
    let outcome = submit.await.unwrap();
    assert_eq!(outcome, SubmitOutcome::Failed("transaction dropped".into()));

    let state = view.state();
    assert_eq!(state.submit, SubmitState::Idle);
    // not restored
    assert_eq!(state.pending_message, "");
}

#[tokio::test]
async fn failed_send_keeps_message() {
    let wallet = MockWallet::authorized([ALICE]);
    let portal = MockPortal::new();
    portal.set_fail_send(true);
    let view = view(&wallet, &portal);
    view.mount().await;
    view.set_pending_message("hello");

    let outcome = view.submit_wave("hello").await;
    assert_eq!(outcome, SubmitOutcome::Failed("insufficient funds for gas".into()));

    let state = view.state();
    assert!(!state.is_submitting());
    assert_eq!(state.pending_message, "hello");
    assert!(portal.sent().is_empty());
}

#[tokio::test]
async fn failed_count_refresh_aborts_submit() {
    let wallet = MockWallet::authorized([ALICE]);
    let portal = MockPortal::new();
    let view = view(&wallet, &portal);
    view.mount().await;
    portal.set_fail_reads(true);

    let outcome = view.submit_wave("hello").await;
    assert_eq!(outcome, SubmitOutcome::Failed("getTotalWaves failed".into()));
    assert!(portal.sent().is_empty());
    assert!(!view.state().is_submitting());
}

#[tokio::test]
async fn uses_configured_settings() {
    let wallet = MockWallet::authorized([ALICE]);
    let portal = MockPortal::new();
    let settings = ViewSettings { gas_limit: 120_000, min_message_len: 2 };
    let view = view_with(&wallet, &portal, settings);
    view.mount().await;

    assert_eq!(
        view.submit_wave("x").await,
        SubmitOutcome::RejectedTooShort { len: 1, min: 2 }
    );
    assert!(matches!(view.submit_wave("gm").await, SubmitOutcome::Mined(_)));
    assert_eq!(portal.sent()[0].gas_limit, 120_000);
}

#[tokio::test]
async fn writes_after_unmount_are_dropped() {
    let wallet = MockWallet::authorized([ALICE]);
    let portal = MockPortal::new();
    let view = view(&wallet, &portal);
    view.mount().await;
    portal.hold_confirmations();

    let submit = tokio::spawn({
        let view = view.clone();
        async move { view.submit_wave("hello").await }
    });
    let frozen = wait_for(&view, |state| state.is_submitting() && portal.sent().len() == 1).await;
    view.unmount().await;

    portal.release_confirmations();
    // the transaction itself is not cancelled
    assert!(matches!(submit.await.unwrap(), SubmitOutcome::Mined(_)));
    assert_eq!(view.state(), frozen);
    assert!(view.state().is_submitting());
}

#[tokio::test]
async fn submit_state_toggles_once_per_call() {
    let wallet = MockWallet::authorized([ALICE]);
    let portal = MockPortal::new();
    let view = view(&wallet, &portal);
    view.mount().await;
    let mut transitions = submit_transitions(&view);

    for fail in [false, true] {
        portal.set_fail_confirmation(fail);
        portal.hold_confirmations();
        let submit = tokio::spawn({
            let view = view.clone();
            async move { view.submit_wave("hello").await }
        });
        assert_eq!(transitions.recv().await, Some(SubmitState::Submitting));

        portal.release_confirmations();
        let outcome = submit.await.unwrap();
        assert_eq!(matches!(outcome, SubmitOutcome::Mined(_)), !fail, "{outcome:?}");
        assert_eq!(transitions.recv().await, Some(SubmitState::Idle));
    }

    // rejected messages never enter the submitting state
    view.submit_wave("hey").await;
    tokio::task::yield_now().await;
    assert!(transitions.try_recv().is_err());
}

#[tokio::test]
async fn stale_submit_does_not_write_into_remount() {
    let wallet = MockWallet::authorized([ALICE]);
    let portal = MockPortal::new();
    let view = view(&wallet, &portal);
    view.mount().await;
    portal.hold_confirmations();

    let submit = tokio::spawn({
        let view = view.clone();
        async move { view.submit_wave("hello").await }
    });
    wait_for(&view, |state| state.is_submitting() && portal.sent().len() == 1).await;

    view.unmount().await;
    view.mount().await;
    view.set_pending_message("second");
    let fresh = view.state();
    assert_eq!(fresh.total_wave_count, 0);
    assert_eq!(fresh.submit, SubmitState::Idle);

    portal.release_confirmations();
    assert!(matches!(submit.await.unwrap(), SubmitOutcome::Mined(_)));

    // the mined wave reaches the new lifetime through its own subscription
    let state = wait_for(&view, |state| state.wave_history.len() == 1).await;
    assert_eq!(state.total_wave_count, 0);
    assert_eq!(state.submit, SubmitState::Idle);
    assert_eq!(state.pending_message, "second");
    assert_eq!(state.wave_history[0].message(), "hello");
}
