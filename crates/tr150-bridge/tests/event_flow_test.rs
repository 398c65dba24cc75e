//! Integration tests for decode event delivery and the host lifecycle.

mod common;

use futures::StreamExt;
use tr150_bridge::{Binding, BridgeConfig, GateState, HostSignal};
use tr150_hardware::DecodeEvent;

// ============================================================================
// Subscription
// ============================================================================

#[tokio::test]
async fn test_last_subscriber_wins() {
    let (bridge, mocks) = common::start_bridge();
    let mut first = bridge.subscribe().await.unwrap();
    let mut second = bridge.subscribe().await.unwrap();
    common::activate(&bridge).await;

    assert_eq!(mocks.scanner.emit_text("4006381333931"), 1);

    assert_eq!(common::next_event(&mut second).await.as_deref(), Some("4006381333931"));
    // The replaced stream ends without ever seeing the event.
    assert_eq!(first.recv().await, None);
}

#[tokio::test]
async fn test_no_subscriber_drops_events() {
    let (bridge, mocks) = common::start_bridge();
    common::activate(&bridge).await;

    mocks.scanner.emit_text("dropped");
    let mut stream = bridge.subscribe().await.unwrap();
    mocks.scanner.emit_text("kept");

    assert_eq!(common::next_event(&mut stream).await.as_deref(), Some("kept"));
    bridge.event_plane_state().await.unwrap();
    common::assert_no_event(&mut stream);
}

#[tokio::test]
async fn test_unsubscribe_ends_stream() {
    let (bridge, mocks) = common::start_bridge();
    let mut stream = bridge.subscribe().await.unwrap();
    common::activate(&bridge).await;

    assert!(bridge.unsubscribe().await.unwrap());
    assert!(!bridge.unsubscribe().await.unwrap());
    mocks.scanner.emit_text("after unsubscribe");

    assert_eq!(stream.recv().await, None);
}

#[tokio::test]
async fn test_events_arrive_in_order() {
    let (bridge, mocks) = common::start_bridge();
    let stream = bridge.subscribe().await.unwrap();
    common::activate(&bridge).await;

    let codes: Vec<String> = (0..10).map(|i| format!("CODE-{i:03}")).collect();
    for code in &codes {
        mocks.scanner.emit_text(code.clone());
    }
    bridge.unsubscribe().await.unwrap();

    let received: Vec<String> = stream.collect().await;
    assert_eq!(received, codes);
}

#[tokio::test]
async fn test_payloadless_events_skipped() {
    let (bridge, mocks) = common::start_bridge();
    let mut stream = bridge.subscribe().await.unwrap();
    common::activate(&bridge).await;

    mocks.scanner.emit(DecodeEvent::raw(vec![0x00, 0x9f, 0x12]).with_barcode_type(0x71));
    mocks.scanner.emit(DecodeEvent::text("ABC-123").with_barcode_type(3));

    assert_eq!(common::next_event(&mut stream).await.as_deref(), Some("ABC-123"));
}

#[tokio::test]
async fn test_slow_subscriber_does_not_block_scanner() {
    let (bridge, mocks) = common::start_bridge_with(BridgeConfig::default().with_event_buffer(2));
    let mut stream = bridge.subscribe().await.unwrap();
    common::activate(&bridge).await;

    for i in 0..5 {
        mocks.scanner.emit_text(format!("{i}"));
    }
    bridge.event_plane_state().await.unwrap();

    assert_eq!(stream.try_recv().unwrap(), "0");
    assert_eq!(stream.try_recv().unwrap(), "1");
    common::assert_no_event(&mut stream);
}

// ============================================================================
// Lifecycle gate
// ============================================================================

#[tokio::test]
async fn test_resume_event_pause_event_delivers_one() {
    let (bridge, mocks) = common::start_bridge();
    let mut stream = bridge.subscribe().await.unwrap();
    common::activate(&bridge).await;

    mocks.scanner.emit_text("first");
    assert_eq!(bridge.on_host_pause().await.unwrap(), GateState::Inactive);
    assert_eq!(mocks.scanner.emit_text("second"), 0);

    assert_eq!(stream.try_recv().unwrap(), "first");
    common::assert_no_event(&mut stream);
}

#[tokio::test]
async fn test_double_resume_registers_once() {
    let (bridge, mocks) = common::start_bridge();
    let mut stream = bridge.subscribe().await.unwrap();
    common::activate(&bridge).await;

    assert_eq!(bridge.on_host_resume().await.unwrap(), GateState::Active);

    assert_eq!(mocks.scanner.registration_count(), 1);
    assert_eq!(mocks.scanner.total_registrations(), 1);

    // One registration, so one delivery.
    assert_eq!(mocks.scanner.emit_text("once"), 1);
    assert_eq!(common::next_event(&mut stream).await.as_deref(), Some("once"));
    bridge.event_plane_state().await.unwrap();
    common::assert_no_event(&mut stream);
}

#[tokio::test]
async fn test_pause_resume_preserves_subscription() {
    let (bridge, mocks) = common::start_bridge();
    let mut stream = bridge.subscribe().await.unwrap();
    common::activate(&bridge).await;

    bridge.on_host_pause().await.unwrap();
    bridge.on_host_resume().await.unwrap();

    mocks.scanner.emit_text("back again");
    assert_eq!(common::next_event(&mut stream).await.as_deref(), Some("back again"));
    assert_eq!(mocks.scanner.total_registrations(), 2);
    assert_eq!(mocks.scanner.registration_count(), 1);
}

#[tokio::test]
async fn test_resume_before_attach_is_ignored() {
    let (bridge, mocks) = common::start_bridge();

    assert_eq!(bridge.on_host_resume().await.unwrap(), GateState::Inactive);
    assert_eq!(mocks.scanner.registration_count(), 0);

    let state = bridge.event_plane_state().await.unwrap();
    assert_eq!(state.binding, Binding::Unbound);
}

#[tokio::test]
async fn test_config_change_recreation_keeps_subscriber() {
    let (bridge, mocks) = common::start_bridge();
    let mut stream = bridge.subscribe().await.unwrap();
    common::activate(&bridge).await;

    bridge
        .host_signal(HostSignal::DetachedForConfigChange)
        .await
        .unwrap();
    assert_eq!(mocks.scanner.registration_count(), 0);
    assert!(bridge.event_plane_state().await.unwrap().subscribed);

    common::activate(&bridge).await;
    mocks.scanner.emit_text("rotated");
    assert_eq!(common::next_event(&mut stream).await.as_deref(), Some("rotated"));
}

#[tokio::test]
async fn test_final_detach_closes_stream() {
    let (bridge, mocks) = common::start_bridge();
    let mut stream = bridge.subscribe().await.unwrap();
    common::activate(&bridge).await;

    bridge.host_signal(HostSignal::Detached).await.unwrap();

    assert_eq!(mocks.scanner.registration_count(), 0);
    assert_eq!(stream.recv().await, None);
    let state = bridge.event_plane_state().await.unwrap();
    assert_eq!(state.gate, GateState::Inactive);
    assert!(!state.subscribed);
}

#[tokio::test]
async fn test_registration_failure_leaves_gate_inactive() {
    let (bridge, mocks) = common::start_bridge();
    bridge.host_signal(HostSignal::Attached).await.unwrap();
    mocks.scanner.fail_next_registration();

    assert_eq!(bridge.on_host_resume().await.unwrap(), GateState::Inactive);
    assert_eq!(mocks.scanner.registration_count(), 0);

    // The next resume tries again.
    assert_eq!(bridge.on_host_resume().await.unwrap(), GateState::Active);
    assert_eq!(mocks.scanner.registration_count(), 1);
}

#[tokio::test]
async fn test_signals_from_host_thread() {
    let (bridge, mocks) = common::start_bridge();
    let mut stream = bridge.subscribe().await.unwrap();
    let signals = bridge.host_signals();

    // The host's UI thread is not a runtime thread.
    std::thread::spawn(move || {
        signals.send(HostSignal::Attached).unwrap();
        signals.send(HostSignal::Resumed).unwrap();
    })
    .join()
    .unwrap();

    assert_eq!(bridge.event_plane_state().await.unwrap().gate, GateState::Active);
    mocks.scanner.emit_text("from host");
    assert_eq!(common::next_event(&mut stream).await.as_deref(), Some("from host"));
}

#[tokio::test]
async fn test_scans_from_driver_thread() {
    let (bridge, mocks) = common::start_bridge();
    let stream = bridge.subscribe().await.unwrap();
    common::activate(&bridge).await;

    let scanner = mocks.scanner.clone();
    std::thread::spawn(move || {
        for i in 0..3 {
            scanner.emit_text(format!("T{i}"));
        }
    })
    .join()
    .unwrap();
    bridge.unsubscribe().await.unwrap();

    let received: Vec<String> = stream.collect().await;
    assert_eq!(received, vec!["T0", "T1", "T2"]);
}

#[tokio::test]
async fn test_shutdown_deregisters_and_closes() {
    let (bridge, mocks) = common::start_bridge();
    let mut stream = bridge.subscribe().await.unwrap();
    common::activate(&bridge).await;

    bridge.shutdown().await.unwrap();

    assert_eq!(mocks.scanner.registration_count(), 0);
    assert_eq!(stream.recv().await, None);
}
