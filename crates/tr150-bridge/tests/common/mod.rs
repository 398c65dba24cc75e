//! Common test utilities for bridge integration tests.
//!
//! - `start_*` helpers build a bridge over mock peripherals
//! - `valid_call` builds a well-formed method call for any command
//! - `driver_calls` collects what the mocks were asked to do

#![allow(dead_code)]

use std::time::Duration;

use serde_json::json;
use tokio::sync::mpsc::error::TryRecvError;
use tr150_bridge::{BridgeConfig, BridgeFacade, EventStream, GateState, HostSignal, MethodCall};
use tr150_core::CommandKind;
use tr150_hardware::{MockPeripherals, PeripheralAdapter};

/// How long to wait for an event that should arrive.
pub const EVENT_TIMEOUT: Duration = Duration::from_secs(2);

/// Start a bridge with default configuration over mock peripherals.
pub fn start_bridge() -> (BridgeFacade, MockPeripherals) {
    start_bridge_with(BridgeConfig::default())
}

pub fn start_bridge_with(config: BridgeConfig) -> (BridgeFacade, MockPeripherals) {
    let (adapter, mocks) = PeripheralAdapter::mock();
    let bridge = BridgeFacade::start(adapter, config).expect("valid test config");
    (bridge, mocks)
}

/// Attach and resume the host, asserting the gate ends up Active.
pub async fn activate(bridge: &BridgeFacade) {
    bridge.host_signal(HostSignal::Attached).await.unwrap();
    let state = bridge.host_signal(HostSignal::Resumed).await.unwrap();
    assert_eq!(state, GateState::Active, "gate did not activate");
}

/// A method call carrying every required argument, correctly typed.
pub fn valid_call(kind: CommandKind) -> MethodCall {
    let call = MethodCall::new(kind.method_name());
    match kind {
        CommandKind::SetSpeedLevel | CommandKind::SetGrayLevel => call.arg("level", 5),
        CommandKind::SetupPage => call.arg("width", 384).arg("height", 200),
        CommandKind::PrintPage => call.arg("rotate", 0),
        CommandKind::DrawLine => call
            .arg("x0", 0)
            .arg("y0", 10)
            .arg("x1", 383)
            .arg("y1", 10)
            .arg("lineWidth", 2),
        CommandKind::DrawText => call
            .arg("data", "Order #1042")
            .arg("x", 0)
            .arg("y", 20)
            .arg("fontName", "simsun")
            .arg("fontSize", 24)
            .arg("bold", true)
            .arg("italic", false)
            .arg("rotate", 0),
        CommandKind::DrawTextEx => call
            .arg("data", "Thank you for shopping with us")
            .arg("x", 0)
            .arg("y", 60)
            .arg("width", 384)
            .arg("height", 48)
            .arg("fontName", "simsun")
            .arg("fontSize", 20)
            .arg("rotate", 0)
            .arg("style", 0)
            .arg("format", 0),
        CommandKind::DrawBarcode => call
            .arg("data", "4006381333931")
            .arg("x", 20)
            .arg("y", 120)
            .arg("barcodeType", 20)
            .arg("width", 2)
            .arg("height", 60)
            .arg("rotate", 0),
        CommandKind::DrawBitmap => call
            .arg("pBmp", json!([0x42, 0x4d, 0x3e, 0x00, 0xff, 0x00]))
            .arg("xDest", 0)
            .arg("yDest", 0)
            .arg("widthDest", 48)
            .arg("heightDest", 48),
        _ => call,
    }
}

/// Every driver call made so far: printer calls first, then scanner calls.
pub async fn driver_calls(mocks: &MockPeripherals) -> Vec<&'static str> {
    let mut calls = mocks.printer.calls().await;
    calls.extend(mocks.scanner.calls().await);
    calls
}

/// Wait for the next event, failing the test if none arrives in time.
pub async fn next_event(stream: &mut EventStream) -> Option<String> {
    tokio::time::timeout(EVENT_TIMEOUT, stream.recv())
        .await
        .expect("timed out waiting for decode event")
}

/// Assert nothing is queued on the stream right now.
///
/// Callers synchronize with the event plane first (any awaited bridge call
/// does), so anything delivered before that point is already queued.
pub fn assert_no_event(stream: &mut EventStream) {
    match stream.try_recv() {
        Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => {}
        Ok(payload) => panic!("unexpected decode event: {payload}"),
    }
}
