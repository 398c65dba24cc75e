//! Concurrent callers against one bridge.

mod common;

use std::sync::Arc;

use tr150_bridge::HostSignal;
use tr150_core::{CommandKind, PageSize, ResultValue};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_status_during_setup_page_is_never_torn() {
    for _ in 0..50 {
        let (bridge, _mocks) = common::start_bridge();
        let bridge = Arc::new(bridge);
        bridge.dispatch_call(&common::valid_call(CommandKind::OpenPrinter)).await;
        bridge
            .dispatch_call(
                &tr150_bridge::MethodCall::new("setupPage")
                    .arg("width", 50)
                    .arg("height", 50),
            )
            .await;

        let setup = {
            let bridge = Arc::clone(&bridge);
            tokio::spawn(async move {
                bridge
                    .dispatch_call(
                        &tr150_bridge::MethodCall::new("setupPage")
                            .arg("width", 100)
                            .arg("height", 200),
                    )
                    .await
            })
        };
        let status = {
            let bridge = Arc::clone(&bridge);
            tokio::spawn(async move {
                bridge
                    .dispatch_call(&common::valid_call(CommandKind::GetStatus))
                    .await
            })
        };

        assert!(setup.await.unwrap().is_success());
        let status = status.await.unwrap();
        let page = status.value().and_then(ResultValue::as_status).unwrap().page;
        assert!(
            page == Some(PageSize::new(50, 50)) || page == Some(PageSize::new(100, 200)),
            "torn page state: {page:?}"
        );
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_interleaved_printer_and_scanner_callers() {
    let (bridge, mocks) = common::start_bridge();
    let bridge = Arc::new(bridge);
    bridge.dispatch_call(&common::valid_call(CommandKind::OpenPrinter)).await;
    bridge.dispatch_call(&common::valid_call(CommandKind::SetupPage)).await;
    bridge.dispatch_call(&common::valid_call(CommandKind::OpenScanner)).await;

    let printer = {
        let bridge = Arc::clone(&bridge);
        tokio::spawn(async move {
            for _ in 0..20 {
                let result = bridge
                    .dispatch_call(&common::valid_call(CommandKind::DrawText))
                    .await;
                assert!(result.is_success());
            }
        })
    };
    let scanner = {
        let bridge = Arc::clone(&bridge);
        tokio::spawn(async move {
            for _ in 0..10 {
                assert!(bridge
                    .dispatch_call(&common::valid_call(CommandKind::StartDecode))
                    .await
                    .is_success());
                assert!(bridge
                    .dispatch_call(&common::valid_call(CommandKind::StopDecode))
                    .await
                    .is_success());
            }
        })
    };
    printer.await.unwrap();
    scanner.await.unwrap();

    assert_eq!(mocks.printer.pending_primitives().await.len(), 20);
    assert_eq!(mocks.scanner.call_count().await, 21);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_lifecycle_churn_never_double_registers() {
    let (bridge, mocks) = common::start_bridge();
    let bridge = Arc::new(bridge);
    let _stream = bridge.subscribe().await.unwrap();
    bridge.host_signal(HostSignal::Attached).await.unwrap();

    let mut tasks = tokio::task::JoinSet::new();
    for i in 0..16 {
        let bridge = Arc::clone(&bridge);
        let signal = if i % 2 == 0 {
            HostSignal::Resumed
        } else {
            HostSignal::Paused
        };
        tasks.spawn(async move { bridge.host_signal(signal).await.unwrap() });
    }
    let scanner = mocks.scanner.clone();
    let emitter = std::thread::spawn(move || {
        for i in 0..200 {
            scanner.emit_text(format!("{i}"));
        }
    });
    while let Some(result) = tasks.join_next().await {
        result.unwrap();
    }
    emitter.join().unwrap();

    let state = bridge.event_plane_state().await.unwrap();
    let expected = usize::from(state.gate == tr150_bridge::GateState::Active);
    assert_eq!(mocks.scanner.registration_count(), expected);
}
