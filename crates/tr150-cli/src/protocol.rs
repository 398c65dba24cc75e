//! Line protocol spoken on stdin/stdout.
//!
//! Each input line is one JSON [`Request`]; each output line is one JSON
//! [`Output`]. Decode events are written as they arrive, interleaved with
//! command results.
//!
//! ```text
//! {"op":"host","signal":"attached"}
//! {"op":"host","signal":"resumed"}
//! {"op":"subscribe"}
//! {"op":"call","method":"openScanner"}
//! {"op":"scan","payload":"4006381333931"}
//! ```

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tr150_bridge::{BridgeFacade, GateState, HostSignal, MethodCall, PlaneSnapshot};
use tr150_core::CommandResult;
use tr150_core::constants::EVENT_CHANNEL;
use tr150_hardware::{DecodeEvent, MockPeripherals};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    /// Invoke a bridge command.
    Call(MethodCall),

    /// Deliver a host lifecycle signal.
    Host { signal: HostSignal },

    Subscribe,
    Unsubscribe,

    /// Simulate a barcode read on the mock scanner.
    Scan {
        payload: String,
        #[serde(default)]
        barcode_type: u8,
    },

    /// Report the event plane state.
    State,

    /// Report device information.
    Info,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Output {
    Result { method: String, result: CommandResult },
    Gate { signal: HostSignal, state: GateState },
    Subscribed,
    Unsubscribed { was_subscribed: bool },
    Scanned { receivers: usize },
    Event { channel: &'static str, payload: String },
    State(PlaneSnapshot),
    Info { printer: String, scanner: String },
    Error { message: String },
}

impl Output {
    fn error(err: impl std::fmt::Display) -> Self {
        Self::Error {
            message: err.to_string(),
        }
    }
}

/// Execute one request against the bridge.
///
/// Subscribing spawns a task forwarding the new stream into `out`; it ends by
/// itself when the stream is replaced or closed.
pub async fn handle(
    bridge: &BridgeFacade,
    mocks: &MockPeripherals,
    request: Request,
    out: &mpsc::UnboundedSender<Output>,
) -> Output {
    debug!(?request, "Handling request");

    match request {
        Request::Call(call) => {
            let result = bridge.dispatch_call(&call).await;
            Output::Result {
                method: call.method,
                result,
            }
        }
        Request::Host { signal } => match bridge.host_signal(signal).await {
            Ok(state) => Output::Gate { signal, state },
            Err(e) => Output::error(e),
        },
        Request::Subscribe => match bridge.subscribe().await {
            Ok(mut stream) => {
                let out = out.clone();
                tokio::spawn(async move {
                    while let Some(payload) = stream.recv().await {
                        let event = Output::Event {
                            channel: EVENT_CHANNEL,
                            payload,
                        };
                        if out.send(event).is_err() {
                            break;
                        }
                    }
                });
                Output::Subscribed
            }
            Err(e) => Output::error(e),
        },
        Request::Unsubscribe => match bridge.unsubscribe().await {
            Ok(was_subscribed) => Output::Unsubscribed { was_subscribed },
            Err(e) => Output::error(e),
        },
        Request::Scan {
            payload,
            barcode_type,
        } => {
            let event = DecodeEvent::text(payload).with_barcode_type(barcode_type);
            Output::Scanned {
                receivers: mocks.scanner.emit(event),
            }
        }
        Request::State => match bridge.event_plane_state().await {
            Ok(snapshot) => Output::State(snapshot),
            Err(e) => Output::error(e),
        },
        Request::Info => match bridge.adapter().device_info().await {
            Ok(info) => Output::Info {
                printer: info.printer.model,
                scanner: info.scanner.model,
            },
            Err(e) => Output::error(e),
        },
    }
}
