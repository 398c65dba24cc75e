//! The bridge's public entry point.
//!
//! [`BridgeFacade`] ties together the command path and the event plane:
//!
//! - commands go straight to the [`CommandDispatcher`] and are answered with
//!   a [`CommandResult`]
//! - subscriptions and host lifecycle signals are messages to the event
//!   plane task
//!
//! The two never wait on each other: a slow printer job does not delay a
//! pause, and a burst of scans does not delay a command.
//!
//! # Examples
//!
//! ```
//! use tr150_bridge::{BridgeConfig, BridgeFacade, HostSignal, MethodCall};
//! use tr150_hardware::PeripheralAdapter;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (adapter, mocks) = PeripheralAdapter::mock();
//!     let bridge = BridgeFacade::start(adapter, BridgeConfig::default())?;
//!
//!     let result = bridge.dispatch_call(&MethodCall::new("openScanner")).await;
//!     assert!(result.is_success());
//!
//!     let mut events = bridge.subscribe().await?;
//!     bridge.host_signal(HostSignal::Attached).await?;
//!     bridge.host_signal(HostSignal::Resumed).await?;
//!
//!     mocks.scanner.emit_text("4006381333931");
//!     assert_eq!(events.recv().await.as_deref(), Some("4006381333931"));
//!
//!     bridge.shutdown().await?;
//!     Ok(())
//! }
//! ```

use std::sync::Arc;

use tokio::task::JoinHandle;
use tr150_core::CommandResult;
use tr150_hardware::PeripheralAdapter;
use tracing::{debug, info};

use crate::call::MethodCall;
use crate::command::Command;
use crate::config::BridgeConfig;
use crate::dispatcher::CommandDispatcher;
use crate::error::{BridgeError, Result};
use crate::lifecycle::{GateState, HostSignal};
use crate::plane::{EventPlane, PlaneHandle, PlaneMessage, PlaneSnapshot};
use crate::relay::EventStream;

/// Printer/scanner bridge.
///
/// Must be started from within a Tokio runtime.
#[derive(Debug)]
pub struct BridgeFacade {
    dispatcher: CommandDispatcher,
    plane: PlaneHandle,
    plane_task: JoinHandle<()>,
    config: BridgeConfig,
}

impl BridgeFacade {
    /// Validate the configuration and start the event plane.
    ///
    /// The gate starts Inactive and unbound; nothing is registered with the
    /// decode source until the host attaches and resumes.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Config`] for an invalid configuration and
    /// [`BridgeError::NoRuntime`] when called outside a Tokio runtime.
    pub fn start(adapter: PeripheralAdapter, config: BridgeConfig) -> Result<Self> {
        config.validate()?;
        tokio::runtime::Handle::try_current().map_err(|_| BridgeError::NoRuntime)?;

        let adapter = Arc::new(adapter);
        let (plane, plane_task) = EventPlane::spawn(adapter.decode_source().clone(), &config);
        let dispatcher = CommandDispatcher::new(adapter, config.return_code_policy);

        info!(
            policy = ?config.return_code_policy,
            event_buffer = config.event_buffer,
            "Bridge started"
        );

        Ok(Self {
            dispatcher,
            plane,
            plane_task,
            config,
        })
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// The peripheral adapter behind this bridge.
    pub fn adapter(&self) -> &PeripheralAdapter {
        self.dispatcher.adapter()
    }

    /// Execute a decoded command.
    pub async fn dispatch(&self, command: &Command) -> CommandResult {
        self.dispatcher.dispatch(command).await
    }

    /// Decode and execute a host method call.
    pub async fn dispatch_call(&self, call: &MethodCall) -> CommandResult {
        self.dispatcher.dispatch_call(call).await
    }

    /// Open the event stream, replacing (and ending) any previous one.
    pub async fn subscribe(&self) -> Result<EventStream> {
        self.plane.subscribe().await
    }

    /// Close the event stream. Returns whether a subscriber was present.
    pub async fn unsubscribe(&self) -> Result<bool> {
        self.plane.unsubscribe().await
    }

    /// Apply a host lifecycle signal and wait for the resulting gate state.
    pub async fn host_signal(&self, signal: HostSignal) -> Result<GateState> {
        self.plane.host_signal(signal).await
    }

    pub async fn on_host_resume(&self) -> Result<GateState> {
        self.host_signal(HostSignal::Resumed).await
    }

    pub async fn on_host_pause(&self) -> Result<GateState> {
        self.host_signal(HostSignal::Paused).await
    }

    /// A sender for pushing lifecycle signals without waiting.
    pub fn host_signals(&self) -> HostSignalSender {
        HostSignalSender {
            plane: self.plane.clone(),
        }
    }

    /// Current gate, binding and subscription state.
    pub async fn event_plane_state(&self) -> Result<PlaneSnapshot> {
        self.plane.snapshot().await
    }

    /// Deregister the decode source, end the event stream and stop the
    /// event plane.
    pub async fn shutdown(self) -> Result<()> {
        debug!("Bridge shutting down");
        self.plane.shutdown().await?;
        self.plane_task.await?;
        info!("Bridge stopped");
        Ok(())
    }
}

/// Pushes host lifecycle signals into the bridge without waiting.
///
/// Signals are applied in the order they are sent, relative to each other
/// and to subscribe/unsubscribe calls. A live sender keeps the event plane
/// running until [`BridgeFacade::shutdown`].
#[derive(Debug, Clone)]
pub struct HostSignalSender {
    plane: PlaneHandle,
}

impl HostSignalSender {
    pub fn send(&self, signal: HostSignal) -> Result<()> {
        self.plane.send(PlaneMessage::Host {
            signal,
            reply: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tr150_core::{FailureKind, ResultValue};

    #[tokio::test]
    async fn test_start_rejects_invalid_config() {
        let (adapter, _mocks) = PeripheralAdapter::mock();
        let result = BridgeFacade::start(adapter, BridgeConfig::default().with_event_buffer(0));
        assert!(matches!(result, Err(BridgeError::Config(_))));
    }

    #[test]
    fn test_start_outside_runtime() {
        let (adapter, _mocks) = PeripheralAdapter::mock();
        let result = BridgeFacade::start(adapter, BridgeConfig::default());
        assert!(matches!(result, Err(BridgeError::NoRuntime)));
    }

    #[tokio::test]
    async fn test_dispatch_through_facade() {
        let (adapter, mocks) = PeripheralAdapter::mock();
        let bridge = BridgeFacade::start(adapter, BridgeConfig::default()).unwrap();

        let result = bridge.dispatch(&Command::OpenPrinter).await;
        assert_eq!(result.value(), Some(&ResultValue::Bool(true)));
        assert!(mocks.printer.is_open().await);

        let result = bridge.dispatch_call(&MethodCall::new("printPage")).await;
        assert_eq!(result.failure_kind(), Some(FailureKind::InvalidArgument));
    }

    #[tokio::test]
    async fn test_host_signal_sender() {
        let (adapter, mocks) = PeripheralAdapter::mock();
        let bridge = BridgeFacade::start(adapter, BridgeConfig::default()).unwrap();
        let signals = bridge.host_signals();

        signals.send(HostSignal::Attached).unwrap();
        signals.send(HostSignal::Resumed).unwrap();

        let state = bridge.event_plane_state().await.unwrap();
        assert_eq!(state.gate, GateState::Active);
        assert_eq!(mocks.scanner.registration_count(), 1);
    }

    #[tokio::test]
    async fn test_sender_fails_after_shutdown() {
        let (adapter, _mocks) = PeripheralAdapter::mock();
        let bridge = BridgeFacade::start(adapter, BridgeConfig::default()).unwrap();
        let signals = bridge.host_signals();

        bridge.shutdown().await.unwrap();
        assert!(matches!(
            signals.send(HostSignal::Resumed),
            Err(BridgeError::PlaneStopped)
        ));
    }

    #[tokio::test]
    async fn test_device_info() {
        let (adapter, _mocks) = PeripheralAdapter::mock();
        let bridge = BridgeFacade::start(adapter, BridgeConfig::default()).unwrap();

        let info = bridge.adapter().device_info().await.unwrap();
        assert_eq!(info.scanner.name, "Mock Scanner");
    }
}
