//! Command/event bridge between a host application and the TR150's printer
//! and barcode scanner.
//!
//! # Overview
//!
//! The bridge has two independent paths:
//!
//! 1. **Commands**: the host sends one of eighteen named commands. A
//!    [`MethodCall`] is decoded into a typed [`Command`] at the boundary
//!    (rejecting missing or mistyped arguments before any driver is
//!    touched), and the [`CommandDispatcher`] turns it into exactly one
//!    driver call whose outcome becomes a [`CommandResult`].
//! 2. **Events**: decoded barcodes flow from the scanner's decode source
//!    through the [`EventRelay`] to the single current subscriber, but only
//!    while the [`LifecycleGate`] has the source registered, which it does
//!    while the host is in the foreground.
//!
//! ```text
//!  host ── MethodCall ──► BridgeFacade ──► CommandDispatcher ──► PeripheralAdapter
//!  host ◄─ EventStream ── EventRelay ◄── LifecycleGate ◄────── decode source
//!  host ── HostSignal ──► (event plane task)
//! ```
//!
//! Failures never escape as errors from `dispatch`: they are returned as
//! [`Failure`](tr150_core::Failure) values with a [`FailureKind`](tr150_core::FailureKind)
//! and, where the driver supplied one, its native code.
//!
//! [`CommandResult`]: tr150_core::CommandResult

pub mod call;
pub mod command;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod facade;
pub mod lifecycle;
mod plane;
pub mod relay;

pub use call::MethodCall;
pub use command::Command;
pub use config::{BridgeConfig, ReturnCodePolicy};
pub use dispatcher::CommandDispatcher;
pub use error::{BridgeError, DispatchError, Result};
pub use facade::{BridgeFacade, HostSignalSender};
pub use lifecycle::{Binding, GateState, HostSignal, LifecycleGate};
pub use plane::PlaneSnapshot;
pub use relay::{Delivery, EventRelay, EventStream};
