//! Error types for the bridge.
//!
//! [`DispatchError`] covers everything that can go wrong while executing one
//! command and is always converted into a [`Failure`] before it reaches the
//! caller. [`BridgeError`] covers the bridge's own plumbing (configuration,
//! the event plane task).

use thiserror::Error;
use tr150_core::{CommandKind, Failure, FailureKind};
use tr150_hardware::HardwareError;

/// Failure of a single dispatched command.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Method name or arguments could not be decoded.
    #[error(transparent)]
    Decode(#[from] tr150_core::Error),

    /// The driver call failed.
    #[error(transparent)]
    Driver(#[from] HardwareError),

    /// The driver returned a non-zero code and the strict policy is active.
    #[error("{operation} returned code {code}")]
    ReturnCode { operation: CommandKind, code: i32 },
}

impl DispatchError {
    /// Failure category reported to the caller.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Decode(tr150_core::Error::InvalidArgument { .. }) => FailureKind::InvalidArgument,
            Self::Decode(tr150_core::Error::UnknownCommand(_)) => FailureKind::Unimplemented,
            Self::Driver(e) if e.is_state_rejection() => FailureKind::StateFailure,
            Self::Driver(_) | Self::ReturnCode { .. } => FailureKind::DriverFailure,
        }
    }

    /// Native driver code, if any.
    pub fn code(&self) -> Option<i32> {
        match self {
            Self::Decode(_) => None,
            Self::Driver(e) => e.code(),
            Self::ReturnCode { code, .. } => Some(*code),
        }
    }
}

impl From<DispatchError> for Failure {
    fn from(err: DispatchError) -> Self {
        let failure = Failure::new(err.kind(), err.to_string());
        match err.code() {
            Some(code) => failure.with_code(code),
            None => failure,
        }
    }
}

/// Errors raised by the bridge itself.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// No Tokio runtime to run the event plane on.
    #[error("No Tokio runtime available")]
    NoRuntime,

    /// The event plane task is no longer running.
    #[error("Event plane stopped")]
    PlaneStopped,

    /// The event plane task panicked or was cancelled.
    #[error("Event plane task failed: {0}")]
    PlaneTask(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, BridgeError>;
