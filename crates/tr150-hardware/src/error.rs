//! Error types for peripheral driver operations.
//!
//! Every driver call, whatever the native convention of the underlying SDK
//! (return code, boolean or thrown fault), fails with a [`HardwareError`].
//! The error keeps the native code when there is one so callers can report
//! the real cause.

/// Result type alias for hardware operations.
pub type Result<T> = std::result::Result<T, HardwareError>;

/// Errors that can occur during peripheral driver operations.
#[derive(Debug, thiserror::Error)]
pub enum HardwareError {
    /// Session has not been opened.
    #[error("{device} is not open")]
    NotOpen { device: String },

    /// Operation is not valid in the current session state.
    #[error("Invalid state: {message}")]
    InvalidState { message: String },

    /// Driver reported a failure code.
    #[error("Driver fault {code}: {message}")]
    Fault { code: i32, message: String },

    /// Operation or argument value is not supported by this device.
    #[error("Unsupported operation: {operation}")]
    Unsupported { operation: String },

    /// Invalid data passed to or received from the device.
    #[error("Invalid data: {message}")]
    InvalidData { message: String },

    /// Decode event source could not be registered or unregistered.
    #[error("Registration error: {message}")]
    Registration { message: String },
}

impl HardwareError {
    /// Create a new not-open error.
    pub fn not_open(device: impl Into<String>) -> Self {
        Self::NotOpen {
            device: device.into(),
        }
    }

    /// Create a new invalid state error.
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState {
            message: message.into(),
        }
    }

    /// Create a new driver fault carrying the native code.
    pub fn fault(code: i32, message: impl Into<String>) -> Self {
        Self::Fault {
            code,
            message: message.into(),
        }
    }

    /// Create a new unsupported operation error.
    pub fn unsupported(operation: impl Into<String>) -> Self {
        Self::Unsupported {
            operation: operation.into(),
        }
    }

    /// Create a new invalid data error.
    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData {
            message: message.into(),
        }
    }

    /// Create a new registration error.
    pub fn registration(message: impl Into<String>) -> Self {
        Self::Registration {
            message: message.into(),
        }
    }

    /// Native driver code, if the driver supplied one.
    pub fn code(&self) -> Option<i32> {
        match self {
            Self::Fault { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Whether the driver refused the call because of the session state
    /// rather than a device fault.
    pub fn is_state_rejection(&self) -> bool {
        matches!(self, Self::NotOpen { .. } | Self::InvalidState { .. })
    }
}
