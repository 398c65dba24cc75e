use std::fmt;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::constants::*;

/// Page dimensions in printer dots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageSize {
    pub width: i32,
    pub height: i32,
}

impl PageSize {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// Printer condition decoded from a driver status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrinterCondition {
    Ok,
    OutOfPaper,
    Overheat,
    UnderVoltage,
    Busy,
    Error,
    DriverError,
    /// Code not covered by the known status table.
    Unknown(i32),
}

impl PrinterCondition {
    pub fn from_code(code: i32) -> Self {
        match code {
            PRNSTS_OK => Self::Ok,
            PRNSTS_OUT_OF_PAPER => Self::OutOfPaper,
            PRNSTS_OVER_HEAT => Self::Overheat,
            PRNSTS_UNDER_VOLTAGE => Self::UnderVoltage,
            PRNSTS_BUSY => Self::Busy,
            PRNSTS_ERR => Self::Error,
            PRNSTS_ERR_DRIVER => Self::DriverError,
            other => Self::Unknown(other),
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            Self::Ok => PRNSTS_OK,
            Self::OutOfPaper => PRNSTS_OUT_OF_PAPER,
            Self::Overheat => PRNSTS_OVER_HEAT,
            Self::UnderVoltage => PRNSTS_UNDER_VOLTAGE,
            Self::Busy => PRNSTS_BUSY,
            Self::Error => PRNSTS_ERR,
            Self::DriverError => PRNSTS_ERR_DRIVER,
            Self::Unknown(code) => *code,
        }
    }
}

/// Snapshot of the printer session as reported by the driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrinterStatus {
    /// Raw driver status code.
    pub code: i32,

    /// Decoded condition.
    pub condition: PrinterCondition,

    /// Whether the printer session is open.
    pub is_open: bool,

    /// Page configured by the last `setupPage`, if any.
    pub page: Option<PageSize>,

    pub speed_level: i32,

    pub gray_level: i32,
}

impl PrinterStatus {
    /// Build a status from a driver code, with session fields at defaults.
    pub fn from_code(code: i32) -> Self {
        Self {
            code,
            condition: PrinterCondition::from_code(code),
            is_open: false,
            page: None,
            speed_level: DEFAULT_SPEED_LEVEL,
            gray_level: DEFAULT_GRAY_LEVEL,
        }
    }
}

/// Scanner power/decode state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScannerState {
    /// Scanner engine powered off.
    Closed,

    /// Powered on, not decoding.
    Idle,

    /// Decode session running.
    Decoding,
}

impl ScannerState {
    pub fn is_open(&self) -> bool {
        !matches!(self, Self::Closed)
    }
}

impl fmt::Display for ScannerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed => write!(f, "Closed"),
            Self::Idle => write!(f, "Idle"),
            Self::Decoding => write!(f, "Decoding"),
        }
    }
}

/// Value carried by a successful command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ResultValue {
    None,
    Bool(bool),
    Int(i32),
    Bytes(Bytes),
    Status(PrinterStatus),
    ScannerState(ScannerState),
}

impl ResultValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_status(&self) -> Option<&PrinterStatus> {
        match self {
            Self::Status(status) => Some(status),
            _ => None,
        }
    }
}

/// Failure category reported to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Missing or malformed argument, rejected before reaching the driver.
    InvalidArgument,

    /// Unknown command name.
    Unimplemented,

    /// The peripheral call reported a failure.
    DriverFailure,

    /// The driver rejected the call because of the session state.
    StateFailure,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument => write!(f, "InvalidArgument"),
            Self::Unimplemented => write!(f, "Unimplemented"),
            Self::DriverFailure => write!(f, "DriverFailure"),
            Self::StateFailure => write!(f, "StateFailure"),
        }
    }
}

/// Structured failure returned across the dispatch boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    pub kind: FailureKind,

    /// Driver code, when the driver supplied one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i32>,

    pub message: String,
}

impl Failure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(mut self, code: i32) -> Self {
        self.code = Some(code);
        self
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "{} ({}): {}", self.kind, code, self.message),
            None => write!(f, "{}: {}", self.kind, self.message),
        }
    }
}

impl From<crate::Error> for Failure {
    fn from(err: crate::Error) -> Self {
        let kind = match err {
            crate::Error::InvalidArgument { .. } => FailureKind::InvalidArgument,
            crate::Error::UnknownCommand(_) => FailureKind::Unimplemented,
        };
        Self::new(kind, err.to_string())
    }
}

/// Outcome of one dispatched command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CommandResult {
    Success { value: ResultValue },
    Failure(Failure),
}

impl CommandResult {
    pub fn success(value: ResultValue) -> Self {
        Self::Success { value }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn value(&self) -> Option<&ResultValue> {
        match self {
            Self::Success { value } => Some(value),
            Self::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Self::Failure(failure) => Some(failure),
            Self::Success { .. } => None,
        }
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        self.failure().map(|f| f.kind)
    }
}

impl<E: Into<Failure>> From<std::result::Result<ResultValue, E>> for CommandResult {
    fn from(result: std::result::Result<ResultValue, E>) -> Self {
        match result {
            Ok(value) => Self::Success { value },
            Err(err) => Self::Failure(err.into()),
        }
    }
}
