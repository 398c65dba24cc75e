//! Common types shared across driver implementations.
//!
//! This module defines the strongly-typed argument records for printer
//! primitives, the native return code wrapper, and the decode event that a
//! scanner's event source delivers.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Generic device information.
///
/// Contains metadata about a peripheral such as name, model, serial number,
/// and firmware version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// Device name (e.g., "TR150 Printer", "Mock Scanner").
    pub name: String,

    /// Device model identifier.
    pub model: String,

    /// Optional device serial number.
    pub serial_number: Option<String>,

    /// Optional firmware version string.
    pub firmware_version: Option<String>,
}

impl DeviceInfo {
    /// Create a new DeviceInfo with required fields.
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
            serial_number: None,
            firmware_version: None,
        }
    }

    /// Set the serial number.
    pub fn with_serial_number(mut self, serial_number: impl Into<String>) -> Self {
        self.serial_number = Some(serial_number.into());
        self
    }

    /// Set the firmware version.
    pub fn with_firmware_version(mut self, firmware_version: impl Into<String>) -> Self {
        self.firmware_version = Some(firmware_version.into());
        self
    }
}

/// Native return code of a printer SDK call. Zero means success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReturnCode(pub i32);

impl ReturnCode {
    pub const SUCCESS: ReturnCode = ReturnCode(0);

    pub fn is_success(&self) -> bool {
        self.0 == 0
    }

    pub fn value(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for ReturnCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Straight line primitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineSpec {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
    pub line_width: i32,
}

/// Single-line text primitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextSpec {
    pub data: String,
    pub x: i32,
    pub y: i32,
    pub font_name: String,
    pub font_size: i32,
    pub bold: bool,
    pub italic: bool,
    pub rotate: i32,
}

/// Text laid out inside a bounding box.
///
/// `style` and `format` are passed to the driver unchanged; their bit
/// meanings belong to the printer firmware.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextBoxSpec {
    pub data: String,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub font_name: String,
    pub font_size: i32,
    pub rotate: i32,
    pub style: i32,
    pub format: i32,
}

/// Barcode primitive. `barcode_type` is the firmware symbology id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarcodeSpec {
    pub data: String,
    pub x: i32,
    pub y: i32,
    pub barcode_type: i32,
    pub width: i32,
    pub height: i32,
    pub rotate: i32,
}

/// Bitmap primitive, scaled into the destination rectangle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BitmapSpec {
    pub bitmap: Bytes,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// A barcode decoded by the scanner engine.
///
/// The string payload is optional: some symbologies only yield raw bytes,
/// and such events are not forwarded to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeEvent {
    /// Decoded payload as text.
    pub payload: Option<String>,

    /// Raw decoded bytes.
    pub raw: Bytes,

    /// Symbology id reported by the engine.
    pub barcode_type: u8,

    /// When the decode happened.
    pub timestamp: DateTime<Utc>,
}

impl DecodeEvent {
    /// Create a text decode event with the current timestamp.
    pub fn text(payload: impl Into<String>) -> Self {
        let payload = payload.into();
        Self {
            raw: Bytes::copy_from_slice(payload.as_bytes()),
            payload: Some(payload),
            barcode_type: 0,
            timestamp: Utc::now(),
        }
    }

    /// Create an event that carries only raw bytes.
    pub fn raw(raw: impl Into<Bytes>) -> Self {
        Self {
            payload: None,
            raw: raw.into(),
            barcode_type: 0,
            timestamp: Utc::now(),
        }
    }

    /// Set the symbology id.
    pub fn with_barcode_type(mut self, barcode_type: u8) -> Self {
        self.barcode_type = barcode_type;
        self
    }
}

/// Identifies one registration of a decode receiver with an event source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegistrationId(uuid::Uuid);

impl RegistrationId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for RegistrationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RegistrationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Receiver invoked by an event source for every decode.
///
/// Runs on whatever thread the source delivers on, so it must return
/// promptly.
pub type DecodeCallback = Arc<dyn Fn(DecodeEvent) + Send + Sync>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_info_builder() {
        let info = DeviceInfo::new("TR150 Printer", "Thermal 58mm")
            .with_serial_number("123456789")
            .with_firmware_version("v2.0.1");

        assert_eq!(info.name, "TR150 Printer");
        assert_eq!(info.model, "Thermal 58mm");
        assert_eq!(info.serial_number, Some("123456789".to_string()));
        assert_eq!(info.firmware_version, Some("v2.0.1".to_string()));
    }

    #[test]
    fn test_return_code() {
        assert!(ReturnCode::SUCCESS.is_success());
        assert!(!ReturnCode(-1).is_success());
        assert_eq!(ReturnCode(-4).value(), -4);
        assert_eq!(ReturnCode(3).to_string(), "3");
    }

    #[test]
    fn test_decode_event_text() {
        let event = DecodeEvent::text("4006381333931").with_barcode_type(11);
        assert_eq!(event.payload.as_deref(), Some("4006381333931"));
        assert_eq!(&event.raw[..], b"4006381333931");
        assert_eq!(event.barcode_type, 11);
    }

    #[test]
    fn test_decode_event_raw() {
        let event = DecodeEvent::raw(vec![0x01, 0x02]);
        assert_eq!(event.payload, None);
        assert_eq!(event.raw.len(), 2);
    }

    #[test]
    fn test_registration_ids_are_unique() {
        assert_ne!(RegistrationId::new(), RegistrationId::new());
    }

    #[test]
    fn test_device_info_serialization() {
        let info = DeviceInfo::new("Mock Scanner", "Mock").with_firmware_version("1.0.0");
        let json = serde_json::to_string(&info).unwrap();
        let deserialized: DeviceInfo = serde_json::from_str(&json).unwrap();
        assert_eq!(info, deserialized);
    }
}
