//! Host method calls and their decoding into [`Command`]s.
//!
//! The host sends a method name plus a map of named arguments, spelled the
//! way the terminal's method channel spells them (`fontName`, `pBmp`, ...).
//! Decoding resolves the name first, then reads the command's arguments in
//! declaration order; the first missing or mistyped one is reported.
//!
//! # Examples
//!
//! ```
//! use tr150_bridge::{Command, MethodCall};
//! use tr150_core::PageSize;
//!
//! let call = MethodCall::new("setupPage")
//!     .arg("width", 384)
//!     .arg("height", 200);
//! assert_eq!(call.decode().unwrap(), Command::SetupPage(PageSize::new(384, 200)));
//!
//! let err = MethodCall::new("setupPage").arg("width", 384).decode().unwrap_err();
//! assert_eq!(err.to_string(), "height missing or wrong type");
//! ```

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tr150_core::{CommandKind, Error, PageSize, Result};
use tr150_hardware::types::{BarcodeSpec, BitmapSpec, LineSpec, TextBoxSpec, TextSpec};

use crate::command::Command;

/// A method invocation as received from the host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MethodCall {
    pub method: String,

    #[serde(default)]
    pub arguments: Map<String, Value>,
}

impl MethodCall {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            arguments: Map::new(),
        }
    }

    /// Add a named argument.
    pub fn arg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.arguments.insert(name.into(), value.into());
        self
    }

    /// Resolve the method name and decode the arguments.
    pub fn decode(&self) -> Result<Command> {
        let kind: CommandKind = self.method.parse()?;
        let args = Arguments(&self.arguments);

        let command = match kind {
            CommandKind::OpenPrinter => Command::OpenPrinter,
            CommandKind::ClosePrinter => Command::ClosePrinter,
            CommandKind::SetSpeedLevel => Command::SetSpeedLevel {
                level: args.int("level")?,
            },
            CommandKind::SetGrayLevel => Command::SetGrayLevel {
                level: args.int("level")?,
            },
            CommandKind::SetupPage => {
                Command::SetupPage(PageSize::new(args.int("width")?, args.int("height")?))
            }
            CommandKind::ClearPage => Command::ClearPage,
            CommandKind::PrintPage => Command::PrintPage {
                rotate: args.int("rotate")?,
            },
            CommandKind::DrawLine => Command::DrawLine(LineSpec {
                x0: args.int("x0")?,
                y0: args.int("y0")?,
                x1: args.int("x1")?,
                y1: args.int("y1")?,
                line_width: args.int("lineWidth")?,
            }),
            CommandKind::DrawText => Command::DrawText(TextSpec {
                data: args.string("data")?,
                x: args.int("x")?,
                y: args.int("y")?,
                font_name: args.string("fontName")?,
                font_size: args.int("fontSize")?,
                bold: args.boolean("bold")?,
                italic: args.boolean("italic")?,
                rotate: args.int("rotate")?,
            }),
            CommandKind::DrawTextEx => Command::DrawTextEx(TextBoxSpec {
                data: args.string("data")?,
                x: args.int("x")?,
                y: args.int("y")?,
                width: args.int("width")?,
                height: args.int("height")?,
                font_name: args.string("fontName")?,
                font_size: args.int("fontSize")?,
                rotate: args.int("rotate")?,
                style: args.int("style")?,
                format: args.int("format")?,
            }),
            CommandKind::DrawBarcode => Command::DrawBarcode(BarcodeSpec {
                data: args.string("data")?,
                x: args.int("x")?,
                y: args.int("y")?,
                barcode_type: args.int("barcodeType")?,
                width: args.int("width")?,
                height: args.int("height")?,
                rotate: args.int("rotate")?,
            }),
            CommandKind::DrawBitmap => Command::DrawBitmap(BitmapSpec {
                bitmap: args.bytes("pBmp")?,
                x: args.int("xDest")?,
                y: args.int("yDest")?,
                width: args.int("widthDest")?,
                height: args.int("heightDest")?,
            }),
            CommandKind::GetStatus => Command::GetStatus,
            CommandKind::OpenScanner => Command::OpenScanner,
            CommandKind::CloseScanner => Command::CloseScanner,
            CommandKind::GetScannerState => Command::GetScannerState,
            CommandKind::StartDecode => Command::StartDecode,
            CommandKind::StopDecode => Command::StopDecode,
        };
        Ok(command)
    }
}

/// Typed access to a call's argument map.
struct Arguments<'a>(&'a Map<String, Value>);

impl Arguments<'_> {
    fn get(&self, name: &str) -> Result<&Value> {
        self.0.get(name).ok_or_else(|| Error::invalid_argument(name))
    }

    fn int(&self, name: &str) -> Result<i32> {
        self.get(name)?
            .as_i64()
            .and_then(|n| i32::try_from(n).ok())
            .ok_or_else(|| Error::invalid_argument(name))
    }

    fn string(&self, name: &str) -> Result<String> {
        self.get(name)?
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| Error::invalid_argument(name))
    }

    fn boolean(&self, name: &str) -> Result<bool> {
        self.get(name)?
            .as_bool()
            .ok_or_else(|| Error::invalid_argument(name))
    }

    /// A byte array, sent as a JSON array of integers in `0..=255`.
    fn bytes(&self, name: &str) -> Result<Bytes> {
        let items = self
            .get(name)?
            .as_array()
            .ok_or_else(|| Error::invalid_argument(name))?;
        items
            .iter()
            .map(|item| {
                item.as_u64()
                    .and_then(|b| u8::try_from(b).ok())
                    .ok_or_else(|| Error::invalid_argument(name))
            })
            .collect::<Result<Vec<u8>>>()
            .map(Bytes::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn draw_text_call() -> MethodCall {
        MethodCall::new("drawText")
            .arg("data", "TOTAL 12.50")
            .arg("x", 0)
            .arg("y", 40)
            .arg("fontName", "simsun")
            .arg("fontSize", 24)
            .arg("bold", true)
            .arg("italic", false)
            .arg("rotate", 0)
    }

    #[test]
    fn test_decode_no_argument_commands() {
        assert_eq!(MethodCall::new("openPrinter").decode().unwrap(), Command::OpenPrinter);
        assert_eq!(MethodCall::new("getStatus").decode().unwrap(), Command::GetStatus);
        assert_eq!(MethodCall::new("stopDecode").decode().unwrap(), Command::StopDecode);
    }

    #[test]
    fn test_decode_draw_text() {
        let command = draw_text_call().decode().unwrap();
        let Command::DrawText(text) = command else {
            panic!("expected DrawText, got {command:?}");
        };
        assert_eq!(text.data, "TOTAL 12.50");
        assert_eq!(text.font_name, "simsun");
        assert_eq!(text.font_size, 24);
        assert!(text.bold);
        assert!(!text.italic);
    }

    #[test]
    fn test_decode_bitmap() {
        let call = MethodCall::new("drawBitmap")
            .arg("pBmp", json!([0x42, 0x4d, 0, 255]))
            .arg("xDest", 0)
            .arg("yDest", 0)
            .arg("widthDest", 64)
            .arg("heightDest", 32);
        let Command::DrawBitmap(bitmap) = call.decode().unwrap() else {
            panic!("expected DrawBitmap");
        };
        assert_eq!(bitmap.bitmap.as_ref(), &[0x42, 0x4d, 0, 255]);
        assert_eq!(bitmap.height, 32);
    }

    #[rstest]
    #[case("x", json!("10"))]
    #[case("bold", json!(1))]
    #[case("fontSize", json!(2.5))]
    #[case("fontSize", json!(i64::from(i32::MAX) + 1))]
    #[case("data", json!(null))]
    #[case("fontName", json!(42))]
    fn test_wrong_type_rejected(#[case] name: &str, #[case] value: Value) {
        let err = draw_text_call().arg(name, value).decode().unwrap_err();
        assert_eq!(err, Error::invalid_argument(name));
    }

    #[rstest]
    #[case(json!([256]))]
    #[case(json!([-1]))]
    #[case(json!("QkM="))]
    #[case(json!([1, "2"]))]
    fn test_bad_bitmap_rejected(#[case] value: Value) {
        let err = MethodCall::new("drawBitmap")
            .arg("pBmp", value)
            .arg("xDest", 0)
            .arg("yDest", 0)
            .arg("widthDest", 1)
            .arg("heightDest", 1)
            .decode()
            .unwrap_err();
        assert_eq!(err.to_string(), "pBmp missing or wrong type");
    }

    #[test]
    fn test_first_missing_argument_reported() {
        let mut call = draw_text_call();
        call.arguments.remove("fontName");
        call.arguments.remove("rotate");
        assert_eq!(call.decode().unwrap_err(), Error::invalid_argument("fontName"));
    }

    #[test]
    fn test_unknown_method() {
        let err = MethodCall::new("feedPaper").decode().unwrap_err();
        assert_eq!(err, Error::UnknownCommand("feedPaper".into()));
    }

    #[test]
    fn test_extra_arguments_ignored() {
        let call = MethodCall::new("printPage").arg("rotate", 90).arg("copies", 2);
        assert_eq!(call.decode().unwrap(), Command::PrintPage { rotate: 90 });
    }

    #[test]
    fn test_method_call_from_json() {
        let call: MethodCall =
            serde_json::from_str(r#"{"method":"setGrayLevel","arguments":{"level":3}}"#).unwrap();
        assert_eq!(call.decode().unwrap(), Command::SetGrayLevel { level: 3 });

        let call: MethodCall = serde_json::from_str(r#"{"method":"openScanner"}"#).unwrap();
        assert_eq!(call.decode().unwrap(), Command::OpenScanner);
    }
}
