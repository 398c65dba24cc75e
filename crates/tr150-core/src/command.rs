//! The closed set of commands the bridge understands.
//!
//! Every method a client may invoke is a variant of [`CommandKind`]. Method
//! names arriving from a transport are parsed into a kind exactly once; an
//! unknown name surfaces as [`Error::UnknownCommand`] and is reported to the
//! caller as "unimplemented".
//!
//! # Examples
//!
//! ```
//! use tr150_core::{CommandKind, Peripheral};
//!
//! let kind: CommandKind = "setupPage".parse().unwrap();
//! assert_eq!(kind, CommandKind::SetupPage);
//! assert_eq!(kind.peripheral(), Peripheral::Printer);
//! assert_eq!(kind.method_name(), "setupPage");
//!
//! assert!("feedPaper".parse::<CommandKind>().is_err());
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::error::{Error, Result};

/// Physical peripheral a command is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Peripheral {
    /// Thermal label/receipt printer.
    Printer,

    /// Barcode scanner.
    Scanner,
}

impl fmt::Display for Peripheral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Printer => write!(f, "Printer"),
            Self::Scanner => write!(f, "Scanner"),
        }
    }
}

/// Kind of a bridge command, one per client-visible method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CommandKind {
    OpenPrinter,
    ClosePrinter,
    SetSpeedLevel,
    SetGrayLevel,
    SetupPage,
    ClearPage,
    PrintPage,
    DrawLine,
    DrawText,
    DrawTextEx,
    DrawBarcode,
    DrawBitmap,
    GetStatus,
    OpenScanner,
    CloseScanner,
    GetScannerState,
    StartDecode,
    StopDecode,
}

impl CommandKind {
    /// Every command kind, printer commands first.
    pub const ALL: [CommandKind; 18] = [
        Self::OpenPrinter,
        Self::ClosePrinter,
        Self::SetSpeedLevel,
        Self::SetGrayLevel,
        Self::SetupPage,
        Self::ClearPage,
        Self::PrintPage,
        Self::DrawLine,
        Self::DrawText,
        Self::DrawTextEx,
        Self::DrawBarcode,
        Self::DrawBitmap,
        Self::GetStatus,
        Self::OpenScanner,
        Self::CloseScanner,
        Self::GetScannerState,
        Self::StartDecode,
        Self::StopDecode,
    ];

    /// Method name used on the wire.
    pub fn method_name(&self) -> &'static str {
        match self {
            Self::OpenPrinter => constants::OPEN_PRINTER,
            Self::ClosePrinter => constants::CLOSE_PRINTER,
            Self::SetSpeedLevel => constants::SET_SPEED_LEVEL,
            Self::SetGrayLevel => constants::SET_GRAY_LEVEL,
            Self::SetupPage => constants::SETUP_PAGE,
            Self::ClearPage => constants::CLEAR_PAGE,
            Self::PrintPage => constants::PRINT_PAGE,
            Self::DrawLine => constants::DRAW_LINE,
            Self::DrawText => constants::DRAW_TEXT,
            Self::DrawTextEx => constants::DRAW_TEXT_EX,
            Self::DrawBarcode => constants::DRAW_BARCODE,
            Self::DrawBitmap => constants::DRAW_BITMAP,
            Self::GetStatus => constants::GET_STATUS,
            Self::OpenScanner => constants::OPEN_SCANNER,
            Self::CloseScanner => constants::CLOSE_SCANNER,
            Self::GetScannerState => constants::GET_SCANNER_STATE,
            Self::StartDecode => constants::START_DECODE,
            Self::StopDecode => constants::STOP_DECODE,
        }
    }

    /// Peripheral whose session this command touches.
    pub fn peripheral(&self) -> Peripheral {
        match self {
            Self::OpenScanner
            | Self::CloseScanner
            | Self::GetScannerState
            | Self::StartDecode
            | Self::StopDecode => Peripheral::Scanner,
            _ => Peripheral::Printer,
        }
    }

    /// Names of the arguments this command requires, in wire spelling.
    pub fn required_arguments(&self) -> &'static [&'static str] {
        match self {
            Self::SetSpeedLevel | Self::SetGrayLevel => &["level"],
            Self::SetupPage => &["width", "height"],
            Self::PrintPage => &["rotate"],
            Self::DrawLine => &["x0", "y0", "x1", "y1", "lineWidth"],
            Self::DrawText => &[
                "data", "x", "y", "fontName", "fontSize", "bold", "italic", "rotate",
            ],
            Self::DrawTextEx => &[
                "data", "x", "y", "width", "height", "fontName", "fontSize", "rotate", "style",
                "format",
            ],
            Self::DrawBarcode => &[
                "data",
                "x",
                "y",
                "barcodeType",
                "width",
                "height",
                "rotate",
            ],
            Self::DrawBitmap => &["pBmp", "xDest", "yDest", "widthDest", "heightDest"],
            _ => &[],
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.method_name())
    }
}

impl FromStr for CommandKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.method_name() == s)
            .ok_or_else(|| Error::UnknownCommand(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("openPrinter", CommandKind::OpenPrinter)]
    #[case("drawTextEx", CommandKind::DrawTextEx)]
    #[case("getScannerState", CommandKind::GetScannerState)]
    #[case("stopDecode", CommandKind::StopDecode)]
    fn test_parse_method_name(#[case] name: &str, #[case] expected: CommandKind) {
        assert_eq!(name.parse::<CommandKind>().unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("OpenPrinter")] // case sensitive
    #[case("getState")]
    fn test_parse_unknown(#[case] name: &str) {
        let err = name.parse::<CommandKind>().unwrap_err();
        assert_eq!(err, Error::UnknownCommand(name.to_string()));
    }

    #[test]
    fn test_method_names_round_trip() {
        for kind in CommandKind::ALL {
            assert_eq!(kind.method_name().parse::<CommandKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_peripheral_split() {
        let scanner = CommandKind::ALL
            .iter()
            .filter(|k| k.peripheral() == Peripheral::Scanner)
            .count();
        assert_eq!(scanner, 5);
        assert_eq!(CommandKind::ALL.len() - scanner, 13);
    }

    #[test]
    fn test_required_arguments() {
        assert!(CommandKind::OpenPrinter.required_arguments().is_empty());
        assert_eq!(CommandKind::SetupPage.required_arguments(), ["width", "height"]);
        assert_eq!(CommandKind::DrawTextEx.required_arguments().len(), 10);
    }

    #[test]
    fn test_serde_uses_method_names() {
        let json = serde_json::to_string(&CommandKind::GetScannerState).unwrap();
        assert_eq!(json, "\"getScannerState\"");
    }
}
