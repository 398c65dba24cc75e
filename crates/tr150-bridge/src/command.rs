//! Typed bridge commands.
//!
//! A [`Command`] is a fully decoded request: every argument is present and
//! has the right type. Producing one is the only way to reach a driver, so
//! argument validation can never be skipped.

use tr150_core::{CommandKind, PageSize, Peripheral};
use tr150_hardware::types::{BarcodeSpec, BitmapSpec, LineSpec, TextBoxSpec, TextSpec};

/// A decoded command, one variant per bridge operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    OpenPrinter,
    ClosePrinter,
    SetSpeedLevel { level: i32 },
    SetGrayLevel { level: i32 },
    SetupPage(PageSize),
    ClearPage,
    PrintPage { rotate: i32 },
    DrawLine(LineSpec),
    DrawText(TextSpec),
    DrawTextEx(TextBoxSpec),
    DrawBarcode(BarcodeSpec),
    DrawBitmap(BitmapSpec),
    GetStatus,
    OpenScanner,
    CloseScanner,
    GetScannerState,
    StartDecode,
    StopDecode,
}

impl Command {
    pub fn kind(&self) -> CommandKind {
        match self {
            Self::OpenPrinter => CommandKind::OpenPrinter,
            Self::ClosePrinter => CommandKind::ClosePrinter,
            Self::SetSpeedLevel { .. } => CommandKind::SetSpeedLevel,
            Self::SetGrayLevel { .. } => CommandKind::SetGrayLevel,
            Self::SetupPage(_) => CommandKind::SetupPage,
            Self::ClearPage => CommandKind::ClearPage,
            Self::PrintPage { .. } => CommandKind::PrintPage,
            Self::DrawLine(_) => CommandKind::DrawLine,
            Self::DrawText(_) => CommandKind::DrawText,
            Self::DrawTextEx(_) => CommandKind::DrawTextEx,
            Self::DrawBarcode(_) => CommandKind::DrawBarcode,
            Self::DrawBitmap(_) => CommandKind::DrawBitmap,
            Self::GetStatus => CommandKind::GetStatus,
            Self::OpenScanner => CommandKind::OpenScanner,
            Self::CloseScanner => CommandKind::CloseScanner,
            Self::GetScannerState => CommandKind::GetScannerState,
            Self::StartDecode => CommandKind::StartDecode,
            Self::StopDecode => CommandKind::StopDecode,
        }
    }

    pub fn peripheral(&self) -> Peripheral {
        self.kind().peripheral()
    }
}
