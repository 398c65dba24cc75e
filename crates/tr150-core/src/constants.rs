//! Wire-level constants shared by the bridge, its drivers and transports.
//!
//! Method names are the exact strings a transport receives from the client
//! application. They are decoded once, at the boundary, into
//! [`CommandKind`](crate::CommandKind) and never used for routing afterwards.

// ============================================================================
// Channels
// ============================================================================

/// Name of the method-call channel carrying commands and their results.
pub const METHOD_CHANNEL: &str = "tr150";

/// Name of the one-directional channel carrying decoded barcode payloads.
pub const EVENT_CHANNEL: &str = "tr150_event";

// ============================================================================
// Printer method names
// ============================================================================

pub const OPEN_PRINTER: &str = "openPrinter";
pub const CLOSE_PRINTER: &str = "closePrinter";
pub const SET_SPEED_LEVEL: &str = "setSpeedLevel";
pub const SET_GRAY_LEVEL: &str = "setGrayLevel";
pub const SETUP_PAGE: &str = "setupPage";
pub const CLEAR_PAGE: &str = "clearPage";
pub const PRINT_PAGE: &str = "printPage";
pub const DRAW_LINE: &str = "drawLine";
pub const DRAW_TEXT: &str = "drawText";
pub const DRAW_TEXT_EX: &str = "drawTextEx";
pub const DRAW_BARCODE: &str = "drawBarcode";
pub const DRAW_BITMAP: &str = "drawBitmap";
pub const GET_STATUS: &str = "getStatus";

// ============================================================================
// Scanner method names
// ============================================================================

pub const OPEN_SCANNER: &str = "openScanner";
pub const CLOSE_SCANNER: &str = "closeScanner";
pub const GET_SCANNER_STATE: &str = "getScannerState";
pub const START_DECODE: &str = "startDecode";
pub const STOP_DECODE: &str = "stopDecode";

// ============================================================================
// Printer status codes
// ============================================================================

/// Printer is ready.
pub const PRNSTS_OK: i32 = 0;

/// Paper roll is empty.
pub const PRNSTS_OUT_OF_PAPER: i32 = -1;

/// Print head temperature is too high.
pub const PRNSTS_OVER_HEAT: i32 = -2;

/// Battery voltage too low to drive the print head.
pub const PRNSTS_UNDER_VOLTAGE: i32 = -3;

/// Printer is busy with a previous page.
pub const PRNSTS_BUSY: i32 = -4;

/// Generic printer error.
pub const PRNSTS_ERR: i32 = -256;

/// Printer driver error.
pub const PRNSTS_ERR_DRIVER: i32 = -257;

// ============================================================================
// Printer defaults
// ============================================================================

/// Speed level a freshly opened printer reports.
pub const DEFAULT_SPEED_LEVEL: i32 = 9;

/// Gray (darkness) level a freshly opened printer reports.
pub const DEFAULT_GRAY_LEVEL: i32 = 0;

/// Rotation values accepted by the print head, in degrees.
pub const ROTATIONS: [i32; 4] = [0, 90, 180, 270];
