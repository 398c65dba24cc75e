//! Mock device implementations for testing and development.
//!
//! This module provides simulated peripherals that can be controlled
//! programmatically without requiring the physical terminal.

pub mod printer;
pub mod scanner;

// Re-export commonly used types
pub use printer::{MockPrinter, MockPrinterHandle, PrintedPage, Primitive};
pub use scanner::{MockDecodeSource, MockScanner, MockScannerHandle};
