//! Peripheral driver adapter.
//!
//! The `PeripheralAdapter` owns both drivers and the scanner's decode source.
//! Each driver sits behind its own async mutex, which gives the session
//! guarantees the bridge relies on:
//!
//! ```text
//!  caller A ──┐                      ┌──────────────────┐
//!             ├── printer lock ─────►│ AnyPrinterDriver │
//!  caller B ──┤     (FIFO)           └──────────────────┘
//!             │                      ┌──────────────────┐
//!             └── scanner lock ─────►│ AnyScannerDriver │
//!                   (FIFO)           └──────────────────┘
//! ```
//!
//! - calls against one peripheral run one at a time, in the order callers
//!   asked for the lock (Tokio's mutex is fair)
//! - printer and scanner calls never wait on each other
//!
//! # Examples
//!
//! ```
//! use tr150_hardware::adapter::PeripheralAdapter;
//! use tr150_hardware::traits::{PrinterDriver, ScannerDriver};
//!
//! #[tokio::main]
//! async fn main() -> tr150_hardware::Result<()> {
//!     let (adapter, _mocks) = PeripheralAdapter::mock();
//!
//!     adapter.printer().await.open().await?;
//!     adapter.scanner().await.open().await?;
//!
//!     let info = adapter.device_info().await?;
//!     assert_eq!(info.printer.name, "Mock Printer");
//!     Ok(())
//! }
//! ```

use tokio::sync::{Mutex, MutexGuard};
use tracing::debug;

use crate::Result;
use crate::devices::{AnyDecodeSource, AnyPrinterDriver, AnyScannerDriver};
use crate::mock::{MockPrinter, MockPrinterHandle, MockScanner, MockScannerHandle};
use crate::traits::{PrinterDriver, ScannerDriver};
use crate::types::DeviceInfo;

/// Device information for both peripherals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeripheralInfo {
    pub printer: DeviceInfo,
    pub scanner: DeviceInfo,
}

/// Control handles of the mock peripherals behind a mock adapter.
#[derive(Debug, Clone)]
pub struct MockPeripherals {
    pub printer: MockPrinterHandle,
    pub scanner: MockScannerHandle,
}

/// Owns the printer and scanner drivers and serializes access per session.
#[derive(Debug)]
pub struct PeripheralAdapter {
    printer: Mutex<AnyPrinterDriver>,
    scanner: Mutex<AnyScannerDriver>,
    decode_source: AnyDecodeSource,
}

impl PeripheralAdapter {
    /// Create an adapter over the given drivers.
    pub fn new(
        printer: AnyPrinterDriver,
        scanner: AnyScannerDriver,
        decode_source: AnyDecodeSource,
    ) -> Self {
        Self {
            printer: Mutex::new(printer),
            scanner: Mutex::new(scanner),
            decode_source,
        }
    }

    /// Create an adapter over mock peripherals.
    ///
    /// Returns the adapter and the handles controlling its mocks.
    pub fn mock() -> (Self, MockPeripherals) {
        let (printer, printer_handle) = MockPrinter::new();
        let (scanner, scanner_handle) = MockScanner::new();
        let decode_source = AnyDecodeSource::Mock(scanner.decode_source());

        let adapter = Self::new(
            AnyPrinterDriver::Mock(printer),
            AnyScannerDriver::Mock(scanner),
            decode_source,
        );

        (
            adapter,
            MockPeripherals {
                printer: printer_handle,
                scanner: scanner_handle,
            },
        )
    }

    /// Exclusive access to the printer session.
    ///
    /// Hold the guard for exactly one driver call; holding it longer delays
    /// every other printer command.
    pub async fn printer(&self) -> MutexGuard<'_, AnyPrinterDriver> {
        let guard = self.printer.lock().await;
        debug!("Printer session acquired");
        guard
    }

    /// Exclusive access to the scanner session.
    pub async fn scanner(&self) -> MutexGuard<'_, AnyScannerDriver> {
        let guard = self.scanner.lock().await;
        debug!("Scanner session acquired");
        guard
    }

    /// The scanner's decode event source.
    pub fn decode_source(&self) -> &AnyDecodeSource {
        &self.decode_source
    }

    /// Query device information from both drivers.
    pub async fn device_info(&self) -> Result<PeripheralInfo> {
        let printer = self.printer.lock().await.get_info().await?;
        let scanner = self.scanner.lock().await.get_info().await?;
        Ok(PeripheralInfo { printer, scanner })
    }
}
