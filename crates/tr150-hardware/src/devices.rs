//! Enum wrappers for driver dispatch.
//!
//! Native `async fn` in traits is not object-safe, so `Box<dyn PrinterDriver>`
//! is not available. These enums provide concrete dispatch over the supported
//! backends instead, resolved at compile time.
//!
//! # Examples
//!
//! ```
//! use tr150_hardware::devices::AnyPrinterDriver;
//! use tr150_hardware::mock::MockPrinter;
//!
//! let (printer, _handle) = MockPrinter::new();
//! let any_printer = AnyPrinterDriver::Mock(printer);
//! ```

use tr150_core::{PageSize, PrinterStatus, ScannerState};

use crate::Result;
use crate::mock::{MockDecodeSource, MockPrinter, MockScanner};
use crate::traits::{DecodeEventSource, PrinterDriver, ScannerDriver};
use crate::types::{
    BarcodeSpec, BitmapSpec, DecodeCallback, DeviceInfo, LineSpec, RegistrationId, ReturnCode,
    TextBoxSpec, TextSpec,
};

/// Enum wrapper for printer driver dispatch.
#[derive(Debug)]
#[non_exhaustive]
pub enum AnyPrinterDriver {
    /// Mock printer for development and testing.
    Mock(MockPrinter),
    // TODO: add a `hardware-jni` variant wrapping the vendor PrinterManager
    // once the JNI bindings crate exists.
}

impl PrinterDriver for AnyPrinterDriver {
    async fn open(&mut self) -> Result<ReturnCode> {
        match self {
            Self::Mock(device) => device.open().await,
        }
    }

    async fn close(&mut self) -> Result<ReturnCode> {
        match self {
            Self::Mock(device) => device.close().await,
        }
    }

    async fn set_speed_level(&mut self, level: i32) -> Result<()> {
        match self {
            Self::Mock(device) => device.set_speed_level(level).await,
        }
    }

    async fn set_gray_level(&mut self, level: i32) -> Result<()> {
        match self {
            Self::Mock(device) => device.set_gray_level(level).await,
        }
    }

    async fn setup_page(&mut self, size: PageSize) -> Result<ReturnCode> {
        match self {
            Self::Mock(device) => device.setup_page(size).await,
        }
    }

    async fn clear_page(&mut self) -> Result<ReturnCode> {
        match self {
            Self::Mock(device) => device.clear_page().await,
        }
    }

    async fn print_page(&mut self, rotate: i32) -> Result<i32> {
        match self {
            Self::Mock(device) => device.print_page(rotate).await,
        }
    }

    async fn draw_line(&mut self, line: &LineSpec) -> Result<ReturnCode> {
        match self {
            Self::Mock(device) => device.draw_line(line).await,
        }
    }

    async fn draw_text(&mut self, text: &TextSpec) -> Result<i32> {
        match self {
            Self::Mock(device) => device.draw_text(text).await,
        }
    }

    async fn draw_text_boxed(&mut self, text: &TextBoxSpec) -> Result<i32> {
        match self {
            Self::Mock(device) => device.draw_text_boxed(text).await,
        }
    }

    async fn draw_barcode(&mut self, barcode: &BarcodeSpec) -> Result<i32> {
        match self {
            Self::Mock(device) => device.draw_barcode(barcode).await,
        }
    }

    async fn draw_bitmap(&mut self, bitmap: &BitmapSpec) -> Result<i32> {
        match self {
            Self::Mock(device) => device.draw_bitmap(bitmap).await,
        }
    }

    async fn status(&self) -> Result<PrinterStatus> {
        match self {
            Self::Mock(device) => device.status().await,
        }
    }

    async fn get_info(&self) -> Result<DeviceInfo> {
        match self {
            Self::Mock(device) => device.get_info().await,
        }
    }
}

/// Enum wrapper for scanner driver dispatch.
#[derive(Debug)]
#[non_exhaustive]
pub enum AnyScannerDriver {
    /// Mock scanner for development and testing.
    Mock(MockScanner),
}

impl ScannerDriver for AnyScannerDriver {
    async fn open(&mut self) -> Result<bool> {
        match self {
            Self::Mock(device) => device.open().await,
        }
    }

    async fn close(&mut self) -> Result<bool> {
        match self {
            Self::Mock(device) => device.close().await,
        }
    }

    async fn start_decode(&mut self) -> Result<bool> {
        match self {
            Self::Mock(device) => device.start_decode().await,
        }
    }

    async fn stop_decode(&mut self) -> Result<bool> {
        match self {
            Self::Mock(device) => device.stop_decode().await,
        }
    }

    async fn state(&self) -> Result<ScannerState> {
        match self {
            Self::Mock(device) => device.state().await,
        }
    }

    async fn get_info(&self) -> Result<DeviceInfo> {
        match self {
            Self::Mock(device) => device.get_info().await,
        }
    }
}

/// Enum wrapper for decode event source dispatch.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum AnyDecodeSource {
    /// Broadcast source of a mock scanner.
    Mock(MockDecodeSource),
}

impl DecodeEventSource for AnyDecodeSource {
    fn register(&self, receiver: DecodeCallback) -> Result<RegistrationId> {
        match self {
            Self::Mock(source) => source.register(receiver),
        }
    }

    fn unregister(&self, id: RegistrationId) -> Result<()> {
        match self {
            Self::Mock(source) => source.unregister(id),
        }
    }
}
