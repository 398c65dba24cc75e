//! Peripheral driver abstraction layer for the TR150 bridge.
//!
//! This crate wraps the terminal's two peripherals, a thermal printer and a
//! barcode scanner, behind trait-based driver interfaces. The bridge talks to
//! them only through these traits, so a mock backend (for development and
//! testing) and the vendor SDK backend are interchangeable.
//!
//! # Design Philosophy
//!
//! - **Async-first**: driver calls use native `async fn` in traits
//!   (Edition 2024 RPITIT).
//! - **Enum dispatch**: backends are selected through the wrappers in
//!   [`devices`], since async traits are not object-safe.
//! - **Thread-safe**: all drivers are `Send + Sync`.
//! - **One failure shape**: whatever the SDK's convention (return code,
//!   boolean, thrown fault), a failed call yields a [`HardwareError`] that
//!   keeps the native code.
//!
//! # Printer
//!
//! The [`PrinterDriver`] composes a page in driver memory and commits it:
//!
//! ```no_run
//! use tr150_core::PageSize;
//! use tr150_hardware::traits::PrinterDriver;
//! use tr150_hardware::types::TextSpec;
//! use tr150_hardware::Result;
//!
//! async fn print_label<P: PrinterDriver>(printer: &mut P, label: &str) -> Result<i32> {
//!     printer.open().await?;
//!     printer.setup_page(PageSize::new(384, 120)).await?;
//!     printer
//!         .draw_text(&TextSpec {
//!             data: label.to_string(),
//!             x: 10,
//!             y: 10,
//!             font_name: "simsun".to_string(),
//!             font_size: 32,
//!             bold: true,
//!             italic: false,
//!             rotate: 0,
//!         })
//!         .await?;
//!     printer.print_page(0).await
//! }
//! ```
//!
//! # Scanner
//!
//! The [`ScannerDriver`] controls the scan engine; decoded barcodes arrive
//! asynchronously through a [`DecodeEventSource`] that is only active while a
//! receiver is registered.
//!
//! # Mock Implementations
//!
//! The [`mock`] module provides a mock printer and a mock scanner, each with
//! a handle for fault injection, simulated scans and call inspection.
//!
//! [`PrinterDriver`]: traits::PrinterDriver
//! [`ScannerDriver`]: traits::ScannerDriver
//! [`DecodeEventSource`]: traits::DecodeEventSource

pub mod adapter;
pub mod devices;
pub mod error;
pub mod mock;
pub mod traits;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{HardwareError, Result};
pub use traits::{DecodeEventSource, PrinterDriver, ScannerDriver};
pub use types::{
    BarcodeSpec, BitmapSpec, DecodeCallback, DecodeEvent, DeviceInfo, LineSpec, RegistrationId,
    ReturnCode, TextBoxSpec, TextSpec,
};

// Re-export adapter types
pub use adapter::{MockPeripherals, PeripheralAdapter, PeripheralInfo};
pub use devices::{AnyDecodeSource, AnyPrinterDriver, AnyScannerDriver};
