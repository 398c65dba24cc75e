//! Peripheral driver trait definitions.
//!
//! These traits are the contract between the bridge and the vendor SDKs that
//! actually drive the printer and the scanner. Each native call maps to one
//! trait method with strongly-typed arguments; whatever the SDK's own
//! convention, a failure comes back as a [`HardwareError`](crate::HardwareError).
//!
//! Driver methods use native `async fn` (Edition 2024 RPITIT), so they are not
//! object-safe. Dynamic selection between backends goes through the enum
//! wrappers in [`devices`](crate::devices).

#![allow(async_fn_in_trait)]

use tr150_core::{PageSize, PrinterStatus, ScannerState};

use crate::error::Result;
use crate::types::{
    BarcodeSpec, BitmapSpec, DecodeCallback, DeviceInfo, LineSpec, RegistrationId, ReturnCode,
    TextBoxSpec, TextSpec,
};

/// Thermal printer driver.
///
/// A page is composed in driver memory and committed in one go:
///
/// 1. [`open`](Self::open) the session
/// 2. [`setup_page`](Self::setup_page) to allocate the page
/// 3. any number of `draw_*` primitives
/// 4. [`print_page`](Self::print_page) to feed paper and print
///
/// The driver owns the session state and is the one that rejects calls made
/// out of order; callers are not expected to pre-validate.
///
/// # Examples
///
/// ```no_run
/// use tr150_core::PageSize;
/// use tr150_hardware::traits::PrinterDriver;
/// use tr150_hardware::types::LineSpec;
/// use tr150_hardware::Result;
///
/// async fn print_rule<P: PrinterDriver>(printer: &mut P) -> Result<i32> {
///     printer.open().await?;
///     printer.setup_page(PageSize::new(384, 40)).await?;
///     printer
///         .draw_line(&LineSpec { x0: 0, y0: 20, x1: 383, y1: 20, line_width: 2 })
///         .await?;
///     printer.print_page(0).await
/// }
/// ```
pub trait PrinterDriver: Send + Sync {
    /// Power up the print head and open a session.
    ///
    /// # Errors
    ///
    /// Returns [`Fault`](crate::HardwareError::Fault) if the print head
    /// cannot be powered.
    async fn open(&mut self) -> Result<ReturnCode>;

    /// Close the session and power down.
    ///
    /// Closing a printer that is not open is reported through the return
    /// code, not as an error.
    ///
    /// # Errors
    ///
    /// Returns [`Fault`](crate::HardwareError::Fault) if the driver fails
    /// to power down.
    async fn close(&mut self) -> Result<ReturnCode>;

    /// Set the paper feed speed.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The session is not open ([`NotOpen`](crate::HardwareError::NotOpen))
    /// - The driver reports a failure ([`Fault`](crate::HardwareError::Fault))
    async fn set_speed_level(&mut self, level: i32) -> Result<()>;

    /// Set the print darkness.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The session is not open ([`NotOpen`](crate::HardwareError::NotOpen))
    /// - The driver reports a failure ([`Fault`](crate::HardwareError::Fault))
    async fn set_gray_level(&mut self, level: i32) -> Result<()>;

    /// Allocate a blank page of the given size.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The session is not open ([`NotOpen`](crate::HardwareError::NotOpen))
    /// - The size is not positive ([`InvalidData`](crate::HardwareError::InvalidData))
    /// - The driver reports a failure ([`Fault`](crate::HardwareError::Fault))
    async fn setup_page(&mut self, size: PageSize) -> Result<ReturnCode>;

    /// Discard every primitive drawn on the current page.
    ///
    /// # Errors
    ///
    /// Returns [`NotOpen`](crate::HardwareError::NotOpen) or
    /// [`InvalidState`](crate::HardwareError::InvalidState) if no page is set
    /// up, and [`Fault`](crate::HardwareError::Fault) if the driver fails.
    async fn clear_page(&mut self) -> Result<ReturnCode>;

    /// Print the current page. Returns the driver's status code.
    ///
    /// A printer that is not ready (out of paper, overheated...) reports its
    /// status code and keeps the page for a retry.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The session is not open ([`NotOpen`](crate::HardwareError::NotOpen))
    /// - No page is set up ([`InvalidState`](crate::HardwareError::InvalidState))
    /// - The rotation is not one of
    ///   [`ROTATIONS`](tr150_core::constants::ROTATIONS)
    ///   ([`Unsupported`](crate::HardwareError::Unsupported))
    /// - The driver reports a failure ([`Fault`](crate::HardwareError::Fault))
    async fn print_page(&mut self, rotate: i32) -> Result<i32>;

    /// Draw a straight line on the current page.
    ///
    /// # Errors
    ///
    /// Returns [`NotOpen`](crate::HardwareError::NotOpen) or
    /// [`InvalidState`](crate::HardwareError::InvalidState) if no page is set
    /// up, and [`Fault`](crate::HardwareError::Fault) if the driver fails.
    async fn draw_line(&mut self, line: &LineSpec) -> Result<ReturnCode>;

    /// Draw a line of text. Returns the driver-computed value (text height).
    ///
    /// # Errors
    ///
    /// Returns [`NotOpen`](crate::HardwareError::NotOpen) or
    /// [`InvalidState`](crate::HardwareError::InvalidState) if no page is set
    /// up, and [`Fault`](crate::HardwareError::Fault) if the driver fails.
    async fn draw_text(&mut self, text: &TextSpec) -> Result<i32>;

    /// Draw text wrapped inside a box. Returns the driver-computed value.
    ///
    /// # Errors
    ///
    /// Returns [`NotOpen`](crate::HardwareError::NotOpen) or
    /// [`InvalidState`](crate::HardwareError::InvalidState) if no page is set
    /// up, and [`Fault`](crate::HardwareError::Fault) if the driver fails.
    async fn draw_text_boxed(&mut self, text: &TextBoxSpec) -> Result<i32>;

    /// Draw a barcode. Returns the driver-computed value.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No page is set up ([`NotOpen`](crate::HardwareError::NotOpen) or
    ///   [`InvalidState`](crate::HardwareError::InvalidState))
    /// - The data is empty ([`InvalidData`](crate::HardwareError::InvalidData))
    /// - The driver reports a failure ([`Fault`](crate::HardwareError::Fault))
    async fn draw_barcode(&mut self, barcode: &BarcodeSpec) -> Result<i32>;

    /// Draw a bitmap. Returns the driver-computed value.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No page is set up ([`NotOpen`](crate::HardwareError::NotOpen) or
    ///   [`InvalidState`](crate::HardwareError::InvalidState))
    /// - The bitmap is empty ([`InvalidData`](crate::HardwareError::InvalidData))
    /// - The driver reports a failure ([`Fault`](crate::HardwareError::Fault))
    async fn draw_bitmap(&mut self, bitmap: &BitmapSpec) -> Result<i32>;

    /// Query the printer status record.
    ///
    /// Works whether or not the session is open.
    ///
    /// # Errors
    ///
    /// Returns [`Fault`](crate::HardwareError::Fault) if the driver cannot
    /// report its status.
    async fn status(&self) -> Result<PrinterStatus>;

    /// Get device information.
    ///
    /// # Errors
    ///
    /// Returns [`Fault`](crate::HardwareError::Fault) if the driver cannot
    /// identify the device.
    async fn get_info(&self) -> Result<DeviceInfo>;
}

/// Barcode scanner engine driver.
///
/// The boolean results are the SDK's own success flags and are passed
/// through unchanged. A call made in the wrong engine state returns `false`
/// rather than an error.
pub trait ScannerDriver: Send + Sync {
    /// Power up the scan engine.
    ///
    /// # Errors
    ///
    /// Returns [`Fault`](crate::HardwareError::Fault) if the engine cannot be
    /// powered.
    async fn open(&mut self) -> Result<bool>;

    /// Power down the scan engine. Returns `false` if it was not open.
    ///
    /// # Errors
    ///
    /// Returns [`Fault`](crate::HardwareError::Fault) if the driver fails.
    async fn close(&mut self) -> Result<bool>;

    /// Start a decode session. Returns `false` if the engine is not open.
    ///
    /// # Errors
    ///
    /// Returns [`Fault`](crate::HardwareError::Fault) if the driver fails.
    async fn start_decode(&mut self) -> Result<bool>;

    /// Stop the running decode session. Returns `false` if the engine is not
    /// open.
    ///
    /// # Errors
    ///
    /// Returns [`Fault`](crate::HardwareError::Fault) if the driver fails.
    async fn stop_decode(&mut self) -> Result<bool>;

    /// Current engine state.
    ///
    /// # Errors
    ///
    /// Returns [`Fault`](crate::HardwareError::Fault) if the driver cannot
    /// report its state.
    async fn state(&self) -> Result<ScannerState>;

    /// Get device information.
    ///
    /// # Errors
    ///
    /// Returns [`Fault`](crate::HardwareError::Fault) if the driver cannot
    /// identify the device.
    async fn get_info(&self) -> Result<DeviceInfo>;
}

/// Broadcast-style source of decode events.
///
/// The source is activated by registering a receiver and deactivated by
/// unregistering it. It may invoke the receiver from any thread. Methods are
/// synchronous so registration can happen while a lock is held.
pub trait DecodeEventSource: Send + Sync {
    /// Register a receiver. Returns the id needed to unregister it.
    ///
    /// # Errors
    ///
    /// Returns [`Registration`](crate::HardwareError::Registration) if the
    /// source rejects the receiver.
    fn register(&self, receiver: DecodeCallback) -> Result<RegistrationId>;

    /// Unregister a receiver previously returned by [`register`](Self::register).
    ///
    /// # Errors
    ///
    /// Returns [`Registration`](crate::HardwareError::Registration) if the id
    /// is not registered.
    fn unregister(&self, id: RegistrationId) -> Result<()>;
}
