//! Mock thermal printer for testing and development.
//!
//! The mock keeps an in-memory model of the printer session (open flag, page,
//! pending primitives, printed pages) and enforces the page-composition
//! order the way the firmware does: drawing before `setup_page`, or anything
//! before `open`, is rejected with a state error.

use std::sync::Arc;

use tokio::sync::Mutex;
use tr150_core::constants::{
    CLEAR_PAGE, CLOSE_PRINTER, DEFAULT_GRAY_LEVEL, DEFAULT_SPEED_LEVEL, DRAW_BARCODE, DRAW_BITMAP,
    DRAW_LINE, DRAW_TEXT, DRAW_TEXT_EX, GET_STATUS, OPEN_PRINTER, PRINT_PAGE, PRNSTS_ERR,
    PRNSTS_OK, PRNSTS_OUT_OF_PAPER, ROTATIONS, SET_GRAY_LEVEL, SET_SPEED_LEVEL, SETUP_PAGE,
};
use tr150_core::{PageSize, PrinterCondition, PrinterStatus};

use crate::{
    HardwareError, Result,
    traits::PrinterDriver,
    types::{BarcodeSpec, BitmapSpec, DeviceInfo, LineSpec, ReturnCode, TextBoxSpec, TextSpec},
};

/// A primitive drawn on the current page.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Primitive {
    Line(LineSpec),
    Text(TextSpec),
    TextBox(TextBoxSpec),
    Barcode(BarcodeSpec),
    Bitmap(BitmapSpec),
}

/// A page committed by `print_page`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintedPage {
    pub size: PageSize,
    pub rotate: i32,
    pub primitives: Vec<Primitive>,
}

#[derive(Debug)]
struct PrinterModel {
    is_open: bool,
    page: Option<PageSize>,
    primitives: Vec<Primitive>,
    printed: Vec<PrintedPage>,
    speed_level: i32,
    gray_level: i32,
    status_code: i32,
    pending_fault: Option<i32>,
    calls: Vec<&'static str>,
}

impl PrinterModel {
    fn new() -> Self {
        Self {
            is_open: false,
            page: None,
            primitives: Vec::new(),
            printed: Vec::new(),
            speed_level: DEFAULT_SPEED_LEVEL,
            gray_level: DEFAULT_GRAY_LEVEL,
            status_code: PRNSTS_OK,
            pending_fault: None,
            calls: Vec::new(),
        }
    }

    /// Record the call and fire any injected fault.
    fn enter(&mut self, operation: &'static str) -> Result<()> {
        self.calls.push(operation);
        match self.pending_fault.take() {
            Some(code) => Err(HardwareError::fault(
                code,
                format!("injected fault in {operation}"),
            )),
            None => Ok(()),
        }
    }

    fn require_open(&self) -> Result<()> {
        if self.is_open {
            Ok(())
        } else {
            Err(HardwareError::not_open("Printer"))
        }
    }

    fn require_page(&self) -> Result<PageSize> {
        self.require_open()?;
        self.page
            .ok_or_else(|| HardwareError::invalid_state("page not set up"))
    }

    fn draw(&mut self, primitive: Primitive) -> Result<()> {
        self.require_page()?;
        self.primitives.push(primitive);
        Ok(())
    }

    fn status(&self) -> PrinterStatus {
        PrinterStatus {
            code: self.status_code,
            condition: PrinterCondition::from_code(self.status_code),
            is_open: self.is_open,
            page: self.page,
            speed_level: self.speed_level,
            gray_level: self.gray_level,
        }
    }
}

/// Mock printer for testing and development.
///
/// # Examples
///
/// ```
/// use tr150_core::PageSize;
/// use tr150_hardware::mock::MockPrinter;
/// use tr150_hardware::traits::PrinterDriver;
/// use tr150_hardware::types::LineSpec;
///
/// #[tokio::main]
/// async fn main() -> tr150_hardware::Result<()> {
///     let (mut printer, handle) = MockPrinter::new();
///
///     printer.open().await?;
///     printer.setup_page(PageSize::new(384, 100)).await?;
///     printer
///         .draw_line(&LineSpec { x0: 0, y0: 0, x1: 383, y1: 0, line_width: 1 })
///         .await?;
///     assert_eq!(printer.print_page(0).await?, 0);
///
///     assert_eq!(handle.printed_pages().await.len(), 1);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockPrinter {
    model: Arc<Mutex<PrinterModel>>,
    name: String,
}

impl MockPrinter {
    /// Create a new mock printer with the default name.
    ///
    /// Returns a tuple of (MockPrinter, MockPrinterHandle) where the handle
    /// can be used to inspect and perturb the printer.
    pub fn new() -> (Self, MockPrinterHandle) {
        Self::with_name("Mock Printer".to_string())
    }

    /// Create a new mock printer with a custom name.
    pub fn with_name(name: String) -> (Self, MockPrinterHandle) {
        let model = Arc::new(Mutex::new(PrinterModel::new()));

        let printer = Self {
            model: Arc::clone(&model),
            name: name.clone(),
        };

        (printer, MockPrinterHandle { model, name })
    }
}

impl Default for MockPrinter {
    fn default() -> Self {
        Self::new().0
    }
}

impl PrinterDriver for MockPrinter {
    async fn open(&mut self) -> Result<ReturnCode> {
        let mut model = self.model.lock().await;
        model.enter(OPEN_PRINTER)?;
        model.is_open = true;
        Ok(ReturnCode::SUCCESS)
    }

    async fn close(&mut self) -> Result<ReturnCode> {
        let mut model = self.model.lock().await;
        model.enter(CLOSE_PRINTER)?;
        if !model.is_open {
            return Ok(ReturnCode(PRNSTS_ERR));
        }
        model.is_open = false;
        model.page = None;
        model.primitives.clear();
        Ok(ReturnCode::SUCCESS)
    }

    async fn set_speed_level(&mut self, level: i32) -> Result<()> {
        let mut model = self.model.lock().await;
        model.enter(SET_SPEED_LEVEL)?;
        model.require_open()?;
        model.speed_level = level;
        Ok(())
    }

    async fn set_gray_level(&mut self, level: i32) -> Result<()> {
        let mut model = self.model.lock().await;
        model.enter(SET_GRAY_LEVEL)?;
        model.require_open()?;
        model.gray_level = level;
        Ok(())
    }

    async fn setup_page(&mut self, size: PageSize) -> Result<ReturnCode> {
        let mut model = self.model.lock().await;
        model.enter(SETUP_PAGE)?;
        model.require_open()?;
        if size.width <= 0 || size.height <= 0 {
            return Err(HardwareError::invalid_data(format!(
                "page size must be positive, got {}x{}",
                size.width, size.height
            )));
        }
        model.page = Some(size);
        model.primitives.clear();
        Ok(ReturnCode::SUCCESS)
    }

    async fn clear_page(&mut self) -> Result<ReturnCode> {
        let mut model = self.model.lock().await;
        model.enter(CLEAR_PAGE)?;
        model.require_page()?;
        model.primitives.clear();
        Ok(ReturnCode::SUCCESS)
    }

    async fn print_page(&mut self, rotate: i32) -> Result<i32> {
        let mut model = self.model.lock().await;
        model.enter(PRINT_PAGE)?;
        let size = model.require_page()?;
        if !ROTATIONS.contains(&rotate) {
            return Err(HardwareError::unsupported(format!("rotation {rotate}")));
        }

        // Not ready: report the condition, keep the page for a retry.
        if model.status_code != PRNSTS_OK {
            return Ok(model.status_code);
        }

        let primitives = std::mem::take(&mut model.primitives);
        model.printed.push(PrintedPage {
            size,
            rotate,
            primitives,
        });
        Ok(PRNSTS_OK)
    }

    async fn draw_line(&mut self, line: &LineSpec) -> Result<ReturnCode> {
        let mut model = self.model.lock().await;
        model.enter(DRAW_LINE)?;
        model.draw(Primitive::Line(line.clone()))?;
        Ok(ReturnCode::SUCCESS)
    }

    async fn draw_text(&mut self, text: &TextSpec) -> Result<i32> {
        let mut model = self.model.lock().await;
        model.enter(DRAW_TEXT)?;
        model.draw(Primitive::Text(text.clone()))?;
        Ok(text.font_size)
    }

    async fn draw_text_boxed(&mut self, text: &TextBoxSpec) -> Result<i32> {
        let mut model = self.model.lock().await;
        model.enter(DRAW_TEXT_EX)?;
        model.draw(Primitive::TextBox(text.clone()))?;
        Ok(text.height)
    }

    async fn draw_barcode(&mut self, barcode: &BarcodeSpec) -> Result<i32> {
        let mut model = self.model.lock().await;
        model.enter(DRAW_BARCODE)?;
        if barcode.data.is_empty() {
            return Err(HardwareError::invalid_data("barcode data is empty"));
        }
        model.draw(Primitive::Barcode(barcode.clone()))?;
        Ok(barcode.height)
    }

    async fn draw_bitmap(&mut self, bitmap: &BitmapSpec) -> Result<i32> {
        let mut model = self.model.lock().await;
        model.enter(DRAW_BITMAP)?;
        if bitmap.bitmap.is_empty() {
            return Err(HardwareError::invalid_data("bitmap is empty"));
        }
        model.draw(Primitive::Bitmap(bitmap.clone()))?;
        Ok(bitmap.height)
    }

    async fn status(&self) -> Result<PrinterStatus> {
        let mut model = self.model.lock().await;
        model.enter(GET_STATUS)?;
        Ok(model.status())
    }

    async fn get_info(&self) -> Result<DeviceInfo> {
        Ok(DeviceInfo::new(self.name.clone(), "Mock Thermal Printer v1.0")
            .with_firmware_version("1.0.0"))
    }
}

/// Handle for inspecting and controlling a mock printer.
///
/// Shares the printer's model, so everything it observes reflects calls made
/// through the driver.
#[derive(Debug, Clone)]
pub struct MockPrinterHandle {
    model: Arc<Mutex<PrinterModel>>,
    name: String,
}

impl MockPrinterHandle {
    /// Device name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Make the next driver call fail with the given code.
    pub async fn fail_next(&self, code: i32) {
        self.model.lock().await.pending_fault = Some(code);
    }

    /// Set the status code the printer reports.
    pub async fn set_status_code(&self, code: i32) {
        self.model.lock().await.status_code = code;
    }

    /// Simulate the paper roll running out (or being replaced).
    pub async fn set_out_of_paper(&self, out: bool) {
        let code = if out { PRNSTS_OUT_OF_PAPER } else { PRNSTS_OK };
        self.set_status_code(code).await;
    }

    /// Operations invoked so far, by method name, in order.
    pub async fn calls(&self) -> Vec<&'static str> {
        self.model.lock().await.calls.clone()
    }

    /// Number of driver calls made so far.
    pub async fn call_count(&self) -> usize {
        self.model.lock().await.calls.len()
    }

    /// Pages committed by `print_page`.
    pub async fn printed_pages(&self) -> Vec<PrintedPage> {
        self.model.lock().await.printed.clone()
    }

    /// Primitives drawn on the current, uncommitted page.
    pub async fn pending_primitives(&self) -> Vec<Primitive> {
        self.model.lock().await.primitives.clone()
    }

    /// Whether the printer session is open.
    pub async fn is_open(&self) -> bool {
        self.model.lock().await.is_open
    }
}
