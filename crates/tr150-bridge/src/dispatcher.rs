//! Command dispatcher.
//!
//! Routes each [`Command`] to exactly one adapter call and maps its outcome
//! onto the [`CommandResult`] contract:
//!
//! | Driver convention | Result |
//! |---|---|
//! | return code (open/close printer, setupPage, clearPage, drawLine) | `Bool(code == 0)`, or a failure under [`ReturnCodePolicy::Strict`] |
//! | computed value (printPage, draw text/barcode/bitmap) | `Int`, unchanged |
//! | unit (speed and gray level) | `None` |
//! | boolean (scanner control) | `Bool`, unchanged |
//! | query (getStatus, getScannerState) | the record itself |
//!
//! Any driver error becomes a `Failure` carrying the driver code. The
//! dispatcher holds no state of its own between calls; sequencing is the
//! driver's business.

use std::sync::Arc;

use tr150_core::{CommandKind, CommandResult, ResultValue};
use tr150_hardware::traits::{PrinterDriver, ScannerDriver};
use tr150_hardware::{PeripheralAdapter, ReturnCode};
use tracing::{debug, trace, warn};

use crate::call::MethodCall;
use crate::command::Command;
use crate::config::ReturnCodePolicy;
use crate::error::DispatchError;

/// Executes commands against a [`PeripheralAdapter`].
///
/// Cheap to share: concurrent `dispatch` calls on one dispatcher are safe,
/// and calls against different peripherals run in parallel.
#[derive(Debug, Clone)]
pub struct CommandDispatcher {
    adapter: Arc<PeripheralAdapter>,
    policy: ReturnCodePolicy,
}

impl CommandDispatcher {
    pub fn new(adapter: Arc<PeripheralAdapter>, policy: ReturnCodePolicy) -> Self {
        Self { adapter, policy }
    }

    pub fn adapter(&self) -> &PeripheralAdapter {
        &self.adapter
    }

    /// Execute a decoded command.
    pub async fn dispatch(&self, command: &Command) -> CommandResult {
        let kind = command.kind();
        debug!(command = %kind, "Dispatching command");

        let result = self.execute(command).await;
        match &result {
            Ok(value) => trace!(command = %kind, ?value, "Command succeeded"),
            Err(e) => warn!(command = %kind, error = %e, "Command failed"),
        }
        result.into()
    }

    /// Decode a host method call and execute it.
    ///
    /// Decoding failures are returned without touching any driver.
    pub async fn dispatch_call(&self, call: &MethodCall) -> CommandResult {
        match call.decode() {
            Ok(command) => self.dispatch(&command).await,
            Err(e) => {
                debug!(method = %call.method, error = %e, "Rejected method call");
                Err::<ResultValue, _>(DispatchError::from(e)).into()
            }
        }
    }

    async fn execute(&self, command: &Command) -> Result<ResultValue, DispatchError> {
        let adapter = &self.adapter;
        let kind = command.kind();

        match command {
            // Printer
            Command::OpenPrinter => {
                let code = adapter.printer().await.open().await?;
                self.return_code(kind, code)
            }
            Command::ClosePrinter => {
                let code = adapter.printer().await.close().await?;
                self.return_code(kind, code)
            }
            Command::SetSpeedLevel { level } => {
                adapter.printer().await.set_speed_level(*level).await?;
                Ok(ResultValue::None)
            }
            Command::SetGrayLevel { level } => {
                adapter.printer().await.set_gray_level(*level).await?;
                Ok(ResultValue::None)
            }
            Command::SetupPage(size) => {
                let code = adapter.printer().await.setup_page(*size).await?;
                self.return_code(kind, code)
            }
            Command::ClearPage => {
                let code = adapter.printer().await.clear_page().await?;
                self.return_code(kind, code)
            }
            Command::PrintPage { rotate } => {
                let value = adapter.printer().await.print_page(*rotate).await?;
                Ok(ResultValue::Int(value))
            }
            Command::DrawLine(line) => {
                let code = adapter.printer().await.draw_line(line).await?;
                self.return_code(kind, code)
            }
            Command::DrawText(text) => {
                let value = adapter.printer().await.draw_text(text).await?;
                Ok(ResultValue::Int(value))
            }
            Command::DrawTextEx(text) => {
                let value = adapter.printer().await.draw_text_boxed(text).await?;
                Ok(ResultValue::Int(value))
            }
            Command::DrawBarcode(barcode) => {
                let value = adapter.printer().await.draw_barcode(barcode).await?;
                Ok(ResultValue::Int(value))
            }
            Command::DrawBitmap(bitmap) => {
                let value = adapter.printer().await.draw_bitmap(bitmap).await?;
                Ok(ResultValue::Int(value))
            }
            Command::GetStatus => {
                let status = adapter.printer().await.status().await?;
                Ok(ResultValue::Status(status))
            }

            // Scanner
            Command::OpenScanner => Ok(ResultValue::Bool(adapter.scanner().await.open().await?)),
            Command::CloseScanner => Ok(ResultValue::Bool(adapter.scanner().await.close().await?)),
            Command::GetScannerState => {
                let state = adapter.scanner().await.state().await?;
                Ok(ResultValue::ScannerState(state))
            }
            Command::StartDecode => {
                Ok(ResultValue::Bool(adapter.scanner().await.start_decode().await?))
            }
            Command::StopDecode => {
                Ok(ResultValue::Bool(adapter.scanner().await.stop_decode().await?))
            }
        }
    }

    fn return_code(
        &self,
        kind: CommandKind,
        code: ReturnCode,
    ) -> Result<ResultValue, DispatchError> {
        if code.is_success() {
            return Ok(ResultValue::Bool(true));
        }
        match self.policy {
            ReturnCodePolicy::Normalize => {
                debug!(command = %kind, %code, "Non-zero return code reported as false");
                Ok(ResultValue::Bool(false))
            }
            ReturnCodePolicy::Strict => Err(DispatchError::ReturnCode {
                operation: kind,
                code: code.value(),
            }),
        }
    }
}
