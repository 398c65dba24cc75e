//! Mock barcode scanner for testing and development.
//!
//! The mock is split the way the vendor SDK is: a [`MockScanner`] engine
//! driven by explicit calls, and a [`MockDecodeSource`] that broadcasts decode
//! events to every registered receiver. A [`MockScannerHandle`] simulates
//! trigger pulls and exposes counters for tests.

use std::sync::{Arc, Mutex as StdMutex, MutexGuard, PoisonError};

use tokio::sync::Mutex;
use tr150_core::ScannerState;
use tr150_core::constants::{
    CLOSE_SCANNER, GET_SCANNER_STATE, OPEN_SCANNER, START_DECODE, STOP_DECODE,
};

use crate::{
    HardwareError, Result,
    traits::{DecodeEventSource, ScannerDriver},
    types::{DecodeCallback, DecodeEvent, DeviceInfo, RegistrationId},
};

#[derive(Debug)]
struct ScannerModel {
    state: ScannerState,
    pending_fault: Option<i32>,
    calls: Vec<&'static str>,
}

impl ScannerModel {
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
}

#[derive(Default)]
struct Registry {
    receivers: Vec<(RegistrationId, DecodeCallback)>,
    total_registrations: usize,
    fail_next_registration: bool,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("receivers", &self.receivers.len())
            .field("total_registrations", &self.total_registrations)
            .finish()
    }
}

type SharedRegistry = Arc<StdMutex<Registry>>;

fn lock(registry: &SharedRegistry) -> MutexGuard<'_, Registry> {
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Mock scan engine.
///
/// # Examples
///
/// ```
/// use tr150_core::ScannerState;
/// use tr150_hardware::mock::MockScanner;
/// use tr150_hardware::traits::ScannerDriver;
///
/// #[tokio::main]
/// async fn main() -> tr150_hardware::Result<()> {
///     let (mut scanner, _handle) = MockScanner::new();
///
///     assert!(scanner.open().await?);
///     assert!(scanner.start_decode().await?);
///     assert_eq!(scanner.state().await?, ScannerState::Decoding);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockScanner {
    model: Arc<Mutex<ScannerModel>>,
    registry: SharedRegistry,
    name: String,
}

impl MockScanner {
    /// Create a new mock scanner with the default name.
    pub fn new() -> (Self, MockScannerHandle) {
        Self::with_name("Mock Scanner".to_string())
    }

    /// Create a new mock scanner with a custom name.
    pub fn with_name(name: String) -> (Self, MockScannerHandle) {
        let model = Arc::new(Mutex::new(ScannerModel {
            state: ScannerState::Closed,
            pending_fault: None,
            calls: Vec::new(),
        }));
        let registry = SharedRegistry::default();

        let scanner = Self {
            model: Arc::clone(&model),
            registry: Arc::clone(&registry),
            name,
        };

        (scanner, MockScannerHandle { model, registry })
    }

    /// Event source broadcasting this scanner's decodes.
    pub fn decode_source(&self) -> MockDecodeSource {
        MockDecodeSource {
            registry: Arc::clone(&self.registry),
        }
    }
}

impl Default for MockScanner {
    fn default() -> Self {
        Self::new().0
    }
}

impl ScannerDriver for MockScanner {
    async fn open(&mut self) -> Result<bool> {
        let mut model = self.model.lock().await;
        model.enter(OPEN_SCANNER)?;
        if model.state == ScannerState::Closed {
            model.state = ScannerState::Idle;
        }
        Ok(true)
    }

    async fn close(&mut self) -> Result<bool> {
        let mut model = self.model.lock().await;
        model.enter(CLOSE_SCANNER)?;
        let was_open = model.state.is_open();
        model.state = ScannerState::Closed;
        Ok(was_open)
    }

    async fn start_decode(&mut self) -> Result<bool> {
        let mut model = self.model.lock().await;
        model.enter(START_DECODE)?;
        if !model.state.is_open() {
            return Ok(false);
        }
        model.state = ScannerState::Decoding;
        Ok(true)
    }

    async fn stop_decode(&mut self) -> Result<bool> {
        let mut model = self.model.lock().await;
        model.enter(STOP_DECODE)?;
        if !model.state.is_open() {
            return Ok(false);
        }
        model.state = ScannerState::Idle;
        Ok(true)
    }

    async fn state(&self) -> Result<ScannerState> {
        let mut model = self.model.lock().await;
        model.enter(GET_SCANNER_STATE)?;
        Ok(model.state)
    }

    async fn get_info(&self) -> Result<DeviceInfo> {
        Ok(DeviceInfo::new(self.name.clone(), "Mock Scan Engine v1.0")
            .with_firmware_version("1.0.0"))
    }
}

/// Broadcast decode source of a [`MockScanner`].
#[derive(Debug, Clone)]
pub struct MockDecodeSource {
    registry: SharedRegistry,
}

impl DecodeEventSource for MockDecodeSource {
    fn register(&self, receiver: DecodeCallback) -> Result<RegistrationId> {
        let mut registry = lock(&self.registry);
        if std::mem::take(&mut registry.fail_next_registration) {
            return Err(HardwareError::registration("receiver rejected by source"));
        }
        let id = RegistrationId::new();
        registry.receivers.push((id, receiver));
        registry.total_registrations += 1;
        Ok(id)
    }

    fn unregister(&self, id: RegistrationId) -> Result<()> {
        let mut registry = lock(&self.registry);
        let before = registry.receivers.len();
        registry.receivers.retain(|(registered, _)| *registered != id);
        if registry.receivers.len() == before {
            return Err(HardwareError::registration(format!(
                "receiver {id} is not registered"
            )));
        }
        Ok(())
    }
}

/// Handle for simulating scans on a mock scanner.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use tr150_hardware::mock::MockScanner;
/// use tr150_hardware::traits::DecodeEventSource;
///
/// let (scanner, handle) = MockScanner::new();
/// let source = scanner.decode_source();
///
/// let seen = Arc::new(AtomicUsize::new(0));
/// let counter = Arc::clone(&seen);
/// source
///     .register(Arc::new(move |_event| {
///         counter.fetch_add(1, Ordering::SeqCst);
///     }))
///     .unwrap();
///
/// assert_eq!(handle.emit_text("4006381333931"), 1);
/// assert_eq!(seen.load(Ordering::SeqCst), 1);
/// ```
#[derive(Debug, Clone)]
pub struct MockScannerHandle {
    model: Arc<Mutex<ScannerModel>>,
    registry: SharedRegistry,
}

impl MockScannerHandle {
    /// Broadcast a decode event to every registered receiver.
    ///
    /// Returns the number of receivers reached. Receivers run on the calling
    /// thread, outside the registry lock.
    pub fn emit(&self, event: DecodeEvent) -> usize {
        let receivers: Vec<DecodeCallback> = lock(&self.registry)
            .receivers
            .iter()
            .map(|(_, receiver)| Arc::clone(receiver))
            .collect();

        for receiver in &receivers {
            receiver(event.clone());
        }
        receivers.len()
    }

    /// Broadcast a text decode.
    pub fn emit_text(&self, payload: impl Into<String>) -> usize {
        self.emit(DecodeEvent::text(payload))
    }

    /// Number of receivers currently registered.
    pub fn registration_count(&self) -> usize {
        lock(&self.registry).receivers.len()
    }

    /// Number of successful registrations since creation.
    pub fn total_registrations(&self) -> usize {
        lock(&self.registry).total_registrations
    }

    /// Make the next `register` call fail.
    pub fn fail_next_registration(&self) {
        lock(&self.registry).fail_next_registration = true;
    }

    /// Make the next engine call fail with the given code.
    pub async fn fail_next(&self, code: i32) {
        self.model.lock().await.pending_fault = Some(code);
    }

    /// Engine operations invoked so far, by method name, in order.
    pub async fn calls(&self) -> Vec<&'static str> {
        self.model.lock().await.calls.clone()
    }

    /// Number of engine calls made so far.
    pub async fn call_count(&self) -> usize {
        self.model.lock().await.calls.len()
    }

    /// Engine state, without recording a call.
    pub async fn state(&self) -> ScannerState {
        self.model.lock().await.state
    }
}
