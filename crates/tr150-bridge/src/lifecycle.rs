//! Host lifecycle gate.
//!
//! The decode source may only be registered while the host is in the
//! foreground. The gate is a two-state machine driven by [`HostSignal`]s:
//!
//! ```text
//!             resume (bound)
//!   Inactive ───────────────► Active
//!      ▲                        │
//!      └────────────────────────┘
//!        pause / detach*
//! ```
//!
//! While Active the gate owns the source registration handle, so
//! deregistration always has something to hand back. Every registration gets
//! a fresh [`Generation`]; the receiver callback is stamped with it, which
//! lets the event plane discard anything a stale registration still manages
//! to deliver.

use std::fmt;

use serde::{Deserialize, Serialize};
use tr150_hardware::traits::DecodeEventSource;
use tr150_hardware::{AnyDecodeSource, DecodeCallback, RegistrationId};
use tracing::{debug, error, info, warn};

/// Registration counter used to tell current events from stale ones.
pub type Generation = u64;

/// Builds the decode receiver for a registration generation.
pub type ReceiverFactory = Box<dyn Fn(Generation) -> DecodeCallback + Send>;

/// Lifecycle notification from the embedding host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostSignal {
    /// A host instance was attached.
    Attached,

    /// The host came to the foreground.
    Resumed,

    /// The host went to the background.
    Paused,

    /// The host is being recreated (configuration change); a new attach follows.
    DetachedForConfigChange,

    /// The host is gone for good.
    Detached,
}

impl fmt::Display for HostSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attached => write!(f, "attached"),
            Self::Resumed => write!(f, "resumed"),
            Self::Paused => write!(f, "paused"),
            Self::DetachedForConfigChange => write!(f, "detached for config change"),
            Self::Detached => write!(f, "detached"),
        }
    }
}

/// Whether the decode source is registered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateState {
    #[default]
    Inactive,
    Active,
}

/// Whether a host instance is attached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Binding {
    #[default]
    Unbound,
    Bound,
}

struct Registration {
    id: RegistrationId,
    generation: Generation,
}

/// Registers and deregisters the decode source as the host comes and goes.
pub struct LifecycleGate {
    source: AnyDecodeSource,
    make_receiver: ReceiverFactory,
    binding: Binding,
    registration: Option<Registration>,
    generation: Generation,
}

impl LifecycleGate {
    pub fn new(source: AnyDecodeSource, make_receiver: ReceiverFactory) -> Self {
        Self {
            source,
            make_receiver,
            binding: Binding::Unbound,
            registration: None,
            generation: 0,
        }
    }

    pub fn state(&self) -> GateState {
        if self.registration.is_some() {
            GateState::Active
        } else {
            GateState::Inactive
        }
    }

    pub fn binding(&self) -> Binding {
        self.binding
    }

    /// Generation of the live registration, if Active.
    pub fn active_generation(&self) -> Option<Generation> {
        self.registration.as_ref().map(|r| r.generation)
    }

    /// Bind to a host instance.
    pub fn attach(&mut self) {
        if self.binding == Binding::Bound {
            debug!("Host re-attached while bound");
        }
        self.binding = Binding::Bound;
        info!("Host attached");
    }

    /// Register the decode source, unless already registered.
    pub fn resume(&mut self) -> GateState {
        if self.binding == Binding::Unbound {
            warn!("Resume ignored, no host attached");
            return self.state();
        }
        if self.registration.is_some() {
            debug!("Resume while active, registration kept");
            return GateState::Active;
        }

        self.generation += 1;
        let generation = self.generation;
        let receiver = (self.make_receiver)(generation);
        match self.source.register(receiver) {
            Ok(id) => {
                info!(%id, generation, "Decode source registered");
                self.registration = Some(Registration { id, generation });
            }
            Err(e) => {
                error!(error = %e, "Decode source registration failed, gate stays inactive");
            }
        }
        self.state()
    }

    /// Deregister the decode source, if registered.
    pub fn pause(&mut self) -> GateState {
        let Some(registration) = self.registration.take() else {
            debug!("Pause while inactive");
            return GateState::Inactive;
        };
        match self.source.unregister(registration.id) {
            Ok(()) => info!(
                id = %registration.id,
                generation = registration.generation,
                "Decode source deregistered"
            ),
            // The handle is gone either way; late events from it are stale.
            Err(e) => error!(
                id = %registration.id,
                error = %e,
                "Decode source deregistration failed"
            ),
        }
        GateState::Inactive
    }

    /// Deregister if needed and unbind from the host.
    pub fn detach(&mut self) -> GateState {
        let state = self.pause();
        if self.binding == Binding::Bound {
            self.binding = Binding::Unbound;
            info!("Host detached");
        }
        state
    }
}

impl fmt::Debug for LifecycleGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifecycleGate")
            .field("binding", &self.binding)
            .field("state", &self.state())
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}
