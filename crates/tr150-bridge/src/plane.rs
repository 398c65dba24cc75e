//! The event plane: one task owning the relay and the lifecycle gate.
//!
//! Every operation that touches the subscription slot or the source
//! registration is a message to this task, handled one at a time:
//!
//! ```text
//!  decode source ──Decode{generation}──┐
//!  host ───────────Host(signal)────────┼──► inbox ──► EventPlane ──► EventStream
//!  facade ─────────Subscribe/...───────┘              (gate, relay)
//! ```
//!
//! Decode callbacks only enqueue, so the source's delivery thread never
//! waits on the plane. Because a registration and a deregistration are
//! handled in inbox order, they cannot race; events stamped with a
//! generation other than the live one are discarded.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tr150_hardware::{AnyDecodeSource, DecodeCallback, DecodeEvent};
use tracing::{debug, info, trace};

use crate::config::BridgeConfig;
use crate::error::{BridgeError, Result};
use crate::lifecycle::{
    Binding, GateState, Generation, HostSignal, LifecycleGate, ReceiverFactory,
};
use crate::relay::{EventRelay, EventStream};

/// Point-in-time view of the event plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlaneSnapshot {
    pub gate: GateState,
    pub binding: Binding,
    pub subscribed: bool,
    pub generation: Option<Generation>,
}

#[derive(Debug)]
pub(crate) enum PlaneMessage {
    Decode {
        generation: Generation,
        event: DecodeEvent,
    },
    Host {
        signal: HostSignal,
        reply: Option<oneshot::Sender<GateState>>,
    },
    Subscribe {
        reply: oneshot::Sender<EventStream>,
    },
    Unsubscribe {
        reply: oneshot::Sender<bool>,
    },
    Snapshot {
        reply: oneshot::Sender<PlaneSnapshot>,
    },
    Shutdown {
        reply: oneshot::Sender<()>,
    },
}

/// Sending side of the plane's inbox.
#[derive(Debug, Clone)]
pub(crate) struct PlaneHandle {
    inbox: mpsc::UnboundedSender<PlaneMessage>,
}

impl PlaneHandle {
    pub(crate) fn send(&self, message: PlaneMessage) -> Result<()> {
        self.inbox
            .send(message)
            .map_err(|_| BridgeError::PlaneStopped)
    }

    async fn request<T>(
        &self,
        message: impl FnOnce(oneshot::Sender<T>) -> PlaneMessage,
    ) -> Result<T> {
        let (reply, response) = oneshot::channel();
        self.send(message(reply))?;
        response.await.map_err(|_| BridgeError::PlaneStopped)
    }

    pub(crate) async fn host_signal(&self, signal: HostSignal) -> Result<GateState> {
        self.request(|reply| PlaneMessage::Host {
            signal,
            reply: Some(reply),
        })
        .await
    }

    pub(crate) async fn subscribe(&self) -> Result<EventStream> {
        self.request(|reply| PlaneMessage::Subscribe { reply }).await
    }

    pub(crate) async fn unsubscribe(&self) -> Result<bool> {
        self.request(|reply| PlaneMessage::Unsubscribe { reply }).await
    }

    pub(crate) async fn snapshot(&self) -> Result<PlaneSnapshot> {
        self.request(|reply| PlaneMessage::Snapshot { reply }).await
    }

    pub(crate) async fn shutdown(&self) -> Result<()> {
        self.request(|reply| PlaneMessage::Shutdown { reply }).await
    }
}

pub(crate) struct EventPlane {
    relay: EventRelay,
    gate: LifecycleGate,
}

impl EventPlane {
    /// Spawn the plane task on the current runtime.
    ///
    /// The task runs until it is told to shut down or every [`PlaneHandle`]
    /// is dropped; either way the source is deregistered on the way out.
    pub(crate) fn spawn(
        source: AnyDecodeSource,
        config: &BridgeConfig,
    ) -> (PlaneHandle, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();

        // Receivers hold a weak sender so a live registration does not keep
        // the plane running.
        let weak = tx.downgrade();
        let make_receiver: ReceiverFactory =
            Box::new(move |generation: Generation| -> DecodeCallback {
                let inbox = weak.clone();
                Arc::new(move |event: DecodeEvent| {
                    let Some(inbox) = inbox.upgrade() else {
                        return;
                    };
                    if inbox.send(PlaneMessage::Decode { generation, event }).is_err() {
                        trace!(generation, "Event plane gone, decode event dropped");
                    }
                })
            });

        let plane = Self {
            relay: EventRelay::new(config.event_buffer).with_log_payloads(config.log_payloads),
            gate: LifecycleGate::new(source, make_receiver),
        };
        let task = tokio::spawn(plane.run(rx));

        (PlaneHandle { inbox: tx }, task)
    }

    async fn run(mut self, mut inbox: mpsc::UnboundedReceiver<PlaneMessage>) {
        debug!("Event plane started");

        while let Some(message) = inbox.recv().await {
            match message {
                PlaneMessage::Decode { generation, event } => self.on_decode(generation, event),
                PlaneMessage::Host { signal, reply } => {
                    let state = self.on_host_signal(signal);
                    if let Some(reply) = reply {
                        let _ = reply.send(state);
                    }
                }
                PlaneMessage::Subscribe { reply } => {
                    let _ = reply.send(self.relay.subscribe());
                }
                PlaneMessage::Unsubscribe { reply } => {
                    let _ = reply.send(self.relay.unsubscribe());
                }
                PlaneMessage::Snapshot { reply } => {
                    let _ = reply.send(self.snapshot());
                }
                PlaneMessage::Shutdown { reply } => {
                    self.close();
                    let _ = reply.send(());
                    return;
                }
            }
        }

        self.close();
    }

    fn on_decode(&mut self, generation: Generation, event: DecodeEvent) {
        if self.gate.active_generation() != Some(generation) {
            debug!(generation, "Decode event from stale registration discarded");
            return;
        }
        self.relay.deliver(event);
    }

    fn on_host_signal(&mut self, signal: HostSignal) -> GateState {
        debug!(%signal, "Host signal");
        match signal {
            HostSignal::Attached => {
                self.gate.attach();
                self.gate.state()
            }
            HostSignal::Resumed => self.gate.resume(),
            HostSignal::Paused => self.gate.pause(),
            HostSignal::DetachedForConfigChange => self.gate.detach(),
            HostSignal::Detached => {
                let state = self.gate.detach();
                self.relay.unsubscribe();
                state
            }
        }
    }

    fn snapshot(&self) -> PlaneSnapshot {
        PlaneSnapshot {
            gate: self.gate.state(),
            binding: self.gate.binding(),
            subscribed: self.relay.has_subscriber(),
            generation: self.gate.active_generation(),
        }
    }

    fn close(&mut self) {
        self.gate.detach();
        self.relay.unsubscribe();
        info!("Event plane stopped");
    }
}
