//! Single-slot relay of decode events to the current subscriber.
//!
//! At most one subscriber exists at a time. Subscribing again replaces it:
//! the previous [`EventStream`] is not told anything, it simply ends. With no
//! subscriber, events are dropped on the floor; only what is on screen now
//! matters to a live scan.
//!
//! Delivery never blocks the caller. Each subscriber gets a bounded buffer;
//! when a slow subscriber lets it fill up, further events are dropped with a
//! warning until it catches up.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures::Stream;
use tokio::sync::mpsc;
use tr150_hardware::DecodeEvent;
use tracing::{debug, trace, warn};

/// Outcome of handing one event to the relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Queued for the current subscriber.
    Delivered,

    /// No subscriber; the event was dropped.
    NoSubscriber,

    /// The event had no text payload; dropped.
    NoPayload,

    /// The subscriber's buffer was full; dropped.
    Overflow,
}

/// Holds the current subscriber, if any.
#[derive(Debug)]
pub struct EventRelay {
    sink: Option<mpsc::Sender<String>>,
    buffer: usize,
    log_payloads: bool,
}

impl EventRelay {
    /// Create a relay whose subscribers buffer up to `buffer` events.
    pub fn new(buffer: usize) -> Self {
        Self {
            sink: None,
            buffer: buffer.max(1),
            log_payloads: false,
        }
    }

    /// Include decoded payloads in trace logs.
    pub fn with_log_payloads(mut self, log_payloads: bool) -> Self {
        self.log_payloads = log_payloads;
        self
    }

    /// Install a new subscriber, replacing the current one.
    pub fn subscribe(&mut self) -> EventStream {
        let (tx, rx) = mpsc::channel(self.buffer);
        if self.sink.replace(tx).is_some() {
            debug!("Subscriber replaced");
        } else {
            debug!("Subscriber installed");
        }
        EventStream { rx }
    }

    /// Remove the current subscriber. Returns whether one was present.
    pub fn unsubscribe(&mut self) -> bool {
        let removed = self.sink.take().is_some();
        if removed {
            debug!("Subscriber removed");
        }
        removed
    }

    /// Whether a subscriber is currently listening.
    pub fn has_subscriber(&self) -> bool {
        self.sink.as_ref().is_some_and(|sink| !sink.is_closed())
    }

    /// Hand one decode event to the current subscriber.
    pub fn deliver(&mut self, event: DecodeEvent) -> Delivery {
        let Some(sink) = self.sink.as_ref() else {
            trace!("No subscriber, decode event dropped");
            return Delivery::NoSubscriber;
        };
        let Some(payload) = event.payload else {
            debug!(
                barcode_type = event.barcode_type,
                raw_len = event.raw.len(),
                "Decode event without text payload dropped"
            );
            return Delivery::NoPayload;
        };

        if self.log_payloads {
            trace!(%payload, "Relaying decode event");
        } else {
            trace!(len = payload.len(), "Relaying decode event");
        }

        match sink.try_send(payload) {
            Ok(()) => Delivery::Delivered,
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!(capacity = self.buffer, "Subscriber buffer full, decode event dropped");
                Delivery::Overflow
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                debug!("Subscriber went away, clearing slot");
                self.sink = None;
                Delivery::NoSubscriber
            }
        }
    }
}

/// Receiving end of a subscription.
///
/// Ends (yields `None`) when the subscription is replaced, removed, or the
/// bridge shuts down.
#[derive(Debug)]
pub struct EventStream {
    rx: mpsc::Receiver<String>,
}

impl EventStream {
    /// Wait for the next decoded payload.
    pub async fn recv(&mut self) -> Option<String> {
        self.rx.recv().await
    }

    /// Take a payload if one is already queued.
    pub fn try_recv(&mut self) -> Result<String, mpsc::error::TryRecvError> {
        self.rx.try_recv()
    }
}

impl Stream for EventStream {
    type Item = String;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}
