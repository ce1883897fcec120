//! Transport collaborator surface
//!
//! Request/reply and publish/subscribe primitives over JSON payloads.
//! Implementations are assumed reliable-enough with timeouts; publish
//! delivery is at-most-once best-effort and no acknowledgment is
//! tracked here.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::mpsc;
use uuid::Uuid;

use super::errors::TransportResult;

/// Boxed future, the async return style for object-safe traits
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A server-side request handler. The returned value is the reply
/// payload; handlers fold their own failures into that payload and
/// never panic the serving loop.
pub type RequestHandler = Arc<dyn Fn(String, Value) -> BoxFuture<'static, Value> + Send + Sync>;

/// One delivered publication
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    /// Concrete subject the message was published on
    pub subject: String,
    /// JSON payload
    pub payload: Value,
}

/// A long-lived subscription. Deliveries for one subscription arrive in
/// publish order; ordering across two subscriptions is not guaranteed.
#[derive(Debug)]
pub struct Subscription {
    id: Uuid,
    receiver: mpsc::UnboundedReceiver<Envelope>,
}

impl Subscription {
    pub(crate) fn new(id: Uuid, receiver: mpsc::UnboundedReceiver<Envelope>) -> Self {
        Self { id, receiver }
    }

    /// Subscription id, used to unsubscribe
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Next delivery, `None` once the bus side is gone
    pub async fn recv(&mut self) -> Option<Envelope> {
        self.receiver.recv().await
    }

    /// Non-blocking poll for a delivery
    pub fn try_recv(&mut self) -> Option<Envelope> {
        self.receiver.try_recv().ok()
    }
}

/// Fan-out accounting for one publish
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PublishOutcome {
    /// Subscriptions whose pattern matched
    pub matched: usize,
    /// Messages handed to a live receiver
    pub delivered: usize,
    /// Messages dropped on a closed receiver
    pub failed: usize,
}

/// The transport collaborator
pub trait Transport: Send + Sync {
    /// Sends a request and awaits its reply within the transport's
    /// configured deadline
    fn request(&self, subject: &str, payload: Value) -> BoxFuture<'_, TransportResult<Value>>;

    /// Publishes to every matching subscription, best-effort
    fn publish(&self, subject: &str, payload: Value) -> TransportResult<PublishOutcome>;

    /// Opens a long-lived subscription on a pattern
    fn subscribe(&self, pattern: &str) -> TransportResult<Subscription>;

    /// Registers a request handler on a pattern
    fn respond(&self, pattern: &str, handler: RequestHandler) -> TransportResult<()>;
}
