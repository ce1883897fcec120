//! In-process message bus
//!
//! The reference [`Transport`] implementation: a responder table for
//! request/reply and unbounded mpsc fan-out for publish/subscribe. In
//! production the collaborator would be a networked broker with the
//! same surface; everything above the trait is unaware of the
//! difference.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::mpsc;
use uuid::Uuid;

use super::bus::{
    BoxFuture, Envelope, PublishOutcome, RequestHandler, Subscription, Transport,
};
use super::errors::{TransportError, TransportResult};
use super::subject;

/// Default request deadline
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_millis(5000);

struct Subscriber {
    pattern: String,
    sender: mpsc::UnboundedSender<Envelope>,
}

/// In-process bus
pub struct MemoryBus {
    responders: RwLock<Vec<(String, RequestHandler)>>,
    subscribers: RwLock<HashMap<Uuid, Subscriber>>,
    request_timeout: Duration,
}

impl MemoryBus {
    /// Creates a bus with the default request timeout
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_REQUEST_TIMEOUT)
    }

    /// Creates a bus with an explicit request timeout
    pub fn with_timeout(request_timeout: Duration) -> Self {
        Self {
            responders: RwLock::new(Vec::new()),
            subscribers: RwLock::new(HashMap::new()),
            request_timeout,
        }
    }

    /// Drops a subscription; subsequent publishes stop matching it
    pub fn unsubscribe(&self, id: Uuid) {
        if let Ok(mut subscribers) = self.subscribers.write() {
            subscribers.remove(&id);
        }
    }

    /// Number of live subscriptions
    pub fn subscription_count(&self) -> usize {
        self.subscribers.read().map(|s| s.len()).unwrap_or(0)
    }

    fn find_responder(&self, subject: &str) -> Option<RequestHandler> {
        let responders = self.responders.read().ok()?;
        responders
            .iter()
            .find(|(pattern, _)| subject::matches(pattern, subject))
            .map(|(_, handler)| handler.clone())
    }
}

impl Default for MemoryBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for MemoryBus {
    fn request(&self, subject_str: &str, payload: Value) -> BoxFuture<'_, TransportResult<Value>> {
        let subject_str = subject_str.to_string();
        Box::pin(async move {
            subject::validate_subject(&subject_str)?;
            let handler = self
                .find_responder(&subject_str)
                .ok_or(TransportError::NoResponder {
                    subject: subject_str.clone(),
                })?;
            let reply = handler(subject_str.clone(), payload);
            tokio::time::timeout(self.request_timeout, reply)
                .await
                .map_err(|_| TransportError::Timeout {
                    subject: subject_str,
                    timeout_ms: self.request_timeout.as_millis() as u64,
                })
        })
    }

    fn publish(&self, subject_str: &str, payload: Value) -> TransportResult<PublishOutcome> {
        subject::validate_subject(subject_str)?;
        let subscribers = self
            .subscribers
            .read()
            .map_err(|_| TransportError::Closed)?;

        let mut outcome = PublishOutcome::default();
        for subscriber in subscribers.values() {
            if !subject::matches(&subscriber.pattern, subject_str) {
                continue;
            }
            outcome.matched += 1;
            let envelope = Envelope {
                subject: subject_str.to_string(),
                payload: payload.clone(),
            };
            match subscriber.sender.send(envelope) {
                Ok(()) => outcome.delivered += 1,
                Err(_) => outcome.failed += 1,
            }
        }
        Ok(outcome)
    }

    fn subscribe(&self, pattern: &str) -> TransportResult<Subscription> {
        subject::validate_pattern(pattern)?;
        let (sender, receiver) = mpsc::unbounded_channel();
        let id = Uuid::new_v4();
        let mut subscribers = self
            .subscribers
            .write()
            .map_err(|_| TransportError::Closed)?;
        subscribers.insert(
            id,
            Subscriber {
                pattern: pattern.to_string(),
                sender,
            },
        );
        Ok(Subscription::new(id, receiver))
    }

    fn respond(&self, pattern: &str, handler: RequestHandler) -> TransportResult<()> {
        subject::validate_pattern(pattern)?;
        let mut responders = self
            .responders
            .write()
            .map_err(|_| TransportError::Closed)?;
        responders.push((pattern.to_string(), handler));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;

    fn echo_handler() -> RequestHandler {
        Arc::new(|subject, payload| {
            Box::pin(async move { json!({"subject": subject, "echo": payload}) })
        })
    }

    #[tokio::test]
    async fn request_reaches_a_wildcard_responder() {
        let bus = MemoryBus::new();
        bus.respond("data.get.*", echo_handler()).unwrap();

        let reply = bus
            .request("data.get.incidents", json!({"q": 1}))
            .await
            .unwrap();
        assert_eq!(reply["subject"], "data.get.incidents");
        assert_eq!(reply["echo"], json!({"q": 1}));
    }

    #[tokio::test]
    async fn request_without_responder_fails() {
        let bus = MemoryBus::new();
        let err = bus.request("data.get.incidents", Value::Null).await.unwrap_err();
        assert!(matches!(err, TransportError::NoResponder { .. }));
    }

    #[tokio::test]
    async fn request_times_out_when_the_handler_stalls() {
        let bus = MemoryBus::with_timeout(Duration::from_millis(20));
        bus.respond(
            "slow.op",
            Arc::new(|_, _| {
                Box::pin(async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    Value::Null
                })
            }),
        )
        .unwrap();

        let err = bus.request("slow.op", Value::Null).await.unwrap_err();
        assert!(matches!(err, TransportError::Timeout { .. }));
    }

    #[tokio::test]
    async fn publish_fans_out_to_every_matching_subscription() {
        let bus = MemoryBus::new();
        let mut first = bus.subscribe("incidents.updated").unwrap();
        let mut second = bus.subscribe("*.updated").unwrap();
        let mut other = bus.subscribe("instructions.updated").unwrap();

        let outcome = bus
            .publish("incidents.updated", json!({"id": "INC-001"}))
            .unwrap();
        assert_eq!(outcome.matched, 2);
        assert_eq!(outcome.delivered, 2);

        assert_eq!(first.recv().await.unwrap().payload, json!({"id": "INC-001"}));
        assert_eq!(second.recv().await.unwrap().subject, "incidents.updated");
        assert!(other.try_recv().is_none());
    }

    #[tokio::test]
    async fn publish_counts_closed_receivers_as_failed() {
        let bus = MemoryBus::new();
        let subscription = bus.subscribe("incidents.updated").unwrap();
        drop(subscription);

        let outcome = bus.publish("incidents.updated", Value::Null).unwrap();
        assert_eq!(outcome.matched, 1);
        assert_eq!(outcome.delivered, 0);
        assert_eq!(outcome.failed, 1);
    }

    #[tokio::test]
    async fn deliveries_preserve_publish_order_per_subscription() {
        let bus = MemoryBus::new();
        let mut sub = bus.subscribe("incidents.updated").unwrap();
        for n in 0..5 {
            bus.publish("incidents.updated", json!(n)).unwrap();
        }
        for n in 0..5 {
            assert_eq!(sub.recv().await.unwrap().payload, json!(n));
        }
    }

    #[tokio::test]
    async fn unsubscribe_stops_matching() {
        let bus = MemoryBus::new();
        let sub = bus.subscribe("incidents.updated").unwrap();
        assert_eq!(bus.subscription_count(), 1);
        bus.unsubscribe(sub.id());
        assert_eq!(bus.subscription_count(), 0);
        let outcome = bus.publish("incidents.updated", Value::Null).unwrap();
        assert_eq!(outcome.matched, 0);
    }

    #[tokio::test]
    async fn wildcard_publish_subject_is_rejected() {
        let bus = MemoryBus::new();
        assert!(bus.publish("incidents.*", Value::Null).is_err());
        assert!(bus.subscribe("a..b").is_err());
    }
}
