//! Change notifier
//!
//! Publishes one full post-mutation record on `<module>.updated` per
//! successful command. Delivery is at-most-once best-effort: clients
//! not subscribed at publish time receive nothing and must re-query to
//! catch up. Failures are logged and counted, never raised.

use std::sync::Arc;

use crate::observability::{Logger, MetricsRegistry};
use crate::store::Record;
use crate::transport::{topics, Transport};

/// Publishes change notifications for mutated records
#[derive(Clone)]
pub struct ChangeNotifier {
    bus: Arc<dyn Transport>,
    metrics: Arc<MetricsRegistry>,
}

impl ChangeNotifier {
    /// Creates a notifier over a transport handle
    pub fn new(bus: Arc<dyn Transport>, metrics: Arc<MetricsRegistry>) -> Self {
        Self { bus, metrics }
    }

    /// Publishes the full record on the module's update channel.
    ///
    /// Never fails: a notifier problem must not fail the command whose
    /// mutation already persisted.
    pub fn publish(&self, module: &str, record: &Record) {
        let subject = topics::updated(module);
        match self.bus.publish(&subject, record.to_value()) {
            Ok(outcome) => {
                self.metrics.increment_notifications_published();
                if outcome.failed > 0 {
                    self.metrics.add_notification_failures(outcome.failed as u64);
                    Logger::warn(
                        "notify.partial",
                        &[
                            ("subject", &subject),
                            ("failed", &outcome.failed.to_string()),
                        ],
                    );
                }
            }
            Err(e) => {
                self.metrics.add_notification_failures(1);
                Logger::error(
                    "notify.failed",
                    &[("subject", &subject), ("error", &e.to_string())],
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Record;
    use crate::transport::MemoryBus;
    use serde_json::json;

    #[tokio::test]
    async fn publishes_the_full_record() {
        let bus = Arc::new(MemoryBus::new());
        let metrics = Arc::new(MetricsRegistry::new());
        let notifier = ChangeNotifier::new(bus.clone(), metrics.clone());
        let mut sub = bus.subscribe("incidents.updated").unwrap();

        let record = Record::from_value(json!({"id": "INC-001", "status": "open"})).unwrap();
        notifier.publish("incidents", &record);

        let envelope = sub.recv().await.unwrap();
        assert_eq!(envelope.subject, "incidents.updated");
        assert_eq!(envelope.payload, json!({"id": "INC-001", "status": "open"}));
        assert_eq!(metrics.snapshot().notifications_published, 1);
    }

    #[tokio::test]
    async fn closed_subscriber_is_counted_not_raised() {
        let bus = Arc::new(MemoryBus::new());
        let metrics = Arc::new(MetricsRegistry::new());
        let notifier = ChangeNotifier::new(bus.clone(), metrics.clone());
        drop(bus.subscribe("incidents.updated").unwrap());

        let record = Record::from_value(json!({"id": "INC-001"})).unwrap();
        notifier.publish("incidents", &record);
        assert_eq!(metrics.snapshot().notification_failures, 1);
    }

    #[tokio::test]
    async fn no_subscribers_is_fine() {
        let bus = Arc::new(MemoryBus::new());
        let metrics = Arc::new(MetricsRegistry::new());
        let notifier = ChangeNotifier::new(bus, metrics.clone());
        let record = Record::from_value(json!({"id": "INC-001"})).unwrap();
        notifier.publish("incidents", &record);
        assert_eq!(metrics.snapshot().notifications_published, 1);
        assert_eq!(metrics.snapshot().notification_failures, 0);
    }
}
