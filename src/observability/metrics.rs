//! Metrics registry
//!
//! Counters only, monotonic increase, reset only on process start.
//! Thread-safe with `Relaxed` ordering; exactness across threads at a
//! given instant is not required.

use std::sync::atomic::{AtomicU64, Ordering};

/// Registry of operational counters
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    /// Commands applied end to end (persisted and notified)
    commands_applied: AtomicU64,
    /// Commands rejected at any pipeline stage
    commands_rejected: AtomicU64,
    /// Data queries served
    queries_served: AtomicU64,
    /// Definition requests served (including misses)
    definition_requests: AtomicU64,
    /// Change notifications published
    notifications_published: AtomicU64,
    /// Subscriber deliveries that failed (closed receiver)
    notification_failures: AtomicU64,
}

impl MetricsRegistry {
    /// Create a new registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment applied commands
    pub fn increment_commands_applied(&self) {
        self.commands_applied.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment rejected commands
    pub fn increment_commands_rejected(&self) {
        self.commands_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment served data queries
    pub fn increment_queries_served(&self) {
        self.queries_served.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment served definition requests
    pub fn increment_definition_requests(&self) {
        self.definition_requests.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment published change notifications
    pub fn increment_notifications_published(&self) {
        self.notifications_published.fetch_add(1, Ordering::Relaxed);
    }

    /// Add failed subscriber deliveries
    pub fn add_notification_failures(&self, count: u64) {
        self.notification_failures.fetch_add(count, Ordering::Relaxed);
    }

    /// Take a point-in-time snapshot of all counters
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            commands_applied: self.commands_applied.load(Ordering::Relaxed),
            commands_rejected: self.commands_rejected.load(Ordering::Relaxed),
            queries_served: self.queries_served.load(Ordering::Relaxed),
            definition_requests: self.definition_requests.load(Ordering::Relaxed),
            notifications_published: self.notifications_published.load(Ordering::Relaxed),
            notification_failures: self.notification_failures.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time counter values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub commands_applied: u64,
    pub commands_rejected: u64,
    pub queries_served: u64,
    pub definition_requests: u64,
    pub notifications_published: u64,
    pub notification_failures: u64,
}
