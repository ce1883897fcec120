//! # Change Notifier
//!
//! Thin publish wrapper placing fully materialized records on a
//! module's update channel.

mod notifier;

pub use notifier::ChangeNotifier;
