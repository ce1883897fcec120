//! # Transport
//!
//! Request/reply and publish/subscribe primitives between backend and
//! clients, plus the subject grammar shared by both sides.
//!
//! The [`Transport`] trait is the collaborator boundary; [`MemoryBus`]
//! is the in-process implementation used by tests and the demo.

pub mod bus;
pub mod errors;
pub mod memory;
pub mod subject;

pub use bus::{BoxFuture, Envelope, PublishOutcome, RequestHandler, Subscription, Transport};
pub use errors::{TransportError, TransportResult};
pub use memory::MemoryBus;
pub use subject::topics;
