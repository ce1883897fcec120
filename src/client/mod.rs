//! # Client
//!
//! The viewer side of the synchronization protocol: a single-writer
//! state object per module view, a session that queries and subscribes
//! over the transport, and the dispatcher that turns definition actions
//! into effects.

pub mod dispatch;
pub mod errors;
pub mod session;
pub mod state;

pub use dispatch::{ActionDispatcher, DispatchOutcome, RecordingRouter, Router};
pub use errors::{ClientError, ClientResult};
pub use session::ClientSession;
pub use state::ClientState;
