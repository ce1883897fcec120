//! # Backend Server
//!
//! Wires the query service, command processor, and change notifier onto
//! the transport, and owns the seed data for the shipped modules.

pub mod backend;
pub mod seed;

pub use backend::Backend;
