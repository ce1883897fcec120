//! # Query Service
//!
//! Read-through queries for records and definitions over the
//! request/reply transport primitive.

mod service;

pub use service::QueryService;
