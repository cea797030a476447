//! Journey Webhook Bridge Library
//!
//! Adapter between a Journey Builder-style orchestration host and an
//! operator-configured webhook endpoint: normalizes contact attributes,
//! relays a derived payload downstream, and always answers the host with a
//! parsable response.

pub mod config;
pub mod contact;
pub mod dispatch;
pub mod server;
