//! craes-sink-server
//!
//! Stand-in for the CRAES gateway: accepts WebSocket connections, decodes
//! each order message, and answers it with one response message.

pub mod config;
pub mod responder;
pub mod server;

// internal, not re-exported
mod connection;

pub use config::Config;
pub use responder::ResponsePolicy;
pub use server::SinkServer;
