//! craes-client
//!
//! Submits a batch of validated orders to the CRAES gateway over one
//! WebSocket connection and returns the trades executed for each.

pub mod config;
pub mod credentials;
pub mod error;
pub mod session;

pub use config::ClientConfig;
pub use credentials::Credentials;
pub use error::SessionError;
pub use session::SessionClient;
