//! Configuration for the sink server.
//!
//! Defaults can be overridden via environment variables:
//!
//! - `CRAES_SINK_BIND_ADDR`  (default: "127.0.0.1")
//! - `CRAES_SINK_PORT`       (default: "8080")
//! - `CRAES_SINK_POLICY`     (default: "empty"; or "fill")
//! - `CRAES_SINK_MAX_ORDERS` (default: unset, no per-connection cap)
//! - `CRAES_SINK_USER` and `CRAES_SINK_PASSPHRASE` (default: unset; when
//!   both are set, handshakes must present matching `User` / `Password`)

use std::env;
use std::str::FromStr;

use thiserror::Error;

use crate::responder::ResponsePolicy;

#[derive(Debug, Error)]
#[error("invalid value {value:?} for {key}: {reason}")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
    pub reason: String,
}

/// Expected handshake credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Auth {
    pub user: String,
    pub passphrase: String,
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// IP address / interface to bind to.
    pub bind_addr: String,

    /// TCP port to listen on. `0` picks a free port.
    pub port: u16,

    /// How each order is answered.
    pub policy: ResponsePolicy,

    /// Close a connection after answering this many orders.
    pub max_orders_per_connection: Option<usize>,

    /// Reject handshakes that do not carry these credentials.
    pub auth: Option<Auth>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bind_addr: "127.0.0.1".to_string(),
            port: 8080,
            policy: ResponsePolicy::Empty,
            max_orders_per_connection: None,
            auth: None,
        }
    }
}

impl Config {
    /// Construct a `Config` from environment variables, falling back
    /// to the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Config::default();

        let bind_addr = env::var("CRAES_SINK_BIND_ADDR").unwrap_or(defaults.bind_addr);
        let port = read_env_or_default("CRAES_SINK_PORT", defaults.port)?;
        let policy = read_env_or_default("CRAES_SINK_POLICY", defaults.policy)?;
        let max_orders_per_connection = match env::var("CRAES_SINK_MAX_ORDERS") {
            Ok(_) => Some(read_env_or_default("CRAES_SINK_MAX_ORDERS", 0usize)?),
            Err(_) => None,
        };
        let auth = match (env::var("CRAES_SINK_USER"), env::var("CRAES_SINK_PASSPHRASE")) {
            (Ok(user), Ok(passphrase)) => Some(Auth { user, passphrase }),
            _ => None,
        };

        Ok(Config {
            bind_addr,
            port,
            policy,
            max_orders_per_connection,
            auth,
        })
    }

    /// Local ephemeral-port config, used by tests.
    pub fn local(policy: ResponsePolicy) -> Self {
        Config {
            port: 0,
            policy,
            ..Config::default()
        }
    }

    /// Convenience: `addr:port` socket string.
    pub fn socket_addr_string(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

fn read_env_or_default<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(value) => value.parse::<T>().map_err(|e| ConfigError {
            key,
            reason: e.to_string(),
            value,
        }),
        Err(_) => Ok(default),
    }
}
