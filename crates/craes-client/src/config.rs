//! Client configuration.
//!
//! Every field has a default, so a TOML file only needs the keys it wants
//! to change:
//!
//! ```toml
//! server_addr = "10.0.0.5"
//! server_port = 9000
//! user_name = "desk-7"
//! passphrase = "..."
//! file = "orders/today.csv"
//! ```
//!
//! Command-line flags override values from the file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::credentials::Credentials;
use crate::session::SessionClient;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    pub server_addr: String,
    pub server_port: u16,
    pub user_name: String,
    pub passphrase: String,
    /// Order file to submit.
    pub file: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_addr: "127.0.0.1".to_string(),
            server_port: 8080,
            user_name: "test_user".to_string(),
            passphrase: "password".to_string(),
            file: PathBuf::from("orders.csv"),
        }
    }
}

impl ClientConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("invalid client config")
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("cannot read config file {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("in {}", path.display()))
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.user_name.clone(), self.passphrase.clone())
    }

    pub fn session_client(&self) -> SessionClient {
        SessionClient::new(self.server_addr.clone(), self.server_port, self.credentials())
    }
}
