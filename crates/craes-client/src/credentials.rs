//! Identity presented during the WebSocket handshake.
//!
//! The gateway reads the user name and passphrase from the `User` and
//! `Password` request headers. They are opaque to this client.

use std::fmt;

use tokio_tungstenite::tungstenite::handshake::client::Request;
use tokio_tungstenite::tungstenite::http::header::{HeaderName, HeaderValue};

use crate::error::SessionError;

pub const USER_HEADER: &str = "user";
pub const PASSWORD_HEADER: &str = "password";

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    user_name: String,
    passphrase: String,
}

impl Credentials {
    pub fn new(user_name: impl Into<String>, passphrase: impl Into<String>) -> Self {
        Credentials {
            user_name: user_name.into(),
            passphrase: passphrase.into(),
        }
    }

    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    /// Attach both headers to a handshake request.
    pub fn apply(&self, request: &mut Request) -> Result<(), SessionError> {
        let user = HeaderValue::from_str(&self.user_name)
            .map_err(|_| SessionError::InvalidCredentials("user name"))?;
        let mut password = HeaderValue::from_str(&self.passphrase)
            .map_err(|_| SessionError::InvalidCredentials("passphrase"))?;
        password.set_sensitive(true);

        let headers = request.headers_mut();
        headers.insert(HeaderName::from_static(USER_HEADER), user);
        headers.insert(HeaderName::from_static(PASSWORD_HEADER), password);
        Ok(())
    }
}

// Keep the passphrase out of logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user_name", &self.user_name)
            .field("passphrase", &"***")
            .finish()
    }
}
