use craes_protocol::ProtocolError;
use thiserror::Error;
use tokio_tungstenite::tungstenite;
use tokio_tungstenite::tungstenite::http::StatusCode;

/// Failure of a batch submission. Every variant aborts the whole batch.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Connection refused, dropped, or a WebSocket protocol error.
    #[error("transport error: {0}")]
    Transport(#[from] tungstenite::Error),

    #[error("handshake rejected by gateway: {0}")]
    HandshakeRejected(StatusCode),

    /// Credential not representable as an HTTP header value.
    #[error("{0} is not a valid header value")]
    InvalidCredentials(&'static str),

    /// Peer closed before every order got its reply.
    #[error("connection closed after {received} of {expected} responses")]
    ConnectionClosed { received: usize, expected: usize },

    #[error("unexpected {0} while awaiting a response")]
    UnexpectedMessage(&'static str),

    /// Response `index` (0-based, in send order) did not decode.
    #[error("response {index} could not be decoded")]
    Decode {
        index: usize,
        #[source]
        source: ProtocolError,
    },
}
