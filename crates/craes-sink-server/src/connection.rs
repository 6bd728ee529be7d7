// crates/craes-sink-server/src/connection.rs

use std::sync::Arc;

use craes_protocol::{binary_codec, csv_codec};
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::http::StatusCode;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tokio_tungstenite::WebSocketStream;
use tracing::{debug, info, warn};

use crate::config::{Auth, Config};

/// Identifier for an accepted connection, unique for the process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(pub u64);

/// Run the WebSocket handshake and the order loop for one connection.
pub async fn run_connection(
    conn_id: ConnectionId,
    stream: TcpStream,
    config: Arc<Config>,
) -> Result<(), WsError> {
    let mut user = None;
    let expected = config.auth.clone();

    let ws = tokio_tungstenite::accept_hdr_async(stream, |req: &Request, resp: Response| {
        let headers = req.headers();
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned)
        };
        user = header("User");

        match expected {
            Some(Auth {
                user: ref want_user,
                passphrase: ref want_pass,
            }) if user.as_deref() != Some(want_user.as_str())
                || header("Password").as_deref() != Some(want_pass.as_str()) =>
            {
                let mut err = ErrorResponse::new(Some("invalid credentials".to_string()));
                *err.status_mut() = StatusCode::UNAUTHORIZED;
                Err(err)
            }
            _ => Ok(resp),
        }
    })
    .await?;

    info!(
        conn = conn_id.0,
        user = user.as_deref().unwrap_or("<none>"),
        "Handshake complete"
    );

    serve_orders(conn_id, ws, &config).await
}

/// Answer every binary order frame with exactly one response frame.
async fn serve_orders(
    conn_id: ConnectionId,
    mut ws: WebSocketStream<TcpStream>,
    config: &Config,
) -> Result<(), WsError> {
    let mut answered = 0usize;

    while let Some(msg) = ws.next().await {
        match msg? {
            Message::Binary(frame) => {
                let order = match binary_codec::decode_order(&frame) {
                    Ok(order) => order,
                    Err(err) => {
                        warn!(conn = conn_id.0, error = %err, "Undecodable order, closing");
                        break;
                    }
                };
                info!(conn = conn_id.0, order = %csv_codec::format_order_line(&order), "Got order");

                let result = config.policy.respond(&order);
                let mut payload = Vec::with_capacity(64);
                if let Err(err) = binary_codec::encode_response(&result, &mut payload) {
                    warn!(conn = conn_id.0, error = %err, "Cannot encode response, closing");
                    break;
                }
                ws.send(Message::Binary(payload.into())).await?;
                answered += 1;

                if config.max_orders_per_connection == Some(answered) {
                    debug!(conn = conn_id.0, answered, "Order cap reached, closing");
                    break;
                }
            }
            Message::Text(text) => {
                warn!(conn = conn_id.0, len = text.len(), "Text frame on order channel, closing");
                break;
            }
            Message::Close(_) => {
                debug!(conn = conn_id.0, "Peer closed");
                break;
            }
            Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => {}
        }
    }

    // The peer may already be gone; a failed close changes nothing.
    if let Err(err) = ws.close(None).await {
        debug!(conn = conn_id.0, error = %err, "Close after order loop failed");
    }

    info!(conn = conn_id.0, answered, "Connection finished");
    Ok(())
}
