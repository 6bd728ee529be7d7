// crates/craes-client/src/session.rs

//! Batch submission over one WebSocket connection.
//!
//! The wire format has no request ID: a response belongs to an order only
//! because it is the next binary message after that order was sent. So a
//! batch is strictly send, await reply, send, await reply. `Session::exchange`
//! takes `&mut self`, which makes a second send while a reply is pending
//! impossible to write.

use craes_core::{Order, TradeExecutionResult};
use craes_protocol::{EncodedOrder, EncodedResponse, OrderCodec};
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

use crate::credentials::Credentials;
use crate::error::SessionError;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Where and as whom to submit batches. Opens a fresh connection per batch.
#[derive(Debug, Clone)]
pub struct SessionClient {
    server_addr: String,
    server_port: u16,
    credentials: Credentials,
}

impl SessionClient {
    pub fn new(server_addr: impl Into<String>, server_port: u16, credentials: Credentials) -> Self {
        SessionClient {
            server_addr: server_addr.into(),
            server_port,
            credentials,
        }
    }

    pub fn url(&self) -> String {
        format!("ws://{}:{}", self.server_addr, self.server_port)
    }

    /// Send every order and collect its reply, index-aligned with `orders`.
    ///
    /// An empty batch returns immediately without connecting. Any failure
    /// aborts the batch; no partial result is returned.
    pub async fn submit_batch(
        &self,
        orders: &[EncodedOrder],
    ) -> Result<Vec<EncodedResponse>, SessionError> {
        if orders.is_empty() {
            debug!("Empty batch, not connecting");
            return Ok(Vec::new());
        }

        let mut session = Session::open(&self.url(), &self.credentials).await?;
        let outcome = session.exchange_all(orders).await;
        session.close().await;

        let responses = outcome?;
        info!(count = responses.len(), "Batch complete");
        Ok(responses)
    }

    /// Encode, submit, and decode a batch of orders.
    pub async fn submit_orders(
        &self,
        codec: &OrderCodec,
        orders: &[Order],
    ) -> Result<Vec<TradeExecutionResult>, SessionError> {
        let encoded = codec.encode_batch(orders);
        let responses = self.submit_batch(&encoded).await?;

        codec
            .decode_batch(&responses)
            .map_err(|(index, source)| SessionError::Decode { index, source })
    }
}

/// One open connection, owned by a single batch call.
struct Session {
    ws: WsStream,
}

impl Session {
    async fn open(url: &str, credentials: &Credentials) -> Result<Self, SessionError> {
        let mut request = url.into_client_request()?;
        credentials.apply(&mut request)?;

        info!(url, user = credentials.user_name(), "Connecting to CRAES");
        let (ws, _response) = tokio_tungstenite::connect_async(request)
            .await
            .map_err(|e| match e {
                WsError::Http(resp) => SessionError::HandshakeRejected(resp.status()),
                other => SessionError::Transport(other),
            })?;
        info!("Connected");

        Ok(Session { ws })
    }

    async fn exchange_all(
        &mut self,
        orders: &[EncodedOrder],
    ) -> Result<Vec<EncodedResponse>, SessionError> {
        let expected = orders.len();
        let mut responses = Vec::with_capacity(expected);

        for (index, order) in orders.iter().enumerate() {
            match self.exchange(order).await? {
                Some(response) => {
                    debug!(index, sent = order.len(), received = response.len(), "Order answered");
                    responses.push(response);
                }
                None => {
                    return Err(SessionError::ConnectionClosed {
                        received: responses.len(),
                        expected,
                    })
                }
            }
        }

        Ok(responses)
    }

    /// Send one order and wait for the next binary message.
    /// `None` means the peer closed first.
    async fn exchange(
        &mut self,
        order: &EncodedOrder,
    ) -> Result<Option<EncodedResponse>, SessionError> {
        self.ws
            .send(Message::Binary(order.clone().into_bytes()))
            .await?;

        while let Some(msg) = self.ws.next().await {
            match msg? {
                Message::Binary(data) => return Ok(Some(EncodedResponse::from(data))),
                Message::Text(_) => return Err(SessionError::UnexpectedMessage("text frame")),
                Message::Close(frame) => {
                    debug!(?frame, "Gateway closed the connection");
                    return Ok(None);
                }
                Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => {}
            }
        }

        Ok(None)
    }

    /// Send a close frame and flush. Runs on every exit path; the socket is
    /// released when `self` drops.
    async fn close(mut self) {
        match self.ws.close(None).await {
            Ok(()) | Err(WsError::ConnectionClosed) | Err(WsError::AlreadyClosed) => {}
            Err(err) => warn!(error = %err, "Closing connection failed"),
        }
    }
}
