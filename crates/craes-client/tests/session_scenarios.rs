// crates/craes-client/tests/session_scenarios.rs
use std::net::SocketAddr;

use craes_client::{Credentials, SessionClient, SessionError};
use craes_core::{Condition, Order, Side, TradeExecutionResult, TradeFill};
use craes_protocol::csv_codec::read_orders;
use craes_protocol::{decode_order, encode_response, OrderCodec, ProtocolError};
use craes_sink_server::config::Auth;
use craes_sink_server::{Config, ResponsePolicy, SinkServer};
use futures::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::http::StatusCode;
use tokio_tungstenite::tungstenite::Message;

const ORDERS: &str = "\
true,3,5.0,None,None,1
false,10,1.0,stoploss,2.0,2
true,7,None,None,None,3
false,1,None,stopandreverse,0.5,4
";

async fn start_sink(config: Config) -> SocketAddr {
    let server = SinkServer::bind(config).await.expect("bind sink");
    let addr = server.local_addr().unwrap();
    tokio::spawn(server.serve());
    addr
}

/// Accepts one connection and answers every binary frame with `reply`.
async fn start_raw_gateway(reply: Message) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
        while let Some(Ok(msg)) = ws.next().await {
            if msg.is_binary() && ws.send(reply.clone()).await.is_err() {
                break;
            }
        }
    });

    addr
}

/// Accepts one connection; pings before answering each order with a fill
/// for its full volume.
async fn start_pinging_gateway() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
        while let Some(Ok(msg)) = ws.next().await {
            let Message::Binary(frame) = msg else { continue };
            let order = decode_order(&frame).unwrap();

            let fill = TradeFill::new(order.limit_price().unwrap_or(0.0), order.volume());
            let mut payload = Vec::new();
            encode_response(&TradeExecutionResult::new(vec![fill]), &mut payload).unwrap();

            if ws.send(Message::Ping(vec![7u8].into())).await.is_err()
                || ws.send(Message::Binary(payload.into())).await.is_err()
            {
                break;
            }
        }
    });

    addr
}

fn client_for(addr: SocketAddr) -> SessionClient {
    SessionClient::new(
        addr.ip().to_string(),
        addr.port(),
        Credentials::new("test_user", "password"),
    )
}

fn orders() -> Vec<Order> {
    read_orders(ORDERS.as_bytes()).unwrap()
}

#[tokio::test]
async fn every_order_gets_its_own_response_in_send_order() {
    let addr = start_sink(Config::local(ResponsePolicy::Fill)).await;
    let orders = orders();

    let results = client_for(addr)
        .submit_orders(&OrderCodec::new(), &orders)
        .await
        .expect("batch succeeds");

    assert_eq!(results.len(), orders.len());
    for (order, result) in orders.iter().zip(&results) {
        assert_eq!(
            result.fills(),
            &[TradeFill::new(
                order.limit_price().unwrap_or(0.0),
                order.volume()
            )]
        );
    }
}

#[tokio::test]
async fn empty_responses_decode_to_empty_results() {
    let addr = start_sink(Config::local(ResponsePolicy::Empty)).await;

    let results = client_for(addr)
        .submit_orders(&OrderCodec::new(), &orders())
        .await
        .unwrap();

    assert_eq!(results.len(), 4);
    assert!(results.iter().all(|r| r.is_empty()));
}

#[tokio::test]
async fn larger_batch_stays_aligned() {
    let addr = start_sink(Config::local(ResponsePolicy::Fill)).await;
    let orders: Vec<Order> = (1..=200)
        .map(|v| Order::new(Side::Buy, v, Some(v as f64), Condition::Unconditional, 1).unwrap())
        .collect();

    let results = client_for(addr)
        .submit_orders(&OrderCodec::new(), &orders)
        .await
        .unwrap();

    let volumes: Vec<u64> = results.iter().map(|r| r.total_volume()).collect();
    assert_eq!(volumes, (1..=200).collect::<Vec<u64>>());
}

#[tokio::test]
async fn empty_batch_returns_without_connecting() {
    // Nothing listens here; connecting would fail.
    let client = SessionClient::new("127.0.0.1", 1, Credentials::new("u", "p"));

    let responses = client.submit_batch(&[]).await.unwrap();
    assert!(responses.is_empty());
}

#[tokio::test]
async fn refused_connection_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client_for(addr)
        .submit_orders(&OrderCodec::new(), &orders())
        .await
        .unwrap_err();

    assert!(matches!(err, SessionError::Transport(_)), "got {:?}", err);
}

#[tokio::test]
async fn drop_mid_batch_fails_whole_submission() {
    let mut config = Config::local(ResponsePolicy::Fill);
    config.max_orders_per_connection = Some(2);
    let addr = start_sink(config).await;

    let err = client_for(addr)
        .submit_orders(&OrderCodec::new(), &orders())
        .await
        .unwrap_err();

    match err {
        SessionError::ConnectionClosed { received, expected } => {
            assert_eq!(received, 2);
            assert_eq!(expected, 4);
        }
        // The close can also surface as a reset socket, depending on timing.
        SessionError::Transport(_) => {}
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn wrong_credentials_are_rejected_at_handshake() {
    let mut config = Config::local(ResponsePolicy::Empty);
    config.auth = Some(Auth {
        user: "test_user".to_string(),
        passphrase: "password".to_string(),
    });
    let addr = start_sink(config).await;

    let intruder = SessionClient::new(
        addr.ip().to_string(),
        addr.port(),
        Credentials::new("test_user", "guess"),
    );
    let err = intruder
        .submit_orders(&OrderCodec::new(), &orders())
        .await
        .unwrap_err();
    assert!(
        matches!(err, SessionError::HandshakeRejected(status) if status == StatusCode::UNAUTHORIZED),
        "got {:?}",
        err
    );

    let results = client_for(addr)
        .submit_orders(&OrderCodec::new(), &orders())
        .await
        .unwrap();
    assert_eq!(results.len(), 4);
}

#[tokio::test]
async fn malformed_response_is_a_decode_error() {
    let addr = start_raw_gateway(Message::Binary(vec![2u8, 1, 0].into())).await;

    let err = client_for(addr)
        .submit_orders(&OrderCodec::new(), &orders())
        .await
        .unwrap_err();

    match err {
        SessionError::Decode { index, source } => {
            assert_eq!(index, 0);
            assert_eq!(source, ProtocolError::Truncated);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn text_reply_aborts_the_batch() {
    let addr = start_raw_gateway(Message::Text("ok".into())).await;

    let err = client_for(addr)
        .submit_orders(&OrderCodec::new(), &orders())
        .await
        .unwrap_err();

    assert!(matches!(err, SessionError::UnexpectedMessage(_)), "got {:?}", err);
}

#[tokio::test]
async fn resubmitting_a_batch_is_repeatable() {
    let addr = start_sink(Config::local(ResponsePolicy::Fill)).await;
    let client = client_for(addr);
    let codec = OrderCodec::new();
    let orders = orders();

    let first_bytes = codec.encode_batch(&orders);
    let first = client.submit_batch(&first_bytes).await.unwrap();
    let second_bytes = codec.encode_batch(&orders);
    let second = client.submit_batch(&second_bytes).await.unwrap();

    assert_eq!(first_bytes, second_bytes);
    assert_eq!(first, second);
}

#[tokio::test]
async fn pings_between_replies_do_not_shift_results() {
    let addr = start_pinging_gateway().await;
    let orders = orders();

    let results = client_for(addr)
        .submit_orders(&OrderCodec::new(), &orders)
        .await
        .unwrap();

    let volumes: Vec<u64> = results.iter().map(|r| r.total_volume()).collect();
    assert_eq!(volumes, vec![3, 10, 7, 1]);
}
