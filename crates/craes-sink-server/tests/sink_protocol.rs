// crates/craes-sink-server/tests/sink_protocol.rs
use std::net::SocketAddr;

use craes_core::{Condition, Order, Side};
use craes_protocol::{decode_response, OrderCodec};
use craes_sink_server::{Config, ResponsePolicy, SinkServer};
use futures::{SinkExt, StreamExt};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

async fn start(config: Config) -> SocketAddr {
    let server = SinkServer::bind(config).await.unwrap();
    let addr = server.local_addr().unwrap();
    tokio::spawn(server.serve());
    addr
}

fn sample_order() -> Order {
    Order::new(Side::Sell, 10, Some(1.0), Condition::StopLoss { trigger: 2.0 }, 2).unwrap()
}

#[tokio::test]
async fn answers_each_order_with_an_empty_response() {
    let addr = start(Config::local(ResponsePolicy::Empty)).await;
    let (mut ws, _) = connect_async(format!("ws://{}", addr)).await.unwrap();
    let order = OrderCodec::new().encode(&sample_order());

    for _ in 0..3 {
        ws.send(Message::Binary(order.clone().into_bytes())).await.unwrap();
        let reply = ws.next().await.unwrap().unwrap();
        let result = decode_response(&reply.into_data()).unwrap();
        assert!(result.is_empty());
    }

    ws.close(None).await.unwrap();
}

#[tokio::test]
async fn closes_connection_on_undecodable_order() {
    let addr = start(Config::local(ResponsePolicy::Empty)).await;
    let (mut ws, _) = connect_async(format!("ws://{}", addr)).await.unwrap();

    ws.send(Message::Binary(vec![9u8, 9, 9].into())).await.unwrap();

    match ws.next().await {
        Some(Ok(Message::Close(_))) | None | Some(Err(_)) => {}
        Some(Ok(other)) => panic!("expected close, got {:?}", other),
    }
}

#[tokio::test]
async fn closes_after_order_cap() {
    let mut config = Config::local(ResponsePolicy::Fill);
    config.max_orders_per_connection = Some(1);
    let addr = start(config).await;
    let (mut ws, _) = connect_async(format!("ws://{}", addr)).await.unwrap();
    let order = OrderCodec::new().encode(&sample_order());

    ws.send(Message::Binary(order.into_bytes())).await.unwrap();
    let reply = ws.next().await.unwrap().unwrap();
    let result = decode_response(&reply.into_data()).unwrap();
    assert_eq!(result.total_volume(), 10);

    assert!(matches!(ws.next().await, Some(Ok(Message::Close(_))) | None | Some(Err(_))));
}
