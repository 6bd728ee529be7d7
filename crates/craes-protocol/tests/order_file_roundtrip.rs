// crates/craes-protocol/tests/order_file_roundtrip.rs
use craes_core::Condition;
use craes_protocol::csv_codec::read_orders;
use craes_protocol::{decode_order, OrderCodec};

const ORDER_FILE: &str = "\
true,3,5.0,None,None,1
false,10,1.0,stoploss,2.0,2
true,7,None,None,None,3
false,1,None,stopandreverse,0.5,4
true,2,0.0,stoploss,0,5
";

#[test]
fn file_orders_survive_encode_and_decode() {
    let orders = read_orders(ORDER_FILE.as_bytes()).expect("order file is valid");
    assert_eq!(orders.len(), 5);

    let codec = OrderCodec::new();
    for order in &orders {
        let encoded = codec.encode(order);
        let decoded = decode_order(encoded.as_bytes()).expect("decodes");
        assert_eq!(&decoded, order);
    }
}

#[test]
fn file_covers_every_price_and_condition_shape() {
    let orders = read_orders(ORDER_FILE.as_bytes()).unwrap();

    assert!(orders.iter().any(|o| o.limit_price().is_none()));
    assert!(orders.iter().any(|o| o.limit_price().is_some()));
    assert!(orders
        .iter()
        .any(|o| o.condition() == Condition::Unconditional));
    assert!(orders
        .iter()
        .any(|o| matches!(o.condition(), Condition::StopLoss { .. })));
    assert!(orders
        .iter()
        .any(|o| matches!(o.condition(), Condition::StopAndReverse { .. })));
}

#[test]
fn same_file_encodes_to_identical_bytes() {
    let codec = OrderCodec::new();
    let first = codec.encode_batch(&read_orders(ORDER_FILE.as_bytes()).unwrap());
    let second = codec.encode_batch(&read_orders(ORDER_FILE.as_bytes()).unwrap());

    assert_eq!(first, second);
}
