//! Packet dispatch from raw datagram bytes to handler callbacks
//!
//! Run with `RUST_LOG=feed_codec=trace` to see the codec's trace events.

use feed_codec::{
    dispatch_packet, encode_event, encode_frame, AddOrder, CodecError, DecodingError, ItchEvent,
    MessageHandler, OrderDelete, OrderExecuted, Seconds, Side, UnmodelledType, WireMessage,
};

/// Rebuilds the event stream and tracks resting quantity per order
#[derive(Default)]
struct BookTracker {
    events: Vec<(u64, ItchEvent)>,
    unmodelled: Vec<(u64, UnmodelledType)>,
    unknown: Vec<(u64, Vec<u8>)>,
    resting: std::collections::HashMap<u64, u64>,
}

impl MessageHandler for BookTracker {
    fn on_seconds(&mut self, seq: u64, message: &Seconds) {
        self.events.push((seq, (*message).into()));
    }

    fn on_add_order(&mut self, seq: u64, message: &AddOrder) {
        self.resting.insert(message.order_id, message.quantity);
        self.events.push((seq, (*message).into()));
    }

    fn on_order_executed(&mut self, seq: u64, message: &OrderExecuted) {
        if let Some(qty) = self.resting.get_mut(&message.order_id) {
            *qty = qty.saturating_sub(message.executed_quantity);
        }
        self.events.push((seq, (*message).into()));
    }

    fn on_order_delete(&mut self, seq: u64, message: &OrderDelete) {
        self.resting.remove(&message.order_id);
        self.events.push((seq, (*message).into()));
    }

    fn on_unmodelled(&mut self, seq: u64, message_type: UnmodelledType, _: &[u8]) {
        self.unmodelled.push((seq, message_type));
    }

    fn on_unknown(&mut self, seq: u64, payload: &[u8]) {
        self.unknown.push((seq, payload.to_vec()));
    }
}

/// Ignores everything; exercises the default callbacks
struct Silent;
impl MessageHandler for Silent {}

fn order(order_id: u64, quantity: u64) -> AddOrder {
    AddOrder {
        timestamp_ns: 10,
        order_id,
        orderbook_id: 1,
        side: Side::Buy,
        orderbook_position: 1,
        quantity,
        price: 1000,
        order_attributes: 0,
        lot_type: 0,
    }
}

fn session_events() -> Vec<ItchEvent> {
    vec![
        Seconds { second: 34_200 }.into(),
        order(1001, 100).into(),
        order(1002, 50).into(),
        OrderExecuted {
            timestamp_ns: 20,
            order_id: 1001,
            orderbook_id: 1,
            side: Side::Buy,
            executed_quantity: 40,
            match_id: 1,
            combo_group_id: 0,
        }
        .into(),
        OrderDelete {
            timestamp_ns: 30,
            order_id: 1002,
            orderbook_id: 1,
            side: Side::Buy,
        }
        .into(),
    ]
}

#[test_log::test]
fn test_dispatches_every_event_with_sequence_numbers() {
    let events = session_events();
    let payloads: Vec<Vec<u8>> = events.iter().map(encode_event).collect();
    let frame = encode_frame(b"SESSION1", 500, &payloads).unwrap();

    let mut tracker = BookTracker::default();
    let summary = dispatch_packet(&frame, &mut tracker).unwrap();

    assert_eq!(summary.sequence_number, 500);
    assert_eq!(summary.message_count, 5);
    assert_eq!(summary.unknown_count, 0);
    assert_eq!(summary.next_sequence_number(), 505);
    assert_eq!(summary.session_id.trimmed(), b"SESSION1");

    let expected: Vec<(u64, ItchEvent)> = (500..).zip(events).collect();
    assert_eq!(tracker.events, expected);
    assert_eq!(tracker.resting.get(&1001), Some(&60));
    assert!(!tracker.resting.contains_key(&1002));
}

#[test_log::test]
fn test_unmodelled_and_unknown_types_are_skipped_not_fatal() {
    let payloads: Vec<Vec<u8>> = vec![
        b"R\x00\x00\x00\x01directory".to_vec(),
        order(1, 1).encode(),
        vec![b'P'; 44],
        Vec::new(),
        b"Qgarbage".to_vec(),
    ];
    let frame = encode_frame(b"S", 1, &payloads).unwrap();

    let mut tracker = BookTracker::default();
    let summary = dispatch_packet(&frame, &mut tracker).unwrap();

    assert_eq!(summary.unmodelled_count, 2);
    assert_eq!(summary.unknown_count, 2);
    assert_eq!(tracker.events.len(), 1);
    assert_eq!(tracker.events[0].0, 2);
    assert_eq!(
        tracker.unmodelled,
        vec![
            (1, UnmodelledType::OrderbookDirectory),
            (3, UnmodelledType::Trade)
        ]
    );
    let unknown_sequences: Vec<u64> = tracker.unknown.iter().map(|(s, _)| *s).collect();
    assert_eq!(unknown_sequences, vec![4, 5]);
    assert_eq!(tracker.unknown[1].1, payloads[4]);
}

#[test_log::test]
fn test_truncated_known_message_fails_whole_packet() {
    let mut short = order(1, 1).encode();
    short.pop();
    let payloads = vec![Seconds { second: 1 }.encode(), short];
    let frame = encode_frame(b"S", 7, &payloads).unwrap();

    let mut tracker = BookTracker::default();
    let err = dispatch_packet(&frame, &mut tracker).unwrap_err();

    assert!(tracker.events.is_empty());
    match err {
        CodecError::Block {
            index,
            sequence_number,
            source: DecodingError::WrongLength { expected, got, .. },
        } => {
            assert_eq!(index, 1);
            assert_eq!(sequence_number, 8);
            assert_eq!((expected, got), (37, 36));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test_log::test]
fn test_default_handler_accepts_anything() {
    let payloads: Vec<Vec<u8>> = session_events().iter().map(encode_event).collect();
    let frame = encode_frame(b"S", 1, &payloads).unwrap();
    let summary = dispatch_packet(&frame, &mut Silent).unwrap();
    assert_eq!(summary.message_count, 5);
}

#[test_log::test]
fn test_bad_frame_is_a_framing_error() {
    let frame = encode_frame(b"S", 1, &[order(1, 1).encode()]).unwrap();
    let err = dispatch_packet(&frame[..frame.len() - 1], &mut Silent).unwrap_err();
    assert!(matches!(err, CodecError::Framing(_)));
}
