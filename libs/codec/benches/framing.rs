//! Hot path throughput: message encode/decode and frame build/parse
//!
//! Error paths are benchmarked separately to confirm the diagnostic strings
//! in the error types cost nothing until a failure actually happens.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use feed_codec::{
    decode_frame, dispatch_packet, encode_frame, AddOrder, FrameBuilder, FramingConfig,
    MessageHandler, PacketView, SessionId, SessionSequencer, Side, WireMessage,
};

fn order(order_id: u64) -> AddOrder {
    AddOrder {
        timestamp_ns: 123_456_789,
        order_id,
        orderbook_id: 1,
        side: if order_id % 2 == 0 { Side::Buy } else { Side::Sell },
        orderbook_position: order_id as u32,
        quantity: 100,
        price: 1000,
        order_attributes: 0,
        lot_type: 0,
    }
}

fn encoded_orders(n: u64) -> Vec<Vec<u8>> {
    (0..n).map(|i| order(i).encode()).collect()
}

/// Counts orders; stands in for a book update
struct Counter(u64);

impl MessageHandler for Counter {
    fn on_add_order(&mut self, _: u64, message: &AddOrder) {
        self.0 = self.0.wrapping_add(message.quantity);
    }
}

fn bench_message_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("add_order");
    group.throughput(Throughput::Elements(1));

    let msg = order(1001);
    let bytes = msg.encode();
    let mut buf = Vec::with_capacity(AddOrder::WIRE_SIZE);

    group.bench_function("encode_into", |b| {
        b.iter(|| {
            buf.clear();
            black_box(&msg).encode_into(&mut buf);
            black_box(&buf);
        })
    });

    group.bench_function("decode", |b| {
        b.iter(|| AddOrder::decode(black_box(&bytes)))
    });

    group.finish();
}

fn bench_framing(c: &mut Criterion) {
    let mut group = c.benchmark_group("moldudp64");
    let session = SessionId::new(b"SESSION1").unwrap();

    for count in [3u64, 37] {
        let orders = encoded_orders(count);
        let frame = encode_frame(b"SESSION1", 1, &orders).unwrap();
        group.throughput(Throughput::Elements(count));

        group.bench_with_input(BenchmarkId::new("encode_frame", count), &orders, |b, orders| {
            b.iter(|| encode_frame(b"SESSION1", black_box(1), orders))
        });

        group.bench_with_input(BenchmarkId::new("frame_builder", count), &count, |b, &count| {
            b.iter(|| {
                let mut builder =
                    FrameBuilder::with_config(session, 1, FramingConfig::ethernet()).unwrap();
                for i in 0..count {
                    builder.try_push_message(&order(i)).unwrap();
                }
                builder.build()
            })
        });

        group.bench_with_input(BenchmarkId::new("decode_frame", count), &frame, |b, frame| {
            b.iter(|| decode_frame(black_box(frame)))
        });

        group.bench_with_input(BenchmarkId::new("packet_view", count), &frame, |b, frame| {
            b.iter(|| {
                let view = PacketView::parse(black_box(frame)).unwrap();
                view.blocks().map(|block| block.payload.len()).sum::<usize>()
            })
        });

        group.bench_with_input(BenchmarkId::new("dispatch", count), &frame, |b, frame| {
            b.iter(|| {
                let mut counter = Counter(0);
                dispatch_packet(black_box(frame), &mut counter).unwrap();
                counter.0
            })
        });
    }

    group.finish();
}

fn bench_sequencer(c: &mut Criterion) {
    let orders = encoded_orders(1_000);
    let mut group = c.benchmark_group("sequencer");
    group.throughput(Throughput::Elements(orders.len() as u64));

    group.bench_function("pack_1000_ethernet", |b| {
        b.iter(|| {
            let mut sequencer = SessionSequencer::with_config(
                SessionId::new(b"SESSION1").unwrap(),
                1,
                FramingConfig::ethernet(),
            )
            .unwrap();
            sequencer.pack(black_box(&orders)).unwrap()
        })
    });

    group.finish();
}

fn bench_error_paths(c: &mut Criterion) {
    let mut group = c.benchmark_group("error_paths");

    let short = vec![0u8; 12];
    group.bench_function("truncated_header", |b| {
        b.iter(|| decode_frame(black_box(&short)).is_err())
    });

    let mut bad_side = order(1).encode();
    bad_side[17] = b'X';
    group.bench_function("invalid_side", |b| {
        b.iter(|| AddOrder::decode(black_box(&bad_side)).is_err())
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_message_codec,
    bench_framing,
    bench_sequencer,
    bench_error_paths
);
criterion_main!(benches);
