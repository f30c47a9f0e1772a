//! # MoldUDP64 Frame Demo
//!
//! Builds the three-order AddOrder fixture, frames it under the configured
//! session, prints the datagram as hex and parses it back.
//!
//! ```text
//! cargo run -p feed-codec --example frame_demo -- config/moldfeed.toml
//! MOLDFEED_SESSION__INITIAL_SEQUENCE=1000 cargo run -p feed-codec --example frame_demo
//! ```

use anyhow::Result;
use feed_codec::{dispatch_packet, AddOrder, MessageHandler, Side, WireMessage};
use feed_config::{init_logging, FeedConfig};
use std::path::PathBuf;

struct Printer;

impl MessageHandler for Printer {
    fn on_add_order(&mut self, sequence_number: u64, m: &AddOrder) {
        println!(
            "   #{sequence_number} AddOrder id={} book={} side={} pos={} qty={} px={}",
            m.order_id, m.orderbook_id, m.side, m.orderbook_position, m.quantity, m.price
        );
    }

    fn on_unknown(&mut self, sequence_number: u64, payload: &[u8]) {
        println!("   #{sequence_number} unknown ({} bytes)", payload.len());
    }
}

fn fixture() -> Vec<AddOrder> {
    [
        (1001, Side::Buy, 1, 100, 1000),
        (1002, Side::Sell, 2, 200, 1010),
        (1003, Side::Buy, 3, 150, 1020),
    ]
    .into_iter()
    .map(|(order_id, side, orderbook_position, quantity, price)| AddOrder {
        timestamp_ns: 123_456_789,
        order_id,
        orderbook_id: 1,
        side,
        orderbook_position,
        quantity,
        price,
        order_attributes: 0,
        lot_type: 0,
    })
    .collect()
}

fn main() -> Result<()> {
    let path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = FeedConfig::load(path.as_deref())?;
    init_logging(&config.logging)?;

    let mut sequencer = config.sequencer()?;
    let messages: Vec<Vec<u8>> = fixture().iter().map(AddOrder::encode).collect();

    println!("MoldUDP64 frame demo");
    println!("   session:  {}", sequencer.session_id());
    println!("   sequence: {}", sequencer.next_sequence_number());

    let frame = sequencer.frame(&messages)?;
    println!("   frame:    {} bytes", frame.len());
    for chunk in frame.chunks(16) {
        println!("     {}", hex::encode(chunk));
    }

    println!("Parsed back:");
    let summary = dispatch_packet(&frame, &mut Printer)?;
    println!(
        "   {} messages, next sequence {}",
        summary.message_count,
        summary.next_sequence_number()
    );
    Ok(())
}
