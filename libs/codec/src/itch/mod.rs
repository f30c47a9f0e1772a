//! # ITCH Message Codec
//!
//! ## Purpose
//!
//! Bidirectional mapping between the typed records in `feed-types` and their
//! fixed-size ITCH wire representation. Encoding is infallible for a
//! constructed record (every field already has its wire width); decoding
//! checks length, type tag and side byte before any field is trusted.
//!
//! ## Supported Messages
//!
//! | Type | Tag | Size |
//! |------|-----|------|
//! | Seconds | `T` | 5 |
//! | AddOrder | `A` | 37 |
//! | OrderDelete | `D` | 18 |
//! | OrderExecuted | `E` | 52 |
//!
//! ## Usage
//!
//! ```rust
//! use feed_codec::itch::WireMessage;
//! use feed_types::{AddOrder, Side};
//!
//! let order = AddOrder {
//!     timestamp_ns: 123_456_789,
//!     order_id: 1001,
//!     orderbook_id: 1,
//!     side: Side::Buy,
//!     orderbook_position: 1,
//!     quantity: 100,
//!     price: 1000,
//!     order_attributes: 0,
//!     lot_type: 0,
//! };
//!
//! let bytes = order.encode();
//! assert_eq!(bytes.len(), AddOrder::WIRE_SIZE);
//! assert_eq!(AddOrder::decode(&bytes).unwrap(), order);
//! ```

pub mod layout;

use crate::error::{DecodingError, DecodingResult};
use crate::wire::{BeU16, BeU32, BeU64, WireWriter};
use feed_types::{
    is_itch_tag, AddOrder, ItchEvent, MessageType, OrderDelete, OrderExecuted, Seconds, Side,
};
use layout::{
    AddOrderLayout, OrderDeleteLayout, OrderExecutedLayout, SecondsLayout,
    ADD_ORDER_SIDE_OFFSET, ORDER_DELETE_SIDE_OFFSET, ORDER_EXECUTED_RESERVED_SIZE,
    ORDER_EXECUTED_SIDE_OFFSET,
};
use std::mem::size_of;
use zerocopy::{FromBytes, Unaligned};

/// A record with a fixed ITCH wire layout
pub trait WireMessage: Sized {
    /// Tag written in byte 0
    const MESSAGE_TYPE: MessageType;
    /// Exact encoded size in bytes
    const WIRE_SIZE: usize;

    /// Append the encoded message to `buf`
    fn encode_into(&self, buf: &mut Vec<u8>);

    /// Encode into a freshly allocated buffer of exactly `WIRE_SIZE` bytes
    fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(Self::WIRE_SIZE);
        self.encode_into(&mut buf);
        buf
    }

    /// Decode one message; `bytes` must be exactly `WIRE_SIZE` long
    fn decode(bytes: &[u8]) -> DecodingResult<Self>;
}

/// Wire size of a message type
pub const fn wire_size(message_type: MessageType) -> usize {
    match message_type {
        MessageType::Seconds => layout::SECONDS_SIZE,
        MessageType::AddOrder => layout::ADD_ORDER_SIZE,
        MessageType::OrderDelete => layout::ORDER_DELETE_SIZE,
        MessageType::OrderExecuted => layout::ORDER_EXECUTED_SIZE,
    }
}

/// Check size and tag, then copy the layout out of `bytes`
fn read_layout<L: FromBytes + Unaligned>(
    bytes: &[u8],
    message_type: MessageType,
) -> DecodingResult<L> {
    let expected = size_of::<L>();
    if bytes.len() != expected {
        return Err(DecodingError::wrong_length(
            message_type.name(),
            expected,
            bytes.len(),
        ));
    }

    let tag = bytes[layout::MESSAGE_TYPE_OFFSET];
    if tag != message_type.tag() {
        return Err(if is_itch_tag(tag) {
            DecodingError::unexpected_message_type(message_type.name(), tag)
        } else {
            DecodingError::unknown_message_type(tag)
        });
    }

    L::read_from(bytes)
        .ok_or_else(|| DecodingError::wrong_length(message_type.name(), expected, bytes.len()))
}

fn read_side(byte: u8, offset: usize) -> DecodingResult<Side> {
    Side::try_from(byte).map_err(|_| DecodingError::invalid_side(byte, offset))
}

impl WireMessage for Seconds {
    const MESSAGE_TYPE: MessageType = MessageType::Seconds;
    const WIRE_SIZE: usize = layout::SECONDS_SIZE;

    fn encode_into(&self, buf: &mut Vec<u8>) {
        WireWriter::new(buf).put(&SecondsLayout {
            message_type: Self::MESSAGE_TYPE.tag(),
            second: BeU32::new(self.second),
        });
    }

    fn decode(bytes: &[u8]) -> DecodingResult<Self> {
        let wire: SecondsLayout = read_layout(bytes, Self::MESSAGE_TYPE)?;
        Ok(Seconds {
            second: wire.second.get(),
        })
    }
}

impl From<&AddOrder> for AddOrderLayout {
    fn from(m: &AddOrder) -> Self {
        Self {
            message_type: MessageType::AddOrder.tag(),
            timestamp_ns: BeU32::new(m.timestamp_ns),
            order_id: BeU64::new(m.order_id),
            orderbook_id: BeU32::new(m.orderbook_id),
            side: m.side.as_byte(),
            orderbook_position: BeU32::new(m.orderbook_position),
            quantity: BeU64::new(m.quantity),
            price: BeU32::new(m.price),
            order_attributes: BeU16::new(m.order_attributes),
            lot_type: m.lot_type,
        }
    }
}

impl WireMessage for AddOrder {
    const MESSAGE_TYPE: MessageType = MessageType::AddOrder;
    const WIRE_SIZE: usize = layout::ADD_ORDER_SIZE;

    fn encode_into(&self, buf: &mut Vec<u8>) {
        WireWriter::new(buf).put(&AddOrderLayout::from(self));
    }

    fn decode(bytes: &[u8]) -> DecodingResult<Self> {
        let wire: AddOrderLayout = read_layout(bytes, Self::MESSAGE_TYPE)?;
        Ok(AddOrder {
            timestamp_ns: wire.timestamp_ns.get(),
            order_id: wire.order_id.get(),
            orderbook_id: wire.orderbook_id.get(),
            side: read_side(wire.side, ADD_ORDER_SIDE_OFFSET)?,
            orderbook_position: wire.orderbook_position.get(),
            quantity: wire.quantity.get(),
            price: wire.price.get(),
            order_attributes: wire.order_attributes.get(),
            lot_type: wire.lot_type,
        })
    }
}

impl WireMessage for OrderDelete {
    const MESSAGE_TYPE: MessageType = MessageType::OrderDelete;
    const WIRE_SIZE: usize = layout::ORDER_DELETE_SIZE;

    fn encode_into(&self, buf: &mut Vec<u8>) {
        WireWriter::new(buf).put(&OrderDeleteLayout {
            message_type: Self::MESSAGE_TYPE.tag(),
            timestamp_ns: BeU32::new(self.timestamp_ns),
            order_id: BeU64::new(self.order_id),
            orderbook_id: BeU32::new(self.orderbook_id),
            side: self.side.as_byte(),
        });
    }

    fn decode(bytes: &[u8]) -> DecodingResult<Self> {
        let wire: OrderDeleteLayout = read_layout(bytes, Self::MESSAGE_TYPE)?;
        Ok(OrderDelete {
            timestamp_ns: wire.timestamp_ns.get(),
            order_id: wire.order_id.get(),
            orderbook_id: wire.orderbook_id.get(),
            side: read_side(wire.side, ORDER_DELETE_SIDE_OFFSET)?,
        })
    }
}

impl WireMessage for OrderExecuted {
    const MESSAGE_TYPE: MessageType = MessageType::OrderExecuted;
    const WIRE_SIZE: usize = layout::ORDER_EXECUTED_SIZE;

    fn encode_into(&self, buf: &mut Vec<u8>) {
        WireWriter::new(buf).put(&OrderExecutedLayout {
            message_type: Self::MESSAGE_TYPE.tag(),
            timestamp_ns: BeU32::new(self.timestamp_ns),
            order_id: BeU64::new(self.order_id),
            orderbook_id: BeU32::new(self.orderbook_id),
            side: self.side.as_byte(),
            executed_quantity: BeU64::new(self.executed_quantity),
            match_id: BeU64::new(self.match_id),
            combo_group_id: BeU32::new(self.combo_group_id),
            reserved: [0u8; ORDER_EXECUTED_RESERVED_SIZE],
        });
    }

    fn decode(bytes: &[u8]) -> DecodingResult<Self> {
        let wire: OrderExecutedLayout = read_layout(bytes, Self::MESSAGE_TYPE)?;
        Ok(OrderExecuted {
            timestamp_ns: wire.timestamp_ns.get(),
            order_id: wire.order_id.get(),
            orderbook_id: wire.orderbook_id.get(),
            side: read_side(wire.side, ORDER_EXECUTED_SIDE_OFFSET)?,
            executed_quantity: wire.executed_quantity.get(),
            match_id: wire.match_id.get(),
            combo_group_id: wire.combo_group_id.get(),
        })
    }
}

/// Append any supported event to `buf`
pub fn encode_event_into(event: &ItchEvent, buf: &mut Vec<u8>) {
    match event {
        ItchEvent::Seconds(m) => m.encode_into(buf),
        ItchEvent::AddOrder(m) => m.encode_into(buf),
        ItchEvent::OrderDelete(m) => m.encode_into(buf),
        ItchEvent::OrderExecuted(m) => m.encode_into(buf),
    }
}

/// Encode any supported event into its exact wire bytes
pub fn encode_event(event: &ItchEvent) -> Vec<u8> {
    let mut buf = Vec::with_capacity(wire_size(event.message_type()));
    encode_event_into(event, &mut buf);
    buf
}

/// Read the message type from the first byte of a message
pub fn peek_message_type(bytes: &[u8]) -> DecodingResult<MessageType> {
    let tag = *bytes.first().ok_or(DecodingError::Empty)?;
    MessageType::try_from(tag).map_err(|_| DecodingError::unsupported_tag(tag))
}

/// Decode one message of any supported type, dispatching on its tag
pub fn decode_message(bytes: &[u8]) -> DecodingResult<ItchEvent> {
    Ok(match peek_message_type(bytes)? {
        MessageType::Seconds => Seconds::decode(bytes)?.into(),
        MessageType::AddOrder => AddOrder::decode(bytes)?.into(),
        MessageType::OrderDelete => OrderDelete::decode(bytes)?.into(),
        MessageType::OrderExecuted => OrderExecuted::decode(bytes)?.into(),
    })
}
