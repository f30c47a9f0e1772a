//! ITCH order-event records
//!
//! Each record mirrors one fixed-layout ITCH message. The leading message type
//! byte is implied by the Rust type and is reported through
//! [`ItchEvent::message_type`]; it is not stored as a field.

use num_enum::{IntoPrimitive, TryFromPrimitive};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// ITCH message type tags carried in the first byte of every message
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MessageType {
    /// 'T' - seconds since midnight marker
    Seconds = 0x54,
    /// 'A' - new order entering a book
    AddOrder = 0x41,
    /// 'D' - order removed from a book
    OrderDelete = 0x44,
    /// 'E' - order (partially) executed
    OrderExecuted = 0x45,
}

impl MessageType {
    /// All message types understood by the codec
    pub const ALL: [MessageType; 4] = [
        MessageType::Seconds,
        MessageType::AddOrder,
        MessageType::OrderDelete,
        MessageType::OrderExecuted,
    ];

    /// The ASCII tag byte written on the wire
    #[inline]
    pub const fn tag(self) -> u8 {
        self as u8
    }

    /// Human readable name for diagnostics
    pub const fn name(self) -> &'static str {
        match self {
            MessageType::Seconds => "Seconds",
            MessageType::AddOrder => "AddOrder",
            MessageType::OrderDelete => "OrderDelete",
            MessageType::OrderExecuted => "OrderExecuted",
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ('{}')", self.name(), self.tag() as char)
    }
}

/// ITCH message types that exist on the feed but have no record here
///
/// Disjoint from [`MessageType`]; a tag in neither set is not ITCH.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum UnmodelledType {
    /// 'F'
    AddOrderWithMpid = 0x46,
    /// 'C'
    OrderExecutedWithPrice = 0x43,
    /// 'U'
    OrderReplace = 0x55,
    /// 'P'
    Trade = 0x50,
    /// 'Z'
    EquilibriumPriceUpdate = 0x5A,
    /// 'Y'
    OrderbookFlush = 0x59,
    /// 'R'
    OrderbookDirectory = 0x52,
    /// 'M'
    CombinationOrderbookLeg = 0x4D,
    /// 'L'
    TickSizeTableEntry = 0x4C,
    /// 'V'
    ShortSellStatus = 0x56,
    /// 'S'
    SystemEvent = 0x53,
    /// 'O'
    OrderbookState = 0x4F,
}

impl UnmodelledType {
    #[inline]
    pub const fn tag(self) -> u8 {
        self as u8
    }

    pub const fn name(self) -> &'static str {
        match self {
            UnmodelledType::AddOrderWithMpid => "AddOrderWithMpid",
            UnmodelledType::OrderExecutedWithPrice => "OrderExecutedWithPrice",
            UnmodelledType::OrderReplace => "OrderReplace",
            UnmodelledType::Trade => "Trade",
            UnmodelledType::EquilibriumPriceUpdate => "EquilibriumPriceUpdate",
            UnmodelledType::OrderbookFlush => "OrderbookFlush",
            UnmodelledType::OrderbookDirectory => "OrderbookDirectory",
            UnmodelledType::CombinationOrderbookLeg => "CombinationOrderbookLeg",
            UnmodelledType::TickSizeTableEntry => "TickSizeTableEntry",
            UnmodelledType::ShortSellStatus => "ShortSellStatus",
            UnmodelledType::SystemEvent => "SystemEvent",
            UnmodelledType::OrderbookState => "OrderbookState",
        }
    }
}

impl fmt::Display for UnmodelledType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ('{}')", self.name(), self.tag() as char)
    }
}

/// Whether `tag` is any ITCH message type, modelled or not
pub fn is_itch_tag(tag: u8) -> bool {
    MessageType::try_from(tag).is_ok() || UnmodelledType::try_from(tag).is_ok()
}

/// Order side, written as a single ASCII byte
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Side {
    /// 'B'
    Buy = 0x42,
    /// 'S'
    Sell = 0x53,
}

impl Side {
    /// Parse an ASCII side character ('B' or 'S')
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'B' => Some(Side::Buy),
            'S' => Some(Side::Sell),
            _ => None,
        }
    }

    #[inline]
    pub const fn as_byte(self) -> u8 {
        self as u8
    }

    #[inline]
    pub const fn as_char(self) -> char {
        self as u8 as char
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Seconds marker ('T'), 5 bytes on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Seconds {
    /// Seconds since midnight of the trading day
    pub second: u32,
}

/// AddOrder ('A'), 37 bytes on the wire
///
/// A new order entering an order book. `order_attributes` and `lot_type` are
/// opaque to the codec; `price` is a fixed-point value whose scale is a
/// caller convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AddOrder {
    /// Nanosecond part of the event time, wraps at 2^32
    pub timestamp_ns: u32,
    /// Caller-assigned order identifier (uniqueness not enforced)
    pub order_id: u64,
    pub orderbook_id: u32,
    pub side: Side,
    /// Caller-supplied ordering hint within the book
    pub orderbook_position: u32,
    pub quantity: u64,
    pub price: u32,
    pub order_attributes: u16,
    pub lot_type: u8,
}

/// OrderDelete ('D'), 18 bytes on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrderDelete {
    pub timestamp_ns: u32,
    pub order_id: u64,
    pub orderbook_id: u32,
    pub side: Side,
}

/// OrderExecuted ('E'), 52 bytes on the wire
///
/// The two 7-byte reserved areas that close the message are not modelled;
/// they are written as zeros and skipped when reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrderExecuted {
    pub timestamp_ns: u32,
    pub order_id: u64,
    pub orderbook_id: u32,
    pub side: Side,
    pub executed_quantity: u64,
    pub match_id: u64,
    pub combo_group_id: u32,
}

/// Any ITCH record the codec understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ItchEvent {
    Seconds(Seconds),
    AddOrder(AddOrder),
    OrderDelete(OrderDelete),
    OrderExecuted(OrderExecuted),
}

impl ItchEvent {
    pub const fn message_type(&self) -> MessageType {
        match self {
            ItchEvent::Seconds(_) => MessageType::Seconds,
            ItchEvent::AddOrder(_) => MessageType::AddOrder,
            ItchEvent::OrderDelete(_) => MessageType::OrderDelete,
            ItchEvent::OrderExecuted(_) => MessageType::OrderExecuted,
        }
    }

    /// Order identifier, for the variants that reference an order
    pub const fn order_id(&self) -> Option<u64> {
        match self {
            ItchEvent::Seconds(_) => None,
            ItchEvent::AddOrder(m) => Some(m.order_id),
            ItchEvent::OrderDelete(m) => Some(m.order_id),
            ItchEvent::OrderExecuted(m) => Some(m.order_id),
        }
    }
}

impl From<Seconds> for ItchEvent {
    fn from(m: Seconds) -> Self {
        ItchEvent::Seconds(m)
    }
}

impl From<AddOrder> for ItchEvent {
    fn from(m: AddOrder) -> Self {
        ItchEvent::AddOrder(m)
    }
}

impl From<OrderDelete> for ItchEvent {
    fn from(m: OrderDelete) -> Self {
        ItchEvent::OrderDelete(m)
    }
}

impl From<OrderExecuted> for ItchEvent {
    fn from(m: OrderExecuted) -> Self {
        ItchEvent::OrderExecuted(m)
    }
}
