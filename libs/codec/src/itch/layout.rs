//! Byte-exact ITCH message layouts
//!
//! Each struct is the message exactly as it appears on the wire: packed
//! without padding, big-endian integers, the type tag in byte 0 and the
//! nanosecond timestamp (where present) at byte 1.
//!
//! ```text
//! AddOrder ('A'), 37 bytes
//!  0  type                 'A'
//!  1  timestamp_ns         u32
//!  5  order_id             u64
//! 13  orderbook_id         u32
//! 17  side                 'B' | 'S'
//! 18  orderbook_position   u32
//! 22  quantity             u64
//! 30  price                u32
//! 34  order_attributes     u16
//! 36  lot_type             u8
//! ```

use crate::wire::{BeU16, BeU32, BeU64};
use std::mem::{offset_of, size_of};
use zerocopy::{AsBytes, FromBytes, FromZeroes, Unaligned};

/// Offset of the message type tag in every ITCH message
pub const MESSAGE_TYPE_OFFSET: usize = 0;
/// Offset of the nanosecond timestamp in timestamped messages
pub const TIMESTAMP_OFFSET: usize = 1;

pub const SECONDS_SIZE: usize = 5;
pub const ADD_ORDER_SIZE: usize = 37;
pub const ORDER_DELETE_SIZE: usize = 18;
pub const ORDER_EXECUTED_SIZE: usize = 52;

pub const ADD_ORDER_SIDE_OFFSET: usize = 17;
pub const ORDER_DELETE_SIDE_OFFSET: usize = 17;
pub const ORDER_EXECUTED_SIDE_OFFSET: usize = 17;

/// Reserved filler at the end of OrderExecuted (two 7-byte areas)
pub const ORDER_EXECUTED_RESERVED_SIZE: usize = 14;

#[repr(C)]
#[derive(Debug, Clone, Copy, AsBytes, FromBytes, FromZeroes, Unaligned)]
pub struct SecondsLayout {
    pub message_type: u8,
    pub second: BeU32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, AsBytes, FromBytes, FromZeroes, Unaligned)]
pub struct AddOrderLayout {
    pub message_type: u8,
    pub timestamp_ns: BeU32,
    pub order_id: BeU64,
    pub orderbook_id: BeU32,
    pub side: u8,
    pub orderbook_position: BeU32,
    pub quantity: BeU64,
    pub price: BeU32,
    pub order_attributes: BeU16,
    pub lot_type: u8,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, AsBytes, FromBytes, FromZeroes, Unaligned)]
pub struct OrderDeleteLayout {
    pub message_type: u8,
    pub timestamp_ns: BeU32,
    pub order_id: BeU64,
    pub orderbook_id: BeU32,
    pub side: u8,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, AsBytes, FromBytes, FromZeroes, Unaligned)]
pub struct OrderExecutedLayout {
    pub message_type: u8,
    pub timestamp_ns: BeU32,
    pub order_id: BeU64,
    pub orderbook_id: BeU32,
    pub side: u8,
    pub executed_quantity: BeU64,
    pub match_id: BeU64,
    pub combo_group_id: BeU32,
    pub reserved: [u8; ORDER_EXECUTED_RESERVED_SIZE],
}

// Sizes and offsets are the wire contract.
const _: () = {
    assert!(size_of::<SecondsLayout>() == SECONDS_SIZE);

    assert!(size_of::<AddOrderLayout>() == ADD_ORDER_SIZE);
    assert!(offset_of!(AddOrderLayout, timestamp_ns) == TIMESTAMP_OFFSET);
    assert!(offset_of!(AddOrderLayout, order_id) == 5);
    assert!(offset_of!(AddOrderLayout, orderbook_id) == 13);
    assert!(offset_of!(AddOrderLayout, side) == ADD_ORDER_SIDE_OFFSET);
    assert!(offset_of!(AddOrderLayout, orderbook_position) == 18);
    assert!(offset_of!(AddOrderLayout, quantity) == 22);
    assert!(offset_of!(AddOrderLayout, price) == 30);
    assert!(offset_of!(AddOrderLayout, order_attributes) == 34);
    assert!(offset_of!(AddOrderLayout, lot_type) == 36);

    assert!(size_of::<OrderDeleteLayout>() == ORDER_DELETE_SIZE);
    assert!(offset_of!(OrderDeleteLayout, side) == ORDER_DELETE_SIDE_OFFSET);

    assert!(size_of::<OrderExecutedLayout>() == ORDER_EXECUTED_SIZE);
    assert!(offset_of!(OrderExecutedLayout, side) == ORDER_EXECUTED_SIDE_OFFSET);
    assert!(offset_of!(OrderExecutedLayout, executed_quantity) == 18);
    assert!(offset_of!(OrderExecutedLayout, match_id) == 26);
    assert!(offset_of!(OrderExecutedLayout, combo_group_id) == 34);
    assert!(offset_of!(OrderExecutedLayout, reserved) == 38);
};
