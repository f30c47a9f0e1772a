//! # moldfeed Types
//!
//! Plain data records for the ITCH order-event messages that the moldfeed
//! codec writes into MoldUDP64 frames.
//!
//! ## Design Philosophy
//!
//! - **Pure Data**: No byte-order or layout logic lives here; the wire rules
//!   belong to `feed-codec`
//! - **Typed Fields**: Every field carries its declared wire width as its Rust
//!   type, so a constructed record can always be encoded
//! - **Closed Tags**: `Side` and `MessageType` only admit the tag bytes the
//!   protocol defines
//!
//! ## Quick Start
//!
//! ```rust
//! use feed_types::{AddOrder, ItchEvent, MessageType, Side};
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
//! let event = ItchEvent::from(order);
//! assert_eq!(event.message_type(), MessageType::AddOrder);
//! ```
//!
//! ## Architecture Role
//!
//! ```text
//! libs/types → libs/codec → external capture / network layer
//!     ↑             ↓
//! Pure Data    Wire Rules
//! AddOrder     37-byte layout, MoldUDP64 framing
//! ```

pub mod itch;

pub use itch::{
    is_itch_tag, AddOrder, ItchEvent, MessageType, OrderDelete, OrderExecuted, Seconds, Side,
    UnmodelledType,
};
