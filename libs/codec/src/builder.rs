//! # AddOrder Builder - Checked Construction From Untyped Input
//!
//! ## Purpose
//!
//! A constructed [`AddOrder`] can always be encoded: its field types already
//! match the wire widths. Values that arrive untyped (config files, CSV
//! fixtures, replay tools) go through [`AddOrderBuilder`] instead, which
//! accepts wide integers and a side character and reports every violation as
//! an [`EncodingError`] before any byte is produced.
//!
//! ## Usage
//!
//! ```rust
//! use feed_codec::AddOrderBuilder;
//!
//! let bytes = AddOrderBuilder::new()
//!     .timestamp_ns(123_456_789)
//!     .order_id(1001)
//!     .orderbook_id(1)
//!     .side('B')
//!     .orderbook_position(1)
//!     .quantity(100)
//!     .price(1000)
//!     .encode()
//!     .unwrap();
//! assert_eq!(bytes.len(), 37);
//! ```
//!
//! Fields other than `side` default to zero. The first violation found, in
//! wire order, is returned.

use crate::error::{EncodingError, EncodingResult};
use crate::itch::WireMessage;
use feed_types::{is_itch_tag, AddOrder, MessageType, Side};

/// Builder for [`AddOrder`] records with range-checked setters
#[derive(Debug, Clone, Default)]
pub struct AddOrderBuilder {
    message_type: Option<u8>,
    timestamp_ns: u64,
    order_id: u64,
    orderbook_id: u64,
    side: Option<char>,
    orderbook_position: u64,
    quantity: u64,
    price: u64,
    order_attributes: u64,
    lot_type: u64,
}

impl AddOrderBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Explicit type tag, checked against 'A' at build time
    pub fn message_type(mut self, tag: u8) -> Self {
        self.message_type = Some(tag);
        self
    }

    pub fn timestamp_ns(mut self, value: u64) -> Self {
        self.timestamp_ns = value;
        self
    }

    pub fn order_id(mut self, value: u64) -> Self {
        self.order_id = value;
        self
    }

    pub fn orderbook_id(mut self, value: u64) -> Self {
        self.orderbook_id = value;
        self
    }

    pub fn side(mut self, value: char) -> Self {
        self.side = Some(value);
        self
    }

    pub fn orderbook_position(mut self, value: u64) -> Self {
        self.orderbook_position = value;
        self
    }

    pub fn quantity(mut self, value: u64) -> Self {
        self.quantity = value;
        self
    }

    pub fn price(mut self, value: u64) -> Self {
        self.price = value;
        self
    }

    pub fn order_attributes(mut self, value: u64) -> Self {
        self.order_attributes = value;
        self
    }

    pub fn lot_type(mut self, value: u64) -> Self {
        self.lot_type = value;
        self
    }

    /// Validate every field and produce the typed record
    pub fn build(&self) -> EncodingResult<AddOrder> {
        if let Some(tag) = self.message_type.filter(|&t| t != MessageType::AddOrder.tag()) {
            return Err(if is_itch_tag(tag) {
                EncodingError::UnexpectedMessageType {
                    expected: MessageType::AddOrder.name(),
                    got: tag,
                }
            } else {
                EncodingError::unknown_message_type(tag)
            });
        }

        let timestamp_ns = narrow_u32("timestamp_ns", self.timestamp_ns)?;
        let orderbook_id = narrow_u32("orderbook_id", self.orderbook_id)?;
        let side = match self.side {
            Some(c) => Side::from_char(c).ok_or(EncodingError::invalid_side(c))?,
            None => return Err(EncodingError::MissingField { field: "side" }),
        };
        let orderbook_position = narrow_u32("orderbook_position", self.orderbook_position)?;
        let price = narrow_u32("price", self.price)?;
        let order_attributes = u16::try_from(self.order_attributes)
            .map_err(|_| EncodingError::out_of_range("order_attributes", self.order_attributes, 2))?;
        let lot_type = u8::try_from(self.lot_type)
            .map_err(|_| EncodingError::out_of_range("lot_type", self.lot_type, 1))?;

        Ok(AddOrder {
            timestamp_ns,
            order_id: self.order_id,
            orderbook_id,
            side,
            orderbook_position,
            quantity: self.quantity,
            price,
            order_attributes,
            lot_type,
        })
    }

    /// Validate and encode in one step; no bytes on failure
    pub fn encode(&self) -> EncodingResult<Vec<u8>> {
        self.build().map(|order| order.encode())
    }
}

impl From<&AddOrder> for AddOrderBuilder {
    fn from(order: &AddOrder) -> Self {
        Self {
            message_type: None,
            timestamp_ns: order.timestamp_ns.into(),
            order_id: order.order_id,
            orderbook_id: order.orderbook_id.into(),
            side: Some(order.side.as_char()),
            orderbook_position: order.orderbook_position.into(),
            quantity: order.quantity,
            price: order.price.into(),
            order_attributes: order.order_attributes.into(),
            lot_type: order.lot_type.into(),
        }
    }
}

#[inline]
fn narrow_u32(field: &'static str, value: u64) -> EncodingResult<u32> {
    u32::try_from(value).map_err(|_| EncodingError::out_of_range(field, value, 4))
}
