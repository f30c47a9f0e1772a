//! # Packet Dispatch
//!
//! Decode a MoldUDP64 datagram and hand each ITCH message to a
//! [`MessageHandler`] callback, in block order, with its session sequence
//! number.
//!
//! Dispatch is two-phase. Every block is decoded first; callbacks only run
//! once the whole packet is known to be well formed, so a handler never sees
//! half a packet. ITCH message types this codec does not model go to
//! [`MessageHandler::on_unmodelled`]; tags that are not ITCH at all, and empty
//! blocks, go to [`MessageHandler::on_unknown`]. Neither fails the packet.
//! By default `on_unmodelled` forwards to `on_unknown`.

use crate::error::{CodecError, CodecResult, DecodingError};
use crate::itch::decode_message;
use crate::moldudp64::{PacketView, SessionId};
use feed_types::{AddOrder, ItchEvent, OrderDelete, OrderExecuted, Seconds, UnmodelledType};

/// Receives decoded messages; every callback defaults to a no-op
#[allow(unused_variables)]
pub trait MessageHandler {
    fn on_seconds(&mut self, sequence_number: u64, message: &Seconds) {}

    fn on_add_order(&mut self, sequence_number: u64, message: &AddOrder) {}

    fn on_order_delete(&mut self, sequence_number: u64, message: &OrderDelete) {}

    fn on_order_executed(&mut self, sequence_number: u64, message: &OrderExecuted) {}

    /// Valid ITCH message without a record type here
    fn on_unmodelled(
        &mut self,
        sequence_number: u64,
        message_type: UnmodelledType,
        payload: &[u8],
    ) {
        self.on_unknown(sequence_number, payload)
    }

    /// A block whose tag is not ITCH (or an empty block)
    fn on_unknown(&mut self, sequence_number: u64, payload: &[u8]) {}
}

/// What a dispatched packet contained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketSummary {
    pub session_id: SessionId,
    /// Sequence number of the first block
    pub sequence_number: u64,
    pub message_count: u16,
    /// Blocks routed to `on_unmodelled`
    pub unmodelled_count: usize,
    /// Blocks routed to `on_unknown`
    pub unknown_count: usize,
}

impl PacketSummary {
    pub fn next_sequence_number(&self) -> u64 {
        self.sequence_number
            .wrapping_add(u64::from(self.message_count))
    }
}

enum Decoded<'a> {
    Event(ItchEvent),
    Unmodelled(UnmodelledType, &'a [u8]),
    Unknown(&'a [u8]),
}

/// Decode `bytes` as one MoldUDP64 packet and dispatch its messages
///
/// Framing errors and malformed known messages fail the whole packet
/// before any callback runs.
pub fn dispatch_packet<H: MessageHandler + ?Sized>(
    bytes: &[u8],
    handler: &mut H,
) -> CodecResult<PacketSummary> {
    let view = PacketView::parse(bytes)?;

    let mut decoded = Vec::with_capacity(usize::from(view.message_count()));
    for (index, block) in view.blocks().enumerate() {
        let item = match decode_message(block.payload) {
            Ok(event) => Decoded::Event(event),
            Err(DecodingError::UnmodelledMessageType { message_type }) => {
                tracing::trace!(
                    sequence_number = block.sequence_number,
                    %message_type,
                    "skipping unmodelled message type"
                );
                Decoded::Unmodelled(message_type, block.payload)
            }
            Err(DecodingError::UnknownMessageType { tag, .. }) => {
                tracing::debug!(
                    sequence_number = block.sequence_number,
                    tag = %char::from(tag).escape_default(),
                    "skipping unknown message type"
                );
                Decoded::Unknown(block.payload)
            }
            Err(DecodingError::Empty) => Decoded::Unknown(block.payload),
            Err(source) => {
                return Err(CodecError::Block {
                    index,
                    sequence_number: block.sequence_number,
                    source,
                })
            }
        };
        decoded.push((block.sequence_number, item));
    }

    let mut unmodelled_count = 0;
    let mut unknown_count = 0;
    for (sequence_number, item) in decoded {
        match item {
            Decoded::Event(ItchEvent::Seconds(m)) => handler.on_seconds(sequence_number, &m),
            Decoded::Event(ItchEvent::AddOrder(m)) => handler.on_add_order(sequence_number, &m),
            Decoded::Event(ItchEvent::OrderDelete(m)) => {
                handler.on_order_delete(sequence_number, &m)
            }
            Decoded::Event(ItchEvent::OrderExecuted(m)) => {
                handler.on_order_executed(sequence_number, &m)
            }
            Decoded::Unmodelled(message_type, payload) => {
                unmodelled_count += 1;
                handler.on_unmodelled(sequence_number, message_type, payload)
            }
            Decoded::Unknown(payload) => {
                unknown_count += 1;
                handler.on_unknown(sequence_number, payload)
            }
        }
    }

    let summary = PacketSummary {
        session_id: view.session_id(),
        sequence_number: view.sequence_number(),
        message_count: view.message_count(),
        unmodelled_count,
        unknown_count,
    };
    tracing::trace!(
        session = %summary.session_id,
        sequence_number = summary.sequence_number,
        message_count = summary.message_count,
        unmodelled_count,
        unknown_count,
        "dispatched packet"
    );
    Ok(summary)
}
