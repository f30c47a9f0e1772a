//! # moldfeed Codec - ITCH Messages and MoldUDP64 Framing
//!
//! ## Purpose
//!
//! The "rules" layer of moldfeed: how the records in `feed-types` become
//! bytes and back. Two layers compose:
//! - **Message codec** ([`itch`]): fixed-size ITCH layouts, big-endian
//!   integers, ASCII type and side tags
//! - **Transport framer** ([`moldudp64`]): session id, sequence number and
//!   length-prefixed message blocks, with payloads opaque
//!
//! ## Architecture Role
//!
//! ```text
//! libs/types → [codec] → UDP payload bytes
//!     ↑           ↓
//! AddOrder    WireMessage::encode → encode_frame / FrameBuilder
//! ItchEvent   decode_frame / PacketView → decode_message → MessageHandler
//! ```
//!
//! ## What This Crate Contains
//! - [`WireMessage`] implementations for Seconds, AddOrder, OrderDelete, OrderExecuted
//! - [`AddOrderBuilder`] for range-checked construction from untyped input
//! - [`encode_frame`], [`decode_frame`], [`PacketView`], [`FrameBuilder`]
//! - [`SessionSequencer`] for publishers and [`dispatch_packet`] for consumers
//! - [`FramingConfig`] size limits and the layered error types
//!
//! ## What This Crate Does NOT Contain
//! - Sockets, pcap writing or any other I/O
//! - Retransmission, gap recovery or order book state
//!
//! ## Concurrency
//!
//! Every encode and decode function is pure: inputs are borrowed, outputs
//! are fresh buffers, nothing is global. Stateful helpers take `&mut self`
//! and are meant to be owned by one publisher or consumer.

pub mod builder;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod itch;
pub mod moldudp64;
pub mod session;
pub mod wire;

pub use builder::AddOrderBuilder;
pub use config::{FramingConfig, ETHERNET_UDP_PAYLOAD, MAX_UDP_PAYLOAD};
pub use dispatch::{dispatch_packet, MessageHandler, PacketSummary};
pub use error::{
    CodecError, CodecResult, DecodingError, DecodingResult, EncodingError, EncodingResult,
    FramingError, FramingResult,
};
pub use itch::{decode_message, encode_event, encode_event_into, wire_size, WireMessage};
pub use moldudp64::{
    decode_frame, encode_frame, frame_size, DownstreamHeader, DownstreamPacket, FrameBuilder,
    MessageBlock, PacketView, SessionId, HEADER_SIZE, MAX_MESSAGE_COUNT, MAX_MESSAGE_SIZE,
    SESSION_ID_SIZE,
};
pub use session::SessionSequencer;

// Record types, so callers need only this crate
pub use feed_types::{
    is_itch_tag, AddOrder, ItchEvent, MessageType, OrderDelete, OrderExecuted, Seconds, Side, UnmodelledType,
};
