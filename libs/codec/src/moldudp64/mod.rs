//! # MoldUDP64 Downstream Framing
//!
//! ## Wire Format
//!
//! ```text
//! offset 0,  len 10 : session id, left-justified, zero padded
//! offset 10, len 8  : sequence number of the first message (u64 BE)
//! offset 18, len 2  : message count (u16 BE)
//! then message_count times:
//!   len 2 : message length (u16 BE)
//!   len n : message payload
//! ```
//!
//! Payloads are opaque at this layer. The session id and sequence number are
//! always supplied by the caller; the message count is always derived from the
//! blocks actually written.
//!
//! ## Entry Points
//!
//! - [`encode_frame`] / [`decode_frame`]: one-shot owned conversion
//! - [`PacketView`]: validated zero-copy view over a received datagram
//! - [`FrameBuilder`]: incremental construction under size limits

mod builder;
mod view;

pub use builder::FrameBuilder;
pub use view::{MessageBlock, MessageBlocks, PacketView};

use crate::error::{FramingError, FramingResult};
use crate::wire::{BeU16, BeU64, WireWriter};
use std::fmt;
use std::mem::{offset_of, size_of};
use zerocopy::{AsBytes, FromBytes, FromZeroes, Unaligned};

/// Session id field width
pub const SESSION_ID_SIZE: usize = 10;
/// Downstream header size (session + sequence + count)
pub const HEADER_SIZE: usize = 20;
/// Width of the per-block length prefix
pub const LENGTH_PREFIX_SIZE: usize = 2;
/// Largest payload a length prefix can describe
pub const MAX_MESSAGE_SIZE: usize = u16::MAX as usize;
/// Largest message count the header can carry
pub const MAX_MESSAGE_COUNT: usize = u16::MAX as usize;

pub(crate) const MESSAGE_COUNT_OFFSET: usize = 18;

/// 10-byte MoldUDP64 session identifier
///
/// Shorter input is right-padded with zero bytes; longer input is rejected,
/// never truncated.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, AsBytes, FromBytes, FromZeroes, Unaligned)]
pub struct SessionId([u8; SESSION_ID_SIZE]);

impl SessionId {
    pub fn new(id: &[u8]) -> FramingResult<Self> {
        if id.len() > SESSION_ID_SIZE {
            return Err(FramingError::session_id_too_long(id.len()));
        }
        let mut bytes = [0u8; SESSION_ID_SIZE];
        bytes[..id.len()].copy_from_slice(id);
        Ok(Self(bytes))
    }

    pub const fn from_bytes(bytes: [u8; SESSION_ID_SIZE]) -> Self {
        Self(bytes)
    }

    /// All ten bytes, padding included
    pub const fn as_array(&self) -> &[u8; SESSION_ID_SIZE] {
        &self.0
    }

    /// The id without trailing zero padding
    pub fn trimmed(&self) -> &[u8] {
        let end = self.0.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
        &self.0[..end]
    }
}

impl TryFrom<&str> for SessionId {
    type Error = FramingError;

    fn try_from(id: &str) -> FramingResult<Self> {
        Self::new(id.as_bytes())
    }
}

impl TryFrom<&[u8]> for SessionId {
    type Error = FramingError;

    fn try_from(id: &[u8]) -> FramingResult<Self> {
        Self::new(id)
    }
}

impl AsRef<[u8]> for SessionId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let trimmed = self.trimmed();
        match std::str::from_utf8(trimmed) {
            Ok(s) if s.chars().all(|c| c.is_ascii_graphic() || c == ' ') => f.write_str(s),
            _ => write!(f, "0x{}", hex::encode(self.0)),
        }
    }
}

impl fmt::Debug for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionId({self})")
    }
}

/// Downstream packet header, exactly as on the wire
#[repr(C)]
#[derive(Debug, Clone, Copy, AsBytes, FromBytes, FromZeroes, Unaligned)]
pub struct DownstreamHeader {
    pub session_id: SessionId,
    pub sequence_number: BeU64,
    pub message_count: BeU16,
}

const _: () = {
    assert!(size_of::<DownstreamHeader>() == HEADER_SIZE);
    assert!(offset_of!(DownstreamHeader, sequence_number) == SESSION_ID_SIZE);
    assert!(offset_of!(DownstreamHeader, message_count) == MESSAGE_COUNT_OFFSET);
};

impl DownstreamHeader {
    pub fn new(session_id: SessionId, sequence_number: u64, message_count: u16) -> Self {
        Self {
            session_id,
            sequence_number: BeU64::new(sequence_number),
            message_count: BeU16::new(message_count),
        }
    }
}

/// An owned, decoded MoldUDP64 frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownstreamPacket {
    pub session_id: SessionId,
    pub sequence_number: u64,
    pub messages: Vec<Vec<u8>>,
}

impl DownstreamPacket {
    /// Always the number of blocks, never stored separately
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Sequence number the next packet of this session should carry
    pub fn next_sequence_number(&self) -> u64 {
        self.sequence_number
            .wrapping_add(self.messages.len() as u64)
    }

    /// Re-encode the packet
    pub fn encode(&self) -> FramingResult<Vec<u8>> {
        encode_frame(self.session_id.as_array(), self.sequence_number, &self.messages)
    }
}

/// Exact encoded size of a frame holding `messages`
pub fn frame_size<M: AsRef<[u8]>>(messages: &[M]) -> usize {
    HEADER_SIZE
        + messages
            .iter()
            .map(|m| LENGTH_PREFIX_SIZE + m.as_ref().len())
            .sum::<usize>()
}

/// Encode a downstream frame
///
/// Validates the session id, message count and every payload length before
/// writing, so a failure never yields partial output. An empty `messages`
/// slice produces a 20-byte header-only frame.
pub fn encode_frame<M: AsRef<[u8]>>(
    session_id: &[u8],
    sequence_number: u64,
    messages: &[M],
) -> FramingResult<Vec<u8>> {
    let session_id = SessionId::new(session_id)?;

    if messages.len() > MAX_MESSAGE_COUNT {
        return Err(FramingError::TooManyMessages {
            count: messages.len(),
            max: MAX_MESSAGE_COUNT,
        });
    }
    if let Some((index, m)) = messages
        .iter()
        .enumerate()
        .find(|(_, m)| m.as_ref().len() > MAX_MESSAGE_SIZE)
    {
        return Err(FramingError::MessageTooLarge {
            index,
            size: m.as_ref().len(),
            max: MAX_MESSAGE_SIZE,
        });
    }

    let mut buf = Vec::with_capacity(frame_size(messages));
    let mut writer = WireWriter::new(&mut buf);
    writer.put(&DownstreamHeader::new(
        session_id,
        sequence_number,
        messages.len() as u16,
    ));
    for m in messages {
        let payload = m.as_ref();
        writer.put_u16(payload.len() as u16).put_bytes(payload);
    }

    tracing::trace!(
        session = %session_id,
        sequence_number,
        message_count = messages.len(),
        frame_size = buf.len(),
        "encoded MoldUDP64 frame"
    );
    Ok(buf)
}

/// Decode a downstream frame into owned payloads
///
/// Strict: the buffer must contain the header and exactly `message_count`
/// blocks with nothing after them.
pub fn decode_frame(bytes: &[u8]) -> FramingResult<DownstreamPacket> {
    PacketView::parse(bytes).map(|view| view.to_packet())
}
