//! Codec errors for ITCH message and MoldUDP64 frame processing
//!
//! Three layers, mirroring where a violation is detected:
//! - [`EncodingError`]: a value cannot be expressed in a message layout
//! - [`DecodingError`]: bytes do not match a message layout
//! - [`FramingError`]: a transport frame is structurally invalid
//!
//! [`CodecError`] wraps all three for operations that span both layers.
//! Every variant carries enough context (offsets, sizes, limits) to locate the
//! problem in a capture without re-running the parser.

use feed_types::UnmodelledType;
use thiserror::Error;

/// Message-level encoding violations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodingError {
    /// Side must be 'B' or 'S'
    #[error("Invalid side {value:?}: expected 'B' (buy) or 'S' (sell)")]
    InvalidSide { value: char },

    /// Message type tag is not an ITCH message type
    #[error("Unknown message type tag {tag:#04x} ({display:?}): not an ITCH message type")]
    UnknownMessageType { tag: u8, display: char },

    /// Tag is valid ITCH but does not belong to the record being encoded
    #[error("Message type mismatch: encoding {expected} but tag {got:#04x} was supplied")]
    UnexpectedMessageType { expected: &'static str, got: u8 },

    /// Value does not fit the field's unsigned wire width
    #[error("Field {field} out of range: {value} exceeds {width}-byte maximum {max}")]
    FieldOutOfRange {
        field: &'static str,
        value: u64,
        width: usize,
        max: u64,
    },

    /// A field without a meaningful default was never set
    #[error("Missing required field {field}")]
    MissingField { field: &'static str },
}

impl EncodingError {
    pub fn invalid_side(value: char) -> Self {
        Self::InvalidSide { value }
    }

    pub fn unknown_message_type(tag: u8) -> Self {
        Self::UnknownMessageType {
            tag,
            display: printable(tag),
        }
    }

    /// Range violation for a field of `width` bytes
    pub fn out_of_range(field: &'static str, value: u64, width: usize) -> Self {
        let max = if width >= 8 {
            u64::MAX
        } else {
            (1u64 << (width * 8)) - 1
        };
        Self::FieldOutOfRange {
            field,
            value,
            width,
            max,
        }
    }
}

/// Message-level decoding violations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodingError {
    /// Zero-length message block
    #[error("Empty message: no message type byte present")]
    Empty,

    /// Buffer length does not match the fixed message size
    #[error("Wrong length for {message}: expected {expected} bytes, got {got} ({diagnosis})")]
    WrongLength {
        message: &'static str,
        expected: usize,
        got: usize,
        diagnosis: String,
    },

    /// First byte is not an ITCH message type
    #[error("Unknown message type tag {tag:#04x} ({display:?})")]
    UnknownMessageType { tag: u8, display: char },

    /// Valid ITCH message type without a record in this codec
    #[error("Unmodelled message type {message_type}: no record to decode into")]
    UnmodelledMessageType { message_type: UnmodelledType },

    /// Known tag, but not the one the caller asked to decode
    #[error("Message type mismatch: expected {expected}, got tag {got:#04x} ({display:?})")]
    UnexpectedMessageType {
        expected: &'static str,
        got: u8,
        display: char,
    },

    /// Side byte is neither 'B' nor 'S'
    #[error("Invalid side byte {byte:#04x} ({display:?}) at offset {offset}: expected 'B' or 'S'")]
    InvalidSide { byte: u8, display: char, offset: usize },
}

impl DecodingError {
    pub fn wrong_length(message: &'static str, expected: usize, got: usize) -> Self {
        let diagnosis = if got == 0 {
            "empty buffer"
        } else if got < expected {
            "message truncated"
        } else {
            "trailing bytes or wrong message block boundary"
        };

        Self::WrongLength {
            message,
            expected,
            got,
            diagnosis: diagnosis.to_string(),
        }
    }

    pub fn unknown_message_type(tag: u8) -> Self {
        Self::UnknownMessageType {
            tag,
            display: printable(tag),
        }
    }

    /// Classify a tag that has no record: unmodelled ITCH or not ITCH at all
    pub fn unsupported_tag(tag: u8) -> Self {
        match UnmodelledType::try_from(tag) {
            Ok(message_type) => Self::UnmodelledMessageType { message_type },
            Err(_) => Self::unknown_message_type(tag),
        }
    }

    pub fn unexpected_message_type(expected: &'static str, got: u8) -> Self {
        Self::UnexpectedMessageType {
            expected,
            got,
            display: printable(got),
        }
    }

    pub fn invalid_side(byte: u8, offset: usize) -> Self {
        Self::InvalidSide {
            byte,
            display: printable(byte),
            offset,
        }
    }
}

/// Transport-level framing violations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FramingError {
    /// Session identifiers are padded, never truncated
    #[error("Session id too long: {len} bytes exceeds the {max}-byte field")]
    SessionIdTooLong { len: usize, max: usize },

    /// Message does not fit the 2-byte length prefix
    #[error("Message {index} too large: {size} bytes exceeds maximum {max}")]
    MessageTooLarge { index: usize, size: usize, max: usize },

    /// Message count does not fit the 2-byte count field (or the configured limit)
    #[error("Too many messages: {count} exceeds maximum {max} per frame")]
    TooManyMessages { count: usize, max: usize },

    /// Adding the message would push the frame over its configured size
    #[error("Frame full: {frame_size} bytes + {block_size}-byte block exceeds limit {limit}")]
    FrameFull {
        frame_size: usize,
        block_size: usize,
        limit: usize,
    },

    /// Buffer ends inside the header or a length prefix
    #[error("Truncated frame at offset {offset}: need {need} bytes, {available} available ({context}, action: {suggested_action})")]
    Truncated {
        offset: usize,
        need: usize,
        available: usize,
        context: String,
        suggested_action: String,
    },

    /// A block declares more payload than the buffer holds
    #[error("Message block {index} at offset {offset} declares {declared} bytes, only {remaining} remain")]
    BlockOverrun {
        index: usize,
        offset: usize,
        declared: usize,
        remaining: usize,
    },

    /// Bytes left over after `message_count` blocks were consumed
    #[error("Trailing bytes: {remaining} bytes after {message_count} message blocks (offset {offset})")]
    TrailingBytes {
        offset: usize,
        remaining: usize,
        message_count: u16,
    },

    /// Sequence number would wrap past u64::MAX
    #[error("Sequence overflow: {sequence_number} + {message_count} messages exceeds u64")]
    SequenceOverflow {
        sequence_number: u64,
        message_count: usize,
    },

    /// Framing limits that cannot produce a valid frame
    #[error("Invalid framing configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl FramingError {
    pub fn session_id_too_long(len: usize) -> Self {
        Self::SessionIdTooLong {
            len,
            max: crate::moldudp64::SESSION_ID_SIZE,
        }
    }

    /// Truncation with a hint about the likely cause
    pub fn truncated(
        offset: usize,
        need: usize,
        available: usize,
        context: impl Into<String>,
    ) -> Self {
        let suggested_action = if offset == 0 && available == 0 {
            "empty datagram - check capture slicing"
        } else if offset == 0 {
            "payload shorter than a MoldUDP64 header - check UDP payload offset"
        } else {
            "message_count larger than the blocks present - packet cut short"
        };

        Self::Truncated {
            offset,
            need,
            available,
            context: context.into(),
            suggested_action: suggested_action.to_string(),
        }
    }

    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }
}

/// Errors from operations that cross the message and frame layers
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error(transparent)]
    Encoding(#[from] EncodingError),

    #[error(transparent)]
    Decoding(#[from] DecodingError),

    #[error(transparent)]
    Framing(#[from] FramingError),

    /// A message block failed to decode; `sequence_number` locates it in the session
    #[error("Message block {index} (sequence {sequence_number}): {source}")]
    Block {
        index: usize,
        sequence_number: u64,
        #[source]
        source: DecodingError,
    },
}

/// Result type for encoding operations
pub type EncodingResult<T> = std::result::Result<T, EncodingError>;

/// Result type for decoding operations
pub type DecodingResult<T> = std::result::Result<T, DecodingError>;

/// Result type for framing operations
pub type FramingResult<T> = std::result::Result<T, FramingError>;

/// Result type for cross-layer operations
pub type CodecResult<T> = std::result::Result<T, CodecError>;

fn printable(byte: u8) -> char {
    if byte.is_ascii_graphic() {
        byte as char
    } else {
        '.'
    }
}
