//! Incremental frame construction under configured limits

use super::{
    DownstreamHeader, SessionId, HEADER_SIZE, LENGTH_PREFIX_SIZE, MAX_MESSAGE_COUNT,
    MAX_MESSAGE_SIZE, MESSAGE_COUNT_OFFSET,
};
use crate::config::{FramingConfig, ETHERNET_UDP_PAYLOAD};
use crate::error::{FramingError, FramingResult};
use crate::itch::WireMessage;
use crate::wire::{BeU16, WireWriter};
use zerocopy::AsBytes;

/// Builds one MoldUDP64 frame block by block
///
/// The header is written up front and the count patched in [`build`]. A push
/// that would break a limit is rejected and leaves the frame untouched, so
/// the caller can flush and retry the same message in a new frame.
///
/// [`build`]: FrameBuilder::build
#[derive(Debug, Clone)]
pub struct FrameBuilder {
    session_id: SessionId,
    sequence_number: u64,
    config: FramingConfig,
    buf: Vec<u8>,
    count: usize,
}

impl FrameBuilder {
    /// Builder with the default (UDP maximum) limits
    pub fn new(session_id: SessionId, sequence_number: u64) -> Self {
        Self::with_valid_config(session_id, sequence_number, FramingConfig::default())
    }

    pub fn with_config(
        session_id: SessionId,
        sequence_number: u64,
        config: FramingConfig,
    ) -> FramingResult<Self> {
        config.validate()?;
        Ok(Self::with_valid_config(session_id, sequence_number, config))
    }

    pub(crate) fn with_valid_config(
        session_id: SessionId,
        sequence_number: u64,
        config: FramingConfig,
    ) -> Self {
        let mut buf = Vec::with_capacity(config.max_frame_size.min(ETHERNET_UDP_PAYLOAD));
        WireWriter::new(&mut buf).put(&DownstreamHeader::new(session_id, sequence_number, 0));
        Self {
            session_id,
            sequence_number,
            config,
            buf,
            count: 0,
        }
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn sequence_number(&self) -> u64 {
        self.sequence_number
    }

    pub fn message_count(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Current encoded size, header included
    pub fn frame_size(&self) -> usize {
        self.buf.len()
    }

    fn max_messages(&self) -> usize {
        self.config.max_messages_per_frame.min(MAX_MESSAGE_COUNT)
    }

    /// Largest payload the next push could accept
    pub fn remaining_capacity(&self) -> usize {
        if self.count >= self.max_messages() {
            return 0;
        }
        self.config
            .max_frame_size
            .saturating_sub(self.buf.len() + LENGTH_PREFIX_SIZE)
            .min(MAX_MESSAGE_SIZE)
    }

    pub fn would_fit(&self, payload_len: usize) -> bool {
        self.check(payload_len).is_ok()
    }

    fn check(&self, payload_len: usize) -> FramingResult<()> {
        if payload_len > MAX_MESSAGE_SIZE {
            return Err(FramingError::MessageTooLarge {
                index: self.count,
                size: payload_len,
                max: MAX_MESSAGE_SIZE,
            });
        }
        if self.count >= self.max_messages() {
            return Err(FramingError::TooManyMessages {
                count: self.count + 1,
                max: self.max_messages(),
            });
        }
        let block_size = LENGTH_PREFIX_SIZE + payload_len;
        if self.buf.len() + block_size > self.config.max_frame_size {
            return Err(FramingError::FrameFull {
                frame_size: self.buf.len(),
                block_size,
                limit: self.config.max_frame_size,
            });
        }
        Ok(())
    }

    /// Append one opaque payload as the next block
    pub fn try_push(&mut self, payload: &[u8]) -> FramingResult<()> {
        self.check(payload.len())?;
        WireWriter::new(&mut self.buf)
            .put_u16(payload.len() as u16)
            .put_bytes(payload);
        self.count += 1;
        Ok(())
    }

    /// Encode a message directly into the frame
    pub fn try_push_message<M: WireMessage>(&mut self, message: &M) -> FramingResult<()> {
        self.check(M::WIRE_SIZE)?;
        WireWriter::new(&mut self.buf).put_u16(M::WIRE_SIZE as u16);
        message.encode_into(&mut self.buf);
        self.count += 1;
        Ok(())
    }

    /// Finish the frame; the header count reflects every accepted block
    pub fn build(mut self) -> Vec<u8> {
        let count = BeU16::new(self.count as u16);
        self.buf[MESSAGE_COUNT_OFFSET..HEADER_SIZE].copy_from_slice(count.as_bytes());
        tracing::trace!(
            session = %self.session_id,
            sequence_number = self.sequence_number,
            message_count = self.count,
            frame_size = self.buf.len(),
            "built MoldUDP64 frame"
        );
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moldudp64::{decode_frame, encode_frame};
    use feed_types::Seconds;

    fn session() -> SessionId {
        SessionId::new(b"TEST").unwrap()
    }

    #[test]
    fn test_matches_one_shot_encoder() {
        let mut builder = FrameBuilder::new(session(), 42);
        builder.try_push(b"hello").unwrap();
        builder.try_push(b"").unwrap();
        builder.try_push_message(&Seconds { second: 9 }).unwrap();
        assert_eq!(builder.message_count(), 3);

        let seconds = crate::itch::WireMessage::encode(&Seconds { second: 9 });
        let expected =
            encode_frame(b"TEST", 42, &[&b"hello"[..], &b""[..], &seconds[..]]).unwrap();
        assert_eq!(builder.build(), expected);
    }

    #[test]
    fn test_empty_build_is_header_only() {
        let frame = FrameBuilder::new(session(), 7).build();
        assert_eq!(frame.len(), HEADER_SIZE);
        let packet = decode_frame(&frame).unwrap();
        assert_eq!(packet.sequence_number, 7);
        assert!(packet.messages.is_empty());
    }

    #[test]
    fn test_frame_full_leaves_builder_unchanged() {
        let config = FramingConfig {
            max_frame_size: HEADER_SIZE + 2 + 5 + 2 + 3,
            ..FramingConfig::default()
        };
        let mut builder = FrameBuilder::with_config(session(), 1, config).unwrap();
        builder.try_push(b"12345").unwrap();
        assert_eq!(builder.remaining_capacity(), 3);
        assert!(builder.would_fit(3));
        assert!(!builder.would_fit(4));

        let before = builder.frame_size();
        assert_eq!(
            builder.try_push(b"1234"),
            Err(FramingError::FrameFull {
                frame_size: before,
                block_size: 6,
                limit: config.max_frame_size
            })
        );
        assert_eq!(builder.frame_size(), before);
        assert_eq!(builder.message_count(), 1);

        builder.try_push(b"123").unwrap();
        assert_eq!(builder.remaining_capacity(), 0);
        assert_eq!(builder.build().len(), config.max_frame_size);
    }

    #[test]
    fn test_message_limit() {
        let config = FramingConfig {
            max_messages_per_frame: 2,
            ..FramingConfig::default()
        };
        let mut builder = FrameBuilder::with_config(session(), 1, config).unwrap();
        builder.try_push(b"a").unwrap();
        builder.try_push(b"b").unwrap();
        assert_eq!(
            builder.try_push(b"c"),
            Err(FramingError::TooManyMessages { count: 3, max: 2 })
        );
        assert_eq!(builder.remaining_capacity(), 0);
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = FramingConfig {
            max_frame_size: 10,
            ..FramingConfig::default()
        };
        assert!(FrameBuilder::with_config(session(), 1, config).is_err());
    }
}
