//! # Session Sequencer
//!
//! Caller-side bookkeeping for a MoldUDP64 publisher: one session id and the
//! sequence number the next frame must start at. Each emitted frame advances
//! the sequence by its message count, so consecutive frames tile the session's
//! sequence space without gaps.
//!
//! This is publisher state only. Gap detection, retransmission and
//! end-of-session signalling are left to the transport around it.

use crate::config::FramingConfig;
use crate::error::{FramingError, FramingResult};
use crate::moldudp64::{FrameBuilder, SessionId};

#[derive(Debug, Clone)]
pub struct SessionSequencer {
    session_id: SessionId,
    next_sequence: u64,
    config: FramingConfig,
}

impl SessionSequencer {
    pub fn new(session_id: SessionId, initial_sequence: u64) -> Self {
        Self {
            session_id,
            next_sequence: initial_sequence,
            config: FramingConfig::default(),
        }
    }

    pub fn with_config(
        session_id: SessionId,
        initial_sequence: u64,
        config: FramingConfig,
    ) -> FramingResult<Self> {
        config.validate()?;
        Ok(Self {
            session_id,
            next_sequence: initial_sequence,
            config,
        })
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// Sequence number the next frame will carry
    pub fn next_sequence_number(&self) -> u64 {
        self.next_sequence
    }

    pub fn config(&self) -> &FramingConfig {
        &self.config
    }

    /// Emit all `messages` as a single frame
    ///
    /// Fails without advancing if the messages exceed the configured limits
    /// or the sequence space.
    pub fn frame<M: AsRef<[u8]>>(&mut self, messages: &[M]) -> FramingResult<Vec<u8>> {
        let next = advance(self.next_sequence, messages.len())?;

        let mut builder = self.builder(self.next_sequence);
        for m in messages {
            builder.try_push(m.as_ref())?;
        }
        let frame = builder.build();

        self.commit(next, 1);
        Ok(frame)
    }

    /// Greedily split a message stream into as many frames as the limits need
    ///
    /// All-or-nothing: on error no frame is returned and the sequence is not
    /// advanced. An empty stream yields no frames.
    pub fn pack<I>(&mut self, messages: I) -> FramingResult<Vec<Vec<u8>>>
    where
        I: IntoIterator,
        I::Item: AsRef<[u8]>,
    {
        let mut frames = Vec::new();
        let mut sequence = self.next_sequence;
        let mut builder = self.builder(sequence);

        for m in messages {
            let payload = m.as_ref();
            if !builder.is_empty() && !builder.would_fit(payload.len()) {
                sequence = advance(sequence, builder.message_count())?;
                let full = std::mem::replace(&mut builder, self.builder(sequence));
                frames.push(full.build());
            }
            builder.try_push(payload)?;
        }

        if !builder.is_empty() {
            sequence = advance(sequence, builder.message_count())?;
            frames.push(builder.build());
        }

        self.commit(sequence, frames.len());
        Ok(frames)
    }

    fn builder(&self, sequence_number: u64) -> FrameBuilder {
        FrameBuilder::with_valid_config(self.session_id, sequence_number, self.config)
    }

    fn commit(&mut self, next: u64, frames: usize) {
        tracing::debug!(
            session = %self.session_id,
            from = self.next_sequence,
            to = next,
            frames,
            "sequencer advanced"
        );
        self.next_sequence = next;
    }
}

fn advance(sequence_number: u64, message_count: usize) -> FramingResult<u64> {
    u64::try_from(message_count)
        .ok()
        .and_then(|n| sequence_number.checked_add(n))
        .ok_or(FramingError::SequenceOverflow {
            sequence_number,
            message_count,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moldudp64::{decode_frame, HEADER_SIZE};

    fn session() -> SessionId {
        SessionId::new(b"SEQ").unwrap()
    }

    #[test]
    fn test_frames_tile_sequence_space() {
        let mut seq = SessionSequencer::new(session(), 1);
        let first = seq.frame(&[b"a", b"b", b"c"]).unwrap();
        assert_eq!(seq.next_sequence_number(), 4);
        let second = seq.frame(&[b"d"]).unwrap();
        assert_eq!(seq.next_sequence_number(), 5);

        assert_eq!(decode_frame(&first).unwrap().sequence_number, 1);
        assert_eq!(decode_frame(&second).unwrap().sequence_number, 4);
    }

    #[test]
    fn test_empty_frame_does_not_advance() {
        let mut seq = SessionSequencer::new(session(), 9);
        let frame = seq.frame::<&[u8]>(&[]).unwrap();
        assert_eq!(frame.len(), HEADER_SIZE);
        assert_eq!(seq.next_sequence_number(), 9);
    }

    #[test]
    fn test_overflow_is_rejected_without_advancing() {
        let mut seq = SessionSequencer::new(session(), u64::MAX - 1);
        assert!(seq.frame(&[b"a"]).is_ok());
        assert_eq!(seq.next_sequence_number(), u64::MAX);
        assert_eq!(
            seq.frame(&[b"b"]),
            Err(FramingError::SequenceOverflow {
                sequence_number: u64::MAX,
                message_count: 1
            })
        );
        assert_eq!(seq.next_sequence_number(), u64::MAX);
    }

    #[test]
    fn test_pack_splits_on_frame_size() {
        // Room for exactly two 10-byte payloads per frame
        let config = FramingConfig {
            max_frame_size: HEADER_SIZE + 2 * 12,
            ..FramingConfig::default()
        };
        let mut seq = SessionSequencer::with_config(session(), 100, config).unwrap();
        let messages: Vec<Vec<u8>> = (0u8..5).map(|i| vec![i; 10]).collect();

        let frames = seq.pack(&messages).unwrap();
        assert_eq!(frames.len(), 3);
        assert_eq!(seq.next_sequence_number(), 105);

        let packets: Vec<_> = frames.iter().map(|f| decode_frame(f).unwrap()).collect();
        assert_eq!(packets[0].sequence_number, 100);
        assert_eq!(packets[1].sequence_number, 102);
        assert_eq!(packets[2].sequence_number, 104);
        assert_eq!(packets[2].messages, vec![vec![4u8; 10]]);

        let flattened: Vec<Vec<u8>> = packets.into_iter().flat_map(|p| p.messages).collect();
        assert_eq!(flattened, messages);
    }

    #[test]
    fn test_pack_splits_on_message_count() {
        let config = FramingConfig {
            max_messages_per_frame: 3,
            ..FramingConfig::default()
        };
        let mut seq = SessionSequencer::with_config(session(), 1, config).unwrap();
        let frames = seq.pack(vec![b"x"; 7]).unwrap();
        assert_eq!(frames.len(), 3);
        assert_eq!(seq.next_sequence_number(), 8);
    }

    #[test]
    fn test_pack_oversized_message_is_all_or_nothing() {
        let config = FramingConfig {
            max_frame_size: HEADER_SIZE + 2 + 4,
            ..FramingConfig::default()
        };
        let mut seq = SessionSequencer::with_config(session(), 1, config).unwrap();
        let result = seq.pack([&b"ok"[..], &b"too long"[..]]);
        assert!(matches!(result, Err(FramingError::FrameFull { .. })));
        assert_eq!(seq.next_sequence_number(), 1);
    }

    #[test]
    fn test_pack_empty_stream() {
        let mut seq = SessionSequencer::new(session(), 5);
        assert!(seq.pack(Vec::<Vec<u8>>::new()).unwrap().is_empty());
        assert_eq!(seq.next_sequence_number(), 5);
    }
}
