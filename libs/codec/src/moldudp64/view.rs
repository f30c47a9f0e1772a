//! Zero-copy view over a received MoldUDP64 datagram

use super::{DownstreamHeader, DownstreamPacket, SessionId, HEADER_SIZE, LENGTH_PREFIX_SIZE};
use crate::error::{FramingError, FramingResult};
use crate::wire::WireReader;
use std::iter::FusedIterator;

/// A validated MoldUDP64 frame borrowed from the receive buffer
///
/// [`PacketView::parse`] walks every block once; after that, iteration cannot
/// fail and never copies payload bytes.
#[derive(Debug, Clone, Copy)]
pub struct PacketView<'a> {
    header: DownstreamHeader,
    body: &'a [u8],
}

impl<'a> PacketView<'a> {
    pub fn parse(bytes: &'a [u8]) -> FramingResult<Self> {
        let mut reader = WireReader::new(bytes);
        let header: DownstreamHeader = reader.read().ok_or_else(|| {
            FramingError::truncated(0, HEADER_SIZE, bytes.len(), "MoldUDP64 downstream header")
        })?;
        let body = reader.rest();

        let message_count = header.message_count.get();
        for index in 0..usize::from(message_count) {
            let offset = reader.position();
            let declared = reader.read_u16().ok_or_else(|| {
                FramingError::truncated(
                    offset,
                    LENGTH_PREFIX_SIZE,
                    reader.remaining(),
                    format!("length prefix of message block {index} of {message_count}"),
                )
            })?;
            let declared = usize::from(declared);
            if reader.take(declared).is_none() {
                return Err(FramingError::BlockOverrun {
                    index,
                    offset,
                    declared,
                    remaining: reader.remaining(),
                });
            }
        }

        if !reader.is_exhausted() {
            return Err(FramingError::TrailingBytes {
                offset: reader.position(),
                remaining: reader.remaining(),
                message_count,
            });
        }

        tracing::trace!(
            session = %header.session_id,
            sequence_number = header.sequence_number.get(),
            message_count,
            "parsed MoldUDP64 frame"
        );
        Ok(Self { header, body })
    }

    pub fn header(&self) -> &DownstreamHeader {
        &self.header
    }

    pub fn session_id(&self) -> SessionId {
        self.header.session_id
    }

    /// Sequence number of the first block
    pub fn sequence_number(&self) -> u64 {
        self.header.sequence_number.get()
    }

    pub fn message_count(&self) -> u16 {
        self.header.message_count.get()
    }

    pub fn is_empty(&self) -> bool {
        self.message_count() == 0
    }

    /// Total frame length, header included
    pub fn len(&self) -> usize {
        HEADER_SIZE + self.body.len()
    }

    /// Sequence number the following packet of this session should carry
    pub fn next_sequence_number(&self) -> u64 {
        self.sequence_number()
            .wrapping_add(u64::from(self.message_count()))
    }

    pub fn blocks(&self) -> MessageBlocks<'a> {
        MessageBlocks {
            reader: WireReader::new(self.body),
            sequence_number: self.sequence_number(),
            remaining: self.message_count(),
        }
    }

    pub fn to_packet(&self) -> DownstreamPacket {
        DownstreamPacket {
            session_id: self.session_id(),
            sequence_number: self.sequence_number(),
            messages: self.blocks().map(|b| b.payload.to_vec()).collect(),
        }
    }
}

impl<'a> IntoIterator for &PacketView<'a> {
    type Item = MessageBlock<'a>;
    type IntoIter = MessageBlocks<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks()
    }
}

/// One message block and its position in the session's sequence space
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageBlock<'a> {
    pub sequence_number: u64,
    pub payload: &'a [u8],
}

/// Iterator over the blocks of a validated [`PacketView`]
#[derive(Debug, Clone)]
pub struct MessageBlocks<'a> {
    reader: WireReader<'a>,
    sequence_number: u64,
    remaining: u16,
}

impl<'a> Iterator for MessageBlocks<'a> {
    type Item = MessageBlock<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let len = self.reader.read_u16()?;
        let payload = self.reader.take(usize::from(len))?;
        let block = MessageBlock {
            sequence_number: self.sequence_number,
            payload,
        };
        self.sequence_number = self.sequence_number.wrapping_add(1);
        self.remaining -= 1;
        Some(block)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = usize::from(self.remaining);
        (n, Some(n))
    }
}

impl ExactSizeIterator for MessageBlocks<'_> {}
impl FusedIterator for MessageBlocks<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moldudp64::encode_frame;

    #[test]
    fn test_blocks_carry_sequence_numbers() {
        let frame = encode_frame(b"S", 100, &[&b"a"[..], &b"bc"[..], &b""[..]]).unwrap();
        let view = PacketView::parse(&frame).unwrap();
        assert_eq!(view.len(), frame.len());
        assert_eq!(view.next_sequence_number(), 103);

        let blocks: Vec<_> = view.blocks().collect();
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0].sequence_number, 100);
        assert_eq!(blocks[1].payload, b"bc");
        assert_eq!(blocks[2].sequence_number, 102);
        assert!(blocks[2].payload.is_empty());
        assert_eq!(view.blocks().len(), 3);
    }

    #[test]
    fn test_header_truncation() {
        assert!(matches!(
            PacketView::parse(&[]),
            Err(FramingError::Truncated { offset: 0, need: 20, available: 0, .. })
        ));
        assert!(matches!(
            PacketView::parse(&[0u8; 19]),
            Err(FramingError::Truncated { available: 19, .. })
        ));
    }

    #[test]
    fn test_length_prefix_truncation() {
        let mut frame = encode_frame(b"S", 1, &[b"xy"]).unwrap();
        // Claim two blocks, supply one plus a single stray byte
        frame[19] = 2;
        frame.push(0);
        match PacketView::parse(&frame) {
            Err(FramingError::Truncated {
                offset, need, available, ..
            }) => {
                assert_eq!(offset, 24);
                assert_eq!(need, 2);
                assert_eq!(available, 1);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_block_overrun() {
        let mut frame = encode_frame(b"S", 1, &[b"xyz"]).unwrap();
        frame.truncate(frame.len() - 1);
        assert_eq!(
            PacketView::parse(&frame).unwrap_err(),
            FramingError::BlockOverrun {
                index: 0,
                offset: 20,
                declared: 3,
                remaining: 2
            }
        );
    }

    #[test]
    fn test_trailing_bytes() {
        let mut frame = encode_frame(b"S", 1, &[b"xyz"]).unwrap();
        frame.extend_from_slice(&[0xAA, 0xBB]);
        assert_eq!(
            PacketView::parse(&frame).unwrap_err(),
            FramingError::TrailingBytes {
                offset: 25,
                remaining: 2,
                message_count: 1
            }
        );
    }
}
