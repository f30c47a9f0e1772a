//! Big-endian wire primitives shared by the message and frame layers
//!
//! Every multi-byte integer on the wire is network byte order. Layout structs
//! are built from [`BeU16`], [`BeU32`] and [`BeU64`] so they are `Unaligned`
//! and byte-exact; [`WireReader`] and [`WireWriter`] only accept `Unaligned`
//! types, which keeps native-endian integers from ever reaching a buffer.

use std::mem::size_of;
use zerocopy::byteorder::{BigEndian, U16, U32, U64};
use zerocopy::{AsBytes, FromBytes, Unaligned};

/// 2-byte big-endian unsigned integer
pub type BeU16 = U16<BigEndian>;
/// 4-byte big-endian unsigned integer
pub type BeU32 = U32<BigEndian>;
/// 8-byte big-endian unsigned integer
pub type BeU64 = U64<BigEndian>;

/// Bounds-checked forward cursor over a byte slice
///
/// Reads never panic; a short buffer yields `None` and leaves the cursor
/// where it was so callers can report the exact offset.
#[derive(Debug, Clone)]
pub struct WireReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> WireReader<'a> {
    pub const fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Current offset from the start of the buffer
    #[inline]
    pub const fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.pos == self.buf.len()
    }

    /// Unread tail of the buffer
    pub fn rest(&self) -> &'a [u8] {
        &self.buf[self.pos..]
    }

    /// Borrow the next `n` bytes and advance past them
    pub fn take(&mut self, n: usize) -> Option<&'a [u8]> {
        let end = self.pos.checked_add(n)?;
        let bytes = self.buf.get(self.pos..end)?;
        self.pos = end;
        Some(bytes)
    }

    /// Copy out a fixed-layout value and advance past it
    pub fn read<T: FromBytes + Unaligned>(&mut self) -> Option<T> {
        let end = self.pos.checked_add(size_of::<T>())?;
        let value = T::read_from(self.buf.get(self.pos..end)?)?;
        self.pos = end;
        Some(value)
    }

    pub fn read_u8(&mut self) -> Option<u8> {
        self.read::<u8>()
    }

    pub fn read_u16(&mut self) -> Option<u16> {
        self.read::<BeU16>().map(|v| v.get())
    }

    pub fn read_u32(&mut self) -> Option<u32> {
        self.read::<BeU32>().map(|v| v.get())
    }

    pub fn read_u64(&mut self) -> Option<u64> {
        self.read::<BeU64>().map(|v| v.get())
    }
}

/// Append-only writer over an owned output buffer
#[derive(Debug)]
pub struct WireWriter<'a> {
    buf: &'a mut Vec<u8>,
}

impl<'a> WireWriter<'a> {
    pub fn new(buf: &'a mut Vec<u8>) -> Self {
        Self { buf }
    }

    /// Bytes written to the underlying buffer so far (including prior content)
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Append the exact wire bytes of a fixed-layout value
    pub fn put<T: AsBytes + Unaligned>(&mut self, value: &T) -> &mut Self {
        self.buf.extend_from_slice(value.as_bytes());
        self
    }

    pub fn put_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    pub fn put_u8(&mut self, value: u8) -> &mut Self {
        self.buf.push(value);
        self
    }

    pub fn put_u16(&mut self, value: u16) -> &mut Self {
        self.put(&BeU16::new(value))
    }

    pub fn put_u32(&mut self, value: u32) -> &mut Self {
        self.put(&BeU32::new(value))
    }

    pub fn put_u64(&mut self, value: u64) -> &mut Self {
        self.put(&BeU64::new(value))
    }
}
