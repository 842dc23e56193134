//! Byte I/O primitives: a bounds-checked writer over a caller buffer and a
//! seekable reader over a caller slice.
//!
//! Explicitly out of scope per this crate's purpose (any implementation can
//! reproduce these directly) — kept small and unremarkable on purpose.

use crate::error::{Error, InvalidReason, Result};
use crate::format::Tag;

/// Writes into a caller-provided `&mut [u8]`, tracking how many bytes have
/// been written so far. Never grows the buffer; running out of room is
/// `Error::NoSpaceLeft`.
pub struct Writer<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> Writer<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let end = self.pos.checked_add(bytes.len()).ok_or(Error::NoSpaceLeft)?;
        if end > self.buf.len() {
            return Err(Error::NoSpaceLeft);
        }
        self.buf[self.pos..end].copy_from_slice(bytes);
        self.pos = end;
        Ok(())
    }

    pub fn write_u8(&mut self, b: u8) -> Result<()> {
        self.write_bytes(&[b])
    }

    pub fn write_tag(&mut self, tag: Tag) -> Result<()> {
        self.write_u8(tag.to_byte())
    }
}

/// A bounds-checked cursor over a borrowed byte slice, with the two seek
/// operations the decoder needs: one-byte peek/rewind (for `Option`) and
/// save/restore to an arbitrary earlier position (for sum `active_field`
/// rollback).
#[derive(Debug, Clone, Copy)]
pub struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn seek_to(&mut self, pos: usize) {
        debug_assert!(pos <= self.buf.len());
        self.pos = pos;
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn peek_u8(&self) -> Result<u8> {
        self.buf
            .get(self.pos)
            .copied()
            .ok_or(Error::Invalid(InvalidReason::UnexpectedEnd))
    }

    pub fn peek_tag(&self) -> Result<Tag> {
        let b = self.peek_u8()?;
        Tag::from_byte(b).ok_or(Error::Invalid(InvalidReason::BadTag(b)))
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        let b = self.peek_u8()?;
        self.pos += 1;
        Ok(b)
    }

    pub fn read_tag(&mut self) -> Result<Tag> {
        let tag = self.peek_tag()?;
        self.pos += 1;
        Ok(tag)
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(n)
            .ok_or(Error::Invalid(InvalidReason::UnexpectedEnd))?;
        if end > self.buf.len() {
            return Err(Error::Invalid(InvalidReason::UnexpectedEnd));
        }
        let slice = &self.buf[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let bytes = self.read_bytes(N)?;
        Ok(bytes.try_into().expect("read_bytes(N) returns N bytes"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writer_rejects_overflow() {
        let mut buf = [0u8; 2];
        let mut w = Writer::new(&mut buf);
        w.write_bytes(&[1, 2]).unwrap();
        match w.write_u8(3) {
            Err(Error::NoSpaceLeft) => {}
            other => panic!("expected NoSpaceLeft, got {other:?}"),
        }
    }

    #[test]
    fn reader_seek_roundtrip() {
        let data = [10u8, 20, 30];
        let mut r = Reader::new(&data);
        assert_eq!(r.read_u8().unwrap(), 10);
        let saved = r.position();
        assert_eq!(r.read_u8().unwrap(), 20);
        r.seek_to(saved);
        assert_eq!(r.read_u8().unwrap(), 20);
        assert_eq!(r.read_u8().unwrap(), 30);
        assert_eq!(r.remaining(), 0);
    }
}
