//! Frame buffer and metadata

use bytes::BytesMut;
use fgen_core::{limits, Error, Result};
use std::fmt;

/// Offset and length of a header inside a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeaderExtent {
    pub offset: usize,
    pub length: usize,
}

impl HeaderExtent {
    pub fn new(offset: usize, length: usize) -> Self {
        HeaderExtent { offset, length }
    }

    /// First byte after the header
    pub fn end(&self) -> usize {
        self.offset + self.length
    }
}

/// A named frame: its description text and the bytes encoded from it.
///
/// The backing buffer has a fixed capacity chosen at creation time; the used
/// length never exceeds it.
#[derive(Clone)]
pub struct Frame {
    name: String,
    text: String,
    data: BytesMut,
    data_len: usize,
    tsc_offset: Option<usize>,
    pub(crate) l2: Option<HeaderExtent>,
    pub(crate) l3: Option<HeaderExtent>,
    pub(crate) l4: Option<HeaderExtent>,
}

impl Frame {
    /// Create an empty frame with a zeroed buffer of `capacity` bytes
    pub fn new(name: impl Into<String>, text: impl Into<String>, capacity: usize) -> Self {
        Frame {
            name: name.into(),
            text: text.into(),
            data: BytesMut::zeroed(capacity),
            data_len: 0,
            tsc_offset: None,
            l2: None,
            l3: None,
            l4: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The frame description this frame was built from
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Encoded bytes, without the CRC
    pub fn data(&self) -> &[u8] {
        &self.data[..self.data_len]
    }

    pub fn data_len(&self) -> usize {
        self.data_len
    }

    /// Length on the wire including the CRC
    pub fn wire_len(&self) -> usize {
        self.data_len + limits::ETHER_CRC_LEN
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Offset of the timestamp marker, if the frame has one
    pub fn tsc_offset(&self) -> Option<usize> {
        self.tsc_offset
    }

    /// Outer Ethernet header plus any VLAN tags directly behind it
    pub fn l2(&self) -> Option<HeaderExtent> {
        self.l2
    }

    /// First IP header
    pub fn l3(&self) -> Option<HeaderExtent> {
        self.l3
    }

    /// First UDP or TCP header
    pub fn l4(&self) -> Option<HeaderExtent> {
        self.l4
    }

    /// Replace the frame contents with captured bytes.
    ///
    /// The description text is kept; header extents are cleared since they
    /// no longer describe the data.
    pub fn load_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        if bytes.len() > self.capacity() {
            return Err(Error::BufferOverflow {
                need: bytes.len(),
                capacity: self.capacity(),
            });
        }
        self.reset();
        self.data[..bytes.len()].copy_from_slice(bytes);
        self.data_len = bytes.len();
        Ok(())
    }

    /// Zero the buffer and forget everything learned by the last encode
    pub(crate) fn reset(&mut self) {
        self.data.fill(0);
        self.data_len = 0;
        self.tsc_offset = None;
        self.l2 = None;
        self.l3 = None;
        self.l4 = None;
    }

    pub(crate) fn set_data_len(&mut self, len: usize) -> Result<()> {
        if len > self.capacity() {
            return Err(Error::BufferOverflow {
                need: len,
                capacity: self.capacity(),
            });
        }
        self.data_len = len;
        Ok(())
    }

    pub(crate) fn set_tsc_offset(&mut self, offset: usize) {
        self.tsc_offset = Some(offset);
    }

    /// Bounds-checked view of `len` bytes at `offset`
    pub fn window(&self, offset: usize, len: usize) -> Result<&[u8]> {
        let end = self.checked_end(offset, len)?;
        Ok(&self.data[offset..end])
    }

    /// Bounds-checked mutable view of `len` bytes at `offset`
    pub(crate) fn window_mut(&mut self, offset: usize, len: usize) -> Result<&mut [u8]> {
        let end = self.checked_end(offset, len)?;
        Ok(&mut self.data[offset..end])
    }

    /// Fill `len` bytes at `offset` with `byte`
    pub(crate) fn fill(&mut self, offset: usize, len: usize, byte: u8) -> Result<()> {
        self.window_mut(offset, len)?.fill(byte);
        Ok(())
    }

    fn checked_end(&self, offset: usize, len: usize) -> Result<usize> {
        match offset.checked_add(len) {
            Some(end) if end <= self.capacity() => Ok(end),
            _ => Err(Error::BufferOverflow {
                need: offset.saturating_add(len),
                capacity: self.capacity(),
            }),
        }
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("name", &self.name)
            .field("text", &self.text)
            .field("data_len", &self.data_len)
            .field("capacity", &self.capacity())
            .field("tsc_offset", &self.tsc_offset)
            .field("l2", &self.l2)
            .field("l3", &self.l3)
            .field("l4", &self.l4)
            .finish()
    }
}
