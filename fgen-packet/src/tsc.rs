//! Timestamp marker
//!
//! Test frames may carry a 12 byte marker: the ASCII text `tsc=` followed
//! by a 64-bit counter in network byte order. The counter is normally
//! patched in at transmit time through the frame's recorded offset.

use crate::Header;
use bytes::{Buf, BufMut};

/// Leading bytes of a timestamp marker
pub const TSC_MARKER: [u8; 4] = *b"tsc=";

/// Timestamp marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TscHeader {
    pub value: u64,
}

impl TscHeader {
    pub fn new(value: u64) -> Self {
        TscHeader { value }
    }

    /// Offset of the counter inside the marker
    pub const VALUE_OFFSET: usize = TSC_MARKER.len();

    /// Check whether `data` starts with a complete marker
    pub fn sniff(data: &[u8]) -> bool {
        data.len() >= Self::LEN && data.starts_with(&TSC_MARKER)
    }
}

impl Header for TscHeader {
    const NAME: &'static str = "TSC";
    const LEN: usize = 12;

    fn put<B: BufMut>(&self, buf: &mut B) {
        buf.put_slice(&TSC_MARKER);
        buf.put_u64(self.value);
    }

    fn get<B: Buf>(buf: &mut B) -> Self {
        buf.advance(Self::VALUE_OFFSET);
        TscHeader {
            value: buf.get_u64(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sniff() {
        let mut buf = [0u8; 16];
        TscHeader::new(0x0102_0304_0506_0708).write_to(&mut buf).unwrap();
        assert!(TscHeader::sniff(&buf));
        assert!(!TscHeader::sniff(&buf[..11]));
        assert!(!TscHeader::sniff(b"tsx=00000000"));
    }

    #[test]
    fn test_wire_layout() {
        let hdr = TscHeader::new(0x0102_0304_0506_0708);
        let mut buf = [0u8; 12];
        hdr.write_to(&mut buf).unwrap();
        assert_eq!(&buf[..4], b"tsc=");
        assert_eq!(&buf[TscHeader::VALUE_OFFSET..], &[1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(TscHeader::read_from(&buf).unwrap(), hdr);
    }
}
