//! UDP header construction and parsing
//!
//! The checksum is computed by the IP layer once the whole datagram is in
//! the frame buffer, see [`crate::checksum::transport_checksum`].

use crate::Header;
use bytes::{Buf, BufMut};

/// UDP header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UdpHeader {
    /// Source port
    pub source_port: u16,
    /// Destination port
    pub destination_port: u16,
    /// Length (header + data)
    pub length: u16,
    /// Checksum
    pub checksum: u16,
}

impl UdpHeader {
    /// Offset of the checksum field inside the header
    pub const CHECKSUM_OFFSET: usize = 6;

    pub fn new(source_port: u16, destination_port: u16) -> Self {
        UdpHeader {
            source_port,
            destination_port,
            length: Self::LEN as u16,
            checksum: 0,
        }
    }

    /// A computed checksum of zero goes on the wire as 0xFFFF, zero means none
    pub fn wire_checksum(computed: u16) -> u16 {
        if computed == 0 {
            0xFFFF
        } else {
            computed
        }
    }
}

impl Default for UdpHeader {
    fn default() -> Self {
        UdpHeader::new(1234, 5678)
    }
}

impl Header for UdpHeader {
    const NAME: &'static str = "UDP";
    const LEN: usize = 8;

    fn put<B: BufMut>(&self, buf: &mut B) {
        buf.put_u16(self.source_port);
        buf.put_u16(self.destination_port);
        buf.put_u16(self.length);
        buf.put_u16(self.checksum);
    }

    fn get<B: Buf>(buf: &mut B) -> Self {
        UdpHeader {
            source_port: buf.get_u16(),
            destination_port: buf.get_u16(),
            length: buf.get_u16(),
            checksum: buf.get_u16(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ports() {
        let hdr = UdpHeader::default();
        assert_eq!(hdr.source_port, 1234);
        assert_eq!(hdr.destination_port, 5678);
        assert_eq!(hdr.length, 8);
    }

    #[test]
    fn test_wire_layout() {
        let mut hdr = UdpHeader::new(53, 12345);
        hdr.length = 20;
        hdr.checksum = 0xBEEF;

        let mut buf = [0u8; 8];
        hdr.write_to(&mut buf).unwrap();
        assert_eq!(buf, [0x00, 0x35, 0x30, 0x39, 0x00, 0x14, 0xBE, 0xEF]);
        assert_eq!(UdpHeader::read_from(&buf).unwrap(), hdr);
    }

    #[test]
    fn test_zero_checksum_substitution() {
        assert_eq!(UdpHeader::wire_checksum(0), 0xFFFF);
        assert_eq!(UdpHeader::wire_checksum(0x1234), 0x1234);
    }
}
