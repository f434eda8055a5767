//! TCP header construction and parsing (no options)

use crate::Header;
use bytes::{Buf, BufMut};

/// TCP control bits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TcpFlags(pub u8);

impl TcpFlags {
    pub const FIN: TcpFlags = TcpFlags(0x01);
    pub const SYN: TcpFlags = TcpFlags(0x02);
    pub const RST: TcpFlags = TcpFlags(0x04);
    pub const PSH: TcpFlags = TcpFlags(0x08);
    pub const ACK: TcpFlags = TcpFlags(0x10);
    pub const URG: TcpFlags = TcpFlags(0x20);

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn contains(self, other: TcpFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for TcpFlags {
    type Output = TcpFlags;

    fn bitor(self, rhs: TcpFlags) -> TcpFlags {
        TcpFlags(self.0 | rhs.0)
    }
}

/// TCP header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TcpHeader {
    pub source_port: u16,
    pub destination_port: u16,
    pub sequence: u32,
    pub acknowledgment: u32,
    /// Header length in 32-bit words
    pub data_offset: u8,
    pub flags: TcpFlags,
    pub window: u16,
    pub checksum: u16,
    pub urgent_pointer: u16,
}

impl TcpHeader {
    /// Offset of the checksum field inside the header
    pub const CHECKSUM_OFFSET: usize = 16;

    pub fn new(source_port: u16, destination_port: u16) -> Self {
        TcpHeader {
            source_port,
            destination_port,
            sequence: 0,
            acknowledgment: 0,
            data_offset: (Self::LEN / 4) as u8,
            flags: TcpFlags::SYN,
            window: 8192,
            checksum: 0,
            urgent_pointer: 0,
        }
    }
}

impl Default for TcpHeader {
    fn default() -> Self {
        TcpHeader::new(0x1234, 0x1111)
    }
}

impl Header for TcpHeader {
    const NAME: &'static str = "TCP";
    const LEN: usize = 20;

    fn put<B: BufMut>(&self, buf: &mut B) {
        buf.put_u16(self.source_port);
        buf.put_u16(self.destination_port);
        buf.put_u32(self.sequence);
        buf.put_u32(self.acknowledgment);
        buf.put_u8((self.data_offset & 0x0F) << 4);
        buf.put_u8(self.flags.bits());
        buf.put_u16(self.window);
        buf.put_u16(self.checksum);
        buf.put_u16(self.urgent_pointer);
    }

    fn get<B: Buf>(buf: &mut B) -> Self {
        let source_port = buf.get_u16();
        let destination_port = buf.get_u16();
        let sequence = buf.get_u32();
        let acknowledgment = buf.get_u32();
        let data_offset = buf.get_u8() >> 4;
        let flags = TcpFlags(buf.get_u8());
        let window = buf.get_u16();
        let checksum = buf.get_u16();
        let urgent_pointer = buf.get_u16();

        TcpHeader {
            source_port,
            destination_port,
            sequence,
            acknowledgment,
            data_offset,
            flags,
            window,
            checksum,
            urgent_pointer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags() {
        let flags = TcpFlags::SYN | TcpFlags::ACK;
        assert_eq!(flags.bits(), 0x12);
        assert!(flags.contains(TcpFlags::SYN));
        assert!(!flags.contains(TcpFlags::FIN));
    }

    #[test]
    fn test_default_header() {
        let hdr = TcpHeader::default();
        assert_eq!(hdr.source_port, 0x1234);
        assert_eq!(hdr.destination_port, 0x1111);
        assert_eq!(hdr.data_offset, 5);
        assert_eq!(hdr.flags, TcpFlags::SYN);
        assert_eq!(hdr.window, 8192);
    }

    #[test]
    fn test_wire_layout() {
        let mut hdr = TcpHeader::new(80, 443);
        hdr.sequence = 1;
        hdr.flags = TcpFlags::SYN | TcpFlags::ACK;

        let mut buf = [0u8; 20];
        hdr.write_to(&mut buf).unwrap();
        assert_eq!(&buf[0..4], &[0x00, 0x50, 0x01, 0xBB]);
        assert_eq!(&buf[4..8], &[0, 0, 0, 1]);
        assert_eq!(buf[12], 0x50);
        assert_eq!(buf[13], 0x12);
        assert_eq!(TcpHeader::read_from(&buf).unwrap(), hdr);
    }
}
