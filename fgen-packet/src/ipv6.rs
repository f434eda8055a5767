//! IPv6 fixed header

use crate::ip::IpProtocol;
use crate::Header;
use bytes::{Buf, BufMut};
use fgen_core::ip_protocols;
use std::net::Ipv6Addr;

/// IPv6 header (40 bytes, no extension headers)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ipv6Header {
    /// Version (4 bits), traffic class (8 bits) and flow label (20 bits)
    pub vtc_flow: u32,
    /// Length of everything after this header
    pub payload_len: u16,
    /// Next header protocol
    pub next_header: IpProtocol,
    /// Hop limit
    pub hop_limit: u8,
    /// Source address
    pub source: Ipv6Addr,
    /// Destination address
    pub destination: Ipv6Addr,
}

impl Ipv6Header {
    pub fn new(source: Ipv6Addr, destination: Ipv6Addr) -> Self {
        Ipv6Header {
            vtc_flow: 6 << 28,
            payload_len: 0,
            next_header: IpProtocol::Custom(ip_protocols::NO_NEXT_HEADER),
            hop_limit: 64,
            source,
            destination,
        }
    }

    pub fn version(&self) -> u8 {
        (self.vtc_flow >> 28) as u8
    }
}

impl Default for Ipv6Header {
    fn default() -> Self {
        Ipv6Header::new(
            Ipv6Addr::new(0x2001, 0xdb8, 0, 0, 0, 0, 0, 1),
            Ipv6Addr::new(0x2001, 0xdb8, 0, 0, 0, 0, 0, 2),
        )
    }
}

impl Header for Ipv6Header {
    const NAME: &'static str = "IPv6";
    const LEN: usize = 40;

    fn put<B: BufMut>(&self, buf: &mut B) {
        buf.put_u32(self.vtc_flow);
        buf.put_u16(self.payload_len);
        buf.put_u8(self.next_header.to_u8());
        buf.put_u8(self.hop_limit);
        buf.put_slice(&self.source.octets());
        buf.put_slice(&self.destination.octets());
    }

    fn get<B: Buf>(buf: &mut B) -> Self {
        let vtc_flow = buf.get_u32();
        let payload_len = buf.get_u16();
        let next_header = IpProtocol::from_u8(buf.get_u8());
        let hop_limit = buf.get_u8();
        let source = Ipv6Addr::from(buf.get_u128());
        let destination = Ipv6Addr::from(buf.get_u128());

        Ipv6Header {
            vtc_flow,
            payload_len,
            next_header,
            hop_limit,
            source,
            destination,
        }
    }
}
