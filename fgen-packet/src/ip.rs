//! IPv4 header construction and parsing
//!
//! Only the fixed 20-byte header is modelled; options are not generated.

use crate::checksum::internet_checksum;
use crate::Header;
use bytes::{Buf, BufMut};
use fgen_core::{ip_protocols, Error};
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

/// IP Protocol numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IpProtocol {
    /// TCP (6)
    TCP,
    /// UDP (17)
    UDP,
    /// Any other protocol number
    Custom(u8),
}

impl IpProtocol {
    pub fn to_u8(self) -> u8 {
        match self {
            IpProtocol::TCP => ip_protocols::TCP,
            IpProtocol::UDP => ip_protocols::UDP,
            IpProtocol::Custom(val) => val,
        }
    }

    pub fn from_u8(value: u8) -> Self {
        match value {
            ip_protocols::TCP => IpProtocol::TCP,
            ip_protocols::UDP => IpProtocol::UDP,
            val => IpProtocol::Custom(val),
        }
    }
}

impl fmt::Display for IpProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IpProtocol::TCP => write!(f, "tcp"),
            IpProtocol::UDP => write!(f, "udp"),
            IpProtocol::Custom(val) => write!(f, "{}", val),
        }
    }
}

impl FromStr for IpProtocol {
    type Err = Error;

    /// Accepts `udp`, `tcp` or a protocol number
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("udp") {
            return Ok(IpProtocol::UDP);
        }
        if s.eq_ignore_ascii_case("tcp") {
            return Ok(IpProtocol::TCP);
        }

        let value = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            Some(hex) => u8::from_str_radix(hex, 16),
            None => s.parse::<u8>(),
        };
        value
            .map(IpProtocol::from_u8)
            .map_err(|_| Error::invalid_value("proto", s, "expected udp, tcp or 0-255"))
    }
}

/// IPv4 header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ipv4Header {
    /// Version (4 bits) and header length in 32-bit words (4 bits)
    pub version_ihl: u8,
    /// Type of Service / DSCP
    pub tos: u8,
    /// Total length (header + data) in bytes
    pub total_length: u16,
    /// Identification
    pub identification: u16,
    /// Flags (3 bits) and fragment offset (13 bits)
    pub fragment_offset: u16,
    /// Time to Live
    pub ttl: u8,
    /// Protocol of the next header
    pub protocol: IpProtocol,
    /// Header checksum
    pub checksum: u16,
    /// Source IP address
    pub source: Ipv4Addr,
    /// Destination IP address
    pub destination: Ipv4Addr,
}

impl Ipv4Header {
    /// Version 4, five 32-bit words
    pub const VERSION_IHL: u8 = (4 << 4) | (Self::LEN as u8 / 4);

    pub fn new(source: Ipv4Addr, destination: Ipv4Addr) -> Self {
        Ipv4Header {
            version_ihl: Self::VERSION_IHL,
            tos: 0,
            total_length: Self::LEN as u16,
            identification: 1,
            fragment_offset: 0,
            ttl: 64,
            protocol: IpProtocol::Custom(0),
            checksum: 0,
            source,
            destination,
        }
    }

    pub fn version(&self) -> u8 {
        self.version_ihl >> 4
    }

    /// Header length in bytes
    pub fn header_len(&self) -> usize {
        (self.version_ihl & 0x0F) as usize * 4
    }

    /// Calculate the header checksum with the checksum field zeroed
    pub fn compute_checksum(&self) -> u16 {
        let mut copy = *self;
        copy.checksum = 0;

        let mut bytes = [0u8; Self::LEN];
        let mut window = &mut bytes[..];
        copy.put(&mut window);

        internet_checksum(&bytes)
    }

    /// Calculate and store the header checksum
    pub fn update_checksum(&mut self) {
        self.checksum = self.compute_checksum();
    }
}

impl Default for Ipv4Header {
    fn default() -> Self {
        Ipv4Header::new(Ipv4Addr::new(192, 10, 0, 1), Ipv4Addr::new(192, 10, 0, 2))
    }
}

impl Header for Ipv4Header {
    const NAME: &'static str = "IPv4";
    const LEN: usize = 20;

    fn put<B: BufMut>(&self, buf: &mut B) {
        buf.put_u8(self.version_ihl);
        buf.put_u8(self.tos);
        buf.put_u16(self.total_length);
        buf.put_u16(self.identification);
        buf.put_u16(self.fragment_offset);
        buf.put_u8(self.ttl);
        buf.put_u8(self.protocol.to_u8());
        buf.put_u16(self.checksum);
        buf.put_slice(&self.source.octets());
        buf.put_slice(&self.destination.octets());
    }

    fn get<B: Buf>(buf: &mut B) -> Self {
        let version_ihl = buf.get_u8();
        let tos = buf.get_u8();
        let total_length = buf.get_u16();
        let identification = buf.get_u16();
        let fragment_offset = buf.get_u16();
        let ttl = buf.get_u8();
        let protocol = IpProtocol::from_u8(buf.get_u8());
        let checksum = buf.get_u16();
        let source = Ipv4Addr::from(buf.get_u32());
        let destination = Ipv4Addr::from(buf.get_u32());

        Ipv4Header {
            version_ihl,
            tos,
            total_length,
            identification,
            fragment_offset,
            ttl,
            protocol,
            checksum,
            source,
            destination,
        }
    }
}
