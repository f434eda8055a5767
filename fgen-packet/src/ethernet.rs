//! Ethernet header construction and parsing
//!
//! Ethernet II headers only; the frame payload lives in the frame buffer and
//! is never copied into the header model.

use crate::Header;
use bytes::{Buf, BufMut};
use fgen_core::{ethertypes, Error};
use std::fmt;
use std::str::FromStr;

/// EtherType values the frame generator chains on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EtherType {
    /// IPv4 (0x0800)
    IPv4,
    /// 802.1Q VLAN tag (0x8100)
    VLAN,
    /// 802.1ad service tag (0x88A8)
    QinQ,
    /// IPv6 (0x86DD)
    IPv6,
    /// Any other value
    Custom(u16),
}

impl EtherType {
    /// Convert EtherType to u16 value
    pub fn to_u16(self) -> u16 {
        match self {
            EtherType::IPv4 => ethertypes::IPV4,
            EtherType::VLAN => ethertypes::DOT1Q,
            EtherType::QinQ => ethertypes::QINQ,
            EtherType::IPv6 => ethertypes::IPV6,
            EtherType::Custom(val) => val,
        }
    }

    /// Create EtherType from u16 value
    pub fn from_u16(value: u16) -> Self {
        match value {
            ethertypes::IPV4 => EtherType::IPv4,
            ethertypes::DOT1Q => EtherType::VLAN,
            ethertypes::QINQ => EtherType::QinQ,
            ethertypes::IPV6 => EtherType::IPv6,
            val => EtherType::Custom(val),
        }
    }
}

impl fmt::Display for EtherType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:04X}", self.to_u16())
    }
}

/// MAC address (6 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacAddress(pub [u8; 6]);

impl MacAddress {
    /// Broadcast MAC address (FF:FF:FF:FF:FF:FF)
    pub const BROADCAST: MacAddress = MacAddress([0xFF; 6]);

    /// Zero MAC address (00:00:00:00:00:00)
    pub const ZERO: MacAddress = MacAddress([0x00; 6]);

    /// Create a new MAC address from a byte array
    pub fn new(bytes: [u8; 6]) -> Self {
        MacAddress(bytes)
    }

    /// Get the MAC address as a byte array
    pub fn as_bytes(&self) -> &[u8; 6] {
        &self.0
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
            self.0[0], self.0[1], self.0[2], self.0[3], self.0[4], self.0[5]
        )
    }
}

impl From<[u8; 6]> for MacAddress {
    fn from(bytes: [u8; 6]) -> Self {
        MacAddress(bytes)
    }
}

impl FromStr for MacAddress {
    type Err = Error;

    /// Accepts six colon or hyphen separated octets (`00:11:22:33:44:55`)
    /// or three colon separated 16-bit groups (`0011:2233:4455`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = |reason: &str| Error::invalid_value("mac", s, reason);
        let parts: Vec<&str> = s.trim().split(|c: char| c == ':' || c == '-').collect();
        let mut bytes = [0u8; 6];

        match parts.len() {
            6 => {
                for (byte, part) in bytes.iter_mut().zip(&parts) {
                    if part.is_empty() || part.len() > 2 {
                        return Err(bad("octet must be 1 or 2 hex digits"));
                    }
                    *byte = u8::from_str_radix(part, 16).map_err(|_| bad("invalid hex octet"))?;
                }
            }
            3 => {
                for (pair, part) in bytes.chunks_exact_mut(2).zip(&parts) {
                    if part.is_empty() || part.len() > 4 {
                        return Err(bad("group must be 1 to 4 hex digits"));
                    }
                    let word =
                        u16::from_str_radix(part, 16).map_err(|_| bad("invalid hex group"))?;
                    pair.copy_from_slice(&word.to_be_bytes());
                }
            }
            _ => return Err(bad("expected 6 octets or 3 groups")),
        }

        Ok(MacAddress(bytes))
    }
}

/// Ethernet II header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EthernetHeader {
    /// Destination MAC address
    pub destination: MacAddress,
    /// Source MAC address
    pub source: MacAddress,
    /// EtherType of the next header
    pub ethertype: EtherType,
}

impl EthernetHeader {
    pub fn new(destination: MacAddress, source: MacAddress, ethertype: EtherType) -> Self {
        EthernetHeader {
            destination,
            source,
            ethertype,
        }
    }
}

impl Default for EthernetHeader {
    fn default() -> Self {
        EthernetHeader::new(
            MacAddress::BROADCAST,
            MacAddress::ZERO,
            EtherType::Custom(ethertypes::PLACEHOLDER),
        )
    }
}

impl Header for EthernetHeader {
    const NAME: &'static str = "Ether";
    const LEN: usize = 14;

    fn put<B: BufMut>(&self, buf: &mut B) {
        buf.put_slice(self.destination.as_bytes());
        buf.put_slice(self.source.as_bytes());
        buf.put_u16(self.ethertype.to_u16());
    }

    fn get<B: Buf>(buf: &mut B) -> Self {
        let mut destination = [0u8; 6];
        let mut source = [0u8; 6];
        buf.copy_to_slice(&mut destination);
        buf.copy_to_slice(&mut source);
        let ethertype = EtherType::from_u16(buf.get_u16());

        EthernetHeader {
            destination: MacAddress(destination),
            source: MacAddress(source),
            ethertype,
        }
    }
}
