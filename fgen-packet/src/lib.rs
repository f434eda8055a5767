//! Protocol header models for the fgen frame generator
//!
//! Every header the frame description language knows about has a fixed-size
//! model here that writes itself into, and reads itself out of, a window of a
//! frame buffer in network byte order:
//!
//! - [`ethernet`] - Ethernet II header, MAC addresses and EtherTypes
//! - [`vlan`] - 802.1Q / 802.1ad tag (TCI + inner EtherType)
//! - [`ip`] - IPv4 header
//! - [`ipv6`] - IPv6 header
//! - [`udp`] - UDP header
//! - [`tcp`] - TCP header (no options)
//! - [`vxlan`] - VXLAN header
//! - [`tsc`] - timestamp marker written into test frames
//! - [`checksum`] - Internet checksum and transport pseudo-header sums
//!
//! # Example
//!
//! ```rust
//! use fgen_packet::{EtherType, EthernetHeader, Header, MacAddress};
//!
//! let hdr = EthernetHeader::new(MacAddress::BROADCAST, MacAddress::ZERO, EtherType::IPv4);
//! let mut buf = [0u8; 64];
//! hdr.write_to(&mut buf).unwrap();
//! assert_eq!(EthernetHeader::read_from(&buf).unwrap(), hdr);
//! ```

pub mod checksum;
pub mod ethernet;
pub mod ip;
pub mod ipv6;
pub mod tcp;
pub mod tsc;
pub mod udp;
pub mod vlan;
pub mod vxlan;

use bytes::{Buf, BufMut};
use fgen_core::{Error, Result};

// Re-export commonly used types for convenience
pub use checksum::{internet_checksum, transport_checksum, transport_checksum_v6};
pub use ethernet::{EtherType, EthernetHeader, MacAddress};
pub use ip::{IpProtocol, Ipv4Header};
pub use ipv6::Ipv6Header;
pub use tcp::{TcpFlags, TcpHeader};
pub use tsc::TscHeader;
pub use udp::UdpHeader;
pub use vlan::VlanHeader;
pub use vxlan::VxlanHeader;

/// A fixed-layout protocol header.
///
/// Implementors only describe the field order; the provided methods take
/// care of bounds checking against the window they are given.
pub trait Header: Sized {
    /// Layer name used in error messages
    const NAME: &'static str;

    /// Size of the header on the wire
    const LEN: usize;

    /// Write the fields in network byte order
    fn put<B: BufMut>(&self, buf: &mut B);

    /// Read the fields in network byte order
    fn get<B: Buf>(buf: &mut B) -> Self;

    /// Write the header at the start of `dst`.
    fn write_to(&self, dst: &mut [u8]) -> Result<()> {
        if dst.len() < Self::LEN {
            return Err(Error::BufferOverflow {
                need: Self::LEN,
                capacity: dst.len(),
            });
        }
        let mut window = &mut dst[..Self::LEN];
        self.put(&mut window);
        Ok(())
    }

    /// Read the header from the start of `src`.
    fn read_from(src: &[u8]) -> Result<Self> {
        if src.len() < Self::LEN {
            return Err(Error::Truncated {
                layer: Self::NAME,
                need: Self::LEN,
                have: src.len(),
            });
        }
        let mut window = &src[..Self::LEN];
        Ok(Self::get(&mut window))
    }
}
