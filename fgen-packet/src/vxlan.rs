//! VXLAN header
//!
//! ```text
//! | flags (8) | reserved (16) | next protocol (8) | VNI (24) | reserved (8) |
//! ```

use crate::Header;
use bytes::{Buf, BufMut};

/// VNI is valid
pub const VXLAN_FLAG_I: u8 = 0x08;

/// Next protocol value for an inner Ethernet frame
pub const VXLAN_NEXT_ETHERNET: u8 = 3;

/// VXLAN header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VxlanHeader {
    pub flags: u8,
    pub next_protocol: u8,
    /// VXLAN network identifier (24 bits)
    pub vni: u32,
}

impl VxlanHeader {
    pub fn new(vni: u32) -> Self {
        VxlanHeader {
            flags: VXLAN_FLAG_I,
            next_protocol: 0,
            vni: vni & 0x00FF_FFFF,
        }
    }
}

impl Default for VxlanHeader {
    fn default() -> Self {
        VxlanHeader::new(1000)
    }
}

impl Header for VxlanHeader {
    const NAME: &'static str = "Vxlan";
    const LEN: usize = 8;

    fn put<B: BufMut>(&self, buf: &mut B) {
        buf.put_u8(self.flags);
        buf.put_u16(0);
        buf.put_u8(self.next_protocol);
        buf.put_u32((self.vni & 0x00FF_FFFF) << 8);
    }

    fn get<B: Buf>(buf: &mut B) -> Self {
        let flags = buf.get_u8();
        buf.advance(2);
        let next_protocol = buf.get_u8();
        let vni = buf.get_u32() >> 8;

        VxlanHeader {
            flags,
            next_protocol,
            vni,
        }
    }
}
