//! 802.1Q / 802.1ad tag
//!
//! The tag protocol identifier (0x8100 or 0x88A8) is the EtherType of the
//! header in front of the tag, so the tag model itself is only the 4 bytes
//! that follow it:
//!
//! ```text
//! | PCP (3 bits) | CFI (1 bit) | VID (12 bits) | inner EtherType (16 bits) |
//! ```

use crate::ethernet::EtherType;
use crate::Header;
use bytes::{Buf, BufMut};

/// VLAN ID mask (12 bits)
const VLAN_ID_MASK: u16 = 0x0FFF;

/// Priority shift (3 bits at the top)
const PRIORITY_SHIFT: u16 = 13;

/// CFI/DEI bit
const CFI_MASK: u16 = 0x1000;

/// VLAN tag following an 802.1Q or 802.1ad TPID
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VlanHeader {
    /// VLAN identifier (12 bits)
    pub vlan_id: u16,
    /// Priority code point (3 bits)
    pub priority: u8,
    /// Canonical format / drop eligible indicator
    pub cfi: bool,
    /// EtherType of the header after the tag
    pub eth_proto: EtherType,
}

impl VlanHeader {
    /// Build a tag, masking each field to its width
    pub fn new(vlan_id: u16, priority: u8, cfi: bool) -> Self {
        VlanHeader {
            vlan_id: vlan_id & VLAN_ID_MASK,
            priority: priority & 0x07,
            cfi,
            eth_proto: EtherType::Custom(0),
        }
    }

    /// Pack the tag control information
    pub fn tci(&self) -> u16 {
        let mut tci = (self.vlan_id & VLAN_ID_MASK) | (((self.priority & 0x07) as u16) << PRIORITY_SHIFT);
        if self.cfi {
            tci |= CFI_MASK;
        }
        tci
    }

    /// Unpack tag control information
    pub fn from_tci(tci: u16, eth_proto: EtherType) -> Self {
        VlanHeader {
            vlan_id: tci & VLAN_ID_MASK,
            priority: (tci >> PRIORITY_SHIFT) as u8 & 0x07,
            cfi: tci & CFI_MASK != 0,
            eth_proto,
        }
    }
}

impl Header for VlanHeader {
    const NAME: &'static str = "Dot1q";
    const LEN: usize = 4;

    fn put<B: BufMut>(&self, buf: &mut B) {
        buf.put_u16(self.tci());
        buf.put_u16(self.eth_proto.to_u16());
    }

    fn get<B: Buf>(buf: &mut B) -> Self {
        let tci = buf.get_u16();
        let eth_proto = EtherType::from_u16(buf.get_u16());
        VlanHeader::from_tci(tci, eth_proto)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tci_packing() {
        let tag = VlanHeader::new(0x322, 7, true);
        assert_eq!(tag.tci(), (0x322 & 0xFFF) | (7 << 13) | (1 << 12));
    }

    #[test]
    fn test_fields_are_masked() {
        let tag = VlanHeader::new(0xF123, 9, false);
        assert_eq!(tag.vlan_id, 0x123);
        assert_eq!(tag.priority, 1);
    }

    #[test]
    fn test_wire_layout() {
        let mut tag = VlanHeader::new(100, 5, false);
        tag.eth_proto = EtherType::IPv4;

        let mut buf = [0u8; 4];
        tag.write_to(&mut buf).unwrap();
        // PCP=5, DEI=0, VID=100 -> 0xA064
        assert_eq!(buf, [0xA0, 0x64, 0x08, 0x00]);

        let parsed = VlanHeader::read_from(&buf).unwrap();
        assert_eq!(parsed, tag);
    }
}
