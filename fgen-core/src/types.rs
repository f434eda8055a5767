//! Common types used throughout fgen

use std::fmt;
use std::str::FromStr;

/// Protocol layer identifier
///
/// The declaration order matches the order layers are listed in the
/// frame description language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerType {
    Ether,
    Dot1q,
    Dot1ad,
    Ipv4,
    Ipv6,
    Udp,
    Tcp,
    Vxlan,
    Echo,
    Tsc,
    Raw,
    Payload,
}

impl LayerType {
    /// All layer types
    pub const ALL: [LayerType; 12] = [
        LayerType::Ether,
        LayerType::Dot1q,
        LayerType::Dot1ad,
        LayerType::Ipv4,
        LayerType::Ipv6,
        LayerType::Udp,
        LayerType::Tcp,
        LayerType::Vxlan,
        LayerType::Echo,
        LayerType::Tsc,
        LayerType::Raw,
        LayerType::Payload,
    ];

    /// Name of the layer as written in frame text
    pub const fn name(self) -> &'static str {
        match self {
            LayerType::Ether => "Ether",
            LayerType::Dot1q => "Dot1q",
            LayerType::Dot1ad => "Dot1ad",
            LayerType::Ipv4 => "IPv4",
            LayerType::Ipv6 => "IPv6",
            LayerType::Udp => "UDP",
            LayerType::Tcp => "TCP",
            LayerType::Vxlan => "Vxlan",
            LayerType::Echo => "Echo",
            LayerType::Tsc => "TSC",
            LayerType::Raw => "Raw",
            LayerType::Payload => "Payload",
        }
    }
}

impl fmt::Display for LayerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LayerType {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LayerType::ALL
            .iter()
            .copied()
            .find(|t| t.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| crate::Error::UnknownLayer(s.to_string()))
    }
}

/// Ethertype constants
pub mod ethertypes {
    pub const IPV4: u16 = 0x0800;
    pub const DOT1Q: u16 = 0x8100;
    pub const IPV6: u16 = 0x86DD;
    pub const QINQ: u16 = 0x88A8;
    /// Written when the layer after Ethernet has no registered ethertype
    pub const PLACEHOLDER: u16 = 0x9000;
}

/// IP protocol numbers
pub mod ip_protocols {
    pub const TCP: u8 = 6;
    pub const UDP: u8 = 17;
    pub const NO_NEXT_HEADER: u8 = 59;
}

/// Size limits shared by the encoder, decoder and frame store
pub mod limits {
    /// Maximum layers in one frame text, including the implicit done layer
    pub const MAX_LAYERS: usize = 32;
    /// Maximum parameters in one layer
    pub const MAX_PARAMS: usize = 16;
    /// Maximum length of a frame text string
    pub const MAX_TEXT_LENGTH: usize = 4096;
    /// Maximum length of a frame name
    pub const FRAME_NAME_LENGTH: usize = 32;
    /// Ethernet CRC length
    pub const ETHER_CRC_LEN: usize = 4;
    /// Minimum Ethernet frame including CRC
    pub const ETHER_MIN_LEN: usize = 64;
    /// Maximum Ethernet frame including CRC
    pub const ETHER_MAX_LEN: usize = 1518;
    /// Minimum frame data length (no CRC)
    pub const ETHER_ZLEN: usize = ETHER_MIN_LEN - ETHER_CRC_LEN;
    /// Maximum frame data length (no CRC)
    pub const ETHER_FRAME_LEN: usize = ETHER_MAX_LEN - ETHER_CRC_LEN;
    /// Default per-frame buffer capacity
    pub const FRAME_BUF_SIZE: usize = 10 * 1024;
    /// Default payload fill byte
    pub const FILLER_PATTERN: u8 = b'%';
    /// UDP port used by VXLAN
    pub const VXLAN_PORT: u16 = 4789;
    /// UDP port used by the echo service
    pub const ECHO_PORT: u16 = 7;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_names_round_trip() {
        for typ in LayerType::ALL {
            assert_eq!(typ.name().parse::<LayerType>().unwrap(), typ);
        }
    }

    #[test]
    fn test_layer_parse_is_case_insensitive() {
        assert_eq!("ipv4".parse::<LayerType>().unwrap(), LayerType::Ipv4);
        assert_eq!("DOT1AD".parse::<LayerType>().unwrap(), LayerType::Dot1ad);
        assert!("Foo".parse::<LayerType>().is_err());
    }

    #[test]
    fn test_frame_limits() {
        assert_eq!(limits::ETHER_ZLEN, 60);
        assert_eq!(limits::ETHER_FRAME_LEN, 1514);
    }
}
