//! Frame decoder
//!
//! Renders frame bytes as frame text. Every reader checks that its header
//! fits in the remaining input before reading it, then picks the next reader
//! from a type field of the header it just read. Anything not understood
//! ends up in a trailing `Raw('...')` layer followed by `Payload(len=N)`.

use fgen_core::{limits, Error, LayerType, Result};
use fgen_packet::vxlan::{VXLAN_FLAG_I, VXLAN_NEXT_ETHERNET};
use fgen_packet::{
    EtherType, EthernetHeader, Header, IpProtocol, Ipv4Header, Ipv6Header, TcpHeader, TscHeader,
    UdpHeader, VlanHeader, VxlanHeader,
};

/// Initial text capacity
const DECODE_START_LEN: usize = 4 * DECODE_SLACK;

/// Room kept free behind the text when it grows
const DECODE_SLACK: usize = 64;

/// Hard limit on the text length
pub const MAX_DECODE_TEXT: usize = 8192;

/// Reusable decode state: the text produced by the last decode call
#[derive(Debug, Default)]
pub struct DecodeContext {
    text: String,
    valid: bool,
}

impl DecodeContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `data`, starting with a header of type `start`.
    ///
    /// The text of any previous call is discarded first.
    pub fn decode(&mut self, data: &[u8], start: LayerType) -> Result<&str> {
        self.clear();
        if data.is_empty() {
            return Err(Error::Truncated {
                layer: start.name(),
                need: 1,
                have: 0,
            });
        }

        let mut decoder = Decoder {
            data,
            offset: 0,
            text: &mut self.text,
        };
        let result = match start {
            LayerType::Ether => decoder.ether(),
            LayerType::Dot1q | LayerType::Dot1ad => decoder.vlan(start),
            LayerType::Ipv4 => decoder.ipv4(),
            LayerType::Ipv6 => decoder.ipv6(),
            LayerType::Udp => decoder.udp(),
            LayerType::Tcp => decoder.tcp(),
            LayerType::Vxlan => decoder.vxlan(),
            LayerType::Tsc => decoder.tsc(),
            LayerType::Echo | LayerType::Raw | LayerType::Payload => decoder.payload(),
        };

        match result {
            Ok(()) => {
                self.valid = true;
                Ok(self.text.as_str())
            }
            Err(e) => {
                self.clear();
                Err(e)
            }
        }
    }

    /// Text of the last successful decode
    pub fn text(&self) -> Option<&str> {
        self.valid.then_some(self.text.as_str())
    }

    /// Release the text buffer
    pub fn clear(&mut self) {
        self.text = String::new();
        self.valid = false;
    }
}

struct Decoder<'d, 't> {
    data: &'d [u8],
    offset: usize,
    text: &'t mut String,
}

impl<'d, 't> Decoder<'d, 't> {
    fn remaining(&self) -> &'d [u8] {
        self.data.get(self.offset..).unwrap_or_default()
    }

    /// Read a header at the cursor and step over it
    fn read<H: Header>(&mut self) -> Result<H> {
        let hdr = H::read_from(self.remaining())?;
        self.offset += H::LEN;
        Ok(hdr)
    }

    fn skip(&mut self, layer: &'static str, len: usize) -> Result<()> {
        let have = self.remaining().len();
        if len > have {
            return Err(Error::Truncated {
                layer,
                need: len,
                have,
            });
        }
        self.offset += len;
        Ok(())
    }

    /// Append a fragment, growing the text within its limit
    fn append(&mut self, fragment: &str) -> Result<()> {
        let need = self.text.len() + fragment.len() + DECODE_SLACK;
        if need >= self.text.capacity() {
            if need >= MAX_DECODE_TEXT {
                return Err(Error::TextTooLong {
                    len: need,
                    max: MAX_DECODE_TEXT,
                });
            }
            let target = need.max(DECODE_START_LEN);
            self.text.reserve_exact(target - self.text.len());
        }
        self.text.push_str(fragment);
        Ok(())
    }

    fn ether(&mut self) -> Result<()> {
        let hdr: EthernetHeader = self.read()?;
        self.append(&format!("Ether(dst={},src={})/", hdr.destination, hdr.source))?;

        match hdr.ethertype {
            EtherType::VLAN => self.vlan(LayerType::Dot1q),
            EtherType::QinQ => self.vlan(LayerType::Dot1ad),
            EtherType::IPv4 => self.ipv4(),
            EtherType::IPv6 => self.ipv6(),
            EtherType::Custom(_) => self.payload(),
        }
    }

    fn vlan(&mut self, typ: LayerType) -> Result<()> {
        let tag: VlanHeader = self.read()?;
        self.append(&format!(
            "{}(vlan={},prio={},cfi={})/",
            typ,
            tag.vlan_id,
            tag.priority,
            u8::from(tag.cfi)
        ))?;

        match tag.eth_proto {
            EtherType::VLAN => self.vlan(LayerType::Dot1q),
            EtherType::QinQ => self.vlan(LayerType::Dot1ad),
            EtherType::IPv4 => self.ipv4(),
            EtherType::IPv6 => self.ipv6(),
            EtherType::Custom(_) => self.payload(),
        }
    }

    fn ipv4(&mut self) -> Result<()> {
        let ip: Ipv4Header = self.read()?;
        self.skip("IPv4", ip.header_len().saturating_sub(Ipv4Header::LEN))?;

        self.append(&format!(
            "IPv4(ver={},ihl={},tos={:#04x},len={},id={},fragoff={:#06x},ttl={},cksum={:#06x},dst={},src={},proto={})/",
            ip.version(),
            ip.header_len() / 4,
            ip.tos,
            ip.total_length,
            ip.identification,
            ip.fragment_offset,
            ip.ttl,
            ip.checksum,
            ip.destination,
            ip.source,
            ip.protocol
        ))?;

        self.transport(ip.protocol)
    }

    fn ipv6(&mut self) -> Result<()> {
        let ip: Ipv6Header = self.read()?;
        self.append(&format!(
            "IPv6(vtc={:#010x},len={},hops={},dst={},src={},proto={})/",
            ip.vtc_flow, ip.payload_len, ip.hop_limit, ip.destination, ip.source, ip.next_header
        ))?;

        self.transport(ip.next_header)
    }

    fn transport(&mut self, protocol: IpProtocol) -> Result<()> {
        match protocol {
            IpProtocol::UDP => self.udp(),
            IpProtocol::TCP => self.tcp(),
            IpProtocol::Custom(_) => self.tsc(),
        }
    }

    fn udp(&mut self) -> Result<()> {
        let udp: UdpHeader = self.read()?;
        self.append(&format!(
            "UDP(dport={},sport={},len={},cksum={:#06x})/",
            udp.destination_port, udp.source_port, udp.length, udp.checksum
        ))?;

        let rest = self.remaining();
        let vxlan = udp.destination_port == limits::VXLAN_PORT
            && rest.len() >= VxlanHeader::LEN
            && rest[0] & VXLAN_FLAG_I != 0;
        if vxlan {
            self.vxlan()
        } else {
            self.tsc()
        }
    }

    fn tcp(&mut self) -> Result<()> {
        let tcp: TcpHeader = self.read()?;
        let options = (tcp.data_offset as usize * 4).saturating_sub(TcpHeader::LEN);
        self.skip("TCP", options)?;

        self.append(&format!(
            "TCP(sport={},dport={},seq={},ack={},data_off={},flags={:#04x},win={},cksum={:#06x},urp={})/",
            tcp.source_port,
            tcp.destination_port,
            tcp.sequence,
            tcp.acknowledgment,
            tcp.data_offset,
            tcp.flags.bits(),
            tcp.window,
            tcp.checksum,
            tcp.urgent_pointer
        ))?;

        self.tsc()
    }

    fn vxlan(&mut self) -> Result<()> {
        let vxlan: VxlanHeader = self.read()?;
        self.append(&format!("Vxlan(flags={:#04x},vni={})/", vxlan.flags, vxlan.vni))?;

        if vxlan.next_protocol == VXLAN_NEXT_ETHERNET {
            self.ether()
        } else {
            self.payload()
        }
    }

    /// Optional timestamp marker, only consumed when present
    fn tsc(&mut self) -> Result<()> {
        if TscHeader::sniff(self.remaining()) {
            let tsc: TscHeader = self.read()?;
            self.append(&format!("TSC(val={:#018x})/", tsc.value))?;
        }
        self.payload()
    }

    fn payload(&mut self) -> Result<()> {
        self.raw()?;
        self.append(&format!("Payload(len={})", self.data.len() + limits::ETHER_CRC_LEN))
    }

    /// Unconsumed bytes as an escaped string
    fn raw(&mut self) -> Result<()> {
        let rest = self.remaining();
        if rest.is_empty() {
            return Ok(());
        }

        let mut escaped = String::with_capacity(rest.len() + 8);
        escaped.push_str("Raw('");
        for &byte in rest {
            if (byte.is_ascii_graphic() && !matches!(byte, b'/' | b'\\' | b'\'' | b':'))
                || byte == b' '
            {
                escaped.push(byte as char);
            } else {
                escaped.push_str(&format!("\\x{:02x}", byte));
            }
        }
        escaped.push_str("')/");

        self.offset = self.data.len();
        self.append(&escaped)
    }
}
