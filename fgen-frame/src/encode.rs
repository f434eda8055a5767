//! Frame text encoder
//!
//! Each layer handler places its header at the frame's current length,
//! applies defaults and its `key=value` parameters, grows the frame and then
//! calls the handler of the next layer. Fields that depend on what follows
//! (EtherType, IP protocol, lengths, checksums) are written once that call
//! returns the type of the next layer. A final implicit layer clamps the
//! frame to the Ethernet size limits.

use crate::frame::{Frame, HeaderExtent};
use crate::hexstr::hex_dump;
use crate::table::match_layer;
use crate::tokenizer::{parse_number, split_kv, split_layers, split_params, strip_parens};
use fgen_core::{ethertypes, ip_protocols, limits, Error, FgenConfig, LayerType, Result};
use fgen_packet::vxlan::VXLAN_NEXT_ETHERNET;
use fgen_packet::{
    transport_checksum, transport_checksum_v6, EtherType, EthernetHeader, Header, IpProtocol,
    Ipv4Header, Ipv6Header, MacAddress, TcpFlags, TcpHeader, TscHeader, UdpHeader, VlanHeader,
    VxlanHeader,
};
use std::net::{Ipv4Addr, Ipv6Addr};
use tracing::{debug, info, trace, warn};

/// What a layer handler reports to the layer in front of it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Next {
    /// The handler encoded a layer of this type
    Layer(LayerType),
    /// End of the frame
    Done,
}

impl Next {
    fn name(self) -> &'static str {
        match self {
            Next::Layer(typ) => typ.name(),
            Next::Done => "Done",
        }
    }
}

/// Per-layer bookkeeping for one encode call
#[derive(Debug, Clone)]
struct LayerOpt<'t> {
    kind: Next,
    offset: usize,
    length: usize,
    params: &'t str,
}

/// Encode `frame.text()` into the frame's buffer.
///
/// The frame is reset first. On error the buffer contents are undefined and
/// the frame must not be used.
pub fn encode_frame(frame: &mut Frame, config: &FgenConfig) -> Result<()> {
    let text = frame.text().to_string();
    frame.reset();

    let mut encoder = Encoder::new(&text, config.verbose)?;
    encoder.next_layer(frame, 0)?;

    debug!(frame = frame.name(), len = frame.data_len(), "Frame encoded");
    if config.dump_data {
        info!("{} ({} bytes)\n{}", frame.name(), frame.data_len(), hex_dump(frame.data()));
    }
    Ok(())
}

struct Encoder<'t> {
    verbose: bool,
    layers: Vec<LayerOpt<'t>>,
}

impl<'t> Encoder<'t> {
    fn new(text: &'t str, verbose: bool) -> Result<Self> {
        // the last slot is reserved for the done layer
        let tokens = split_layers(text, limits::MAX_LAYERS - 1)?;
        if tokens.is_empty() {
            return Err(Error::parse("frame text has no layers"));
        }

        let mut layers = Vec::with_capacity(tokens.len() + 1);
        for (idx, token) in tokens.into_iter().enumerate() {
            let (typ, params) =
                match_layer(token).ok_or_else(|| Error::UnknownLayer(token.to_string()))?;
            if verbose {
                info!(layer = idx, "Add layer '{}'", token);
            } else {
                trace!(layer = idx, "Add layer '{}'", token);
            }
            layers.push(LayerOpt {
                kind: Next::Layer(typ),
                offset: 0,
                length: 0,
                params,
            });
        }
        layers.push(LayerOpt {
            kind: Next::Done,
            offset: 0,
            length: 0,
            params: "",
        });

        Ok(Encoder { verbose, layers })
    }

    /// Run the handler for layer `idx`
    fn next_layer(&mut self, frame: &mut Frame, idx: usize) -> Result<Next> {
        let kind = match self.layers.get_mut(idx) {
            Some(opt) => {
                opt.offset = frame.data_len();
                opt.kind
            }
            None => return Err(Error::TooManyLayers(limits::MAX_LAYERS)),
        };
        self.log_params(idx);

        let ret = match kind {
            Next::Layer(LayerType::Ether) => self.encode_ether(frame, idx),
            Next::Layer(typ @ (LayerType::Dot1q | LayerType::Dot1ad)) => {
                self.encode_vlan(frame, idx, typ)
            }
            Next::Layer(LayerType::Ipv4) => self.encode_ipv4(frame, idx),
            Next::Layer(LayerType::Ipv6) => self.encode_ipv6(frame, idx),
            Next::Layer(LayerType::Udp) => self.encode_udp(frame, idx),
            Next::Layer(LayerType::Tcp) => self.encode_tcp(frame, idx),
            Next::Layer(LayerType::Vxlan) => self.encode_vxlan(frame, idx),
            Next::Layer(LayerType::Echo) => self.encode_echo(frame, idx),
            Next::Layer(LayerType::Tsc) => self.encode_tsc(frame, idx),
            Next::Layer(LayerType::Raw) => self.encode_raw(frame, idx),
            Next::Layer(LayerType::Payload) => self.encode_payload(frame, idx),
            Next::Done => self.encode_done(frame),
        }?;

        self.log_return(idx, frame);
        Ok(ret)
    }

    fn log_params(&self, idx: usize) {
        let opt = &self.layers[idx];
        if self.verbose {
            info!(layer = idx, offset = opt.offset, "{} params '{}'", opt.kind.name(), opt.params);
        } else {
            trace!(layer = idx, offset = opt.offset, "{} params '{}'", opt.kind.name(), opt.params);
        }
    }

    fn log_return(&self, idx: usize, frame: &Frame) {
        let opt = &self.layers[idx];
        if self.verbose {
            info!(layer = idx, length = opt.length, pktlen = frame.data_len(), "Return '{}'", opt.kind.name());
        } else {
            trace!(layer = idx, length = opt.length, pktlen = frame.data_len(), "Return '{}'", opt.kind.name());
        }
    }

    /// Parsed `key=value` parameters of layer `idx`
    fn params(&self, idx: usize) -> Result<Vec<(&'t str, &'t str)>> {
        let text = self.layers[idx].params;
        split_params(text, limits::MAX_PARAMS)?
            .into_iter()
            .map(split_kv)
            .collect()
    }

    /// Grow the frame by a layer's header
    fn advance(&mut self, frame: &mut Frame, idx: usize, len: usize) -> Result<()> {
        frame.set_data_len(frame.data_len() + len)?;
        self.layers[idx].length = len;
        Ok(())
    }

    fn encode_ether(&mut self, frame: &mut Frame, idx: usize) -> Result<Next> {
        let offset = self.layers[idx].offset;
        let mut hdr = EthernetHeader::default();

        for (key, value) in self.params(idx)? {
            match key.to_ascii_lowercase().as_str() {
                "dst" => hdr.destination = value.parse::<MacAddress>()?,
                "src" => hdr.source = value.parse::<MacAddress>()?,
                _ => return Err(Error::invalid_key("Ether", key)),
            }
        }

        self.advance(frame, idx, EthernetHeader::LEN)?;
        if frame.l2.is_none() {
            frame.l2 = Some(HeaderExtent::new(offset, EthernetHeader::LEN));
        }

        hdr.ethertype = match self.next_layer(frame, idx + 1)? {
            Next::Layer(LayerType::Dot1q) => EtherType::VLAN,
            Next::Layer(LayerType::Dot1ad) => EtherType::QinQ,
            Next::Layer(LayerType::Ipv4) => EtherType::IPv4,
            Next::Layer(LayerType::Ipv6) => EtherType::IPv6,
            _ => EtherType::Custom(ethertypes::PLACEHOLDER),
        };
        hdr.write_to(frame.window_mut(offset, EthernetHeader::LEN)?)?;

        Ok(Next::Layer(LayerType::Ether))
    }

    fn encode_vlan(&mut self, frame: &mut Frame, idx: usize, typ: LayerType) -> Result<Next> {
        let offset = self.layers[idx].offset;
        let (mut vid, mut prio, mut cfi) = (1u16, 7u8, false);

        for (key, value) in self.params(idx)? {
            match key.to_ascii_lowercase().as_str() {
                "vlan" | "vid" => vid = parse_number::<u16>(key, value)?,
                "prio" => prio = parse_number::<u8>(key, value)?,
                "cfi" => cfi = parse_number::<u8>(key, value)? & 0x01 != 0,
                _ => return Err(Error::invalid_key(typ.name(), key)),
            }
        }

        self.advance(frame, idx, VlanHeader::LEN)?;
        if let Some(l2) = frame.l2.as_mut() {
            if l2.end() == offset {
                l2.length += VlanHeader::LEN;
            }
        }

        let mut tag = VlanHeader::new(vid, prio, cfi);
        tag.eth_proto = match self.next_layer(frame, idx + 1)? {
            Next::Layer(next @ (LayerType::Dot1q | LayerType::Dot1ad)) if next == typ => {
                return Err(Error::sequence(format!("{} cannot be followed by {}", typ, next)));
            }
            Next::Layer(LayerType::Dot1q) => EtherType::VLAN,
            Next::Layer(LayerType::Dot1ad) => EtherType::QinQ,
            Next::Layer(LayerType::Ipv4) => EtherType::IPv4,
            Next::Layer(LayerType::Ipv6) => EtherType::IPv6,
            _ => EtherType::Custom(0),
        };
        tag.write_to(frame.window_mut(offset, VlanHeader::LEN)?)?;

        Ok(Next::Layer(typ))
    }

    fn encode_ipv4(&mut self, frame: &mut Frame, idx: usize) -> Result<Next> {
        let offset = self.layers[idx].offset;
        let mut hdr = Ipv4Header::default();
        let mut proto = None;

        for (key, value) in self.params(idx)? {
            match key.to_ascii_lowercase().as_str() {
                "dst" => hdr.destination = parse_addr::<Ipv4Addr>(key, value)?,
                "src" => hdr.source = parse_addr::<Ipv4Addr>(key, value)?,
                "tos" => hdr.tos = parse_number(key, value)?,
                "ttl" => hdr.ttl = parse_number(key, value)?,
                "id" => hdr.identification = parse_number(key, value)?,
                "proto" => proto = Some(value.parse::<IpProtocol>()?),
                // derived from the frame, accepted so decoder output encodes again
                "ver" | "ihl" | "len" | "fragoff" | "cksum" => {}
                _ => return Err(Error::invalid_key("IPv4", key)),
            }
        }

        self.advance(frame, idx, Ipv4Header::LEN)?;
        if frame.l3.is_none() {
            frame.l3 = Some(HeaderExtent::new(offset, Ipv4Header::LEN));
        }

        let next = self.next_layer(frame, idx + 1)?;

        let total_length = frame.data_len().saturating_sub(offset);
        self.layers[idx].length = total_length;
        hdr.total_length = u16::try_from(total_length).unwrap_or(u16::MAX);
        hdr.protocol = match next {
            Next::Layer(LayerType::Udp) => IpProtocol::UDP,
            Next::Layer(LayerType::Tcp) => IpProtocol::TCP,
            _ => proto.unwrap_or(IpProtocol::Custom(0)),
        };

        let (src, dst, protocol) = (hdr.source, hdr.destination, hdr.protocol.to_u8());
        finish_transport(frame, offset + Ipv4Header::LEN, next, |segment| {
            transport_checksum(src, dst, protocol, segment)
        })?;

        hdr.update_checksum();
        hdr.write_to(frame.window_mut(offset, Ipv4Header::LEN)?)?;

        Ok(Next::Layer(LayerType::Ipv4))
    }

    fn encode_ipv6(&mut self, frame: &mut Frame, idx: usize) -> Result<Next> {
        let offset = self.layers[idx].offset;
        let mut hdr = Ipv6Header::default();
        let mut proto = None;

        for (key, value) in self.params(idx)? {
            match key.to_ascii_lowercase().as_str() {
                "dst" => hdr.destination = parse_addr::<Ipv6Addr>(key, value)?,
                "src" => hdr.source = parse_addr::<Ipv6Addr>(key, value)?,
                "hops" => hdr.hop_limit = parse_number(key, value)?,
                "proto" => proto = Some(value.parse::<IpProtocol>()?),
                "vtc" | "len" => {}
                _ => return Err(Error::invalid_key("IPv6", key)),
            }
        }

        self.advance(frame, idx, Ipv6Header::LEN)?;
        if frame.l3.is_none() {
            frame.l3 = Some(HeaderExtent::new(offset, Ipv6Header::LEN));
        }

        let next = self.next_layer(frame, idx + 1)?;

        let payload_len = frame.data_len().saturating_sub(offset + Ipv6Header::LEN);
        hdr.payload_len = u16::try_from(payload_len).unwrap_or(u16::MAX);
        hdr.next_header = match next {
            Next::Layer(LayerType::Udp) => IpProtocol::UDP,
            Next::Layer(LayerType::Tcp) => IpProtocol::TCP,
            _ => proto.unwrap_or(IpProtocol::Custom(ip_protocols::NO_NEXT_HEADER)),
        };

        let (src, dst, next_header) = (hdr.source, hdr.destination, hdr.next_header.to_u8());
        finish_transport(frame, offset + Ipv6Header::LEN, next, |segment| {
            transport_checksum_v6(src, dst, next_header, segment)
        })?;

        hdr.write_to(frame.window_mut(offset, Ipv6Header::LEN)?)?;

        Ok(Next::Layer(LayerType::Ipv6))
    }

    fn encode_udp(&mut self, frame: &mut Frame, idx: usize) -> Result<Next> {
        let offset = self.layers[idx].offset;
        let (mut sport, mut dport) = (None, None);

        for (key, value) in self.params(idx)? {
            match key.to_ascii_lowercase().as_str() {
                "dport" => dport = Some(parse_number::<u16>(key, value)?),
                "sport" => sport = Some(parse_number::<u16>(key, value)?),
                "len" | "cksum" => {}
                _ => return Err(Error::invalid_key("UDP", key)),
            }
        }

        self.advance(frame, idx, UdpHeader::LEN)?;
        if frame.l4.is_none() {
            frame.l4 = Some(HeaderExtent::new(offset, UdpHeader::LEN));
        }

        let mut hdr = match self.next_layer(frame, idx + 1)? {
            Next::Layer(LayerType::Echo) => UdpHeader::new(limits::ECHO_PORT, limits::ECHO_PORT),
            Next::Layer(LayerType::Vxlan) => UdpHeader::new(limits::VXLAN_PORT, limits::VXLAN_PORT),
            _ => UdpHeader::default(),
        };
        if let Some(port) = sport {
            hdr.source_port = port;
        }
        if let Some(port) = dport {
            hdr.destination_port = port;
        }

        let length = frame.data_len().saturating_sub(offset);
        self.layers[idx].length = length;
        hdr.length = u16::try_from(length).unwrap_or(u16::MAX);
        if self.verbose {
            info!("UDP length {} bytes", length);
        }
        hdr.write_to(frame.window_mut(offset, UdpHeader::LEN)?)?;

        Ok(Next::Layer(LayerType::Udp))
    }

    fn encode_tcp(&mut self, frame: &mut Frame, idx: usize) -> Result<Next> {
        let offset = self.layers[idx].offset;
        let mut hdr = TcpHeader::default();

        for (key, value) in self.params(idx)? {
            match key.to_ascii_lowercase().as_str() {
                "dport" => hdr.destination_port = parse_number(key, value)?,
                "sport" => hdr.source_port = parse_number(key, value)?,
                "seq" => hdr.sequence = parse_number(key, value)?,
                "ack" => hdr.acknowledgment = parse_number(key, value)?,
                "flags" => hdr.flags = TcpFlags(parse_number(key, value)?),
                "win" => hdr.window = parse_number(key, value)?,
                "data_off" | "cksum" | "urp" => {}
                _ => return Err(Error::invalid_key("TCP", key)),
            }
        }

        self.advance(frame, idx, TcpHeader::LEN)?;
        if frame.l4.is_none() {
            frame.l4 = Some(HeaderExtent::new(offset, TcpHeader::LEN));
        }

        self.next_layer(frame, idx + 1)?;
        hdr.write_to(frame.window_mut(offset, TcpHeader::LEN)?)?;

        Ok(Next::Layer(LayerType::Tcp))
    }

    fn encode_vxlan(&mut self, frame: &mut Frame, idx: usize) -> Result<Next> {
        let offset = self.layers[idx].offset;
        let mut hdr = VxlanHeader::default();

        for (key, value) in self.params(idx)? {
            match key.to_ascii_lowercase().as_str() {
                "vni" => hdr = VxlanHeader::new(parse_number(key, value)?),
                "flags" => {}
                _ => return Err(Error::invalid_key("Vxlan", key)),
            }
        }

        self.advance(frame, idx, VxlanHeader::LEN)?;

        if self.next_layer(frame, idx + 1)? == Next::Layer(LayerType::Ether) {
            hdr.next_protocol = VXLAN_NEXT_ETHERNET;
        }
        hdr.write_to(frame.window_mut(offset, VxlanHeader::LEN)?)?;

        Ok(Next::Layer(LayerType::Vxlan))
    }

    fn encode_echo(&mut self, frame: &mut Frame, idx: usize) -> Result<Next> {
        if let Some((key, _)) = self.params(idx)?.first() {
            return Err(Error::invalid_key("Echo", *key));
        }

        self.next_layer(frame, idx + 1)?;
        Ok(Next::Layer(LayerType::Echo))
    }

    fn encode_tsc(&mut self, frame: &mut Frame, idx: usize) -> Result<Next> {
        let offset = self.layers[idx].offset;
        let mut tsc = TscHeader::default();

        for (key, value) in self.params(idx)? {
            match key.to_ascii_lowercase().as_str() {
                "val" => tsc.value = parse_number(key, value)?,
                _ => return Err(Error::invalid_key("TSC", key)),
            }
        }

        self.advance(frame, idx, TscHeader::LEN)?;
        frame.set_tsc_offset(offset);
        tsc.write_to(frame.window_mut(offset, TscHeader::LEN)?)?;

        self.next_layer(frame, idx + 1)?;
        Ok(Next::Layer(LayerType::Tsc))
    }

    fn encode_raw(&mut self, frame: &mut Frame, idx: usize) -> Result<Next> {
        let offset = self.layers[idx].offset;
        let bytes = unescape_raw(self.layers[idx].params)?;

        self.advance(frame, idx, bytes.len())?;
        frame.window_mut(offset, bytes.len())?.copy_from_slice(&bytes);

        self.next_layer(frame, idx + 1)?;
        Ok(Next::Layer(LayerType::Raw))
    }

    fn encode_payload(&mut self, frame: &mut Frame, idx: usize) -> Result<Next> {
        let plen = frame.data_len();
        let mut pktlen = plen;
        let mut sized = false;
        let mut fill = limits::FILLER_PATTERN;

        for (key, value) in self.params(idx)? {
            match key.to_ascii_lowercase().as_str() {
                "size" | "len" => {
                    if std::mem::replace(&mut sized, true) {
                        return Err(Error::parse("Payload: size and append are mutually exclusive"));
                    }
                    // size is the wire length, CRC included
                    let size = parse_number::<usize>(key, value)?
                        .clamp(limits::ETHER_MIN_LEN, limits::ETHER_MAX_LEN);
                    pktlen = size - limits::ETHER_CRC_LEN;
                }
                "append" => {
                    if std::mem::replace(&mut sized, true) {
                        return Err(Error::parse("Payload: size and append are mutually exclusive"));
                    }
                    pktlen = plen.saturating_add(parse_number::<usize>(key, value)?);
                }
                "fill" => fill = parse_number(key, value)?,
                _ => return Err(Error::invalid_key("Payload", key)),
            }
        }

        frame.set_data_len(pktlen)?;
        if pktlen > plen {
            frame.fill(plen, pktlen - plen, fill)?;
        }
        self.layers[idx].length = pktlen.saturating_sub(plen);

        self.next_layer(frame, idx + 1)?;

        // a later layer may have grown the frame, fill that tail as well
        let len = frame.data_len();
        if len > pktlen && fill != 0 {
            frame.fill(pktlen, len - pktlen, fill)?;
        }

        Ok(Next::Layer(LayerType::Payload))
    }

    fn encode_done(&mut self, frame: &mut Frame) -> Result<Next> {
        let len = frame.data_len();

        if len < limits::ETHER_ZLEN {
            debug!(frame = frame.name(), "Frame too short {}, adjusting to {} bytes", len, limits::ETHER_ZLEN);
            frame.set_data_len(limits::ETHER_ZLEN)?;
        } else if len > limits::ETHER_FRAME_LEN {
            warn!(frame = frame.name(), "Frame too long {}, adjusting to {} bytes", len, limits::ETHER_FRAME_LEN);
            frame.set_data_len(limits::ETHER_FRAME_LEN)?;
        }

        Ok(Next::Done)
    }
}

/// Fill in the UDP or TCP checksum behind an IP header.
///
/// The segment runs from `l4` to the end of the frame. `sum` computes the
/// checksum including the IP pseudo-header.
fn finish_transport<F>(frame: &mut Frame, l4: usize, next: Next, sum: F) -> Result<()>
where
    F: FnOnce(&[u8]) -> u16,
{
    let (field, is_udp) = match next {
        Next::Layer(LayerType::Udp) => (UdpHeader::CHECKSUM_OFFSET, true),
        Next::Layer(LayerType::Tcp) => (TcpHeader::CHECKSUM_OFFSET, false),
        _ => return Ok(()),
    };

    let segment_len = frame.data_len().saturating_sub(l4);
    if segment_len < field + 2 {
        return Ok(());
    }

    frame.window_mut(l4 + field, 2)?.fill(0);
    let mut cksum = sum(frame.window(l4, segment_len)?);
    if is_udp {
        cksum = UdpHeader::wire_checksum(cksum);
    }
    frame.window_mut(l4 + field, 2)?.copy_from_slice(&cksum.to_be_bytes());
    Ok(())
}

fn parse_addr<A: std::str::FromStr>(key: &str, value: &str) -> Result<A> {
    value
        .trim()
        .parse::<A>()
        .map_err(|_| Error::invalid_value(key, value, "invalid address"))
}

/// Bytes of a `Raw('...')` layer.
///
/// Printable characters stand for themselves and `\xHH` for any byte;
/// `\\` and `\'` are accepted as well.
fn unescape_raw(params: &str) -> Result<Vec<u8>> {
    let inner = strip_parens(params);
    let inner = inner
        .strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
        .unwrap_or(inner);

    let bytes = inner.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'\\' {
            out.push(bytes[i]);
            i += 1;
            continue;
        }
        match bytes.get(i + 1) {
            Some(b'x') | Some(b'X') => {
                let hex = inner
                    .get(i + 2..i + 4)
                    .ok_or_else(|| Error::invalid_value("Raw", inner, "short \\x escape"))?;
                let byte = u8::from_str_radix(hex, 16)
                    .map_err(|_| Error::invalid_value("Raw", inner, "bad \\x escape"))?;
                out.push(byte);
                i += 4;
            }
            Some(&c @ (b'\\' | b'\'')) => {
                out.push(c);
                i += 2;
            }
            _ => return Err(Error::invalid_value("Raw", inner, "unknown escape")),
        }
    }
    Ok(out)
}
