//! Example: Building an Ethernet/IPv4/UDP frame from header models
//!
//! Writes each header into its window of a frame buffer, then fills in the
//! lengths and checksums the way the frame encoder does.

use fgen_packet::{
    transport_checksum, EtherType, EthernetHeader, Header, IpProtocol, Ipv4Header, MacAddress,
    UdpHeader,
};
use std::net::Ipv4Addr;

fn main() -> fgen_core::Result<()> {
    let src_ip = Ipv4Addr::new(192, 168, 1, 100);
    let dst_ip = Ipv4Addr::new(192, 168, 1, 1);

    // DNS query header (simplified)
    let dns_query = [
        0x12, 0x34, // Transaction ID
        0x01, 0x00, // Flags: standard query
        0x00, 0x01, // Questions: 1
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    ];

    let l3 = EthernetHeader::LEN;
    let l4 = l3 + Ipv4Header::LEN;
    let len = l4 + UdpHeader::LEN + dns_query.len();
    let mut frame = vec![0u8; len];

    let eth = EthernetHeader::new(
        "AA:BB:CC:DD:EE:FF".parse()?,
        MacAddress::new([0x00, 0x11, 0x22, 0x33, 0x44, 0x55]),
        EtherType::IPv4,
    );
    eth.write_to(&mut frame)?;

    frame[l4 + UdpHeader::LEN..].copy_from_slice(&dns_query);

    let mut udp = UdpHeader::new(54321, 53);
    udp.length = (len - l4) as u16;
    udp.write_to(&mut frame[l4..])?;
    udp.checksum = UdpHeader::wire_checksum(transport_checksum(
        src_ip,
        dst_ip,
        IpProtocol::UDP.to_u8(),
        &frame[l4..],
    ));
    udp.write_to(&mut frame[l4..])?;

    let mut ip = Ipv4Header::new(src_ip, dst_ip);
    ip.protocol = IpProtocol::UDP;
    ip.total_length = (len - l3) as u16;
    ip.update_checksum();
    ip.write_to(&mut frame[l3..])?;

    println!("UDP frame built: {} bytes", frame.len());
    println!("Ethernet header: {:02X?}", &frame[..l3]);
    println!("IP checksum: {:#06x}", ip.checksum);
    println!("UDP checksum: {:#06x}", udp.checksum);
    Ok(())
}
