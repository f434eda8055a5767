//! End-to-end tests: text to bytes, bytes to text, store and file loading

use crate::{decode_hex_string, DecodeContext, Frame, FrameStore};
use fgen_core::{limits, Error, FgenConfig, LayerType};
use std::io::Write;

const UDP_FRAME: &str = "Ether(dst=AA:BB:CC:DD:EE:FF)/IPv4(dst=1.2.3.4,src=5.6.7.8)/\
                         UDP(sport=1111,dport=2222)/Payload(size=100,fill=0xAA)";

const CAPTURED: &str = "\
    3C FD FE E4 34 C0 3C FD FE E4 38 40 08 00 45 00
    00 72 B3 0F 00 00 40 11 3A 45 C6 12 00 01 C6 12
    01 01 04 D2 16 2E 00 5E BE 84 6B 6C 6D 6E 6F 70
    E8 A7 59 CF 57 E2 03 00 54 73 74 61 6D 70 32 32
    61 62 63 64 65 66 67 68 69 6A 6B 6C 6D 6E 6F 70
    71 72 73 74 75 76 77 78 79 7A 30 31 32 33 34 35
    61 62 63 64 65 66 67 68 69 6A 6B 6C 6D 6E 6F 70
    71 72 73 74 75 76 77 78 79 7A 30 31 32 33 34 35";

fn store() -> FrameStore {
    FrameStore::new(FgenConfig::default())
}

/// Plain RFC 1071 sum, kept separate from the library implementation
fn reference_checksum(data: &[u8]) -> u16 {
    let mut sum: u32 = 0;
    for pair in data.chunks(2) {
        let hi = pair[0] as u32;
        let lo = pair.get(1).copied().unwrap_or(0) as u32;
        sum += (hi << 8) | lo;
    }
    while sum > 0xFFFF {
        sum = (sum & 0xFFFF) + (sum >> 16);
    }
    !(sum as u16)
}

#[test]
fn test_round_trip_shape() {
    let mut store = store();
    let frame = store.add_frame("udp", UDP_FRAME).unwrap();

    let mut dc = DecodeContext::new();
    let text = dc.decode(frame.data(), LayerType::Ether).unwrap();

    assert!(text.starts_with("Ether(dst=AA:BB:CC:DD:EE:FF,"));
    assert!(text.contains(",dst=1.2.3.4,src=5.6.7.8,proto=udp)/"));
    assert!(text.contains("/UDP(dport=2222,sport=1111,"));
    assert!(text.ends_with("/Payload(len=100)"));
}

#[test]
fn test_decoded_text_encodes_to_same_bytes() {
    let mut store = store();
    store.add_frame("orig", UDP_FRAME).unwrap();

    let mut dc = DecodeContext::new();
    let orig = store.find_frame("orig").unwrap();
    let text = dc.decode(orig.data(), LayerType::Ether).unwrap().to_string();

    store.add_frame("copy", &text).unwrap();
    let orig = store.find_frame("orig").unwrap();
    let copy = store.find_frame("copy").unwrap();
    assert_eq!(orig.data(), copy.data());
}

#[test]
fn test_decoded_raw_text_loads_as_frame_string() {
    let mut store = store();
    store
        .add_frame("orig", "Ether()/IPv4(proto=47)/Raw('a:=b c,d=e')")
        .unwrap();

    let mut dc = DecodeContext::new();
    let orig = store.find_frame("orig").unwrap();
    let text = dc.decode(orig.data(), LayerType::Ether).unwrap().to_string();

    store.load_strings(&[text.as_str()]).unwrap();
    store.load_str(&format!("copy := {}", text)).unwrap();
    let orig = store.find_frame("orig").unwrap();
    assert_eq!(store.find_frame("frame-0").unwrap().data(), orig.data());
    assert_eq!(store.find_frame("copy").unwrap().data(), orig.data());
}

#[test]
fn test_length_invariant() {
    let texts = [
        "Ether()",
        "Ether()/Payload(size=0)",
        "Ether()/Payload(size=63)",
        "Ether()/Payload(size=65)",
        "Ether()/Payload(size=1518)",
        "Ether()/Payload(size=1519)",
        "Ether()/IPv4()/UDP()/Payload(append=5000)",
        "Ether()/Dot1ad()/Dot1q()/IPv6()/TCP()/TSC()/Payload(size=200)",
    ];

    let mut store = store();
    for (idx, text) in texts.iter().enumerate() {
        let frame = store.add_frame(&format!("f{}", idx), text).unwrap();
        let len = frame.wire_len();
        assert!(
            (limits::ETHER_MIN_LEN..=limits::ETHER_MAX_LEN).contains(&len),
            "{} encoded to {} bytes",
            text,
            len
        );
    }
}

#[test]
fn test_checksums_match_reference() {
    let mut store = store();
    let frame = store.add_frame("udp", UDP_FRAME).unwrap();
    let data = frame.data();

    // IPv4 header checksum over the header with its checksum field zeroed
    let mut ip = data[14..34].to_vec();
    let ip_cksum = u16::from_be_bytes([ip[10], ip[11]]);
    ip[10] = 0;
    ip[11] = 0;
    assert_eq!(ip_cksum, reference_checksum(&ip));

    // UDP checksum over pseudo-header plus datagram
    let udp = &data[34..];
    let udp_cksum = u16::from_be_bytes([udp[6], udp[7]]);
    let mut pseudo = Vec::new();
    pseudo.extend_from_slice(&[5, 6, 7, 8, 1, 2, 3, 4, 0, 17]);
    pseudo.extend_from_slice(&(udp.len() as u16).to_be_bytes());
    pseudo.extend_from_slice(udp);
    pseudo[12 + 6] = 0;
    pseudo[12 + 7] = 0;
    let mut expected = reference_checksum(&pseudo);
    if expected == 0 {
        expected = 0xFFFF;
    }
    assert_eq!(udp_cksum, expected);

    assert_eq!(u16::from_be_bytes([data[16], data[17]]), 82);
    assert_eq!(u16::from_be_bytes([udp[4], udp[5]]), 62);
}

#[test]
fn test_vlan_tag_packing() {
    let mut store = store();
    let frame = store
        .add_frame("vlan", "Ether()/Dot1q(vlan=0x322,prio=7,cfi=1)/IPv4()/UDP()")
        .unwrap();
    let data = frame.data();

    let tci: u16 = (0x322 & 0xFFF) | (7 << 13) | (1 << 12);
    assert_eq!(&data[12..14], &[0x81, 0x00]);
    assert_eq!(&data[14..16], &tci.to_be_bytes());
    assert_eq!(&data[16..18], &[0x08, 0x00]);
}

#[test]
fn test_store_teardown() {
    let mut store = store();
    store.load_strings(&["a := Ether()", "b := Ether()/IPv4()"]).unwrap();
    assert_eq!(store.len(), 2);
    store.clear();
    assert!(store.is_empty());
    assert_eq!(store.iter().count(), 0);
    drop(store);

    let empty = FrameStore::new(FgenConfig::default());
    drop(empty);
}

#[test]
fn test_unknown_layer_is_rejected() {
    let mut store = store();
    store.add_frame("good", "Ether()").unwrap();

    let err = store.add_frame("bad", "Foo(bar=1)").unwrap_err();
    assert!(err.is_parse_error());
    assert!(matches!(err, Error::UnknownLayer(_)));

    assert!(store.find_frame("bad").is_none());
    let names: Vec<&str> = store.iter().map(Frame::name).collect();
    assert_eq!(names, vec!["good"]);
}

#[test]
fn test_bulk_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        "Port0 := Ether( dst=00:01:02:03:04:05 )/\n\
         \x20   IPv4(dst=1.2.3.4)\n\
         // a comment between the frames\n\
         Port1 := Ether()/IPv4()/TCP(sport=0x5678) // trailing comment\n"
    )
    .unwrap();

    let mut store = store();
    let count = store.load_file(file.path()).unwrap();
    assert_eq!(count, 2);

    let port0 = store.find_frame("Port0").unwrap();
    assert_eq!(port0.text(), "Ether( dst=00:01:02:03:04:05 )/IPv4(dst=1.2.3.4)");
    let port1 = store.find_frame("Port1").unwrap();
    assert_eq!(port1.text(), "Ether()/IPv4()/TCP(sport=0x5678)");
    assert!(store.iter().all(|f| !f.text().contains("comment")));
}

#[test]
fn test_missing_file() {
    let mut store = store();
    let err = store.load_file("/nonexistent/frames.fgen").unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn test_inject_captured_bytes() {
    let mut store = store();
    store.add_frame("Frame0", UDP_FRAME).unwrap();

    let bytes = decode_hex_string(CAPTURED).unwrap();
    assert_eq!(bytes.len(), 128);

    let frame = store.find_frame_mut("Frame0").unwrap();
    frame.load_bytes(&bytes).unwrap();

    let mut dc = DecodeContext::new();
    let text = dc.decode(frame.data(), LayerType::Ether).unwrap();
    assert!(text.starts_with("Ether(dst=3C:FD:FE:E4:34:C0,src=3C:FD:FE:E4:38:40)/IPv4("));
    assert!(text.contains("dst=198.18.1.1,src=198.18.0.1,proto=udp)/"));
    assert!(text.contains("/UDP(dport=5678,sport=1234,len=94,cksum=0xbe84)/Raw('klmnop\\xe8"));
    assert!(text.ends_with("/Payload(len=132)"));
}

#[test]
fn test_vxlan_round_trip() {
    let mut store = store();
    let frame = store
        .add_frame(
            "vx",
            "Ether()/IPv4()/UDP()/Vxlan(vni=7)/Ether(dst=00:11:22:33:44:55)/IPv4()/TCP()",
        )
        .unwrap();
    assert_eq!(frame.l4().map(|l4| l4.offset), Some(34));

    let mut dc = DecodeContext::new();
    let text = dc.decode(frame.data(), LayerType::Ether).unwrap();
    assert!(text.contains("/Vxlan(flags=0x08,vni=7)/Ether(dst=00:11:22:33:44:55,"));
    assert!(text.contains("proto=tcp)/TCP("));
}
