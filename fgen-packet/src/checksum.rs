//! Checksum calculations for network packets
//!
//! This module provides the Internet Checksum (RFC 1071) used in IPv4, TCP and
//! UDP headers. The transport checksums fold in the IPv4 or IPv6 pseudo-header
//! without building it in memory.

use std::net::{Ipv4Addr, Ipv6Addr};

/// Adds the data to a running sum as big-endian 16-bit words.
///
/// An odd trailing byte is padded with a zero low byte.
fn sum_words(mut sum: u32, data: &[u8]) -> u32 {
    let mut chunks = data.chunks_exact(2);
    for chunk in &mut chunks {
        sum += u16::from_be_bytes([chunk[0], chunk[1]]) as u32;
    }

    if let Some(&byte) = chunks.remainder().first() {
        sum += (byte as u32) << 8;
    }

    sum
}

/// Folds the carries and returns the one's complement
fn finish(mut sum: u32) -> u16 {
    while (sum >> 16) != 0 {
        sum = (sum & 0xFFFF) + (sum >> 16);
    }
    !sum as u16
}

/// Calculates the Internet Checksum as defined in RFC 1071.
///
/// # Examples
///
/// ```
/// use fgen_packet::checksum::internet_checksum;
///
/// let header = [0x45, 0x00, 0x00, 0x3c];
/// let checksum = internet_checksum(&header);
/// ```
pub fn internet_checksum(data: &[u8]) -> u16 {
    finish(sum_words(0, data))
}

/// Calculates a TCP or UDP checksum over an IPv4 pseudo-header.
///
/// The pseudo-header is source address, destination address, a zero byte,
/// the protocol number and the segment length. `segment` is the transport
/// header plus payload with its checksum field zeroed.
pub fn transport_checksum(src: Ipv4Addr, dst: Ipv4Addr, protocol: u8, segment: &[u8]) -> u16 {
    let mut sum = sum_words(0, &src.octets());
    sum = sum_words(sum, &dst.octets());
    sum += protocol as u32;
    sum += segment.len() as u32 & 0xFFFF;
    finish(sum_words(sum, segment))
}

/// Calculates a TCP or UDP checksum over an IPv6 pseudo-header (RFC 8200).
pub fn transport_checksum_v6(src: Ipv6Addr, dst: Ipv6Addr, next_header: u8, segment: &[u8]) -> u16 {
    let mut sum = sum_words(0, &src.octets());
    sum = sum_words(sum, &dst.octets());
    let len = segment.len() as u32;
    sum += len >> 16;
    sum += len & 0xFFFF;
    sum += next_header as u32;
    finish(sum_words(sum, segment))
}

/// Validates an Internet checksum.
///
/// The checksum over data that already contains its checksum field folds to
/// zero (or 0xFFFF, its one's complement twin).
pub fn validate_checksum(data: &[u8]) -> bool {
    let result = internet_checksum(data);
    result == 0 || result == 0xFFFF
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_internet_checksum_empty() {
        assert_eq!(internet_checksum(&[]), 0xFFFF);
    }

    #[test]
    fn test_internet_checksum_rfc1071_example() {
        // RFC 1071 section 3: sum is 0xddf2, checksum its complement
        let data = [0x00, 0x01, 0xf2, 0x03, 0xf4, 0xf5, 0xf6, 0xf7];
        assert_eq!(internet_checksum(&data), !0xddf2u16);
    }

    #[test]
    fn test_internet_checksum_odd_length() {
        // 0x0001 + 0x0200
        assert_eq!(internet_checksum(&[0x00, 0x01, 0x02]), !0x0201u16);
    }

    #[test]
    fn test_known_ipv4_header() {
        // Classic example header with checksum 0xb861
        let header = [
            0x45, 0x00, 0x00, 0x73, 0x00, 0x00, 0x40, 0x00, 0x40, 0x11, 0x00, 0x00, 0xc0, 0xa8,
            0x00, 0x01, 0xc0, 0xa8, 0x00, 0xc7,
        ];
        assert_eq!(internet_checksum(&header), 0xb861);
    }

    #[test]
    fn test_validate_checksum() {
        let data = [0x45, 0x00, 0x00, 0x3c];
        let checksum = internet_checksum(&data);

        let mut with_checksum = data.to_vec();
        with_checksum.extend_from_slice(&checksum.to_be_bytes());

        assert!(validate_checksum(&with_checksum));
    }

    #[test]
    fn test_transport_checksum_matches_explicit_pseudo_header() {
        let src = Ipv4Addr::new(192, 168, 1, 1);
        let dst = Ipv4Addr::new(192, 168, 1, 2);
        let segment = [0x00, 0x35, 0x00, 0x35, 0x00, 0x0a, 0x00, 0x00, 0xab, 0xcd];

        let mut pseudo = Vec::new();
        pseudo.extend_from_slice(&src.octets());
        pseudo.extend_from_slice(&dst.octets());
        pseudo.push(0);
        pseudo.push(17);
        pseudo.extend_from_slice(&(segment.len() as u16).to_be_bytes());
        pseudo.extend_from_slice(&segment);

        assert_eq!(
            transport_checksum(src, dst, 17, &segment),
            internet_checksum(&pseudo)
        );
    }

    #[test]
    fn test_transport_checksum_v6_matches_explicit_pseudo_header() {
        let src: Ipv6Addr = "2001:db8::1".parse().unwrap();
        let dst: Ipv6Addr = "2001:db8::2".parse().unwrap();
        let segment = [0x04, 0xd2, 0x16, 0x2e, 0x00, 0x09, 0x00, 0x00, 0x61];

        let mut pseudo = Vec::new();
        pseudo.extend_from_slice(&src.octets());
        pseudo.extend_from_slice(&dst.octets());
        pseudo.extend_from_slice(&(segment.len() as u32).to_be_bytes());
        pseudo.extend_from_slice(&[0, 0, 0, 17]);
        pseudo.extend_from_slice(&segment);

        assert_eq!(
            transport_checksum_v6(src, dst, 17, &segment),
            internet_checksum(&pseudo)
        );
    }
}
