//! Hex string helpers

use fgen_core::{Error, Result};

/// Decode whitespace separated hex byte pairs (`"3C FD FE ..."`)
pub fn decode_hex_string(text: &str) -> Result<Vec<u8>> {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    hex::decode(&compact).map_err(|e| Error::InvalidHex(e.to_string()))
}

/// Format bytes as an offset-prefixed dump, 16 bytes per line
pub fn hex_dump(data: &[u8]) -> String {
    data.chunks(16)
        .enumerate()
        .map(|(line, chunk)| {
            let encoded = hex::encode_upper(chunk);
            let pairs: Vec<&str> = encoded
                .as_bytes()
                .chunks(2)
                .filter_map(|pair| std::str::from_utf8(pair).ok())
                .collect();
            format!("{:04x}: {}", line * 16, pairs.join(" "))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_hex_string() {
        let bytes = decode_hex_string("3C FD fe\n E4 34\tC0").unwrap();
        assert_eq!(bytes, vec![0x3C, 0xFD, 0xFE, 0xE4, 0x34, 0xC0]);
        assert!(decode_hex_string("").unwrap().is_empty());
    }

    #[test]
    fn test_decode_hex_string_errors() {
        assert!(matches!(decode_hex_string("3C F"), Err(Error::InvalidHex(_))));
        assert!(matches!(decode_hex_string("ZZ"), Err(Error::InvalidHex(_))));
    }

    #[test]
    fn test_hex_dump() {
        let data: Vec<u8> = (0u8..18).collect();
        let dump = hex_dump(&data);
        let lines: Vec<&str> = dump.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("0000: 00 01 02"));
        assert_eq!(lines[1], "0010: 10 11");
    }
}
