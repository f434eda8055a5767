//! Layer-per-line frame listing

use crate::frame::Frame;

/// Format frame text with a title line and one indented layer per line
pub fn layer_listing(title: &str, text: &str) -> String {
    let mut out = format!(">>>> {} <<<<\n", title);
    for layer in text.split('/').map(str::trim).filter(|l| !l.is_empty()) {
        out.push_str("   ");
        out.push_str(layer);
        out.push('\n');
    }
    out
}

/// Listing of a frame's description text
pub fn frame_listing(frame: &Frame) -> String {
    layer_listing(frame.name(), frame.text())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_listing() {
        let listing = layer_listing("Frame0", "Ether(dst=00:01:02:03:04:05)/IPv4()/");
        assert_eq!(listing, ">>>> Frame0 <<<<\n   Ether(dst=00:01:02:03:04:05)\n   IPv4()\n");
    }

    #[test]
    fn test_frame_listing_uses_name() {
        let frame = Frame::new("f1", "Ether()/UDP()", 64);
        assert!(frame_listing(&frame).starts_with(">>>> f1 <<<<\n"));
    }
}
