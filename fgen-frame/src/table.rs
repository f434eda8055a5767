//! Layer dispatch table
//!
//! Maps the literal that opens a layer in frame text (name plus opening
//! parenthesis) to its layer type. Matching is a case-insensitive prefix
//! match, and no entry is a prefix of another so table order is irrelevant.

use fgen_core::LayerType;

/// One entry of the layer table
#[derive(Debug, Clone, Copy)]
pub struct LayerEntry {
    pub prefix: &'static str,
    pub typ: LayerType,
}

/// Every layer the encoder understands
pub static LAYER_TABLE: [LayerEntry; 12] = [
    LayerEntry { prefix: "Ether(", typ: LayerType::Ether },
    LayerEntry { prefix: "Dot1q(", typ: LayerType::Dot1q },
    LayerEntry { prefix: "Dot1ad(", typ: LayerType::Dot1ad },
    LayerEntry { prefix: "IPv4(", typ: LayerType::Ipv4 },
    LayerEntry { prefix: "IPv6(", typ: LayerType::Ipv6 },
    LayerEntry { prefix: "UDP(", typ: LayerType::Udp },
    LayerEntry { prefix: "TCP(", typ: LayerType::Tcp },
    LayerEntry { prefix: "Vxlan(", typ: LayerType::Vxlan },
    LayerEntry { prefix: "Echo(", typ: LayerType::Echo },
    LayerEntry { prefix: "TSC(", typ: LayerType::Tsc },
    LayerEntry { prefix: "Raw(", typ: LayerType::Raw },
    LayerEntry { prefix: "Payload(", typ: LayerType::Payload },
];

/// Look up a layer token.
///
/// Returns the layer type and the parameter text starting at the opening
/// parenthesis.
pub fn match_layer(layer: &str) -> Option<(LayerType, &str)> {
    LAYER_TABLE.iter().find_map(|entry| {
        let len = entry.prefix.len();
        let head = layer.get(..len)?;
        if head.eq_ignore_ascii_case(entry.prefix) {
            // keep the '(' with the parameters
            layer.get(len - 1..).map(|params| (entry.typ, params))
        } else {
            None
        }
    })
}
