//! Frame description language engine
//!
//! Turns frame text such as
//!
//! ```text
//! Ether(dst=00:01:02:03:04:05)/IPv4(dst=1.2.3.4)/UDP(sport=5678)/Payload(size=128)
//! ```
//!
//! into frame bytes, and frame bytes back into the same notation.
//!
//! - [`tokenizer`] - splits frame text into layers, parameters and key/value pairs
//! - [`table`] - maps layer names to layer types
//! - [`encode`] - the layer chain that builds frame bytes
//! - [`decode`] - renders frame bytes as frame text
//! - [`frame`] - frame buffer and header extents
//! - [`store`] - named frame collection
//! - [`loader`] - `Name := text` file format
//! - [`hexstr`] - hex byte strings and dumps
//! - [`listing`] - layer-per-line output
//!
//! # Example
//!
//! ```rust
//! use fgen_core::{FgenConfig, LayerType};
//! use fgen_frame::{DecodeContext, FrameStore};
//!
//! let mut store = FrameStore::new(FgenConfig::default());
//! store.add_frame("udp", "Ether()/IPv4(dst=1.2.3.4)/UDP(dport=53)").unwrap();
//!
//! let frame = store.find_frame("udp").unwrap();
//! assert_eq!(frame.wire_len(), 64);
//!
//! let mut dc = DecodeContext::new();
//! let text = dc.decode(frame.data(), LayerType::Ether).unwrap();
//! assert!(text.contains("UDP(dport=53,"));
//! ```

pub mod decode;
pub mod encode;
pub mod frame;
pub mod hexstr;
pub mod listing;
pub mod loader;
pub mod store;
pub mod table;
pub mod tokenizer;

#[cfg(test)]
mod tests;

pub use decode::DecodeContext;
pub use encode::{encode_frame, Next};
pub use frame::{Frame, HeaderExtent};
pub use hexstr::{decode_hex_string, hex_dump};
pub use listing::{frame_listing, layer_listing};
pub use loader::{parse_frames, FrameDef};
pub use store::FrameStore;
