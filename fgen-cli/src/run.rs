//! Load, encode, decode and print frames

use crate::args::Cli;
use fgen_core::{Error, LayerType, Result};
use fgen_frame::{decode_hex_string, layer_listing, DecodeContext, Frame, FrameStore};
use tracing::info;

/// Frames used when none are given on the command line
pub const DEFAULT_FRAMES: &[&str] = &[
    "Frame0 := Ether( dst=00:01:02:03:04:05 )/IPv4(dst=1.2.3.4)/UDP(sport=5678, dport=1234)/TSC()/Payload(size=32, fill=0xaa)",
    "Frame1 := Ether( dst=00:01:02:03:04:05 )/IPv4(dst=1.2.3.4, src=5.6.7.8)/UDP(sport=0x1234, dport=1234)/TSC()/Payload(fill=0xbb)",
    "Frame2 := Ether(dst=00:11:22:33:44:55, src=01:ff:ff:ff:ff:ff )/Dot1q(vlan=0x322, cfi=1, prio=7)/IPv4(dst=1.2.3.4)/UDP(sport=5678)/Payload(size=128)",
    "Frame3:=Ether(src=2201:2203:4405)/Dot1ad(vlan=0x22, cfi=1, prio=7)/Dot1q(vlan=0x33, cfi=1, prio=7)/IPv4(dst=1.2.3.4)/TCP(sport=0x5678)/TSC()",
    "Frame4:=Ether(src=2201:2203:4405)/Dot1Q(vlan=0x22, cfi=1, prio=7)/Dot1ad(vlan=0x33, cfi=1, prio=7)/IPv4(dst=1.2.3.4)/TCP(sport=0x5678)/TSC()",
];

/// A captured UDP frame injected into `Frame0` of the default set
pub const CAPTURED_FRAME: &str = "\
    3C FD FE E4 34 C0 3C FD FE E4 38 40 08 00 45 00 \
    00 72 B3 0F 00 00 40 11 3A 45 C6 12 00 01 C6 12 \
    01 01 04 D2 16 2E 00 5E BE 84 6B 6C 6D 6E 6F 70 \
    E8 A7 59 CF 57 E2 03 00 54 73 74 61 6D 70 32 32 \
    61 62 63 64 65 66 67 68 69 6A 6B 6C 6D 6E 6F 70 \
    71 72 73 74 75 76 77 78 79 7A 30 31 32 33 34 35 \
    61 62 63 64 65 66 67 68 69 6A 6B 6C 6D 6E 6F 70 \
    71 72 73 74 75 76 77 78 79 7A 30 31 32 33 34 35";

/// Build every requested frame and print its decoded layers.
///
/// Returns the listings in the order they were printed.
pub fn run(cli: &Cli) -> Result<Vec<String>> {
    let mut store = FrameStore::new(cli.config());

    for file in &cli.files {
        info!(file = %file.display(), "Loading frame file");
        store.load_file(file)?;
    }
    if !cli.strings.is_empty() {
        info!(count = cli.strings.len(), "Loading frame strings");
        store.load_strings(cli.strings.as_slice())?;
    }

    let defaults = cli.files.is_empty() && cli.strings.is_empty();
    if defaults {
        info!("No frames given, loading the default frame set");
        store.load_strings(DEFAULT_FRAMES)?;
    }
    info!(count = store.len(), "Found frames");

    let mut dc = DecodeContext::new();
    let mut listings = Vec::with_capacity(store.len());
    for frame in &store {
        listings.push(print_decoded(&mut dc, frame)?);
    }

    let mut injections = cli.hex_injections()?;
    if defaults && injections.is_empty() {
        injections.push(("Frame0", CAPTURED_FRAME));
    }
    for (name, hex) in injections {
        let bytes = decode_hex_string(hex)?;
        let frame = store
            .find_frame_mut(name)
            .ok_or_else(|| Error::NotFound(name.to_string()))?;
        frame.load_bytes(&bytes)?;
        info!(frame = frame.name(), len = bytes.len(), "Injected hex data");
        listings.push(print_decoded(&mut dc, frame)?);
    }

    Ok(listings)
}

fn print_decoded(dc: &mut DecodeContext, frame: &Frame) -> Result<String> {
    let text = dc.decode(frame.data(), LayerType::Ether)?;
    let listing = layer_listing(frame.name(), text);
    println!("\n{}", listing);
    Ok(listing)
}
