//! CLI argument parsing

use clap::Parser;
use fgen_core::{limits, Error, FgenConfig, Result};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "fgen")]
#[command(about = "Build frames from frame description text and decode them again", long_about = None)]
#[command(after_help = "-f and -s may be combined; without either the built-in frame set is used")]
pub struct Cli {
    /// Frame file to load (can be given multiple times)
    #[arg(short = 'f', long = "fgen-file", value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Frame string 'Name := layer/layer/...' (can be given multiple times)
    #[arg(short = 's', long = "fgen-string", value_name = "STRING")]
    pub strings: Vec<String>,

    /// Replace a frame's bytes with hex data and decode it again
    #[arg(short = 'x', long = "hex", value_name = "FRAME=HEX")]
    pub hex: Vec<String>,

    /// Log every layer while encoding
    #[arg(short = 'V', long)]
    pub verbose: bool,

    /// Hex dump every frame after encoding
    #[arg(short = 'D', long)]
    pub dump: bool,

    /// Frame buffer size in bytes
    #[arg(long, value_name = "BYTES", default_value_t = limits::FRAME_BUF_SIZE)]
    pub frame_size: usize,

    /// Log level (-v, -vv for increasing verbosity)
    #[arg(short = 'v', action = clap::ArgAction::Count)]
    pub log_level: u8,
}

impl Cli {
    /// Encoder configuration selected by the flags
    pub fn config(&self) -> FgenConfig {
        FgenConfig::new()
            .with_verbose(self.verbose)
            .with_dump_data(self.dump)
            .with_frame_size(self.frame_size)
    }

    /// Default tracing filter for the log level
    pub fn log_filter(&self) -> &'static str {
        match self.log_level {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }

    /// `-x` arguments split into frame name and hex text
    pub fn hex_injections(&self) -> Result<Vec<(&str, &str)>> {
        self.hex
            .iter()
            .map(|arg| {
                arg.split_once('=')
                    .map(|(name, hex)| (name.trim(), hex))
                    .filter(|(name, _)| !name.is_empty())
                    .ok_or_else(|| Error::KeyValue(arg.clone()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_repeated_args() {
        let cli = Cli::parse_from([
            "fgen",
            "-s",
            "A := Ether()",
            "--fgen-string",
            "B := Ether()/IPv4()",
            "-f",
            "frames.txt",
            "-V",
            "-vv",
        ]);
        assert_eq!(cli.strings.len(), 2);
        assert_eq!(cli.files, vec![PathBuf::from("frames.txt")]);
        assert!(cli.verbose);
        assert!(!cli.dump);
        assert_eq!(cli.log_level, 2);
        assert_eq!(cli.log_filter(), "trace");
    }

    #[test]
    fn test_config_from_flags() {
        let cli = Cli::parse_from(["fgen", "-D", "--frame-size", "100"]);
        let config = cli.config();
        assert!(config.dump_data);
        assert!(!config.verbose);
        assert_eq!(config.frame_size, limits::ETHER_FRAME_LEN);
    }

    #[test]
    fn test_hex_injections() {
        let cli = Cli::parse_from(["fgen", "-x", "Frame0=00 11 22", "-x", "bad"]);
        assert!(cli.hex_injections().is_err());

        let cli = Cli::parse_from(["fgen", "-x", "Frame0=00 11 22"]);
        assert_eq!(cli.hex_injections().unwrap(), vec![("Frame0", "00 11 22")]);
    }
}
