//! Command-line driver for the fgen frame generator
//!
//! Loads frames from files and strings, encodes them, then prints each frame
//! decoded back into frame text, one layer per line.

pub mod args;
pub mod run;

pub use args::Cli;
pub use run::{run, DEFAULT_FRAMES};
