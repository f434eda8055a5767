//! fgen Core Library
//!
//! This crate provides the layer catalogue, size limits, configuration and
//! error handling shared by the fgen frame generator crates.

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::FgenConfig;
pub use error::{Error, Result};
pub use types::*;
