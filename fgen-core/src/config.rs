//! Runtime configuration for the frame generator

use crate::limits;

/// Options controlling how frames are built and reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FgenConfig {
    /// Log every layer as it is encoded
    pub verbose: bool,
    /// Hex dump each frame after it is encoded
    pub dump_data: bool,
    /// Capacity of each frame buffer in bytes
    pub frame_size: usize,
}

impl FgenConfig {
    pub fn new() -> Self {
        Self {
            verbose: false,
            dump_data: false,
            frame_size: limits::FRAME_BUF_SIZE,
        }
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_dump_data(mut self, dump: bool) -> Self {
        self.dump_data = dump;
        self
    }

    /// Set the frame buffer capacity, never below a maximum size Ethernet frame
    pub fn with_frame_size(mut self, size: usize) -> Self {
        self.frame_size = size.max(limits::ETHER_FRAME_LEN);
        self
    }
}

impl Default for FgenConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FgenConfig::default();
        assert!(!config.verbose);
        assert!(!config.dump_data);
        assert_eq!(config.frame_size, limits::FRAME_BUF_SIZE);
    }

    #[test]
    fn test_frame_size_floor() {
        let config = FgenConfig::new().with_frame_size(100);
        assert_eq!(config.frame_size, limits::ETHER_FRAME_LEN);
    }
}
