//! Frame store
//!
//! An insertion-ordered collection of named frames. Each frame owns its
//! buffer; dropping or clearing the store releases every frame.

use crate::encode::encode_frame;
use crate::frame::Frame;
use crate::loader::{parse_frames, split_name};
use fgen_core::{limits, Error, FgenConfig, Result};
use std::path::Path;
use tracing::{debug, error, info};

/// Named frames in insertion order
#[derive(Debug, Default)]
pub struct FrameStore {
    config: FgenConfig,
    frames: Vec<Frame>,
}

impl FrameStore {
    pub fn new(config: FgenConfig) -> Self {
        Self::with_capacity(config, 0)
    }

    /// Create a store with room for `capacity` frames before it reallocates
    pub fn with_capacity(config: FgenConfig, capacity: usize) -> Self {
        debug!(capacity, frame_size = config.frame_size, "Creating frame store");
        FrameStore {
            config,
            frames: Vec::with_capacity(capacity),
        }
    }

    pub fn config(&self) -> &FgenConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Encode `text` into a new frame called `name`.
    ///
    /// A frame that fails to encode is not added.
    pub fn add_frame(&mut self, name: &str, text: &str) -> Result<&Frame> {
        if self.position(name.trim()).is_some() {
            return Err(Error::AlreadyExists(name.trim().to_string()));
        }
        let frame = self.build_frame(name, text)?;

        self.frames.push(frame);
        Ok(&self.frames[self.frames.len() - 1])
    }

    /// Re-encode an existing frame from new text.
    ///
    /// The old frame is kept if the new text fails to encode.
    pub fn replace_frame(&mut self, name: &str, text: &str) -> Result<&Frame> {
        let idx = self
            .position(name)
            .ok_or_else(|| Error::NotFound(name.to_string()))?;
        let frame = self.build_frame(name, text)?;

        self.frames[idx] = frame;
        Ok(&self.frames[idx])
    }

    /// Remove a frame by exact name
    pub fn remove_frame(&mut self, name: &str) -> Result<Frame> {
        let idx = self
            .position(name)
            .ok_or_else(|| Error::NotFound(name.to_string()))?;
        debug!(frame = name, "Removing frame");
        Ok(self.frames.remove(idx))
    }

    /// Find a frame by name.
    ///
    /// An exact match wins, otherwise the first frame whose name starts
    /// with `name` is returned.
    pub fn find_frame(&self, name: &str) -> Option<&Frame> {
        self.find_index(name).map(|idx| &self.frames[idx])
    }

    pub fn find_frame_mut(&mut self, name: &str) -> Option<&mut Frame> {
        self.find_index(name).map(move |idx| &mut self.frames[idx])
    }

    /// Frames in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, Frame> {
        self.frames.iter()
    }

    /// Release every frame
    pub fn clear(&mut self) {
        debug!(frames = self.frames.len(), "Clearing frame store");
        self.frames.clear();
    }

    /// Add frames from `Name := text` strings.
    ///
    /// Strings without a name are called `frame-N` after their position.
    /// Stops at the first frame that fails; returns how many were added.
    pub fn load_strings<S: AsRef<str>>(&mut self, strings: &[S]) -> Result<usize> {
        for (idx, s) in strings.iter().enumerate() {
            let (name, text) = split_name(s.as_ref())?;
            let name = name.map_or_else(|| format!("frame-{}", idx), str::to_string);
            self.add_frame(&name, text)?;
        }
        info!(count = strings.len(), "Loaded frame strings");
        Ok(strings.len())
    }

    /// Add frames from a frame file
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            error!(file = %path.display(), error = %e, "Unable to open frame file");
            e
        })?;

        let count = self.load_str(&content)?;
        info!(file = %path.display(), count, "Loaded frame file");
        Ok(count)
    }

    /// Add frames from text in frame file format.
    ///
    /// Frames without a name are called `Frame-N` after their position.
    /// Stops at the first frame that fails; returns how many were added.
    pub fn load_str(&mut self, content: &str) -> Result<usize> {
        let defs = parse_frames(content);
        for (idx, def) in defs.iter().enumerate() {
            let name = def.name.clone().unwrap_or_else(|| format!("Frame-{}", idx));
            self.add_frame(&name, &def.text)?;
        }
        Ok(defs.len())
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.frames.iter().position(|f| f.name() == name)
    }

    fn find_index(&self, name: &str) -> Option<usize> {
        if name.is_empty() {
            return None;
        }
        self.position(name)
            .or_else(|| self.frames.iter().position(|f| f.name().starts_with(name)))
    }

    /// Validate and encode a frame without adding it
    fn build_frame(&self, name: &str, text: &str) -> Result<Frame> {
        let name = name.trim();
        if name.is_empty() || name.len() > limits::FRAME_NAME_LENGTH {
            return Err(Error::InvalidName(name.to_string()));
        }
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::parse(format!("frame '{}' has no text", name)));
        }
        if text.len() > limits::MAX_TEXT_LENGTH {
            return Err(Error::TextTooLong {
                len: text.len(),
                max: limits::MAX_TEXT_LENGTH,
            });
        }

        let mut frame = Frame::new(name, text, self.config.frame_size);
        if let Err(e) = encode_frame(&mut frame, &self.config) {
            error!(frame = name, error = %e, "Failed to add frame");
            return Err(e);
        }
        Ok(frame)
    }
}

impl Drop for FrameStore {
    fn drop(&mut self) {
        debug!(frames = self.frames.len(), "Releasing frame store");
    }
}

impl<'a> IntoIterator for &'a FrameStore {
    type Item = &'a Frame;
    type IntoIter = std::slice::Iter<'a, Frame>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> FrameStore {
        FrameStore::new(FgenConfig::default())
    }

    #[test]
    fn test_add_and_find() {
        let mut store = store();
        store.add_frame("Frame0", "Ether()/IPv4()/UDP()").unwrap();
        store.add_frame("Frame10", "Ether()/IPv6()").unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.find_frame("Frame0").unwrap().name(), "Frame0");
        assert_eq!(store.find_frame("Frame1").unwrap().name(), "Frame10");
        assert_eq!(store.find_frame("Fr").unwrap().name(), "Frame0");
        assert!(store.find_frame("Other").is_none());
        assert!(store.find_frame("").is_none());
    }

    #[test]
    fn test_duplicate_name() {
        let mut store = store();
        store.add_frame("f", "Ether()").unwrap();
        let err = store.add_frame("f", "Ether()/IPv4()").unwrap_err();
        assert!(matches!(err, Error::AlreadyExists(_)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_invalid_names_and_text() {
        let mut store = store();
        assert!(matches!(store.add_frame("", "Ether()"), Err(Error::InvalidName(_))));
        let long = "x".repeat(limits::FRAME_NAME_LENGTH + 1);
        assert!(matches!(store.add_frame(&long, "Ether()"), Err(Error::InvalidName(_))));
        assert!(store.add_frame("f", "  ").is_err());
        let text = "Ether()/".repeat(600);
        assert!(matches!(store.add_frame("f", &text), Err(Error::TextTooLong { .. })));
        assert!(store.is_empty());
    }

    #[test]
    fn test_failed_encode_is_not_added() {
        let mut store = store();
        assert!(store.add_frame("bad", "Ether(bogus=1)").is_err());
        assert!(store.find_frame("bad").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_replace_frame() {
        let mut store = store();
        store.add_frame("f", "Ether()/Payload(size=100)").unwrap();
        let frame = store.replace_frame("f", "Ether()/Payload(size=200)").unwrap();
        assert_eq!(frame.data_len(), 196);
        assert_eq!(frame.text(), "Ether()/Payload(size=200)");

        assert!(store.replace_frame("f", "Nope()").is_err());
        assert_eq!(store.find_frame("f").unwrap().data_len(), 196);
        assert!(matches!(store.replace_frame("g", "Ether()"), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_remove_frame() {
        let mut store = store();
        store.add_frame("a", "Ether()").unwrap();
        store.add_frame("b", "Ether()").unwrap();
        let removed = store.remove_frame("a").unwrap();
        assert_eq!(removed.name(), "a");
        let names: Vec<&str> = store.iter().map(Frame::name).collect();
        assert_eq!(names, vec!["b"]);
        assert!(store.remove_frame("a").is_err());
    }

    #[test]
    fn test_load_strings() {
        let mut store = store();
        let count = store
            .load_strings(&["First := Ether()/IPv4()", "Ether()/IPv6()"])
            .unwrap();
        assert_eq!(count, 2);
        let names: Vec<&str> = (&store).into_iter().map(Frame::name).collect();
        assert_eq!(names, vec!["First", "frame-1"]);
    }

    #[test]
    fn test_load_str_names_unnamed_frames() {
        let mut store = store();
        let count = store.load_str(":= Ether()\nNamed := Ether()/IPv4()\n").unwrap();
        assert_eq!(count, 2);
        assert!(store.find_frame("Frame-0").is_some());
        assert!(store.find_frame("Named").is_some());
    }

    #[test]
    fn test_clear() {
        let mut store = store();
        store.clear();
        store.add_frame("a", "Ether()").unwrap();
        store.clear();
        assert!(store.is_empty());
        store.clear();
    }
}
