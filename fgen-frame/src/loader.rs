//! Frame file parser
//!
//! A frame file holds lines of the form `Name := layer/layer/...`. The text
//! of a frame may continue on the following lines until the next line
//! containing `:=`; continuation lines are joined with `/`. Everything after
//! `//` on a line is a comment.

use fgen_core::{Error, Result};
use tracing::warn;

/// One frame found in a file or string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameDef {
    /// Name given before `:=`, if any
    pub name: Option<String>,
    pub text: String,
}

impl FrameDef {
    fn new(name: &str) -> Self {
        FrameDef {
            name: (!name.is_empty()).then(|| name.to_string()),
            text: String::new(),
        }
    }

    /// Append one line of frame text, keeping layers `/` separated
    fn push_line(&mut self, line: &str) {
        if line.is_empty() {
            return;
        }
        if !self.text.is_empty() && !self.text.ends_with('/') {
            self.text.push('/');
        }
        self.text.push_str(line);
    }

    fn finish(mut self) -> Option<Self> {
        while self.text.ends_with('/') {
            self.text.pop();
        }
        if self.text.is_empty() {
            warn!(name = ?self.name, "Frame has no text, skipped");
            None
        } else {
            Some(self)
        }
    }
}

/// Remove a `//` comment from a line
pub fn strip_comment(line: &str) -> &str {
    match line.find("//") {
        Some(pos) => &line[..pos],
        None => line,
    }
}

/// Parse the contents of a frame file.
///
/// Lines before the first `:=` line belong to no frame and are ignored.
pub fn parse_frames(content: &str) -> Vec<FrameDef> {
    let mut frames = Vec::new();
    let mut current: Option<FrameDef> = None;

    for line in content.lines() {
        let line = strip_comment(line).trim();
        if line.is_empty() {
            continue;
        }

        match line.find(":=") {
            Some(pos) => {
                if let Some(def) = current.take().and_then(FrameDef::finish) {
                    frames.push(def);
                }
                let mut def = FrameDef::new(line[..pos].trim());
                def.push_line(line[pos + 2..].trim());
                current = Some(def);
            }
            None => match current.as_mut() {
                Some(def) => def.push_line(line),
                None => warn!("Ignoring text outside of a frame: '{}'", line),
            },
        }
    }

    if let Some(def) = current.and_then(FrameDef::finish) {
        frames.push(def);
    }
    frames
}

/// Split a single `Name := text` string. The name is optional.
pub fn split_name(s: &str) -> Result<(Option<&str>, &str)> {
    match s.find(":=") {
        None => Ok((None, s.trim())),
        Some(pos) => {
            let name = s[..pos].trim();
            let text = s[pos + 2..].trim();
            if text.is_empty() {
                return Err(Error::InvalidName(s.to_string()));
            }
            Ok(((!name.is_empty()).then_some(name), text))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line_frames() {
        let frames = parse_frames("A := Ether()/IPv4()\nB:=Ether()\n");
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].name.as_deref(), Some("A"));
        assert_eq!(frames[0].text, "Ether()/IPv4()");
        assert_eq!(frames[1].name.as_deref(), Some("B"));
        assert_eq!(frames[1].text, "Ether()");
    }

    #[test]
    fn test_continuation_and_comments() {
        let content = "\
// test frames
Port0 := Ether( dst=00:01:02:03:04:05 )/   // outer header
         IPv4(dst=1.2.3.4)
         UDP(sport=5678, dport=1234)/
// between frames
 := Ether()/Payload(size=100)
";
        let frames = parse_frames(content);
        assert_eq!(frames.len(), 2);
        assert_eq!(
            frames[0].text,
            "Ether( dst=00:01:02:03:04:05 )/IPv4(dst=1.2.3.4)/UDP(sport=5678, dport=1234)"
        );
        assert!(frames[1].name.is_none());
        assert_eq!(frames[1].text, "Ether()/Payload(size=100)");
    }

    #[test]
    fn test_empty_frames_are_skipped() {
        let frames = parse_frames("A :=\nB := Ether()\n");
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].name.as_deref(), Some("B"));
    }

    #[test]
    fn test_text_before_first_frame_is_ignored() {
        let frames = parse_frames("Ether()\nA := IPv4()\n");
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].text, "IPv4()");
    }

    #[test]
    fn test_split_name() {
        assert_eq!(split_name("F0 := Ether()").unwrap(), (Some("F0"), "Ether()"));
        assert_eq!(split_name("Ether()/IPv4()").unwrap(), (None, "Ether()/IPv4()"));
        assert_eq!(split_name(":=Ether()").unwrap(), (None, "Ether()"));
        assert!(split_name("F0 :=   ").is_err());
    }
}
