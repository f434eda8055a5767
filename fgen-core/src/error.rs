//! Error types for fgen

use thiserror::Error;

/// Result type alias for fgen operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for fgen
#[derive(Error, Debug)]
pub enum Error {
    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed frame text
    #[error("Parse error: {0}")]
    Parse(String),

    /// Layer text did not match any known protocol
    #[error("Unknown layer '{0}'")]
    UnknownLayer(String),

    /// Key not accepted by the layer
    #[error("{layer}: Invalid key '{key}'")]
    InvalidKey { layer: String, key: String },

    /// Value could not be parsed for a key
    #[error("Invalid value '{value}' for key '{key}': {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    /// A key/value pair did not split into exactly two tokens
    #[error("Invalid key/value pair '{0}'")]
    KeyValue(String),

    /// More layers than a frame can hold
    #[error("Too many layers, maximum is {0}")]
    TooManyLayers(usize),

    /// More parameters than a layer can hold
    #[error("Too many parameters in '{text}', maximum is {max}")]
    TooManyParams { text: String, max: usize },

    /// Text exceeds its maximum length
    #[error("Text length {len} exceeds maximum {max}")]
    TextTooLong { len: usize, max: usize },

    /// Frame data would not fit in the frame buffer
    #[error("Frame buffer overflow: need {need} bytes, capacity {capacity}")]
    BufferOverflow { need: usize, capacity: usize },

    /// Illegal layer ordering
    #[error("Invalid layer sequence: {0}")]
    InvalidSequence(String),

    /// Decode ran past the end of the input
    #[error("{layer} header truncated: need {need} bytes, {have} available")]
    Truncated {
        layer: &'static str,
        need: usize,
        have: usize,
    },

    /// Malformed hex byte string
    #[error("Invalid hex string: {0}")]
    InvalidHex(String),

    /// Invalid frame name
    #[error("Invalid frame name '{0}'")]
    InvalidName(String),

    /// Resource not found
    #[error("Frame not found: {0}")]
    NotFound(String),

    /// Resource already exists
    #[error("Frame already exists: {0}")]
    AlreadyExists(String),
}

impl Error {
    /// Create a parse error with a custom message
    pub fn parse<S: Into<String>>(msg: S) -> Self {
        Error::Parse(msg.into())
    }

    /// Create an invalid key error for a layer
    pub fn invalid_key<L: Into<String>, K: Into<String>>(layer: L, key: K) -> Self {
        Error::InvalidKey {
            layer: layer.into(),
            key: key.into(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value<K, V, R>(key: K, value: V, reason: R) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        R: Into<String>,
    {
        Error::InvalidValue {
            key: key.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a sequencing error
    pub fn sequence<S: Into<String>>(msg: S) -> Self {
        Error::InvalidSequence(msg.into())
    }

    /// True for errors caused by the frame text itself rather than capacity or I/O
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            Error::Parse(_)
                | Error::UnknownLayer(_)
                | Error::InvalidKey { .. }
                | Error::InvalidValue { .. }
                | Error::KeyValue(_)
        )
    }
}
