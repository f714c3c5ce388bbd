//! Error types for the image tools.
//!
//! Payloads are plain strings so errors can travel inside iced messages,
//! which must be `Clone`.

use std::io;
use thiserror::Error;

/// Anything that can go wrong while loading, processing or saving an image.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ToolError {
    /// Reading or writing a file failed
    #[error("IO error: {0}")]
    Io(String),

    /// The input bytes could not be decoded as an image
    #[error("Could not decode image: {0}")]
    Decode(String),

    /// The output could not be encoded
    #[error("Could not encode image: {0}")]
    Encode(String),

    /// Neither the magic bytes nor the extension match a known format
    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// The selected file has no content
    #[error("The selected file is empty")]
    EmptyInput,

    /// The selected file exceeds the input limit
    #[error("File is too large ({size} bytes, limit is {limit} bytes)")]
    InputTooLarge { size: u64, limit: u64 },

    /// Tool options are out of range or inconsistent
    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    /// The crop selection has no area inside the image
    #[error("The crop selection is empty")]
    EmptyCrop,

    /// The output would exceed the pixel budget
    #[error("Output of {width}x{height} pixels is too large")]
    TooLarge { width: u32, height: u32 },

    /// A size increase was asked for a target that is not above the original
    #[error("Target size {target} bytes must be larger than the current {current} bytes")]
    TargetTooSmall { current: u64, target: u64 },

    /// A size increase target exceeds the output limit
    #[error("Target size {target} bytes exceeds the limit of {limit} bytes")]
    TargetTooLarge { target: u64, limit: u64 },

    /// A background worker panicked or was cancelled
    #[error("Background task failed: {0}")]
    Worker(String),
}

/// Convenience result type for tool operations.
pub type ToolResult<T> = Result<T, ToolError>;

impl ToolError {
    pub fn decode<T: ToString>(err: T) -> Self {
        Self::Decode(err.to_string())
    }

    pub fn encode<T: ToString>(err: T) -> Self {
        Self::Encode(err.to_string())
    }

    pub fn invalid<T: Into<String>>(msg: T) -> Self {
        Self::InvalidOptions(msg.into())
    }
}

impl From<io::Error> for ToolError {
    fn from(err: io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_conversion_keeps_message() {
        let err: ToolError = io::Error::new(io::ErrorKind::NotFound, "missing.png").into();
        assert_eq!(err, ToolError::Io("missing.png".to_string()));
    }

    #[test]
    fn test_display_includes_sizes() {
        let err = ToolError::TargetTooSmall { current: 2048, target: 1024 };
        let text = err.to_string();
        assert!(text.contains("1024"));
        assert!(text.contains("2048"));
    }
}
