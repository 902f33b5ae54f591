//! Error types for color parsing.

use thiserror::Error;

/// Errors produced while reading a color value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    /// The input is not a `#rrggbb` hex color.
    #[error("invalid color format '{input}': {reason}")]
    InvalidColorFormat { input: String, reason: &'static str },
}

impl ColorError {
    pub(crate) fn invalid(input: &str, reason: &'static str) -> Self {
        Self::InvalidColorFormat {
            input: input.to_string(),
            reason,
        }
    }
}

/// Result type for color operations.
pub type Result<T> = std::result::Result<T, ColorError>;
