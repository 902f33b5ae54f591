//! Error types for theme state.
//!
//! Only [`ThemeError`] reaches callers of the manager. [`StoreError`] is the
//! vocabulary of the key/value store contract; the manager logs and absorbs
//! it so that theme application never depends on storage.

use std::io;

use hueshift_color::ColorError;
use thiserror::Error;

/// Errors returned by theme operations.
#[derive(Debug, Error)]
pub enum ThemeError {
    /// A mode string other than `light`, `dark` or `auto`.
    #[error("unknown theme mode '{0}' (expected light, dark or auto)")]
    UnknownThemeMode(String),

    /// A malformed accent color.
    #[error(transparent)]
    Color(#[from] ColorError),

    /// An invalid or unreadable [`ThemeConfig`](crate::ThemeConfig).
    #[error("invalid theme config: {0}")]
    Config(String),
}

/// Errors raised by a [`KeyValueStore`](crate::KeyValueStore).
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store cannot be used at all (disabled, quota exceeded, ...).
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// Reading or writing the backing file failed.
    #[error("storage I/O failed: {0}")]
    Io(#[from] io::Error),

    /// The backing data could not be decoded.
    #[error("storage data is corrupt: {0}")]
    Corrupt(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Corrupt(err.to_string())
    }
}

/// Result type for theme operations.
pub type Result<T> = std::result::Result<T, ThemeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_mode_display() {
        let err = ThemeError::UnknownThemeMode("sepia".into());
        assert!(err.to_string().contains("'sepia'"));
    }

    #[test]
    fn test_color_error_is_transparent() {
        let color_err = hueshift_color::Color::parse("#xyz").unwrap_err();
        let expected = color_err.to_string();
        let err: ThemeError = color_err.into();
        assert_eq!(err.to_string(), expected);
    }

    #[test]
    fn test_store_error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "read-only");
        let err: StoreError = io_err.into();
        assert!(matches!(err, StoreError::Io(_)));
        assert!(err.to_string().contains("read-only"));
    }
}
