//! Error types.
//!
//! Rendering itself never fails; errors only come from the boundary: decoding
//! input bytes and parsing option names.

use thiserror::Error;

/// Errors surfaced by markdansi.
///
/// # Recovery Strategies
///
/// | Error Variant | Recovery Strategy |
/// |--------------|-------------------|
/// | [`InvalidUtf8`](Error::InvalidUtf8) | Re-encode the input as UTF-8 |
/// | [`UnknownTheme`](Error::UnknownTheme) | Use one of [`ThemeName::ALL`](crate::ThemeName::ALL) |
/// | [`UnknownTableBorder`](Error::UnknownTableBorder) | Use `unicode`, `ascii` or `none` |
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Input bytes are not valid UTF-8.
    #[error("input is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    /// A theme name that matches no built-in preset.
    #[error("unknown theme: {0}")]
    UnknownTheme(String),

    /// A table border style name that is not recognized.
    #[error("unknown table border style: {0}")]
    UnknownTableBorder(String),
}

/// A specialized [`Result`] type for markdansi operations.
pub type Result<T> = std::result::Result<T, Error>;
