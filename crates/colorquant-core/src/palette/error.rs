//! Error types for palette operations
//!
//! This module provides error types for color parsing and palette validation.

use std::num::ParseIntError;

use thiserror::Error;

/// Error type for parsing hex color strings.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseColorError {
    /// Hex string has invalid length (must be 3, 6 or 8 characters after stripping '#')
    #[error("invalid hex color length (expected 3, 6 or 8 characters)")]
    InvalidLength,
    /// A character that is not a hex digit
    #[error("invalid hex digit {0:?}")]
    InvalidDigit(char),
    /// Invalid hexadecimal character encountered
    #[error("invalid hex character: {0}")]
    InvalidHex(#[from] ParseIntError),
}

/// Error type for palette validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PaletteError {
    /// No colors provided in palette
    #[error("palette cannot be empty")]
    EmptyPalette,
    /// More entries than an 8-bit index can address
    #[error("palette has {len} colors, at most {max} are supported")]
    TooManyColors {
        /// Number of colors supplied
        len: usize,
        /// Largest supported palette
        max: usize,
    },
    /// Invalid hex color string
    #[error("invalid color {input:?}: {source}")]
    ParseColor {
        /// The offending entry
        input: String,
        /// Why it failed to parse
        source: ParseColorError,
    },
}
