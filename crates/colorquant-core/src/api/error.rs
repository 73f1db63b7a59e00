//! Unified error type for the quantization API.

use thiserror::Error;

use crate::dither::KernelDefect;
use crate::palette::PaletteError;

/// Errors returned by kernel registration and quantization passes.
///
/// None of these carry a partially quantized raster: a failed pass drops
/// its buffers before the error reaches the caller.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuantizeError {
    /// A parameter is outside its valid range (e.g. zero colors requested)
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A kernel matrix failed validation at registration time
    #[error("malformed kernel {name:?}: {reason}")]
    MalformedKernel {
        /// Name the kernel was registered under
        name: String,
        /// What was wrong with the matrix
        reason: KernelDefect,
    },

    /// The requested kernel is not registered
    #[error("unknown kernel {0:?}")]
    UnknownKernel(String),

    /// The source image is inconsistent with its declared dimensions
    #[error("invalid image: {0}")]
    InvalidImage(String),

    /// Palette validation failed
    #[error("palette error: {0}")]
    Palette(#[from] PaletteError),

    /// The pass observed a cancellation request
    #[error("quantization canceled")]
    Canceled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            QuantizeError::InvalidParameter("numColors must be at least 1".into()).to_string(),
            "invalid parameter: numColors must be at least 1"
        );
        assert_eq!(
            QuantizeError::UnknownKernel("Bayer".into()).to_string(),
            "unknown kernel \"Bayer\""
        );
        assert_eq!(QuantizeError::Canceled.to_string(), "quantization canceled");
        assert_eq!(
            QuantizeError::MalformedKernel {
                name: "Wide".into(),
                reason: KernelDefect::NoAnchor,
            }
            .to_string(),
            "malformed kernel \"Wide\": row 0 must start with a zero-weight anchor cell"
        );
    }

    #[test]
    fn test_from_palette_error() {
        let err: QuantizeError = PaletteError::EmptyPalette.into();
        assert_eq!(err, QuantizeError::Palette(PaletteError::EmptyPalette));
    }
}
