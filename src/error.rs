use colorquant_core::{PaletteError, QuantizeError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("Image decode error: {0}")]
    ImageDecode(String),

    #[error("Encode error: {0}")]
    Encode(String),

    #[error("Quantize error: {0}")]
    Quantize(#[from] QuantizeError),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Worker failed: {0}")]
    Worker(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<PaletteError> for ProcessError {
    fn from(e: PaletteError) -> Self {
        ProcessError::Quantize(QuantizeError::Palette(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_decode_error() {
        let error = ProcessError::ImageDecode("photo.jpg: unexpected EOF".to_string());
        assert_eq!(
            error.to_string(),
            "Image decode error: photo.jpg: unexpected EOF"
        );
    }

    #[test]
    fn test_encode_error() {
        let error = ProcessError::Encode("buffer too small".to_string());
        assert_eq!(error.to_string(), "Encode error: buffer too small");
    }

    #[test]
    fn test_config_error() {
        let error = ProcessError::Config("compression must be 1-100".to_string());
        assert_eq!(error.to_string(), "Config error: compression must be 1-100");
    }

    #[test]
    fn test_from_quantize_error() {
        let error: ProcessError = QuantizeError::UnknownKernel("Bayer".to_string()).into();
        assert_eq!(error.to_string(), "Quantize error: unknown kernel \"Bayer\"");
    }

    #[test]
    fn test_from_palette_error() {
        let error: ProcessError = PaletteError::EmptyPalette.into();
        match error {
            ProcessError::Quantize(QuantizeError::Palette(PaletteError::EmptyPalette)) => {}
            other => panic!("Expected Quantize(Palette) variant, got {other:?}"),
        }
    }

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.png");
        let error: ProcessError = io.into();
        assert_eq!(error.to_string(), "IO error: missing.png");
    }
}
