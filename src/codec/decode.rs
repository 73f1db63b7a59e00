use crate::error::ProcessError;
use colorquant_core::Image;
use std::path::Path;

/// Decode a PNG or JPEG file into an RGBA source image.
///
/// The format is sniffed from the file contents, not the extension.
pub fn decode_file(path: &Path) -> Result<Image, ProcessError> {
    let reader = image::ImageReader::open(path)?.with_guessed_format()?;
    let decoded = reader
        .decode()
        .map_err(|e| ProcessError::ImageDecode(format!("{}: {e}", path.display())))?;
    to_source_image(decoded, &path.display().to_string())
}

/// Decode an in-memory PNG or JPEG.
pub fn decode_bytes(bytes: &[u8]) -> Result<Image, ProcessError> {
    let decoded =
        image::load_from_memory(bytes).map_err(|e| ProcessError::ImageDecode(e.to_string()))?;
    to_source_image(decoded, "in-memory image")
}

/// A raster the quantizer cannot take (e.g. zero-sized) is a decode failure.
fn to_source_image(decoded: image::DynamicImage, source: &str) -> Result<Image, ProcessError> {
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    tracing::debug!(width, height, "Decoded image");
    Image::from_rgba8(width as usize, height as usize, rgba.as_raw())
        .map_err(|e| ProcessError::ImageDecode(format!("{source}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use colorquant_core::Color;
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32, rgba: &[u8]) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        {
            let mut encoder = png::Encoder::new(&mut buf, width, height);
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(rgba).unwrap();
        }
        buf.into_inner()
    }

    #[test]
    fn test_decode_png_bytes() {
        let bytes = png_bytes(2, 1, &[255, 0, 0, 255, 0, 0, 255, 128]);
        let image = decode_bytes(&bytes).unwrap();

        assert_eq!(image.width(), 2);
        assert_eq!(image.height(), 1);
        assert_eq!(image.pixel(0, 0), Color::rgb(255, 0, 0));
        assert_eq!(image.pixel(1, 0), Color::rgba(0, 0, 255, 128));
    }

    #[test]
    fn test_decode_garbage_fails() {
        let err = decode_bytes(b"definitely not an image").unwrap_err();
        assert!(matches!(err, ProcessError::ImageDecode(_)));
    }

    #[test]
    fn test_empty_raster_is_decode_error() {
        let empty = image::DynamicImage::new_rgba8(0, 3);
        match to_source_image(empty, "empty.png") {
            Err(ProcessError::ImageDecode(msg)) => assert!(msg.starts_with("empty.png: "), "{msg}"),
            other => panic!("Expected ImageDecode, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = decode_file(&dir.path().join("missing.png")).unwrap_err();
        assert!(matches!(err, ProcessError::Io(_)));
    }

    #[test]
    fn test_decode_file_sniffs_format() {
        let dir = tempfile::tempdir().unwrap();
        // Wrong extension on purpose
        let path = dir.path().join("picture.jpg");
        std::fs::write(&path, png_bytes(1, 1, &[9, 8, 7, 255])).unwrap();

        let image = decode_file(&path).unwrap();
        assert_eq!(image.pixel(0, 0), Color::rgb(9, 8, 7));
    }
}
