//! Assertion helpers for tests.

use colorquant_core::{Color, Palette};
use pretty_assertions::assert_eq;
use std::path::Path;

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";
const JPEG_SOI: &[u8] = &[0xFF, 0xD8];

/// Assert the file is an indexed PNG and return its decoded RGBA pixels
pub fn assert_indexed_png(path: &Path) -> image::RgbaImage {
    let bytes = std::fs::read(path)
        .unwrap_or_else(|e| panic!("Expected output at {}: {e}", path.display()));
    assert!(
        bytes.starts_with(PNG_SIGNATURE),
        "Expected PNG at {}, got {} bytes starting with {:?}",
        path.display(),
        bytes.len(),
        &bytes[..8.min(bytes.len())]
    );

    let decoder = png::Decoder::new(std::io::Cursor::new(&bytes));
    let reader = decoder.read_info().expect("PNG header");
    assert_eq!(
        reader.info().color_type,
        png::ColorType::Indexed,
        "Expected indexed color type"
    );

    image::load_from_memory(&bytes)
        .expect("decodable PNG")
        .to_rgba8()
}

/// Assert the file is a JPEG and return its decoded RGB pixels
pub fn assert_jpeg(path: &Path) -> image::RgbImage {
    let bytes = std::fs::read(path)
        .unwrap_or_else(|e| panic!("Expected output at {}: {e}", path.display()));
    assert!(
        bytes.starts_with(JPEG_SOI),
        "Expected JPEG at {}, got {:?}",
        path.display(),
        &bytes[..2.min(bytes.len())]
    );
    image::load_from_memory(&bytes)
        .expect("decodable JPEG")
        .to_rgb8()
}

/// Assert every pixel is one of the palette's colors
pub fn assert_only_palette_colors(pixels: &image::RgbaImage, palette: &Palette) {
    for (x, y, px) in pixels.enumerate_pixels() {
        let color = Color::from_bytes(px.0);
        assert!(
            palette.colors().contains(&color),
            "Pixel ({x}, {y}) is {color}, which is not in the palette"
        );
    }
}

/// Assert dimensions match
pub fn assert_dimensions(pixels: &image::RgbaImage, width: u32, height: u32) {
    assert_eq!(pixels.dimensions(), (width, height), "Unexpected dimensions");
}
