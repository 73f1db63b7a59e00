//! Test fixtures: generated input images and settings.

use colorquant::codec::EncodeOptions;
use colorquant::models::ImageType;
use colorquant::services::BatchSettings;
use colorquant_core::{Color, Palette, QuantizeOptions};
use std::path::{Path, PathBuf};

/// Fixture palettes
pub mod palettes {
    use colorquant_core::{Color, Palette};

    pub fn black_white() -> Palette {
        Palette::black_white()
    }

    /// Black, white and the three primaries
    pub fn primaries() -> Palette {
        Palette::new(&[
            Color::BLACK,
            Color::WHITE,
            Color::rgb(255, 0, 0),
            Color::rgb(0, 255, 0),
            Color::rgb(0, 0, 255),
        ])
        .unwrap()
    }
}

/// RGBA bytes of a horizontal gray ramp over a red-to-blue vertical ramp
pub fn gradient_rgba(width: u32, height: u32) -> Vec<u8> {
    let mut rgba = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            let gray = (x * 255 / (width - 1).max(1)) as u8;
            let tint = (y * 255 / (height - 1).max(1)) as u8;
            rgba.extend_from_slice(&[gray.saturating_add(255 - tint) / 2, gray, tint, 255]);
        }
    }
    rgba
}

/// Write an RGBA PNG into `dir` and return its path
pub fn write_png(dir: &Path, name: &str, width: u32, height: u32, rgba: &[u8]) -> PathBuf {
    let path = dir.join(name);
    image::save_buffer(&path, rgba, width, height, image::ExtendedColorType::Rgba8)
        .expect("write fixture PNG");
    path
}

/// Write a gradient PNG fixture
pub fn write_gradient(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    write_png(dir, name, width, height, &gradient_rgba(width, height))
}

/// Write a solid-color PNG fixture
pub fn write_solid(dir: &Path, name: &str, width: u32, height: u32, color: Color) -> PathBuf {
    let rgba: Vec<u8> = (0..width * height).flat_map(|_| color.to_bytes()).collect();
    write_png(dir, name, width, height, &rgba)
}

/// Write a file that is not an image
pub fn write_garbage(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"this is not an image").expect("write garbage fixture");
    path
}

/// Indexed PNG settings
pub fn png_settings(palette: Palette, quantize: QuantizeOptions) -> BatchSettings {
    BatchSettings {
        palette,
        quantize,
        encode: EncodeOptions {
            image_type: ImageType::Png,
            quality: 100,
            optimize: false,
        },
    }
}
