//! Source raster accepted by the quantizer.

use crate::api::QuantizeError;
use crate::color::{Color, CHANNELS};

/// Immutable `width x height` grid of RGBA colors in row-major order.
///
/// The constructors guarantee `pixels.len() == width * height` and that
/// neither dimension is zero, so the quantizer never has to re-check.
///
/// # Example
///
/// ```
/// use colorquant_core::{Color, Image};
///
/// let image = Image::new(2, 1, vec![Color::BLACK, Color::WHITE]).unwrap();
/// assert_eq!(image.pixel(1, 0), Color::WHITE);
///
/// assert!(Image::new(2, 2, vec![Color::BLACK]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    width: usize,
    height: usize,
    pixels: Vec<Color>,
}

impl Image {
    /// Create an image from row-major pixels.
    pub fn new(width: usize, height: usize, pixels: Vec<Color>) -> Result<Self, QuantizeError> {
        if width == 0 || height == 0 {
            return Err(QuantizeError::InvalidImage(format!(
                "dimensions must be non-zero, got {width}x{height}"
            )));
        }
        let expected = width.checked_mul(height).ok_or_else(|| {
            QuantizeError::InvalidImage(format!("{width}x{height} overflows the pixel count"))
        })?;
        if pixels.len() != expected {
            return Err(QuantizeError::InvalidImage(format!(
                "{} pixels supplied for a {width}x{height} image (expected {expected})",
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Create an image from packed RGBA bytes (`[R, G, B, A, R, G, ...]`).
    pub fn from_rgba8(width: usize, height: usize, bytes: &[u8]) -> Result<Self, QuantizeError> {
        if bytes.len() % CHANNELS != 0 {
            return Err(QuantizeError::InvalidImage(format!(
                "{} bytes is not a whole number of RGBA pixels",
                bytes.len()
            )));
        }
        let pixels = bytes
            .chunks_exact(CHANNELS)
            .map(|px| Color::rgba(px[0], px[1], px[2], px[3]))
            .collect();
        Self::new(width, height, pixels)
    }

    /// Create an image where every pixel has the same color.
    pub fn filled(width: usize, height: usize, color: Color) -> Result<Self, QuantizeError> {
        Self::new(width, height, vec![color; width.saturating_mul(height)])
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// All pixels, row-major.
    #[inline]
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// One row of pixels.
    #[inline]
    pub fn row(&self, y: usize) -> &[Color] {
        &self.pixels[y * self.width..(y + 1) * self.width]
    }

    /// Pixel at `(x, y)`.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Color {
        self.pixels[y * self.width + x]
    }

    /// Mirror image with every row reversed.
    pub fn flipped_horizontal(&self) -> Image {
        let pixels = (0..self.height)
            .flat_map(|y| self.row(y).iter().rev().copied())
            .collect();
        Image {
            width: self.width,
            height: self.height,
            pixels,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_validates_length() {
        let err = Image::new(3, 2, vec![Color::BLACK; 5]).unwrap_err();
        assert_eq!(
            err,
            QuantizeError::InvalidImage(
                "5 pixels supplied for a 3x2 image (expected 6)".to_string()
            )
        );
    }

    #[test]
    fn test_new_rejects_zero_dimensions() {
        assert!(Image::new(0, 4, vec![]).is_err());
        assert!(Image::new(4, 0, vec![]).is_err());
        assert!(Image::filled(0, 0, Color::WHITE).is_err());
    }

    #[test]
    fn test_from_rgba8() {
        let bytes = [255, 0, 0, 255, 0, 0, 255, 128];
        let image = Image::from_rgba8(2, 1, &bytes).unwrap();
        assert_eq!(image.pixel(0, 0), Color::rgb(255, 0, 0));
        assert_eq!(image.pixel(1, 0), Color::rgba(0, 0, 255, 128));

        assert!(Image::from_rgba8(1, 1, &[1, 2, 3]).is_err());
    }

    #[test]
    fn test_rows_and_flip() {
        let a = Color::rgb(1, 1, 1);
        let b = Color::rgb(2, 2, 2);
        let c = Color::rgb(3, 3, 3);
        let d = Color::rgb(4, 4, 4);
        let image = Image::new(2, 2, vec![a, b, c, d]).unwrap();

        assert_eq!(image.row(1), &[c, d]);

        let flipped = image.flipped_horizontal();
        assert_eq!(flipped.pixels(), &[b, a, d, c]);
        assert_eq!(flipped.flipped_horizontal(), image);
    }
}
