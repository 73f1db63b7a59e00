//! QuantizedImage: palette indices plus the palette they refer to.

use crate::color::{Color, CHANNELS};
use crate::palette::Palette;

/// The result of a quantization pass.
///
/// Stores one `u8` palette index per source pixel in row-major order, the
/// image dimensions, and the (possibly truncated) palette the indices refer
/// to. The indexed form is canonical; RGBA and RGB buffers are computed on
/// demand by looking up palette colors.
///
/// # Example
///
/// ```
/// use colorquant_core::{Palette, QuantizedImage};
///
/// let image = QuantizedImage::new(vec![0, 1, 1, 0], 2, 2, Palette::black_white());
///
/// assert_eq!(image.index_at(1, 0), 1);
/// assert_eq!(image.to_rgb().len(), 2 * 2 * 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct QuantizedImage {
    indices: Vec<u8>,
    width: usize,
    height: usize,
    palette: Palette,
}

impl QuantizedImage {
    /// Wrap quantized indices.
    ///
    /// Debug-asserts that `indices.len() == width * height` and that every
    /// index is within the palette.
    pub fn new(indices: Vec<u8>, width: usize, height: usize, palette: Palette) -> Self {
        debug_assert_eq!(
            indices.len(),
            width * height,
            "indices length ({}) must match width * height ({}x{})",
            indices.len(),
            width,
            height,
        );
        debug_assert!(indices.iter().all(|&i| (i as usize) < palette.len()));
        Self {
            indices,
            width,
            height,
            palette,
        }
    }

    /// Palette indices, row-major.
    #[inline]
    pub fn indices(&self) -> &[u8] {
        &self.indices
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

    /// Palette the indices refer to.
    #[inline]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Index of the pixel at `(x, y)`.
    #[inline]
    pub fn index_at(&self, x: usize, y: usize) -> u8 {
        self.indices[y * self.width + x]
    }

    /// Palette color of the pixel at `(x, y)`.
    #[inline]
    pub fn color_at(&self, x: usize, y: usize) -> Color {
        self.palette.color(self.index_at(x, y) as usize)
    }

    /// Expand to packed RGBA bytes, `width * height * 4` long.
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut rgba = Vec::with_capacity(self.indices.len() * CHANNELS);
        for &idx in &self.indices {
            rgba.extend_from_slice(&self.palette.color(idx as usize).to_bytes());
        }
        rgba
    }

    /// Expand to packed RGB bytes, dropping alpha. `width * height * 3` long.
    pub fn to_rgb(&self) -> Vec<u8> {
        let mut rgb = Vec::with_capacity(self.indices.len() * 3);
        for &idx in &self.indices {
            let color = self.palette.color(idx as usize);
            rgb.extend_from_slice(&[color.r, color.g, color.b]);
        }
        rgb
    }

    /// Take the index buffer, dropping the palette.
    pub fn into_indices(self) -> Vec<u8> {
        self.indices
    }
}
