//! Error diffusion dithering.
//!
//! Kernels are registered by name in a [`KernelTable`] and resolved once
//! before a scan starts. During the scan, [`diffuse`] spreads each pixel's
//! residual into an [`ErrorBuffer`] that only holds the rows the kernel can
//! reach.
//!
//! # Kernels
//!
//! Seven historical kernels are predefined (see [`BUILTIN_KERNELS`]):
//!
//! - **FloydSteinberg**: 3x5 spread over 48
//! - **Burkes**: 4x5 over 32, propagates 137.5% as historically tabulated
//! - **Stucki**: 3x5 over 42
//! - **Atkinson**: 75% propagation, good for small palettes
//! - **Sierra family**: `Sierra-3`, `Sierra-2` and `Sierra-Lite`
//!
//! # Example
//!
//! ```
//! use colorquant_core::{diffuse, ErrorBuffer, KernelTable};
//!
//! let table = KernelTable::builtin();
//! let kernel = table.lookup("Sierra-Lite").unwrap();
//! let mut buffer = ErrorBuffer::for_kernel(kernel, 4);
//!
//! diffuse(kernel, 0, [40.0, 0.0, 0.0, 0.0], &mut buffer, false);
//! assert_eq!(buffer.accumulated(1), [20.0, 0.0, 0.0, 0.0]);
//! ```

mod kernel;
mod options;
mod table;

pub use kernel::{
    Kernel, KernelDefect, KernelSpec, Tap, ATKINSON, BUILTIN_KERNELS, BURKES, FLOYD_STEINBERG,
    SIERRA_2, SIERRA_3, SIERRA_LITE, STUCKI, WEIGHT_SUM_TOLERANCE,
};
pub use options::{QuantizeOptions, DEFAULT_KERNEL};
pub use table::KernelTable;

use crate::color::CHANNELS;

/// Error buffer for error diffusion.
///
/// Manages a sliding window of error rows, storing only the rows that the
/// diffusion kernel can reach (its row count). Each row is padded by the
/// kernel's horizontal overhang on both sides, so taps that fall off the
/// left or right edge land in padding that is never read.
///
/// # Usage Pattern
///
/// 1. Create buffer with `for_kernel(kernel, width)`
/// 2. For each row:
///    a. Read accumulated error with `accumulated(x)`
///    b. After processing a pixel, distribute its residual with [`diffuse`]
///    c. After the row is complete, call `advance_row()`
#[derive(Debug)]
pub struct ErrorBuffer {
    /// Error rows: rows[0] is the current row, rows[1] the next, etc.
    rows: Vec<Vec<[f32; CHANNELS]>>,
    /// Image width
    width: usize,
    /// Padding cells on each side of a row
    overhang: usize,
}

impl ErrorBuffer {
    /// Create a new zeroed error buffer.
    ///
    /// # Arguments
    ///
    /// * `width` - Image width in pixels
    /// * `row_depth` - Number of rows to track (kernel row count)
    /// * `overhang` - Padding on each side (kernel horizontal reach)
    pub fn new(width: usize, row_depth: usize, overhang: usize) -> Self {
        let padded = width + 2 * overhang;
        Self {
            rows: (0..row_depth.max(1))
                .map(|_| vec![[0.0; CHANNELS]; padded])
                .collect(),
            width,
            overhang,
        }
    }

    /// Create a buffer sized for `kernel` over an image `width` pixels wide.
    pub fn for_kernel(kernel: &Kernel, width: usize) -> Self {
        Self::new(width, kernel.rows(), kernel.overhang())
    }

    /// Image width this buffer was sized for.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows held.
    #[inline]
    pub fn row_depth(&self) -> usize {
        self.rows.len()
    }

    /// Accumulated error for a pixel in the current row.
    #[inline]
    pub fn accumulated(&self, x: usize) -> [f32; CHANNELS] {
        self.rows[0][x + self.overhang]
    }

    /// Add error to a not-yet-visited pixel.
    ///
    /// `x` may be negative or past the right edge by up to the overhang;
    /// such targets fall into padding. Targets further out, or `dy` beyond
    /// the buffer depth, are dropped.
    #[inline]
    pub fn add(&mut self, x: isize, dy: usize, error: [f32; CHANNELS]) {
        let Some(row) = self.rows.get_mut(dy) else {
            return;
        };
        let padded = x + self.overhang as isize;
        if padded < 0 {
            return;
        }
        if let Some(cell) = row.get_mut(padded as usize) {
            for (c, e) in cell.iter_mut().zip(error) {
                *c += e;
            }
        }
    }

    /// Advance to the next row.
    ///
    /// Rotates the row buffer: the first row is discarded, subsequent rows
    /// shift forward, and a zeroed row is added at the end. Rows that
    /// received error past the bottom of the image are simply never read.
    pub fn advance_row(&mut self) {
        self.rows.rotate_left(1);
        if let Some(last) = self.rows.last_mut() {
            last.fill([0.0; CHANNELS]);
        }
    }
}

/// Spread one pixel's residual into the buffer.
///
/// Every tap receives `weight * residual` per channel at `x + dx` on row
/// `dy` below the current one. With `mirrored` set (right-to-left rows in
/// serpentine mode) `dx` is negated.
#[inline]
pub fn diffuse(
    kernel: &Kernel,
    x: usize,
    residual: [f32; CHANNELS],
    buffer: &mut ErrorBuffer,
    mirrored: bool,
) {
    for tap in kernel.taps() {
        let dx = if mirrored { -tap.dx } else { tap.dx };
        let scaled = residual.map(|r| r * tap.weight);
        buffer.add(x as isize + dx as isize, tap.dy, scaled);
    }
}
