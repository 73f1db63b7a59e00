#![allow(clippy::module_inception, clippy::needless_range_loop)]

//! colorquant-core: palette quantization with error-diffusion dithering
//!
//! Reduces a continuous-color raster to a small fixed palette while keeping
//! perceived gradients, by spreading each pixel's quantization error into
//! its not-yet-visited neighbors.
//!
//! # Quick Start
//!
//! ```
//! use colorquant_core::{Color, Image, KernelTable, Palette, Quantizer};
//!
//! let table = KernelTable::builtin();
//! let quantizer = Quantizer::new(&table, Palette::black_white());
//!
//! let image = Image::filled(8, 8, Color::rgb(128, 128, 128)).unwrap();
//! let result = quantizer
//!     .quantize(&image, 2, true, "FloydSteinberg", false)
//!     .unwrap();
//!
//! assert_eq!(result.width(), 8);
//! assert!(result.indices().contains(&0));
//! assert!(result.indices().contains(&1));
//! ```
//!
//! # Components
//!
//! - [`KernelTable`]: immutable registry of named diffusion kernels, built
//!   once at startup and borrowed by every [`Quantizer`]
//! - [`nearest_color`]: linear-scan palette lookup, lowest index on ties
//! - [`ErrorBuffer`] and [`diffuse`]: the per-pass error accumulator and
//!   the routine that spreads a residual through a kernel
//! - [`Quantizer`]: runs one sequential scan per image
//!
//! # Working Values
//!
//! Colors are 8-bit RGBA and all four channels take part in distance and
//! error arithmetic. During a dithered pass each pixel is lifted to `f32`,
//! the accumulated error is added, and every channel is clamped to
//! `0.0..=255.0` before matching. The residual of the clamped value is what
//! gets diffused.
//!
//! # Kernels
//!
//! `FloydSteinberg`, `Burkes`, `Stucki`, `Atkinson`, `Sierra-3`, `Sierra-2`
//! and `Sierra-Lite` are predefined with their historical tables. Atkinson
//! propagates 75% of the error and Burkes 137.5%; the rest propagate all of
//! it. Additional kernels can be registered before the table is shared:
//!
//! ```
//! use colorquant_core::KernelTable;
//!
//! let mut table = KernelTable::builtin();
//! table.register("Right", &[[0.0f32, 1.0]]).unwrap();
//! assert!(table.register("Right", &[[0.0f32, 1.0]]).is_err());
//! ```

pub mod api;
pub mod color;
pub mod dither;
pub mod image;
pub mod output;
pub mod palette;


pub use api::{CancelToken, PassState, QuantizeError, Quantizer};
pub use color::Color;
pub use dither::{
    diffuse, ErrorBuffer, Kernel, KernelDefect, KernelTable, QuantizeOptions, Tap,
    BUILTIN_KERNELS, DEFAULT_KERNEL,
};
pub use image::Image;
pub use output::QuantizedImage;
pub use palette::{nearest_color, Palette, PaletteError, ParseColorError};
