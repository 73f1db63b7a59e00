//! Palette types and nearest-color matching
//!
//! This module provides the ordered [`Palette`], the nearest-color lookups
//! used by the quantizer, and error types for parsing and validation.

mod error;
mod mapper;
#[allow(clippy::module_inception)]
mod palette;

pub use error::{PaletteError, ParseColorError};
pub use mapper::{nearest_channels, nearest_color};
pub use palette::{Palette, MAX_COLORS};
