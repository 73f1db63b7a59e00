//! Quantization options.
//!
//! This module provides the [`QuantizeOptions`] struct, the builder-style
//! counterpart of the positional [`Quantizer::quantize`](crate::Quantizer::quantize)
//! arguments.

/// Default diffusion kernel name.
pub const DEFAULT_KERNEL: &str = "FloydSteinberg";

/// Configuration for one quantization pass.
///
/// # Defaults
///
/// - Colors: 256 (the whole palette, since no palette is larger)
/// - Dithering: enabled
/// - Kernel: `FloydSteinberg`
/// - Serpentine scanning: disabled
///
/// # Example
///
/// ```
/// use colorquant_core::QuantizeOptions;
///
/// let options = QuantizeOptions::new()
///     .num_colors(16)
///     .kernel("Atkinson")
///     .serpentine(true);
/// assert!(options.dither);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantizeOptions {
    /// Maximum number of palette entries to use (taken from the front).
    ///
    /// Must be at least 1. Default: `256`
    pub num_colors: usize,

    /// Diffuse quantization error to neighbors.
    ///
    /// When disabled every pixel maps independently to its nearest color
    /// and the kernel name is not resolved.
    ///
    /// Default: `true`
    pub dither: bool,

    /// Registered name of the diffusion kernel.
    ///
    /// Default: `"FloydSteinberg"`
    pub kernel: String,

    /// Scan odd rows right-to-left with the kernel mirrored.
    ///
    /// Default: `false`
    pub serpentine: bool,
}

impl Default for QuantizeOptions {
    fn default() -> Self {
        Self {
            num_colors: crate::palette::MAX_COLORS,
            dither: true,
            kernel: DEFAULT_KERNEL.to_string(),
            serpentine: false,
        }
    }
}

impl QuantizeOptions {
    /// Create options with default values.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of palette entries.
    #[inline]
    pub fn num_colors(mut self, num_colors: usize) -> Self {
        self.num_colors = num_colors;
        self
    }

    /// Enable or disable error diffusion.
    #[inline]
    pub fn dither(mut self, enabled: bool) -> Self {
        self.dither = enabled;
        self
    }

    /// Set the diffusion kernel by name.
    #[inline]
    pub fn kernel(mut self, name: impl Into<String>) -> Self {
        self.kernel = name.into();
        self
    }

    /// Set serpentine scanning mode.
    #[inline]
    pub fn serpentine(mut self, enabled: bool) -> Self {
        self.serpentine = enabled;
        self
    }
}
