//! Quantizer -- the entry point that runs a full image scan.
//!
//! [`Quantizer`] binds an immutable [`KernelTable`] and a [`Palette`] and
//! turns an [`Image`] into a [`QuantizedImage`], optionally diffusing the
//! quantization error with a named kernel.

use std::time::Instant;

use super::cancel::CancelToken;
use super::error::QuantizeError;
use crate::color::{CHANNELS, CHANNEL_MAX};
use crate::dither::{diffuse, ErrorBuffer, Kernel, KernelTable, QuantizeOptions};
use crate::image::Image;
use crate::output::QuantizedImage;
use crate::palette::{nearest_channels, nearest_color, Palette};

/// Lifecycle of a single quantization pass.
///
/// ```text
/// Idle -> Validating -> Scanning -> Done
///              \            \
///               +------------+--> Failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassState {
    /// Created, nothing checked yet
    Idle,
    /// Checking parameters and resolving the kernel
    Validating,
    /// Walking the pixels
    Scanning,
    /// Output produced
    Done,
    /// Aborted; no output is produced
    Failed,
}

impl PassState {
    /// Whether `next` is a legal successor of `self`.
    pub fn can_transition_to(self, next: PassState) -> bool {
        use PassState::*;
        matches!(
            (self, next),
            (Idle, Validating)
                | (Validating, Scanning)
                | (Validating, Failed)
                | (Scanning, Done)
                | (Scanning, Failed)
        )
    }

    /// Done and Failed have no successors.
    pub fn is_terminal(self) -> bool {
        matches!(self, PassState::Done | PassState::Failed)
    }
}

/// What validation resolved for the scan.
struct Plan<'a> {
    palette: Palette,
    /// `None` when dithering is disabled
    kernel: Option<&'a Kernel>,
    serpentine: bool,
}

/// State tracker for one pass.
struct Pass {
    state: PassState,
}

impl Pass {
    fn new() -> Self {
        Self {
            state: PassState::Idle,
        }
    }

    fn enter(&mut self, next: PassState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal pass transition {:?} -> {:?}",
            self.state,
            next
        );
        self.state = next;
    }

    fn fail<T>(&mut self, err: QuantizeError) -> Result<T, QuantizeError> {
        self.enter(PassState::Failed);
        tracing::debug!(error = %err, "Quantization pass failed");
        Err(err)
    }
}

/// Palette quantizer with optional error diffusion.
///
/// The kernel table is borrowed, never mutated, and can be shared by any
/// number of quantizers running on different threads. Each call to
/// [`quantize()`](Self::quantize) is an independent, strictly sequential
/// pass with its own error buffer.
///
/// # Example
///
/// ```
/// use colorquant_core::{Color, Image, KernelTable, Palette, Quantizer};
///
/// let table = KernelTable::builtin();
/// let palette = Palette::new(&[Color::rgb(255, 0, 0), Color::rgb(0, 0, 255)]).unwrap();
/// let quantizer = Quantizer::new(&table, palette);
///
/// let red = Color::rgb(255, 0, 0);
/// let blue = Color::rgb(0, 0, 255);
/// let image = Image::new(2, 2, vec![red, red, blue, blue]).unwrap();
///
/// let result = quantizer
///     .quantize(&image, 2, false, "FloydSteinberg", false)
///     .unwrap();
/// assert_eq!(result.indices(), &[0, 0, 1, 1]);
/// ```
#[derive(Debug, Clone)]
pub struct Quantizer<'k> {
    kernels: &'k KernelTable,
    palette: Palette,
}

impl<'k> Quantizer<'k> {
    /// Create a quantizer over `palette`.
    pub fn new(kernels: &'k KernelTable, palette: Palette) -> Self {
        Self { kernels, palette }
    }

    /// Create a quantizer over the 216-color web-safe palette.
    pub fn with_default_palette(kernels: &'k KernelTable) -> Self {
        Self::new(kernels, Palette::web_safe())
    }

    /// The full (untruncated) palette.
    #[inline]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// The kernel table names are resolved against.
    #[inline]
    pub fn kernels(&self) -> &'k KernelTable {
        self.kernels
    }

    /// Quantize `source` to at most `num_colors` palette entries.
    ///
    /// # Arguments
    ///
    /// * `num_colors` - Use only the first `num_colors` palette entries (>= 1)
    /// * `dither_enabled` - Diffuse error with `kernel_name`
    /// * `kernel_name` - Registered kernel; ignored when not dithering
    /// * `serpentine` - Alternate scan direction on odd rows
    ///
    /// # Errors
    ///
    /// - [`QuantizeError::InvalidParameter`] if `num_colors` is 0
    /// - [`QuantizeError::UnknownKernel`] if dithering with an unregistered kernel
    pub fn quantize(
        &self,
        source: &Image,
        num_colors: usize,
        dither_enabled: bool,
        kernel_name: &str,
        serpentine: bool,
    ) -> Result<QuantizedImage, QuantizeError> {
        let options = QuantizeOptions::new()
            .num_colors(num_colors)
            .dither(dither_enabled)
            .kernel(kernel_name)
            .serpentine(serpentine);
        self.quantize_with(source, &options, None)
    }

    /// Quantize with structured options and an optional cancellation token.
    ///
    /// The token is checked before every row. Once it is set the pass fails
    /// with [`QuantizeError::Canceled`] and the partial raster is dropped.
    pub fn quantize_with(
        &self,
        source: &Image,
        options: &QuantizeOptions,
        cancel: Option<&CancelToken>,
    ) -> Result<QuantizedImage, QuantizeError> {
        let mut pass = Pass::new();

        pass.enter(PassState::Validating);
        let plan = match self.validate(options) {
            Ok(plan) => plan,
            Err(err) => return pass.fail(err),
        };

        pass.enter(PassState::Scanning);
        let start = Instant::now();
        tracing::debug!(
            width = source.width(),
            height = source.height(),
            colors = plan.palette.len(),
            kernel = plan.kernel.map(Kernel::name),
            serpentine = plan.serpentine,
            "Starting quantization pass"
        );

        let indices = match plan.kernel {
            Some(kernel) => scan_dithered(source, &plan.palette, kernel, plan.serpentine, cancel),
            None => scan_direct(source, &plan.palette, cancel),
        };
        let indices = match indices {
            Ok(indices) => indices,
            Err(err) => return pass.fail(err),
        };

        pass.enter(PassState::Done);
        tracing::debug!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Quantization pass finished"
        );
        Ok(QuantizedImage::new(
            indices,
            source.width(),
            source.height(),
            plan.palette,
        ))
    }

    fn validate(&self, options: &QuantizeOptions) -> Result<Plan<'k>, QuantizeError> {
        if options.num_colors < 1 {
            return Err(QuantizeError::InvalidParameter(
                "numColors must be at least 1".to_string(),
            ));
        }

        let kernel = if options.dither {
            Some(self.kernels.lookup(&options.kernel)?)
        } else {
            None
        };

        Ok(Plan {
            palette: self.palette.truncated(options.num_colors),
            kernel,
            serpentine: options.serpentine,
        })
    }
}

fn check_canceled(cancel: Option<&CancelToken>, row: usize) -> Result<(), QuantizeError> {
    if cancel.is_some_and(CancelToken::is_canceled) {
        tracing::debug!(row, "Quantization pass canceled");
        return Err(QuantizeError::Canceled);
    }
    Ok(())
}

/// Map every pixel independently to its nearest palette entry.
fn scan_direct(
    source: &Image,
    palette: &Palette,
    cancel: Option<&CancelToken>,
) -> Result<Vec<u8>, QuantizeError> {
    let mut indices = Vec::with_capacity(source.width() * source.height());
    for y in 0..source.height() {
        check_canceled(cancel, y)?;
        indices.extend(
            source
                .row(y)
                .iter()
                .map(|&color| nearest_color(color, palette).0 as u8),
        );
    }
    Ok(indices)
}

/// Error diffusion scan.
fn scan_dithered(
    source: &Image,
    palette: &Palette,
    kernel: &Kernel,
    serpentine: bool,
    cancel: Option<&CancelToken>,
) -> Result<Vec<u8>, QuantizeError> {
    let width = source.width();
    let mut indices = vec![0u8; width * source.height()];
    let mut buffer = ErrorBuffer::for_kernel(kernel, width);

    for y in 0..source.height() {
        check_canceled(cancel, y)?;

        let mirrored = serpentine && y % 2 == 1;
        let x_range: Box<dyn Iterator<Item = usize>> = if mirrored {
            Box::new((0..width).rev())
        } else {
            Box::new(0..width)
        };

        let row = source.row(y);
        for x in x_range {
            let raw = row[x].to_channels();
            let accumulated = buffer.accumulated(x);
            let mut working = [0.0f32; CHANNELS];
            for c in 0..CHANNELS {
                working[c] = (raw[c] + accumulated[c]).clamp(0.0, CHANNEL_MAX);
            }

            let (idx, _) = nearest_channels(&working, palette);
            indices[y * width + x] = idx as u8;

            let target = palette.channels(idx);
            let residual = std::array::from_fn(|c| working[c] - target[c]);
            diffuse(kernel, x, residual, &mut buffer, mirrored);
        }

        buffer.advance_row();
    }

    Ok(indices)
}
