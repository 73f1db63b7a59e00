//! Ordered palette of target colors.
//!
//! Entry order is significant: it defines both the meaning of the output
//! indices and the tie-break used by nearest-color matching.

use std::str::FromStr;

use super::error::PaletteError;
use super::mapper::nearest_color;
use crate::color::{Color, CHANNELS};

/// Largest palette an 8-bit index raster can address.
pub const MAX_COLORS: usize = 256;

/// Channel step of the web-safe color cube.
const WEB_SAFE_STEP: u8 = 0x33;

/// An ordered palette of 1 to 256 colors.
///
/// Duplicate entries are allowed; a duplicate can never win a lookup because
/// the earlier entry always matches first.
///
/// Float channel values are precomputed once at construction so per-pixel
/// matching during a dithered pass does no conversion work.
///
/// # Example
///
/// ```
/// use colorquant_core::{Color, Palette};
///
/// let palette = Palette::new(&[Color::BLACK, Color::WHITE]).unwrap();
/// assert_eq!(palette.len(), 2);
/// assert_eq!(palette.find_nearest(Color::rgb(30, 30, 30)), (0, 3 * 900));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: Vec<Color>,
    channels: Vec<[f32; CHANNELS]>,
}

impl Palette {
    /// Create a palette from an ordered list of colors.
    ///
    /// # Errors
    ///
    /// - [`PaletteError::EmptyPalette`] if `colors` is empty
    /// - [`PaletteError::TooManyColors`] if more than [`MAX_COLORS`] are given
    pub fn new(colors: &[Color]) -> Result<Self, PaletteError> {
        if colors.is_empty() {
            return Err(PaletteError::EmptyPalette);
        }
        if colors.len() > MAX_COLORS {
            return Err(PaletteError::TooManyColors {
                len: colors.len(),
                max: MAX_COLORS,
            });
        }

        Ok(Self::from_vec(colors.to_vec()))
    }

    fn from_vec(colors: Vec<Color>) -> Self {
        let channels = colors.iter().map(|c| c.to_channels()).collect();
        Self { colors, channels }
    }

    /// Create a palette from hex color strings (`#rgb`, `#rrggbb`, `#rrggbbaa`).
    ///
    /// ```
    /// use colorquant_core::Palette;
    ///
    /// let palette = Palette::from_hex(&["#000", "#ffffff"]).unwrap();
    /// assert_eq!(palette.len(), 2);
    /// ```
    pub fn from_hex<S: AsRef<str>>(hex: &[S]) -> Result<Self, PaletteError> {
        let colors = hex
            .iter()
            .map(|s| {
                let s = s.as_ref();
                s.parse::<Color>().map_err(|source| PaletteError::ParseColor {
                    input: s.to_string(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(&colors)
    }

    /// The 216-color web-safe cube.
    ///
    /// Entries are ordered red-major, then green, then blue, each channel
    /// stepping through `0x00, 0x33, .. 0xff`. This is the default palette
    /// of the command-line tool.
    pub fn web_safe() -> Self {
        let levels = || (0..6u8).map(|i| i * WEB_SAFE_STEP);
        let colors = levels()
            .flat_map(|r| levels().flat_map(move |g| levels().map(move |b| Color::rgb(r, g, b))))
            .collect();
        Self::from_vec(colors)
    }

    /// Two-entry palette: black, then white.
    pub fn black_white() -> Self {
        Self::from_vec(vec![Color::BLACK, Color::WHITE])
    }

    /// Returns the number of colors in the palette.
    #[inline]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always `false`; empty palettes are rejected at construction.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Get the color at the given index.
    #[inline]
    pub fn color(&self, idx: usize) -> Color {
        self.colors[idx]
    }

    /// All colors in palette order.
    #[inline]
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    /// Precomputed float channels of the entry at `idx`.
    #[inline]
    pub fn channels(&self, idx: usize) -> [f32; CHANNELS] {
        self.channels[idx]
    }

    /// Keep at most the first `max_colors` entries (never fewer than one).
    pub fn truncated(&self, max_colors: usize) -> Palette {
        let keep = max_colors.clamp(1, self.len());
        if keep == self.len() {
            return self.clone();
        }
        Self {
            colors: self.colors[..keep].to_vec(),
            channels: self.channels[..keep].to_vec(),
        }
    }

    /// Find the entry nearest to `color`; see [`nearest_color`].
    #[inline]
    pub fn find_nearest(&self, color: Color) -> (usize, u32) {
        nearest_color(color, self)
    }

    /// Returns true when every entry is fully opaque.
    pub fn is_opaque(&self) -> bool {
        self.colors.iter().all(|c| c.is_opaque())
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::web_safe()
    }
}

impl FromStr for Palette {
    type Err = PaletteError;

    /// Parse a comma-separated list of hex colors, e.g. `"#000,#fff"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let entries: Vec<&str> = s
            .split(',')
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .collect();
        Self::from_hex(&entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::ParseColorError;

    #[test]
    fn test_empty_palette_rejected() {
        assert_eq!(Palette::new(&[]), Err(PaletteError::EmptyPalette));
        assert_eq!("".parse::<Palette>(), Err(PaletteError::EmptyPalette));
    }

    #[test]
    fn test_oversized_palette_rejected() {
        let colors = vec![Color::BLACK; MAX_COLORS + 1];
        assert_eq!(
            Palette::new(&colors),
            Err(PaletteError::TooManyColors {
                len: 257,
                max: 256
            })
        );
        assert!(Palette::new(&colors[..MAX_COLORS]).is_ok());
    }

    #[test]
    fn test_duplicates_allowed() {
        let palette = Palette::new(&[Color::WHITE, Color::WHITE]).unwrap();
        assert_eq!(palette.len(), 2);
    }

    #[test]
    fn test_web_safe_layout() {
        let palette = Palette::web_safe();
        assert_eq!(palette.len(), 216);
        assert_eq!(palette.color(0), Color::rgb(0, 0, 0));
        assert_eq!(palette.color(1), Color::rgb(0, 0, 0x33));
        assert_eq!(palette.color(6), Color::rgb(0, 0x33, 0));
        assert_eq!(palette.color(36), Color::rgb(0x33, 0, 0));
        assert_eq!(palette.color(215), Color::rgb(255, 255, 255));
        assert!(palette.is_opaque());
    }

    #[test]
    fn test_truncated_keeps_leading_entries() {
        let palette = Palette::web_safe();
        let small = palette.truncated(3);
        assert_eq!(small.colors(), &palette.colors()[..3]);
        assert_eq!(small.channels(2), palette.channels(2));

        assert_eq!(palette.truncated(1000).len(), 216);
        assert_eq!(palette.truncated(0).len(), 1);
    }

    #[test]
    fn test_parse_list() {
        let palette: Palette = "#000, #ff0000 ,ffffff".parse().unwrap();
        assert_eq!(
            palette.colors(),
            &[Color::BLACK, Color::rgb(255, 0, 0), Color::WHITE]
        );
    }

    #[test]
    fn test_parse_list_reports_offending_entry() {
        let err = "#000,#12".parse::<Palette>().unwrap_err();
        assert_eq!(
            err,
            PaletteError::ParseColor {
                input: "#12".to_string(),
                source: ParseColorError::InvalidLength,
            }
        );
        assert_eq!(
            err.to_string(),
            "invalid color \"#12\": invalid hex color length (expected 3, 6 or 8 characters)"
        );
    }
}
