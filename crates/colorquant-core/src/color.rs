//! RGBA color type
//!
//! [`Color`] is the pixel type for source images and palette entries. All
//! distance and error arithmetic covers the four channels, so transparency
//! participates in matching just like the color channels do.

use std::fmt;
use std::str::FromStr;

use crate::palette::ParseColorError;

/// Number of channels per pixel (red, green, blue, alpha).
pub const CHANNELS: usize = 4;

/// Largest channel intensity.
pub const CHANNEL_MAX: f32 = 255.0;

/// An 8-bit RGBA color.
///
/// # Example
/// ```
/// use colorquant_core::Color;
///
/// let red = Color::rgb(255, 0, 0);
/// assert_eq!(red.a, 255);
/// assert_eq!("#ff0000".parse::<Color>().unwrap(), red);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
    /// Alpha channel (255 = opaque)
    pub a: u8,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    /// Create an opaque color.
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Create a color with an explicit alpha channel.
    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create a color from a byte array `[R, G, B, A]`.
    #[inline]
    pub const fn from_bytes(bytes: [u8; CHANNELS]) -> Self {
        Self::rgba(bytes[0], bytes[1], bytes[2], bytes[3])
    }

    /// Convert to a byte array `[R, G, B, A]`.
    #[inline]
    pub const fn to_bytes(self) -> [u8; CHANNELS] {
        [self.r, self.g, self.b, self.a]
    }

    /// Channel intensities as floats in `0.0..=255.0`.
    #[inline]
    pub fn to_channels(self) -> [f32; CHANNELS] {
        self.to_bytes().map(f32::from)
    }

    /// Squared Euclidean distance over all four channels.
    #[inline]
    pub fn distance_squared(self, other: Color) -> u32 {
        self.to_bytes()
            .iter()
            .zip(other.to_bytes().iter())
            .map(|(&a, &b)| {
                let d = a.abs_diff(b) as u32;
                d * d
            })
            .sum()
    }

    /// Returns true if the color is fully opaque.
    #[inline]
    pub fn is_opaque(self) -> bool {
        self.a == 255
    }
}

impl fmt::Display for Color {
    /// Formats as `#rrggbb`, or `#rrggbbaa` when not opaque.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if !self.is_opaque() {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

impl FromStr for Color {
    type Err = ParseColorError;

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`. The leading `#` is optional.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);

        if !hex.is_ascii() {
            return Err(ParseColorError::InvalidLength);
        }
        // from_str_radix alone would accept a sign
        if let Some(bad) = hex.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(ParseColorError::InvalidDigit(bad));
        }

        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);

        match hex.len() {
            3 => {
                let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).map(|v| v * 17);
                Ok(Color::rgb(nibble(0)?, nibble(1)?, nibble(2)?))
            }
            6 => Ok(Color::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Ok(Color::rgba(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => Err(ParseColorError::InvalidLength),
        }
    }
}
