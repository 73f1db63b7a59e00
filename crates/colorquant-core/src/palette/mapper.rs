//! Nearest-color lookup against an ordered palette.
//!
//! Both lookups scan the palette in order with a strict `<` comparison, so
//! when several entries are equally close the lowest index wins.

use super::palette::Palette;
use crate::color::{Color, CHANNELS};

/// Find the palette entry nearest to `color`.
///
/// Returns `(index, squared_distance)`. Pure function: the result depends
/// only on the color and the palette.
///
/// # Example
///
/// ```
/// use colorquant_core::{nearest_color, Color, Palette};
///
/// let palette = Palette::new(&[Color::BLACK, Color::WHITE]).unwrap();
/// assert_eq!(nearest_color(Color::rgb(200, 200, 200), &palette), (1, 3 * 55 * 55));
/// ```
pub fn nearest_color(color: Color, palette: &Palette) -> (usize, u32) {
    let mut best_idx = 0;
    let mut best_dist = u32::MAX;

    for (i, &candidate) in palette.colors().iter().enumerate() {
        let dist = color.distance_squared(candidate);
        if dist < best_dist {
            best_dist = dist;
            best_idx = i;
            if dist == 0 {
                break;
            }
        }
    }

    (best_idx, best_dist)
}

/// Float variant of [`nearest_color`] for error-adjusted working colors.
///
/// `channels` holds intensities in `0.0..=255.0`; the returned distance is
/// the squared Euclidean distance in the same units.
pub fn nearest_channels(channels: &[f32; CHANNELS], palette: &Palette) -> (usize, f32) {
    let mut best_idx = 0;
    let mut best_dist = f32::MAX;

    for i in 0..palette.len() {
        let candidate = palette.channels(i);
        let mut dist = 0.0;
        for c in 0..CHANNELS {
            let d = channels[c] - candidate[c];
            dist += d * d;
        }
        if dist < best_dist {
            best_dist = dist;
            best_idx = i;
        }
    }

    (best_idx, best_dist)
}
