//! Luma estimation from RGB.
//!
//! Both formulas use the Rec. 601 weights `0.299 R + 0.587 G + 0.114 B` in
//! 16-bit fixed point (`19595 + 38469 + 7471 = 65535`). They are not
//! interchangeable: [`ranking_luma`] is an exact integer key whose total
//! order drives histogram binning, [`display_luma`] is the rounded gray
//! level written to output images.

use super::rgb::Rgb;

const WEIGHT_RED: u32 = 19595;
const WEIGHT_GREEN: u32 = 38469;
const WEIGHT_BLUE: u32 = 7471;
const WEIGHT_SUM: u32 = WEIGHT_RED + WEIGHT_GREEN + WEIGHT_BLUE;

/// Largest value [`ranking_luma`] can return (pure white).
pub const RANKING_LUMA_MAX: u32 = WEIGHT_SUM * 255;

/// Unbounded ranking key proportional to perceived luminance.
///
/// Range is `0..=RANKING_LUMA_MAX` (16,711,425). Integer arithmetic only, so
/// equal colors always produce equal keys and the ordering is exact.
///
/// # Example
/// ```
/// use luma_quant::{ranking_luma, Rgb};
/// assert_eq!(ranking_luma(Rgb::new(255, 0, 0)), 19595 * 255);
/// ```
#[inline]
pub fn ranking_luma(pixel: Rgb) -> u32 {
    WEIGHT_RED * pixel.red as u32
        + WEIGHT_GREEN * pixel.green as u32
        + WEIGHT_BLUE * pixel.blue as u32
}

/// Display gray level in `0..=255`.
///
/// Equal to `round(0.299 R + 0.587 G + 0.114 B)`, computed as the
/// ranking key divided by the weight sum with round-half-up.
///
/// # Example
/// ```
/// use luma_quant::{display_luma, Rgb};
/// assert_eq!(display_luma(Rgb::new(255, 0, 0)), 76);
/// assert_eq!(display_luma(Rgb::gray(200)), 200);
/// ```
#[inline]
pub fn display_luma(pixel: Rgb) -> u8 {
    let rounded = (ranking_luma(pixel) + WEIGHT_SUM / 2) / WEIGHT_SUM;
    rounded.min(255) as u8
}
