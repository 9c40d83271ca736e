//! Pixel type and luma estimation.
//!
//! [`Rgb`] is the 8-bit triplet stored in every RGB [`PixelBuffer`](crate::PixelBuffer).
//! Two luma functions derive scalar brightness from it, and they are not
//! interchangeable:
//!
//! - [`ranking_luma`]: unbounded integer key, used only for ordering and binning
//! - [`display_luma`]: bounded 0..=255 gray level, used as an output value

mod luma;
mod rgb;

pub use luma::{display_luma, ranking_luma, RANKING_LUMA_MAX};
pub use rgb::Rgb;
