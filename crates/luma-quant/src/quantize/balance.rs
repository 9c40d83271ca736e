//! Channel-balance gray conversion.
//!
//! Each channel is divided by its weight, the channel's mean relative to the
//! brightest channel mean, so an image with a strong color cast is
//! normalised before the channels are averaged.

use rayon::prelude::*;
use tracing::debug;

use super::Filter;
use crate::buffer::PixelBuffer;
use crate::color::Rgb;
use crate::error::QuantError;
use crate::exec::Execution;

/// Per-channel weights derived from the image's average color.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Weights {
    red: f64,
    green: f64,
    blue: f64,
}

impl Weights {
    /// `None` when every channel mean is zero.
    fn from_means(means: [u64; 3]) -> Option<Self> {
        let max = means.into_iter().max().unwrap_or(0);
        if max == 0 {
            return None;
        }
        let max = max as f64;
        Some(Self {
            red: means[0] as f64 / max,
            green: means[1] as f64 / max,
            blue: means[2] as f64 / max,
        })
    }

    #[inline]
    fn gray(&self, pixel: Rgb) -> u8 {
        fn term(value: u8, weight: f64) -> f64 {
            if weight > 0.0 {
                value as f64 / weight
            } else {
                0.0
            }
        }

        let sum = term(pixel.red, self.red) + term(pixel.green, self.green) + term(pixel.blue, self.blue);
        // (sum / dv) / 3 with dv the mean weight
        let total = self.red + self.green + self.blue;
        (sum / total).clamp(0.0, 255.0) as u8
    }
}

/// Gray conversion normalised by the image's mean color.
///
/// Channels whose mean is zero are left out; an all-black image stays
/// black. Output levels are truncated, not rounded.
///
/// # Example
///
/// ```
/// use luma_quant::{ChannelBalance, Filter, PixelBuffer, Rgb};
///
/// let image = PixelBuffer::filled(4, 4, Rgb::gray(90)).unwrap();
/// let gray = ChannelBalance::new().filter(&image).unwrap();
///
/// assert_eq!(gray.at(3, 3), Rgb::gray(90));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelBalance {
    execution: Execution,
}

impl ChannelBalance {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn execution(mut self, execution: Execution) -> Self {
        self.execution = execution;
        self
    }

    /// Integer per-channel means of `image`.
    fn channel_means(&self, image: &PixelBuffer<Rgb>) -> [u64; 3] {
        let pixels = image.to_vec();
        let add = |acc: [u64; 3], pixel: &Rgb| {
            [
                acc[0] + pixel.red as u64,
                acc[1] + pixel.green as u64,
                acc[2] + pixel.blue as u64,
            ]
        };
        let sums = match self.execution {
            Execution::Sequential => pixels.iter().fold([0; 3], add),
            Execution::Parallel => pixels
                .par_iter()
                .fold(|| [0u64; 3], add)
                .reduce(|| [0; 3], |a, b| [a[0] + b[0], a[1] + b[1], a[2] + b[2]]),
        };
        let count = pixels.len().max(1) as u64;
        sums.map(|sum| sum / count)
    }
}

impl Filter for ChannelBalance {
    fn name(&self) -> &'static str {
        "balance"
    }

    fn filter(&self, image: &PixelBuffer<Rgb>) -> Result<PixelBuffer<Rgb>, QuantError> {
        let means = self.channel_means(image);
        let Some(weights) = Weights::from_means(means) else {
            debug!(width = image.width(), height = image.height(), "Black image, nothing to balance");
            return PixelBuffer::new(image.width(), image.height());
        };
        debug!(?means, ?weights, execution = ?self.execution, "Balancing channels");

        Ok(self
            .execution
            .map(image, |pixel| Rgb::gray(weights.gray(pixel))))
    }
}
