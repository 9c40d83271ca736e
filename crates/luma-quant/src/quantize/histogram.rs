//! Histogram-rank quantizer.
//!
//! Pass 1 collects the sorted set of distinct ranking keys in the image and
//! builds a [`HistogramMapping`]. Pass 2 maps every pixel through it. The
//! sorted key set is fully materialised between the passes; each pass on
//! its own is pixel-independent.

use rayon::prelude::*;
use tracing::debug;

use super::Filter;
use crate::buffer::PixelBuffer;
use crate::color::{display_luma, ranking_luma, Rgb};
use crate::error::QuantError;
use crate::exec::Execution;

/// Number of output gray levels.
pub const MAX_LEVELS: usize = 256;

/// Order-preserving map from ranking keys to gray levels.
///
/// When an image has at most [`MAX_LEVELS`] distinct keys no binning is
/// needed and every pixel keeps its display luma. Otherwise the sorted
/// distinct keys are split evenly by rank into 256 bins: the key at sorted
/// position `i` of `n` goes to bin `floor(i / (n / 256))`, and the largest
/// key always lands in bin 255.
///
/// The ranked form is stored as a boundary table holding the smallest key of
/// each bin; a key maps to the last bin whose boundary does not exceed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistogramMapping {
    /// Few enough distinct keys; output is the display luma.
    Identity { distinct: usize },
    /// Rank binning; `boundaries[b]` is the smallest key in bin `b`.
    Ranked { distinct: usize, boundaries: Vec<u32> },
}

impl HistogramMapping {
    /// Build a mapping from an arbitrary, possibly repeating, key sequence.
    ///
    /// # Example
    ///
    /// ```
    /// use luma_quant::HistogramMapping;
    ///
    /// let mapping = HistogramMapping::build((0..1024u32).map(|k| k * 3));
    /// assert_eq!(mapping.distinct_count(), 1024);
    /// assert_eq!(mapping.bin(0), 0);
    /// assert_eq!(mapping.bin(1023 * 3), 255);
    /// ```
    pub fn build(keys: impl IntoIterator<Item = u32>) -> Self {
        let mut keys: Vec<u32> = keys.into_iter().collect();
        keys.sort_unstable();
        keys.dedup();
        Self::from_sorted_distinct(&keys)
    }

    /// Build from keys that are already sorted ascending with no duplicates.
    pub(crate) fn from_sorted_distinct(keys: &[u32]) -> Self {
        let distinct = keys.len();
        if distinct <= MAX_LEVELS {
            return HistogramMapping::Identity { distinct };
        }

        let increment = distinct as f64 / MAX_LEVELS as f64;
        let last_bin = MAX_LEVELS - 1;
        let mut boundaries = Vec::with_capacity(MAX_LEVELS);
        for (position, &key) in keys.iter().enumerate() {
            let bin = if position == distinct - 1 {
                last_bin
            } else {
                ((position as f64 / increment) as usize).min(last_bin)
            };
            while boundaries.len() <= bin {
                boundaries.push(key);
            }
        }

        HistogramMapping::Ranked {
            distinct,
            boundaries,
        }
    }

    /// Number of distinct keys the mapping was built from.
    pub fn distinct_count(&self) -> usize {
        match self {
            HistogramMapping::Identity { distinct } => *distinct,
            HistogramMapping::Ranked { distinct, .. } => *distinct,
        }
    }

    pub fn is_identity(&self) -> bool {
        matches!(self, HistogramMapping::Identity { .. })
    }

    /// Smallest key of each bin; empty for the identity mapping.
    pub fn boundaries(&self) -> &[u32] {
        match self {
            HistogramMapping::Identity { .. } => &[],
            HistogramMapping::Ranked { boundaries, .. } => boundaries,
        }
    }

    /// Bin index of a ranking key.
    ///
    /// For the identity mapping this is the key scaled back to 0..=255,
    /// matching [`display_luma`]. Keys below the first boundary map to 0.
    pub fn bin(&self, key: u32) -> u8 {
        match self {
            HistogramMapping::Identity { .. } => {
                let weight_sum = crate::color::RANKING_LUMA_MAX / 255;
                (key.saturating_add(weight_sum / 2) / weight_sum).min(255) as u8
            }
            HistogramMapping::Ranked { boundaries, .. } => {
                let upper = boundaries.partition_point(|&boundary| boundary <= key);
                upper.saturating_sub(1) as u8
            }
        }
    }

    /// Output gray level for a pixel.
    #[inline]
    pub fn level(&self, pixel: Rgb) -> u8 {
        match self {
            HistogramMapping::Identity { .. } => display_luma(pixel),
            HistogramMapping::Ranked { .. } => self.bin(ranking_luma(pixel)),
        }
    }
}

/// Maps the image's luma distribution onto at most 256 ordered gray levels.
///
/// # Example
///
/// ```
/// use luma_quant::{Filter, HistogramQuantizer, PixelBuffer, Rgb};
///
/// let image = PixelBuffer::from_vec(
///     2,
///     1,
///     vec![Rgb::new(255, 0, 0), Rgb::gray(10)],
/// )
/// .unwrap();
/// let gray = HistogramQuantizer::new().filter(&image).unwrap();
///
/// assert_eq!(gray.to_vec(), vec![Rgb::gray(76), Rgb::gray(10)]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistogramQuantizer {
    execution: Execution,
}

impl HistogramQuantizer {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn execution(mut self, execution: Execution) -> Self {
        self.execution = execution;
        self
    }

    /// Pass 1: build the mapping for `image`.
    pub fn mapping(&self, image: &PixelBuffer<Rgb>) -> HistogramMapping {
        let pixels = image.to_vec();
        let mut keys: Vec<u32> = match self.execution {
            Execution::Sequential => pixels.iter().map(|&p| ranking_luma(p)).collect(),
            Execution::Parallel => pixels.par_iter().map(|&p| ranking_luma(p)).collect(),
        };
        match self.execution {
            Execution::Sequential => keys.sort_unstable(),
            Execution::Parallel => keys.par_sort_unstable(),
        }
        keys.dedup();
        HistogramMapping::from_sorted_distinct(&keys)
    }
}

impl Filter for HistogramQuantizer {
    fn name(&self) -> &'static str {
        "histogram"
    }

    fn filter(&self, image: &PixelBuffer<Rgb>) -> Result<PixelBuffer<Rgb>, QuantError> {
        let mapping = self.mapping(image);
        debug!(
            width = image.width(),
            height = image.height(),
            distinct = mapping.distinct_count(),
            bypass = mapping.is_identity(),
            execution = ?self.execution,
            "Built luma histogram mapping"
        );

        // Pass 2
        Ok(self
            .execution
            .map(image, |pixel| Rgb::gray(mapping.level(pixel))))
    }
}
