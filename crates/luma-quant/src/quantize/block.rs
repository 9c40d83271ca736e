//! Block DCT low-pass quantizer.
//!
//! The image is converted to a plane of display luma (`u8`, 0..=255), padded
//! with zeros on the right and bottom to a multiple of 8, and every 8x8
//! tile is transformed, stripped of its high frequencies and transformed
//! back in place through a view onto the plane. The plane is then cropped
//! back to the input size and replicated into R, G and B.
//!
//! Tiles are independent, so [`Execution::Parallel`] processes them on the
//! rayon pool. Reconstructed samples saturate to 0..=255.

use rayon::prelude::*;
use tracing::debug;

use super::Filter;
use crate::buffer::PixelBuffer;
use crate::color::{display_luma, Rgb};
use crate::dct::{filter_tile, BLOCK_SIZE};
use crate::error::QuantError;
use crate::exec::Execution;

/// Smallest accepted width and height.
pub const MIN_BLOCK_DIMENSION: usize = BLOCK_SIZE;

/// Side of the low-frequency coefficient quadrant kept per tile.
pub const DEFAULT_RETAIN: usize = 4;

/// Discards high spatial frequencies per 8x8 tile.
///
/// # Example
///
/// ```
/// use luma_quant::{BlockQuantizer, Filter, PixelBuffer, Rgb};
///
/// let image = PixelBuffer::filled(16, 16, Rgb::new(255, 0, 0)).unwrap();
/// let gray = BlockQuantizer::new().filter(&image).unwrap();
///
/// assert!(gray.to_vec().iter().all(|&p| p == Rgb::gray(76)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockQuantizer {
    retain: usize,
    execution: Execution,
}

impl Default for BlockQuantizer {
    fn default() -> Self {
        Self {
            retain: DEFAULT_RETAIN,
            execution: Execution::Sequential,
        }
    }
}

impl BlockQuantizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the kept quadrant size, clamped to `1..=8`.
    ///
    /// 8 keeps every coefficient (only rounding remains); 1 keeps DC only.
    #[inline]
    pub fn retain(mut self, retain: usize) -> Self {
        self.retain = retain.clamp(1, BLOCK_SIZE);
        self
    }

    #[inline]
    pub fn execution(mut self, execution: Execution) -> Self {
        self.execution = execution;
        self
    }

    #[inline]
    pub fn retained(&self) -> usize {
        self.retain
    }

    /// Build the zero-padded luma plane for `image`.
    fn luma_plane(&self, image: &PixelBuffer<Rgb>) -> Result<PixelBuffer<u8>, QuantError> {
        let padded_width = image.width().div_ceil(BLOCK_SIZE) * BLOCK_SIZE;
        let padded_height = image.height().div_ceil(BLOCK_SIZE) * BLOCK_SIZE;

        let plane = PixelBuffer::<u8>::new(padded_width, padded_height)?;
        let luma = self.execution.map(image, display_luma);
        plane
            .view(0, 0, image.width(), image.height())?
            .write_from(&luma.to_vec())?;
        Ok(plane)
    }
}

impl Filter for BlockQuantizer {
    fn name(&self) -> &'static str {
        "block"
    }

    fn filter(&self, image: &PixelBuffer<Rgb>) -> Result<PixelBuffer<Rgb>, QuantError> {
        let (width, height) = (image.width(), image.height());
        if width < MIN_BLOCK_DIMENSION || height < MIN_BLOCK_DIMENSION {
            return Err(QuantError::InvalidDimension { width, height });
        }

        let plane = self.luma_plane(image)?;
        let tiles = (0..plane.height())
            .step_by(BLOCK_SIZE)
            .flat_map(|y| (0..plane.width()).step_by(BLOCK_SIZE).map(move |x| (x, y)))
            .map(|(x, y)| plane.view(x, y, BLOCK_SIZE, BLOCK_SIZE))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            width,
            height,
            tiles = tiles.len(),
            retain = self.retain,
            execution = ?self.execution,
            "Filtering luma tiles"
        );

        let retain = self.retain;
        match self.execution {
            Execution::Sequential => tiles
                .into_iter()
                .try_for_each(|mut tile| filter_tile(&mut tile, retain))?,
            Execution::Parallel => tiles
                .into_par_iter()
                .try_for_each(|mut tile| filter_tile(&mut tile, retain))?,
        }

        Ok(plane.view(0, 0, width, height)?.map(Rgb::gray))
    }
}
