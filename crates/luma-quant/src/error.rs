//! Error type for buffer and quantizer operations.
//!
//! Every failure is a precondition violation detected before any work is
//! done. Numeric saturation inside the transform is not an error; see
//! [`Sample::from_f64_saturating`](crate::buffer::Sample::from_f64_saturating).

use thiserror::Error;

/// Error returned by fallible operations in this crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuantError {
    /// Zero-sized image, or an image smaller than a filter's minimum tile.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimension { width: usize, height: usize },

    /// A requested rectangle does not fit inside its owner.
    #[error(
        "region {width}x{height} at ({origin_x}, {origin_y}) exceeds {owner_width}x{owner_height}"
    )]
    OutOfBounds {
        origin_x: usize,
        origin_y: usize,
        width: usize,
        height: usize,
        owner_width: usize,
        owner_height: usize,
    },

    /// Raw sample data does not match `width * height`.
    #[error("sample count mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}

impl QuantError {
    /// Out-of-bounds error for a single element at `(row, col)`.
    pub(crate) fn element(row: usize, col: usize, width: usize, height: usize) -> Self {
        QuantError::OutOfBounds {
            origin_x: col,
            origin_y: row,
            width: 1,
            height: 1,
            owner_width: width,
            owner_height: height,
        }
    }
}
