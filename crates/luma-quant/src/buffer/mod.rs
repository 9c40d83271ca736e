//! Image storage.
//!
//! [`PixelBuffer`] owns a row-major array of elements and hands out
//! sub-rectangle views that share the same backing store. [`Sample`]
//! describes the scalar element types a transform can read from and write
//! back into a buffer.

mod pixel_buffer;
mod sample;

pub use pixel_buffer::PixelBuffer;
pub use sample::Sample;
