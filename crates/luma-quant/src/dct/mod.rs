//! 8x8 discrete cosine transform.
//!
//! Forward and inverse type-II DCT over 8x8 blocks, plus the low-pass
//! coefficient mask used by [`BlockQuantizer`](crate::BlockQuantizer).
//!
//! Coefficients are laid out `block[v][u]`: row index is vertical
//! frequency, column index horizontal frequency, `block[0][0]` is DC.
//!
//! Two formulations are provided and agree to within floating rounding:
//!
//! - [`forward`] / [`inverse`]: separable matrix form `F = C·B·Cᵗ`,
//!   `B = Cᵗ·F·C` against the precomputed basis [`DCT_BASIS`]
//! - [`forward_reference`] / [`inverse_reference`]: direct O(n⁴) sum
//!
//! The basis is orthonormal, so `inverse(forward(b)) == b` up to rounding.

mod basis;
mod transform;

pub use basis::DCT_BASIS;
pub use transform::{
    filter_tile, forward, forward_reference, inverse, inverse_reference, quantize, read_block,
    write_block, Block, BLOCK_SIZE,
};
