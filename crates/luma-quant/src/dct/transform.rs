//! Forward/inverse transform, coefficient masking and tile I/O.

use std::f64::consts::{FRAC_1_SQRT_2, PI};

use super::basis::DCT_BASIS;
use crate::buffer::{PixelBuffer, Sample};
use crate::error::QuantError;

/// Side length of a transform block.
pub const BLOCK_SIZE: usize = 8;

/// An 8x8 block of samples or coefficients, indexed `[row][col]`.
pub type Block = [[f64; BLOCK_SIZE]; BLOCK_SIZE];

/// Forward DCT in separable matrix form: `F = C·B·Cᵗ`.
pub fn forward(samples: &Block) -> Block {
    let c = &DCT_BASIS;

    // C·B
    let mut partial = [[0.0; BLOCK_SIZE]; BLOCK_SIZE];
    for v in 0..BLOCK_SIZE {
        for x in 0..BLOCK_SIZE {
            partial[v][x] = (0..BLOCK_SIZE).map(|y| c[v][y] * samples[y][x]).sum();
        }
    }

    // (C·B)·Cᵗ
    let mut out = [[0.0; BLOCK_SIZE]; BLOCK_SIZE];
    for v in 0..BLOCK_SIZE {
        for u in 0..BLOCK_SIZE {
            out[v][u] = (0..BLOCK_SIZE).map(|x| partial[v][x] * c[u][x]).sum();
        }
    }
    out
}

/// Inverse DCT in separable matrix form: `B = Cᵗ·F·C`.
pub fn inverse(coefficients: &Block) -> Block {
    let c = &DCT_BASIS;

    // Cᵗ·F
    let mut partial = [[0.0; BLOCK_SIZE]; BLOCK_SIZE];
    for y in 0..BLOCK_SIZE {
        for u in 0..BLOCK_SIZE {
            partial[y][u] = (0..BLOCK_SIZE).map(|v| c[v][y] * coefficients[v][u]).sum();
        }
    }

    // (Cᵗ·F)·C
    let mut out = [[0.0; BLOCK_SIZE]; BLOCK_SIZE];
    for y in 0..BLOCK_SIZE {
        for x in 0..BLOCK_SIZE {
            out[y][x] = (0..BLOCK_SIZE).map(|u| partial[y][u] * c[u][x]).sum();
        }
    }
    out
}

#[inline]
fn weight(k: usize) -> f64 {
    if k == 0 {
        FRAC_1_SQRT_2
    } else {
        1.0
    }
}

#[inline]
fn cosine(position: usize, frequency: usize) -> f64 {
    (((2 * position + 1) * frequency) as f64 * PI / 16.0).cos()
}

/// Forward DCT by direct summation.
///
/// `F[v][u] = 0.25·w(u)·w(v)·Σ_y Σ_x B[y][x]·cos((2x+1)uπ/16)·cos((2y+1)vπ/16)`
/// with `w(0) = 1/√2`, `w(k) = 1` otherwise. Slow; kept as the definition
/// the matrix form is checked against.
pub fn forward_reference(samples: &Block) -> Block {
    let mut out = [[0.0; BLOCK_SIZE]; BLOCK_SIZE];
    for v in 0..BLOCK_SIZE {
        for u in 0..BLOCK_SIZE {
            let mut sum = 0.0;
            for y in 0..BLOCK_SIZE {
                for x in 0..BLOCK_SIZE {
                    sum += samples[y][x] * cosine(x, u) * cosine(y, v);
                }
            }
            out[v][u] = 0.25 * weight(u) * weight(v) * sum;
        }
    }
    out
}

/// Inverse DCT by direct summation.
pub fn inverse_reference(coefficients: &Block) -> Block {
    let mut out = [[0.0; BLOCK_SIZE]; BLOCK_SIZE];
    for y in 0..BLOCK_SIZE {
        for x in 0..BLOCK_SIZE {
            let mut sum = 0.0;
            for v in 0..BLOCK_SIZE {
                for u in 0..BLOCK_SIZE {
                    sum += weight(u)
                        * weight(v)
                        * coefficients[v][u]
                        * cosine(x, u)
                        * cosine(y, v);
                }
            }
            out[y][x] = 0.25 * sum;
        }
    }
    out
}

/// Zero every coefficient whose row or column index is `>= retain`,
/// keeping the low-frequency `retain x retain` quadrant.
pub fn quantize(coefficients: &mut Block, retain: usize) {
    for (v, row) in coefficients.iter_mut().enumerate() {
        for (u, value) in row.iter_mut().enumerate() {
            if v >= retain || u >= retain {
                *value = 0.0;
            }
        }
    }
}

fn check_tile<T>(tile: &PixelBuffer<T>) -> Result<(), QuantError>
where
    T: Copy,
{
    if tile.width() != BLOCK_SIZE || tile.height() != BLOCK_SIZE {
        return Err(QuantError::InvalidDimension {
            width: tile.width(),
            height: tile.height(),
        });
    }
    Ok(())
}

/// Load an 8x8 buffer (usually a view) into a block of `f64` samples.
pub fn read_block<T: Sample>(tile: &PixelBuffer<T>) -> Result<Block, QuantError> {
    check_tile(tile)?;
    let mut block = [[0.0; BLOCK_SIZE]; BLOCK_SIZE];
    for (i, sample) in tile.to_vec().into_iter().enumerate() {
        block[i / BLOCK_SIZE][i % BLOCK_SIZE] = sample.to_f64();
    }
    Ok(block)
}

/// Store a block back into an 8x8 buffer, rounding and saturating each
/// sample to `T`'s range.
pub fn write_block<T: Sample>(tile: &mut PixelBuffer<T>, block: &Block) -> Result<(), QuantError> {
    check_tile(tile)?;
    let samples: Vec<T> = block
        .iter()
        .flat_map(|row| row.iter().map(|&value| T::from_f64_saturating(value)))
        .collect();
    tile.write_from(&samples)
}

/// Low-pass one 8x8 tile in place: forward, [`quantize`], inverse.
pub fn filter_tile<T: Sample>(tile: &mut PixelBuffer<T>, retain: usize) -> Result<(), QuantError> {
    let mut coefficients = forward(&read_block(tile)?);
    quantize(&mut coefficients, retain);
    write_block(tile, &inverse(&coefficients))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn max_difference(a: &Block, b: &Block) -> f64 {
        a.iter()
            .flatten()
            .zip(b.iter().flatten())
            .map(|(x, y)| (x - y).abs())
            .fold(0.0, f64::max)
    }

    /// Helper: a block with some structure in every frequency band.
    fn textured() -> Block {
        let mut block = [[0.0; BLOCK_SIZE]; BLOCK_SIZE];
        for (y, row) in block.iter_mut().enumerate() {
            for (x, value) in row.iter_mut().enumerate() {
                *value = ((x * 37 + y * 91 + x * y * 13) % 256) as f64;
            }
        }
        block
    }

    #[test]
    fn test_matrix_form_matches_reference() {
        let block = textured();
        let fast = forward(&block);
        let slow = forward_reference(&block);
        assert!(max_difference(&fast, &slow) < 1e-9);

        let fast_back = inverse(&fast);
        let slow_back = inverse_reference(&slow);
        assert!(max_difference(&fast_back, &slow_back) < 1e-9);
    }

    #[test]
    fn test_round_trip_is_identity() {
        let block = textured();
        assert!(max_difference(&inverse(&forward(&block)), &block) < 1e-9);
    }

    #[test]
    fn test_flat_block_has_only_dc() {
        let block = [[76.0; BLOCK_SIZE]; BLOCK_SIZE];
        let coefficients = forward(&block);

        // DC = 8 * mean for the orthonormal basis
        assert!((coefficients[0][0] - 608.0).abs() < 1e-9);
        for (v, row) in coefficients.iter().enumerate() {
            for (u, &value) in row.iter().enumerate() {
                if (v, u) != (0, 0) {
                    assert!(value.abs() < 1e-9, "AC[{v}][{u}] = {value}");
                }
            }
        }
    }

    #[test]
    fn test_quantize_keeps_low_quadrant() {
        let mut coefficients = [[1.0; BLOCK_SIZE]; BLOCK_SIZE];
        quantize(&mut coefficients, 4);

        let kept = coefficients.iter().flatten().filter(|&&v| v != 0.0).count();
        assert_eq!(kept, 16);
        assert_eq!(coefficients[3][3], 1.0);
        assert_eq!(coefficients[3][4], 0.0);
        assert_eq!(coefficients[4][0], 0.0);
    }

    #[test]
    fn test_quantize_retain_eight_is_noop() {
        let original = textured();
        let mut coefficients = original;
        quantize(&mut coefficients, 8);
        assert_eq!(coefficients, original);
    }

    #[test]
    fn test_read_block_rejects_wrong_size() {
        let image = PixelBuffer::<u8>::new(8, 7).unwrap();
        assert_eq!(
            read_block(&image).unwrap_err(),
            QuantError::InvalidDimension {
                width: 8,
                height: 7
            }
        );
    }

    #[test]
    fn test_write_block_saturates() {
        let mut tile = PixelBuffer::<u8>::new(8, 8).unwrap();
        let mut block = [[100.0; BLOCK_SIZE]; BLOCK_SIZE];
        block[0][0] = 300.0;
        block[7][7] = -40.0;
        write_block(&mut tile, &block).unwrap();

        assert_eq!(tile.at(0, 0), 255);
        assert_eq!(tile.at(7, 7), 0);
        assert_eq!(tile.at(3, 3), 100);
    }

    #[test]
    fn test_filter_tile_through_view() {
        let image = PixelBuffer::<i32>::filled(16, 8, 50).unwrap();
        let mut tile = image.view(8, 0, 8, 8).unwrap();
        tile.put(0, 0, 250);
        filter_tile(&mut tile, 4).unwrap();

        // Left tile untouched, right tile smoothed
        assert!(image.view(0, 0, 8, 8).unwrap().to_vec().iter().all(|&v| v == 50));
        assert!(image.at(0, 8) < 250);
        assert!(image.at(0, 9) > 50);
    }
}
