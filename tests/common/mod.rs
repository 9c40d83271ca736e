//! Common test infrastructure for grayquant integration tests.
//!
//! Each test file compiles its own copy of this module, so items may appear
//! unused from the perspective of a single test file even though they're
//! used elsewhere.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use grayquant::rendering::{load_png, save_png, Compression};
use luma_quant::{PixelBuffer, Rgb};

/// Colorful image with far more than 256 distinct luma values.
pub fn gradient(width: usize, height: usize) -> PixelBuffer<Rgb> {
    let data = (0..width * height)
        .map(|i| {
            let (x, y) = (i % width, i / width);
            Rgb::new(
                (x * 255 / width.max(2).saturating_sub(1)).min(255) as u8,
                (y * 255 / height.max(2).saturating_sub(1)).min(255) as u8,
                ((x * 13 + y * 7) % 256) as u8,
            )
        })
        .collect();
    PixelBuffer::from_vec(width, height, data).unwrap()
}

/// Write `image` as `name` inside `dir` and return its path.
pub fn write_png(dir: &Path, name: &str, image: &PixelBuffer<Rgb>) -> PathBuf {
    let path = dir.join(name);
    save_png(&path, image, Compression::Fast).unwrap();
    path
}

/// Read a PNG and assert every pixel is gray.
pub fn read_gray(path: &Path) -> PixelBuffer<Rgb> {
    let image = load_png(path).unwrap();
    assert!(
        image.to_vec().iter().all(|p| p.is_gray()),
        "{} contains non-gray pixels",
        path.display()
    );
    image
}
