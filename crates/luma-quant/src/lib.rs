#![allow(clippy::needless_range_loop)]

//! luma-quant: RGB to gray palette reduction
//!
//! This library turns 24-bit RGB images into gray images whose palette is
//! reduced to at most 256 ordered levels. Output pixels always have
//! `R = G = B` and the same dimensions as the input.
//!
//! # Quick Start
//!
//! ```
//! use luma_quant::{Filter, HistogramQuantizer, PixelBuffer, Rgb};
//!
//! let image = PixelBuffer::filled(16, 16, Rgb::new(255, 0, 0)).unwrap();
//! let gray = HistogramQuantizer::new().filter(&image).unwrap();
//!
//! assert_eq!(gray.width(), 16);
//! assert_eq!(gray.at(0, 0), Rgb::gray(76));
//! ```
//!
//! Filters can also be selected by name through [`FilterKind`]:
//!
//! ```
//! use luma_quant::{Execution, Filter, FilterKind, FilterSettings};
//!
//! let kind: FilterKind = "block".parse().unwrap();
//! let settings = FilterSettings {
//!     execution: Execution::Parallel,
//!     ..Default::default()
//! };
//! let filter = kind.build(settings);
//! assert_eq!(filter.name(), "block");
//! ```
//!
//! # Buffers and Views
//!
//! [`PixelBuffer`] is a row-major 2D buffer over a reference-counted store.
//! [`PixelBuffer::view`] cuts a rectangle out of it without copying; writes
//! through the view land in the parent. The block filter relies on this to
//! transform every 8x8 tile in place.
//!
//! # Two Lumas
//!
//! | Function | Range | Used For |
//! |----------|-------|----------|
//! | [`ranking_luma`] | `0..=16_711_425` | Exact ordering of colors by brightness |
//! | [`display_luma`] | `0..=255` | Gray level written to output |
//!
//! Both use the weights `0.299 R + 0.587 G + 0.114 B` in 16-bit fixed point.
//!
//! # Filters
//!
//! ```text
//! BlockQuantizer
//!   RGB --display_luma--> u8 plane (zero padded to 8k x 8m)
//!     |
//!     +-- per 8x8 view: DCT -> keep 4x4 low quadrant -> IDCT -> saturate
//!     |
//!     crop to input size --> gray RGB
//!
//! HistogramQuantizer
//!   RGB --ranking_luma--> keys
//!     |
//!     sort + dedup --> n distinct keys
//!     |
//!     +-- n <= 256: gray = display_luma
//!     +-- n  > 256: gray = rank bin, floor(i / (n / 256)), top key -> 255
//!
//! ChannelBalance
//!   RGB --channel means--> weights --> normalised channel average
//! ```
//!
//! Every filter accepts an [`Execution`] strategy; sequential and parallel
//! runs produce identical images.

pub mod buffer;
pub mod color;
pub mod dct;
pub mod error;
pub mod exec;
pub mod quantize;


pub use buffer::{PixelBuffer, Sample};
pub use color::{display_luma, ranking_luma, Rgb, RANKING_LUMA_MAX};
pub use error::QuantError;
pub use exec::Execution;
pub use quantize::{
    BlockQuantizer, ChannelBalance, Filter, FilterKind, FilterSettings, HistogramMapping,
    HistogramQuantizer, ParseFilterKindError, DEFAULT_RETAIN, MAX_LEVELS, MIN_BLOCK_DIMENSION,
};
