//! Palette-reducing filters.
//!
//! All filters implement [`Filter`]: they take an RGB image and return a
//! gray RGB image (R = G = B) of identical dimensions.
//!
//! - [`BlockQuantizer`]: 8x8 DCT low-pass over the display luma plane
//! - [`HistogramQuantizer`]: rank-based mapping of ranking luma onto at most
//!   256 ordered levels
//! - [`ChannelBalance`]: gray level from channel values normalised by the
//!   image's average color
//!
//! # Example
//!
//! ```
//! use luma_quant::{Filter, FilterKind, PixelBuffer, Rgb};
//!
//! let image = PixelBuffer::filled(16, 16, Rgb::new(255, 0, 0)).unwrap();
//! let filter = FilterKind::Histogram.build(Default::default());
//! let gray = filter.filter(&image).unwrap();
//!
//! assert_eq!(gray.at(0, 0), Rgb::gray(76));
//! ```

mod balance;
mod block;
mod histogram;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::buffer::PixelBuffer;
use crate::color::Rgb;
use crate::error::QuantError;
use crate::exec::Execution;

pub use balance::ChannelBalance;
pub use block::{BlockQuantizer, DEFAULT_RETAIN, MIN_BLOCK_DIMENSION};
pub use histogram::{HistogramMapping, HistogramQuantizer, MAX_LEVELS};

/// An RGB-to-gray filter.
pub trait Filter: Send + Sync {
    /// Short lowercase name, matching [`FilterKind`]'s string form.
    fn name(&self) -> &'static str;

    /// Produce a new gray image with the same width and height as `image`.
    fn filter(&self, image: &PixelBuffer<Rgb>) -> Result<PixelBuffer<Rgb>, QuantError>;
}

/// Settings shared by [`FilterKind::build`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterSettings {
    pub execution: Execution,
    /// Low-frequency quadrant kept by [`BlockQuantizer`].
    pub retain: usize,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            execution: Execution::default(),
            retain: DEFAULT_RETAIN,
        }
    }
}

/// Filter selection by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    Block,
    #[default]
    Histogram,
    Balance,
}

impl FilterKind {
    pub const ALL: [FilterKind; 3] = [FilterKind::Block, FilterKind::Histogram, FilterKind::Balance];

    pub fn as_str(self) -> &'static str {
        match self {
            FilterKind::Block => "block",
            FilterKind::Histogram => "histogram",
            FilterKind::Balance => "balance",
        }
    }

    /// Construct the selected filter.
    pub fn build(self, settings: FilterSettings) -> Box<dyn Filter> {
        match self {
            FilterKind::Block => Box::new(
                BlockQuantizer::new()
                    .retain(settings.retain)
                    .execution(settings.execution),
            ),
            FilterKind::Histogram => {
                Box::new(HistogramQuantizer::new().execution(settings.execution))
            }
            FilterKind::Balance => Box::new(ChannelBalance::new().execution(settings.execution)),
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown filter name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown filter '{0}' (expected block, histogram or balance)")]
pub struct ParseFilterKindError(String);

impl FromStr for FilterKind {
    type Err = ParseFilterKindError;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "block" | "dct" => Ok(FilterKind::Block),
            "histogram" | "rank" => Ok(FilterKind::Histogram),
            "balance" => Ok(FilterKind::Balance),
            _ => Err(ParseFilterKindError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_filter_kind() {
        assert_eq!("block".parse::<FilterKind>().unwrap(), FilterKind::Block);
        assert_eq!(" Histogram ".parse::<FilterKind>().unwrap(), FilterKind::Histogram);
        assert_eq!("dct".parse::<FilterKind>().unwrap(), FilterKind::Block);
        assert_eq!("BALANCE".parse::<FilterKind>().unwrap(), FilterKind::Balance);
    }

    #[test]
    fn test_parse_unknown_filter() {
        let err = "sepia".parse::<FilterKind>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown filter 'sepia' (expected block, histogram or balance)"
        );
    }

    #[test]
    fn test_display_round_trips_through_from_str() {
        for kind in FilterKind::ALL {
            assert_eq!(kind.to_string().parse::<FilterKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_build_names_match_kind() {
        for kind in FilterKind::ALL {
            let filter = kind.build(FilterSettings::default());
            assert_eq!(filter.name(), kind.as_str());
        }
    }

    #[test]
    fn test_deserialize_kind() {
        let kind: FilterKind = serde_yaml::from_str("block").unwrap();
        assert_eq!(kind, FilterKind::Block);
    }
}
