use std::path::Path;
use std::time::{Duration, Instant};

use luma_quant::{Filter, FilterKind, HistogramQuantizer, PixelBuffer, QuantError, Rgb};
use serde::Serialize;

use crate::error::ImageIoError;
use crate::models::AppConfig;
use crate::rendering::{load_png, save_png};

/// Result of filtering one file
#[derive(Debug, Clone, PartialEq)]
pub struct FilterReport {
    pub width: usize,
    pub height: usize,
    pub filter: FilterKind,
    /// Time spent in the filter itself, excluding PNG I/O
    pub elapsed: Duration,
}

/// Basic facts about an image
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageInfo {
    pub width: usize,
    pub height: usize,
    /// Number of distinct ranking-luma keys
    pub distinct_keys: usize,
    /// Whether the histogram filter would keep display luma unchanged
    pub histogram_bypass: bool,
}

/// Error from the file pipeline
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Failed to read {}: {source}", .path.display())]
    Load {
        path: std::path::PathBuf,
        source: ImageIoError,
    },

    #[error("Failed to write {}: {source}", .path.display())]
    Save {
        path: std::path::PathBuf,
        source: ImageIoError,
    },

    #[error("Filter {filter} failed: {source}")]
    Filter {
        filter: FilterKind,
        source: QuantError,
    },
}

/// Load -> filter -> save, driven by an [`AppConfig`]
pub struct FilterPipeline {
    config: AppConfig,
    filter: Box<dyn Filter>,
}

impl FilterPipeline {
    pub fn new(config: AppConfig) -> Self {
        let filter = config.filter.build(config.settings());
        Self { config, filter }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Filter an in-memory image.
    pub fn apply(&self, image: &PixelBuffer<Rgb>) -> Result<PixelBuffer<Rgb>, PipelineError> {
        self.filter
            .filter(image)
            .map_err(|source| PipelineError::Filter {
                filter: self.config.filter,
                source,
            })
    }

    /// Filter `input` and write the result to `output`.
    pub fn run_file(&self, input: &Path, output: &Path) -> Result<FilterReport, PipelineError> {
        let image = load_png(input).map_err(|source| PipelineError::Load {
            path: input.to_path_buf(),
            source,
        })?;

        let start = Instant::now();
        let gray = self.apply(&image)?;
        let elapsed = start.elapsed();

        tracing::debug!(
            filter = self.filter.name(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Filter finished"
        );

        save_png(output, &gray, self.config.output.compression).map_err(|source| {
            PipelineError::Save {
                path: output.to_path_buf(),
                source,
            }
        })?;

        Ok(FilterReport {
            width: image.width(),
            height: image.height(),
            filter: self.config.filter,
            elapsed,
        })
    }
}

/// Describe `image` without filtering it.
pub fn image_info(image: &PixelBuffer<Rgb>) -> ImageInfo {
    let mapping = HistogramQuantizer::new().mapping(image);
    ImageInfo {
        width: image.width(),
        height: image.height(),
        distinct_keys: mapping.distinct_count(),
        histogram_bypass: mapping.is_identity(),
    }
}
