pub mod bench;
pub mod pipeline;

pub use bench::{bench_filters, BenchResult};
pub use pipeline::{image_info, FilterPipeline, FilterReport, ImageInfo, PipelineError};
