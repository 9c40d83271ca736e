//! Timing harness comparing the filters on one image.

use std::time::{Duration, Instant};

use luma_quant::{Execution, FilterKind, FilterSettings, PixelBuffer, Rgb};
use serde::Serialize;

/// Timing of one filter over several runs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchResult {
    pub filter: FilterKind,
    pub iterations: usize,
    pub mean: Duration,
    pub fastest: Duration,
}

/// Run every filter `iterations` times on `image`.
///
/// Filters that reject the image (the block filter on images smaller
/// than 8x8) are skipped with a warning.
pub fn bench_filters(
    image: &PixelBuffer<Rgb>,
    iterations: usize,
    execution: Execution,
) -> Vec<BenchResult> {
    let iterations = iterations.max(1);
    let settings = FilterSettings {
        execution,
        ..Default::default()
    };

    let mut results = Vec::with_capacity(FilterKind::ALL.len());
    'filters: for kind in FilterKind::ALL {
        let filter = kind.build(settings);
        let mut total = Duration::ZERO;
        let mut fastest = Duration::MAX;
        for _ in 0..iterations {
            let start = Instant::now();
            if let Err(e) = filter.filter(image) {
                tracing::warn!(filter = %kind, %e, "Skipping filter");
                continue 'filters;
            }
            let elapsed = start.elapsed();
            total += elapsed;
            fastest = fastest.min(elapsed);
        }
        let mean = total / iterations as u32;
        tracing::debug!(filter = %kind, mean_us = mean.as_micros() as u64, "Benchmarked");
        results.push(BenchResult {
            filter: kind,
            iterations,
            mean,
            fastest,
        });
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bench_runs_every_filter() {
        let image = PixelBuffer::filled(16, 16, Rgb::new(10, 20, 30)).unwrap();
        let results = bench_filters(&image, 2, Execution::Sequential);

        let kinds: Vec<FilterKind> = results.iter().map(|r| r.filter).collect();
        assert_eq!(kinds, FilterKind::ALL.to_vec());
        assert!(results.iter().all(|r| r.iterations == 2));
        assert!(results.iter().all(|r| r.fastest <= r.mean));
    }

    #[test]
    fn test_bench_skips_rejecting_filter() {
        let image = PixelBuffer::filled(4, 4, Rgb::gray(1)).unwrap();
        let results = bench_filters(&image, 1, Execution::Parallel);

        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.filter != FilterKind::Block));
    }

    #[test]
    fn test_zero_iterations_runs_once() {
        let image = PixelBuffer::filled(8, 8, Rgb::gray(1)).unwrap();
        let results = bench_filters(&image, 0, Execution::Sequential);
        assert!(results.iter().all(|r| r.iterations == 1));
    }
}
