//! End-to-end tests: PNG on disk -> filter -> PNG on disk.

mod common;

use std::io::Write;

use grayquant::models::{AppConfig, BlockConfig};
use grayquant::services::{image_info, FilterPipeline, PipelineError};
use luma_quant::{display_luma, Execution, FilterKind, PixelBuffer, Rgb};
use pretty_assertions::assert_eq;

#[test]
fn test_every_filter_writes_gray_png_of_same_size() {
    let dir = tempfile::tempdir().unwrap();
    let input = common::write_png(dir.path(), "in.png", &common::gradient(37, 23));

    for filter in FilterKind::ALL {
        let output = dir.path().join(format!("{filter}.png"));
        let pipeline = FilterPipeline::new(AppConfig {
            filter,
            ..Default::default()
        });
        let report = pipeline.run_file(&input, &output).unwrap();

        assert_eq!((report.width, report.height), (37, 23));
        assert_eq!(report.filter, filter);

        let gray = common::read_gray(&output);
        assert_eq!((gray.width(), gray.height()), (37, 23));
    }
}

#[test]
fn test_histogram_spreads_many_levels_over_full_range() {
    let dir = tempfile::tempdir().unwrap();
    let input = common::write_png(dir.path(), "in.png", &common::gradient(64, 64));
    let output = dir.path().join("out.png");

    FilterPipeline::new(AppConfig::default())
        .run_file(&input, &output)
        .unwrap();

    let levels: Vec<u8> = common::read_gray(&output)
        .to_vec()
        .iter()
        .map(|p| p.red)
        .collect();
    assert_eq!(levels.iter().min(), Some(&0));
    assert_eq!(levels.iter().max(), Some(&255));
}

#[test]
fn test_few_colors_keep_display_luma() {
    let dir = tempfile::tempdir().unwrap();
    let colors = [Rgb::new(255, 0, 0), Rgb::new(0, 255, 0), Rgb::new(0, 0, 255)];
    let data = (0..9 * 9).map(|i| colors[i % 3]).collect();
    let image = PixelBuffer::from_vec(9, 9, data).unwrap();
    let input = common::write_png(dir.path(), "in.png", &image);
    let output = dir.path().join("out.png");

    FilterPipeline::new(AppConfig::default())
        .run_file(&input, &output)
        .unwrap();

    let gray = common::read_gray(&output);
    for (before, after) in image.to_vec().iter().zip(gray.to_vec()) {
        assert_eq!(after.red, display_luma(*before));
    }
}

#[test]
fn test_block_filter_rejects_tiny_image() {
    let dir = tempfile::tempdir().unwrap();
    let input = common::write_png(dir.path(), "in.png", &common::gradient(5, 5));
    let output = dir.path().join("out.png");

    let pipeline = FilterPipeline::new(AppConfig {
        filter: FilterKind::Block,
        ..Default::default()
    });
    let err = pipeline.run_file(&input, &output).unwrap_err();

    assert!(matches!(err, PipelineError::Filter { .. }));
    assert!(!output.exists());
}

#[test]
fn test_parallel_output_matches_sequential_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let input = common::write_png(dir.path(), "in.png", &common::gradient(40, 33));

    for filter in FilterKind::ALL {
        let mut outputs = Vec::new();
        for execution in [Execution::Sequential, Execution::Parallel] {
            let output = dir.path().join(format!("{filter}-{execution:?}.png"));
            FilterPipeline::new(AppConfig {
                filter,
                execution,
                block: BlockConfig { retain: 3 },
                ..Default::default()
            })
            .run_file(&input, &output)
            .unwrap();
            outputs.push(common::read_gray(&output));
        }
        assert_eq!(outputs[0], outputs[1], "{filter}");
    }
}

#[test]
fn test_config_file_selects_filter() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("grayquant.yaml");
    let mut file = std::fs::File::create(&config_path).unwrap();
    writeln!(file, "filter: block\nblock:\n  retain: 8\noutput:\n  compression: best").unwrap();

    let config = AppConfig::load(&config_path).unwrap();
    assert_eq!(config.filter, FilterKind::Block);

    // retain 8 keeps every coefficient, so a smooth image survives as its luma
    let image = PixelBuffer::filled(16, 16, Rgb::new(30, 60, 90)).unwrap();
    let input = common::write_png(dir.path(), "in.png", &image);
    let output = dir.path().join("out.png");
    FilterPipeline::new(config).run_file(&input, &output).unwrap();

    let expected = display_luma(Rgb::new(30, 60, 90));
    assert!(common::read_gray(&output)
        .to_vec()
        .iter()
        .all(|p| p.red == expected));
}

#[test]
fn test_image_info_after_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let input = common::write_png(dir.path(), "in.png", &common::gradient(30, 20));
    let image = grayquant::rendering::load_png(&input).unwrap();

    let info = image_info(&image);
    assert_eq!((info.width, info.height), (30, 20));
    assert!(info.distinct_keys > 256);
    assert!(!info.histogram_bypass);
}
