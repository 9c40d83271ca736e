use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use grayquant::models::AppConfig;
use grayquant::rendering::load_png;
use grayquant::services::{bench_filters, image_info, FilterPipeline};
use luma_quant::{Execution, FilterKind};

#[derive(Parser)]
#[command(name = "grayquant")]
#[command(about = "Reduce RGB images to at most 256 ordered gray levels")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a PNG to gray
    Filter {
        /// Input PNG file
        #[arg(short, long)]
        input: PathBuf,

        /// Output PNG file
        #[arg(short, long)]
        output: PathBuf,

        /// Filter: "block", "histogram" or "balance"
        #[arg(short, long)]
        filter: Option<FilterKind>,

        /// Run on all cores
        #[arg(short, long)]
        parallel: bool,

        /// Low-frequency quadrant kept by the block filter (1-8)
        #[arg(short, long)]
        retain: Option<usize>,

        /// YAML config file (default: $GRAYQUANT_CONFIG)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Time every filter on one image
    Bench {
        /// Input PNG file
        #[arg(short, long)]
        input: PathBuf,

        /// Runs per filter
        #[arg(short = 'n', long, default_value_t = 10)]
        iterations: usize,

        /// Run on all cores
        #[arg(short, long)]
        parallel: bool,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print image dimensions and luma statistics
    Info {
        /// Input PNG file
        #[arg(short, long)]
        input: PathBuf,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "grayquant=info,luma_quant=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    match cli.command {
        Commands::Filter {
            input,
            output,
            filter,
            parallel,
            retain,
            config,
        } => run_filter_command(&input, &output, filter, parallel, retain, config.as_deref()),
        Commands::Bench {
            input,
            iterations,
            parallel,
            json,
        } => run_bench_command(&input, iterations, parallel, json),
        Commands::Info { input, json } => run_info_command(&input, json),
    }
}

fn run_filter_command(
    input: &Path,
    output: &Path,
    filter: Option<FilterKind>,
    parallel: bool,
    retain: Option<usize>,
    config: Option<&Path>,
) -> anyhow::Result<()> {
    let mut config = AppConfig::resolve(config).context("Failed to load configuration")?;

    // CLI flags override config values
    if let Some(filter) = filter {
        config.filter = filter;
    }
    if parallel {
        config.execution = Execution::Parallel;
    }
    if let Some(retain) = retain {
        config.block.retain = retain;
    }

    let pipeline = FilterPipeline::new(config);
    let report = pipeline
        .run_file(input, output)
        .with_context(|| format!("Failed to convert {}", input.display()))?;

    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        width = report.width,
        height = report.height,
        filter = %report.filter,
        elapsed_ms = report.elapsed.as_millis() as u64,
        "Converted image"
    );
    Ok(())
}

fn run_bench_command(
    input: &Path,
    iterations: usize,
    parallel: bool,
    json: bool,
) -> anyhow::Result<()> {
    let image = load_png(input).with_context(|| format!("Failed to read {}", input.display()))?;
    let results = bench_filters(&image, iterations, Execution::from_flag(parallel));

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    println!(
        "{}x{}, {} run(s) per filter, {}",
        image.width(),
        image.height(),
        iterations.max(1),
        if parallel { "parallel" } else { "sequential" }
    );
    for result in &results {
        println!(
            "  {:<10} mean {:>10.3} ms   fastest {:>10.3} ms",
            result.filter.as_str(),
            result.mean.as_secs_f64() * 1000.0,
            result.fastest.as_secs_f64() * 1000.0
        );
    }
    Ok(())
}

fn run_info_command(input: &Path, json: bool) -> anyhow::Result<()> {
    let image = load_png(input).with_context(|| format!("Failed to read {}", input.display()))?;
    let info = image_info(&image);

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("Width:         {}", info.width);
    println!("Height:        {}", info.height);
    println!("Distinct luma: {}", info.distinct_keys);
    println!(
        "Histogram:     {}",
        if info.histogram_bypass {
            "bypass (256 or fewer levels)"
        } else {
            "rank binning"
        }
    );
    Ok(())
}
