//! vecdata-bench - stream an ANN benchmark vector dataset
//!
//! Opens one dataset file in any of the supported formats and streams it
//! chunk by chunk, reporting row counts, per-chunk latency percentiles and
//! throughput. Useful for smoke-testing dataset files and for measuring
//! how fast a dataset can feed an indexing pipeline.

use std::fs::File;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context as _, Result};
use hdrhistogram::Histogram;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use vecdata_bench::config::{CliArgs, DatasetConfig};
use vecdata_bench::dataset::{open_dataset, VectorReader};

fn setup_logging(verbose: bool, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else if verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Per-run streaming statistics, exportable as JSON
#[derive(Debug, Serialize)]
struct RunSummary {
    format: String,
    path: String,
    dataset_rows: usize,
    dim: usize,
    rows_read: usize,
    chunks: usize,
    chunk_size: usize,
    elapsed_secs: f64,
    rows_per_sec: f64,
    chunk_latency_p50_us: u64,
    chunk_latency_p99_us: u64,
    chunk_latency_max_us: u64,
}

fn export_json(summary: &RunSummary, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create output file {}", path.display()))?;
    serde_json::to_writer_pretty(file, summary)?;
    Ok(())
}

fn make_progress(total: u64, quiet: bool) -> Option<ProgressBar> {
    if quiet {
        return None;
    }
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} vectors | {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );
    Some(pb)
}

fn stream(config: &DatasetConfig, reader: &mut dyn VectorReader) -> Result<RunSummary> {
    let dataset_rows = reader.size()?;

    if let Some(offset) = config.seek {
        reader.seek(offset)?;
    }
    let available = dataset_rows - config.seek.unwrap_or(0);
    let target = config.limit.unwrap_or(available).min(available);

    let pb = make_progress(target as u64, config.quiet);
    let mut histogram =
        Histogram::<u64>::new_with_bounds(1, 60_000_000, 3).expect("Failed to create histogram");

    let mut rows_read = 0usize;
    let mut chunks = 0usize;
    let mut dim = 0usize;
    let start = Instant::now();

    while rows_read < target {
        let want = config.chunk_size.min(target - rows_read);
        let chunk_start = Instant::now();
        let Some(chunk) = reader.read(want)? else {
            break;
        };
        histogram
            .record(chunk_start.elapsed().as_micros().max(1) as u64)
            .ok();

        dim = chunk.dim();
        rows_read += chunk.rows();
        chunks += 1;
        if let Some(ref pb) = pb {
            pb.set_position(rows_read as u64);
        }
    }

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    let elapsed = start.elapsed();
    let elapsed_secs = elapsed.as_secs_f64();
    Ok(RunSummary {
        format: config.format.clone(),
        path: config.path.clone(),
        dataset_rows,
        dim,
        rows_read,
        chunks,
        chunk_size: config.chunk_size,
        elapsed_secs,
        rows_per_sec: if elapsed_secs > 0.0 {
            rows_read as f64 / elapsed_secs
        } else {
            0.0
        },
        chunk_latency_p50_us: histogram.value_at_quantile(0.50),
        chunk_latency_p99_us: histogram.value_at_quantile(0.99),
        chunk_latency_max_us: histogram.max(),
    })
}

fn print_summary(summary: &RunSummary, quiet: bool) {
    if quiet {
        return;
    }
    println!("\n====================================");
    println!("STREAM COMPLETE");
    println!("====================================");
    println!("Dataset: {} ({})", summary.path, summary.format);
    println!(
        "Rows: {} of {}, dim={}",
        summary.rows_read, summary.dataset_rows, summary.dim
    );
    println!(
        "Chunks: {} x {} rows in {:.3}s ({:.0} rows/s)",
        summary.chunks, summary.chunk_size, summary.elapsed_secs, summary.rows_per_sec
    );
    println!(
        "Chunk latency: p50={}us p99={}us max={}us",
        summary.chunk_latency_p50_us, summary.chunk_latency_p99_us, summary.chunk_latency_max_us
    );
}

fn run() -> Result<()> {
    let args = CliArgs::parse_args();
    setup_logging(args.verbose, args.quiet);

    let config = DatasetConfig::from_cli(&args)?;

    info!("Opening {} dataset: {}", config.format, config.path);
    let mut reader = open_dataset(
        &config.format,
        &config.path,
        config.context,
        config.column.as_deref(),
    )?;

    let summary = stream(&config, reader.as_mut())?;
    print_summary(&summary, config.quiet);

    if let Some(ref output_path) = config.output {
        info!("Writing summary to: {:?}", output_path);
        export_json(&summary, output_path)?;
    }

    Ok(())
}

fn main() {
    if let Err(e) = run() {
        error!("Error: {:#}", e);
        std::process::exit(1);
    }
}
