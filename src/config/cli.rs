//! Command-line argument parsing

use clap::Parser;
use std::path::PathBuf;

/// Streaming reader for ANN benchmark vector datasets
#[derive(Parser, Debug, Clone)]
#[command(name = "vecdata-bench")]
#[command(version, about, long_about = None)]
pub struct CliArgs {
    // ===== Dataset Selection =====
    /// Dataset format: hdf5, bigann or parquet
    #[arg(short = 'f', long = "format")]
    pub format: String,

    /// Dataset file path
    #[arg(short = 'p', long = "path")]
    pub path: String,

    /// Field to read from hdf5 datasets: index, query or neighbors
    #[arg(long = "context")]
    pub context: Option<String>,

    /// Column holding the vectors in parquet datasets
    #[arg(long = "column")]
    pub column: Option<String>,

    // ===== Streaming Parameters =====
    /// Vectors per read call
    #[arg(short = 'c', long = "chunk-size", default_value_t = 500)]
    pub chunk_size: usize,

    /// Start streaming from this row instead of row 0
    #[arg(long = "seek")]
    pub seek: Option<usize>,

    /// Stop after this many vectors
    #[arg(short = 'n', long = "limit")]
    pub limit: Option<usize>,

    // ===== Output =====
    /// Write a JSON run summary to this path
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Verbose logging
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Only log errors, no progress bar
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,
}

impl CliArgs {
    /// Parse from process arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Cross-argument validation
    pub fn validate(&self) -> Result<(), String> {
        if self.chunk_size == 0 {
            return Err("--chunk-size must be at least 1".to_string());
        }
        if let Some(0) = self.limit {
            return Err("--limit must be at least 1".to_string());
        }
        Ok(())
    }
}
