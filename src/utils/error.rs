//! Error types for vecdata-bench

use std::io;
use thiserror::Error;

/// Dataset-related errors
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Offset {offset} out of range for dataset of size {size}")]
    OffsetOutOfRange { offset: usize, size: usize },

    #[error("Unknown extension: {extension}, supported extensions are: u8bin, fbin")]
    InvalidExtension { extension: String },

    #[error("Dataset file too small: {size} bytes, minimum {minimum} bytes")]
    FileTooSmall { size: u64, minimum: u64 },

    #[error(
        "Dataset file size {actual} does not match expected size {expected} \
         derived from point count, dimension and bytes per value"
    )]
    SizeMismatch { actual: u64, expected: u64 },

    #[error("Invalid dataset format: {0}")]
    Format(String),

    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Unsupported column type for {column}: expected {expected}, got {got}")]
    UnsupportedColumnType {
        column: String,
        expected: String,
        got: String,
    },

    #[error(
        "Batch iterator exhausted after {delivered} rows, but dataset declares {declared} rows"
    )]
    BatchesExhausted { delivered: usize, declared: usize },

    #[error("Failed to open dataset: {0}")]
    OpenFailed(io::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[cfg(feature = "hdf5")]
    #[error("HDF5 error: {0}")]
    Hdf5(#[from] hdf5::Error),
}

pub type Result<T> = std::result::Result<T, DatasetError>;
