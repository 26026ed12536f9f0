//! Dataset reading and access
//!
//! This module provides streaming, position-aware readers over vector
//! dataset files in three on-disk encodings: ann-benchmarks HDF5 files,
//! Big ANN Benchmarks flat binary dumps, and parquet files with one vector
//! column. All readers satisfy the same [`VectorReader`] contract and open
//! their file lazily on first access; a dataset is consumed as fixed-size
//! chunks without ever being loaded whole.

pub mod bigann;
pub mod context;
pub mod header;
#[cfg(feature = "hdf5")]
pub mod hdf5_dataset;
pub mod parquet_dataset;
pub mod reader;
mod stitch;

pub use bigann::BigAnnDataset;
pub use context::Context;
pub use header::{ElementKind, FlatHeader, FLAT_HEADER_LEN};
#[cfg(feature = "hdf5")]
pub use hdf5_dataset::Hdf5Dataset;
pub use parquet_dataset::{ParquetDataset, DEFAULT_BATCH_SIZE};
pub use reader::{VectorChunk, VectorReader};

use crate::utils::{DatasetError, Result};

/// Recognized format name for HDF5 datasets
pub const FORMAT_HDF5: &str = "hdf5";
/// Recognized format name for flat binary datasets
pub const FORMAT_BIGANN: &str = "bigann";
/// Recognized format name for parquet datasets
pub const FORMAT_PARQUET: &str = "parquet";

/// Build the reader matching a format name
///
/// `context` is required for `hdf5`, `column` is required (and non-empty)
/// for `parquet`; an unrecognized format name is a configuration error.
pub fn open_dataset(
    format: &str,
    path: &str,
    context: Option<Context>,
    column: Option<&str>,
) -> Result<Box<dyn VectorReader>> {
    match format {
        #[cfg(feature = "hdf5")]
        FORMAT_HDF5 => {
            let context = context.ok_or_else(|| {
                DatasetError::Config("hdf5 datasets require a context".to_string())
            })?;
            Ok(Box::new(Hdf5Dataset::new(path, context)?))
        }
        #[cfg(not(feature = "hdf5"))]
        FORMAT_HDF5 => Err(DatasetError::Config(
            "hdf5 support not compiled in (enable the `hdf5` feature)".to_string(),
        )),
        FORMAT_BIGANN => Ok(Box::new(BigAnnDataset::new(path)?)),
        FORMAT_PARQUET => {
            let column = column.ok_or_else(|| {
                DatasetError::Config("parquet datasets require a column name".to_string())
            })?;
            Ok(Box::new(ParquetDataset::new(path, column)?))
        }
        other => Err(DatasetError::Config(format!(
            "invalid dataset format: {other}"
        ))),
    }
}
