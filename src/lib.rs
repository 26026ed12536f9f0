//! vecdata-bench library
//!
//! Streaming, position-aware readers for ANN benchmark vector datasets
//! (HDF5, BigANN flat binary, Parquet), feeding fixed-size chunks of
//! vectors to an indexing or benchmarking pipeline.

pub mod config;
pub mod dataset;
pub mod utils;
