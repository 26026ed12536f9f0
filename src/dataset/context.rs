//! Dataset usage context
//!
//! A multi-field dataset (ann-benchmarks HDF5 layout) stores the index
//! corpus, the query set and the ground-truth neighbors as separate named
//! fields in one file. The context selects which field a reader serves.

use std::fmt;
use std::str::FromStr;

use crate::utils::DatasetError;

/// Which logical field of a multi-field dataset to read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Context {
    /// Vectors to be indexed (field "train")
    Index,
    /// Query vectors (field "test")
    Query,
    /// Ground-truth neighbor ids (field "neighbors")
    Neighbors,
}

impl Context {
    /// Name of the HDF5 dataset this context selects
    pub fn field_name(&self) -> &'static str {
        match self {
            Context::Index => "train",
            Context::Query => "test",
            Context::Neighbors => "neighbors",
        }
    }
}

impl FromStr for Context {
    type Err = DatasetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "index" => Ok(Context::Index),
            "query" => Ok(Context::Query),
            "neighbors" => Ok(Context::Neighbors),
            other => Err(DatasetError::Config(format!(
                "unsupported context: {other} (expected index, query or neighbors)"
            ))),
        }
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Context::Index => "index",
            Context::Query => "query",
            Context::Neighbors => "neighbors",
        };
        f.write_str(name)
    }
}
