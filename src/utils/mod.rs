//! Utility modules

pub mod error;

pub use error::{DatasetError, Result};
