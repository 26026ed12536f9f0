//! Run configuration derived from CLI arguments

use std::path::PathBuf;

use super::cli::CliArgs;
use crate::dataset::{Context, FORMAT_BIGANN, FORMAT_HDF5, FORMAT_PARQUET};
use crate::utils::{DatasetError, Result};

/// Complete run configuration
#[derive(Debug, Clone)]
pub struct DatasetConfig {
    // Dataset selection
    pub format: String,
    pub path: String,
    pub context: Option<Context>,
    pub column: Option<String>,

    // Streaming
    pub chunk_size: usize,
    pub seek: Option<usize>,
    pub limit: Option<usize>,

    // Output
    pub output: Option<PathBuf>,
    pub quiet: bool,
    pub verbose: bool,
}

impl DatasetConfig {
    /// Create configuration from CLI arguments
    ///
    /// Construction parameters are validated eagerly here; file contents
    /// are only validated when the reader first touches the file.
    pub fn from_cli(args: &CliArgs) -> Result<Self> {
        args.validate().map_err(DatasetError::Config)?;

        if args.path.is_empty() {
            return Err(DatasetError::Config(
                "dataset path cannot be empty".to_string(),
            ));
        }

        match args.format.as_str() {
            FORMAT_HDF5 | FORMAT_BIGANN | FORMAT_PARQUET => {}
            other => {
                return Err(DatasetError::Config(format!(
                    "invalid dataset format: {other}"
                )))
            }
        }

        let context = match args.context.as_deref() {
            Some(s) => Some(s.parse::<Context>()?),
            None => None,
        };

        if args.format == FORMAT_HDF5 && context.is_none() {
            return Err(DatasetError::Config(
                "hdf5 datasets require --context".to_string(),
            ));
        }
        if args.format == FORMAT_PARQUET
            && args.column.as_deref().unwrap_or_default().is_empty()
        {
            return Err(DatasetError::Config(
                "parquet datasets require --column".to_string(),
            ));
        }

        Ok(Self {
            format: args.format.clone(),
            path: args.path.clone(),
            context,
            column: args.column.clone(),
            chunk_size: args.chunk_size,
            seek: args.seek,
            limit: args.limit,
            output: args.output.clone(),
            quiet: args.quiet,
            verbose: args.verbose,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> CliArgs {
        CliArgs {
            format: "bigann".to_string(),
            path: "base.fbin".to_string(),
            context: None,
            column: None,
            chunk_size: 500,
            seek: None,
            limit: None,
            output: None,
            verbose: false,
            quiet: false,
        }
    }

    #[test]
    fn accepts_valid_bigann_args() {
        let config = DatasetConfig::from_cli(&base_args()).unwrap();
        assert_eq!(config.format, "bigann");
        assert_eq!(config.chunk_size, 500);
    }

    #[test]
    fn rejects_unknown_format() {
        let mut args = base_args();
        args.format = "fvecs".to_string();
        assert!(matches!(
            DatasetConfig::from_cli(&args),
            Err(DatasetError::Config(_))
        ));
    }

    #[test]
    fn rejects_empty_path() {
        let mut args = base_args();
        args.path = String::new();
        assert!(DatasetConfig::from_cli(&args).is_err());
    }

    #[test]
    fn hdf5_requires_context() {
        let mut args = base_args();
        args.format = "hdf5".to_string();
        args.path = "glove.hdf5".to_string();
        assert!(DatasetConfig::from_cli(&args).is_err());

        args.context = Some("index".to_string());
        let config = DatasetConfig::from_cli(&args).unwrap();
        assert_eq!(config.context, Some(Context::Index));

        args.context = Some("train".to_string());
        assert!(DatasetConfig::from_cli(&args).is_err());
    }

    #[test]
    fn parquet_requires_column() {
        let mut args = base_args();
        args.format = "parquet".to_string();
        args.path = "vectors.parquet".to_string();
        assert!(DatasetConfig::from_cli(&args).is_err());

        args.column = Some(String::new());
        assert!(DatasetConfig::from_cli(&args).is_err());

        args.column = Some("embedding".to_string());
        assert!(DatasetConfig::from_cli(&args).is_ok());
    }

    #[test]
    fn rejects_zero_chunk_size() {
        let mut args = base_args();
        args.chunk_size = 0;
        assert!(DatasetConfig::from_cli(&args).is_err());
    }
}
