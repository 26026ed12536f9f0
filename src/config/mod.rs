//! Configuration modules

pub mod cli;
pub mod dataset_config;

pub use cli::CliArgs;
pub use dataset_config::DatasetConfig;
