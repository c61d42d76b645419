//! Configuration system for the Grotto cave generator.
//!
//! Generation parameters persist to disk as RON files, missing sections fall
//! back to defaults, and command-line flags parsed with clap override
//! whatever was loaded.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{Config, DebugConfig, GenerationConfig, OutputConfig, default_config_dir};
pub use error::ConfigError;
