//! Configuration module for Manual-Downloader
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file. Command-line flags are applied on top of it by the
//! binaries, so the library only ever sees one finished [`Config`] value.
//!
//! # Example
//!
//! ```no_run
//! use manual_downloader::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("viewer.toml")).unwrap();
//! println!("Images go to: {}", config.output.directory.display());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, HttpConfig, OutputConfig, OutputFormat, ViewerConfig};

// Re-export parser functions
pub use parser::{load_config, load_config_or_default, parse_config};
pub use validation::{parse_selector, validate, validate_quality};
