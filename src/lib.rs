//! Manual-Downloader: a paginated document viewer scraper
//!
//! This crate walks a web-hosted document viewer page by page, following each
//! page's own "next" link, saves the scanned image behind every page and
//! reassembles the images into a single PDF.

pub mod config;
pub mod logging;
pub mod output;
pub mod state;
pub mod storage;
pub mod traversal;
pub mod url;

use thiserror::Error;

/// Main error type for Manual-Downloader operations
#[derive(Debug, Error)]
pub enum ManualError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Request to {url} failed with HTTP {status}: {body}")]
    Transport {
        url: String,
        status: u16,
        body: String,
    },

    #[error("Network error for {url}: {source}")]
    Network { url: String, source: reqwest::Error },

    #[error("Unexpected viewer markup at {url}: {message}")]
    Structure { url: String, message: String },

    #[error("Next page {next} does not come after page {current}")]
    NonIncreasingPage { current: u32, next: u32 },

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::WalkState,
        to: state::WalkState,
    },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Assembly error: {0}")]
    Assemble(#[from] output::AssembleError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid CSS selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL: {0}")]
    MissingHost(String),

    #[error("Cannot resolve '{reference}' against {base}")]
    Unresolvable { reference: String, base: String },
}

/// Result type alias for Manual-Downloader operations
pub type Result<T> = std::result::Result<T, ManualError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::{Config, OutputFormat};
pub use output::{assemble_outcome, Artifact, Assembler};
pub use state::{SequenceState, WalkState};
pub use storage::{AssetStore, DirectoryStore};
pub use traversal::{download, walk, PageLocator, WalkOutcome, Walker};
pub use crate::url::PageReference;
