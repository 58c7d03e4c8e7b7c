use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;

/// Main configuration structure for Manual-Downloader
///
/// Every section is optional in the TOML file; missing keys fall back to the
/// defaults of the viewer the tool was written against.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub viewer: ViewerConfig,

    /// Verbosity level (0 shows the progress bar, anything higher traces steps)
    #[serde(skip)]
    pub verbosity: u8,
}

impl Config {
    /// Returns true when per-step trace lines replace the progress bar
    pub fn is_verbose(&self) -> bool {
        self.verbosity > 0
    }
}

/// Output artifact format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Assemble the page images into one PDF document
    #[default]
    Pdf,
    /// Keep the page images as they were saved
    Png,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pdf => write!(f, "pdf"),
            Self::Png => write!(f, "png"),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Artifact format
    #[serde(default)]
    pub format: OutputFormat,

    /// Directory receiving `<page>.png` files and the assembled document
    #[serde(default = "default_directory")]
    pub directory: PathBuf,

    /// File name of the assembled document inside `directory`
    #[serde(rename = "document-name", default = "default_document_name")]
    pub document_name: String,

    /// Resolution (DPI) used to size PDF pages from image pixels
    #[serde(default = "default_quality")]
    pub quality: f32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            directory: default_directory(),
            document_name: default_document_name(),
            quality: default_quality(),
        }
    }
}

impl OutputConfig {
    /// Full path of the assembled document
    pub fn document_path(&self) -> PathBuf {
        self.directory.join(&self.document_name)
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Whole-request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connection establishment timeout (seconds)
    #[serde(
        rename = "connect-timeout-secs",
        default = "default_connect_timeout_secs"
    )]
    pub connect_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

/// Where the viewer keeps the data the walker needs
#[derive(Debug, Clone, Deserialize)]
pub struct ViewerConfig {
    /// Query parameter carrying the page number (`?p=3`)
    #[serde(rename = "page-param", default = "default_page_param")]
    pub page_param: String,

    /// Element whose text ends with the total page count
    #[serde(
        rename = "total-pages-selector",
        default = "default_total_pages_selector"
    )]
    pub total_pages_selector: String,

    /// Image element rendering the current page
    #[serde(
        rename = "page-image-selector",
        default = "default_page_image_selector"
    )]
    pub page_image_selector: String,

    /// Active "next page" navigation link
    #[serde(rename = "next-page-selector", default = "default_next_page_selector")]
    pub next_page_selector: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            page_param: default_page_param(),
            total_pages_selector: default_total_pages_selector(),
            page_image_selector: default_page_image_selector(),
            next_page_selector: default_next_page_selector(),
        }
    }
}

fn default_directory() -> PathBuf {
    PathBuf::from(".")
}

fn default_document_name() -> String {
    "manual.pdf".to_string()
}

fn default_quality() -> f32 {
    100.0
}

fn default_user_agent() -> String {
    format!("manual-downloader/{}", env!("CARGO_PKG_VERSION"))
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_page_param() -> String {
    "p".to_string()
}

fn default_total_pages_selector() -> String {
    "div.viewer-toolbar__slider > div".to_string()
}

fn default_page_image_selector() -> String {
    "img.bi.x0.y0.w1.h1".to_string()
}

fn default_next_page_selector() -> String {
    "a.router-link-active.router-link-exact-active.glide__arrow.glide__arrow--right".to_string()
}
