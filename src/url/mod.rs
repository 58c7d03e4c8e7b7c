//! URL handling module for Manual-Downloader
//!
//! This module provides page references, page number extraction and
//! resolution of the root-relative paths the viewer emits.

mod page_number;
mod site_root;

// Re-export main functions
pub use page_number::page_number;
pub use site_root::{resolve, site_root};

use crate::{UrlError, UrlResult};
use std::fmt;
use url::Url;

/// Page number assumed for a reference that carries none
pub const FIRST_PAGE: u32 = 1;

/// An absolute locator for one document page
///
/// The page number is read from the page-number query parameter. A reference
/// without one is the first page of the document, never an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageReference {
    url: Url,
    number: Option<u32>,
}

impl PageReference {
    /// Builds a reference from an absolute URL
    pub fn new(url: Url, page_param: &str) -> Self {
        let number = page_number(&url, page_param);
        Self { url, number }
    }

    /// Parses the user supplied entry URL
    ///
    /// Only `http` and `https` URLs with a host are accepted.
    ///
    /// # Examples
    ///
    /// ```
    /// use manual_downloader::url::PageReference;
    ///
    /// let entry = PageReference::parse_entry("https://example.com/manual/x?p=4", "p").unwrap();
    /// assert_eq!(entry.page_number(), 4);
    ///
    /// let entry = PageReference::parse_entry("https://example.com/manual/x", "p").unwrap();
    /// assert_eq!(entry.page_number(), 1);
    /// ```
    pub fn parse_entry(input: &str, page_param: &str) -> UrlResult<Self> {
        let url = Url::parse(input.trim()).map_err(|e| UrlError::Parse(format!("{input}: {e}")))?;

        match url.scheme() {
            "http" | "https" => {}
            other => return Err(UrlError::InvalidScheme(other.to_string())),
        }

        if url.host_str().is_none() {
            return Err(UrlError::MissingHost(input.to_string()));
        }

        Ok(Self::new(url, page_param))
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The explicit page number, if the URL carries one
    pub fn explicit_number(&self) -> Option<u32> {
        self.number
    }

    /// The page number, defaulting to [`FIRST_PAGE`]
    pub fn page_number(&self) -> u32 {
        self.number.unwrap_or(FIRST_PAGE)
    }
}

impl fmt::Display for PageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url)
    }
}
