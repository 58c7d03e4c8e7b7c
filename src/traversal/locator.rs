//! Viewer markup locator
//!
//! All knowledge of the viewer's markup lives here:
//! - The toolbar slider label carrying the total page count
//! - The image element rendering the current page
//! - The active "next page" arrow

use crate::config::{parse_selector, ViewerConfig};
use crate::url::{resolve, PageReference};
use crate::ConfigError;
use scraper::{Html, Selector};
use std::fmt;
use url::Url;

/// Outcome of looking for the next page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextPage {
    /// A following page with a known page number
    Page(PageReference),

    /// The current page is the last one
    End(EndReason),
}

/// Why a page has no successor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// No active "next" link on the page
    NoLink,
    /// The link's target could not be resolved to a URL
    Unresolvable,
    /// The link's target carries no page number
    NoPageNumber,
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoLink => write!(f, "no next link"),
            Self::Unresolvable => write!(f, "next link does not resolve"),
            Self::NoPageNumber => write!(f, "next link has no page number"),
        }
    }
}

/// Extracts page data from viewer markup
#[derive(Debug, Clone)]
pub struct PageLocator {
    total_pages: Selector,
    page_image: Selector,
    next_page: Selector,
    page_param: String,
}

impl PageLocator {
    /// Compiles the configured selectors
    pub fn new(config: &ViewerConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            total_pages: parse_selector(&config.total_pages_selector)?,
            page_image: parse_selector(&config.page_image_selector)?,
            next_page: parse_selector(&config.next_page_selector)?,
            page_param: config.page_param.clone(),
        })
    }

    /// Reads the total page count from the toolbar slider label
    ///
    /// The label reads like "Page 1 of 48"; the last whitespace separated
    /// token is the count. Returns None when the widget is missing or the
    /// token is not a positive integer.
    ///
    /// # Example
    ///
    /// ```
    /// use manual_downloader::config::ViewerConfig;
    /// use manual_downloader::traversal::PageLocator;
    /// use scraper::Html;
    ///
    /// let locator = PageLocator::new(&ViewerConfig::default()).unwrap();
    /// let html = r#"<div class="viewer-toolbar__slider"><div>1 / 48</div></div>"#;
    /// let document = Html::parse_document(html);
    /// assert_eq!(locator.total_page_count(&document), Some(48));
    /// ```
    pub fn total_page_count(&self, document: &Html) -> Option<u32> {
        let label = document
            .select(&self.total_pages)
            .next()?
            .text()
            .collect::<String>();

        label
            .split_whitespace()
            .last()?
            .parse::<u32>()
            .ok()
            .filter(|&total| total > 0)
    }

    /// Returns the `src` of the image rendering the current page
    pub fn image_reference(&self, document: &Html) -> Option<String> {
        document
            .select(&self.page_image)
            .next()?
            .value()
            .attr("src")
            .map(str::trim)
            .filter(|src| !src.is_empty())
            .map(str::to_string)
    }

    /// Finds the page following the current one
    ///
    /// The link target is resolved against `site_root`, never against the
    /// URL of the page being read.
    pub fn next_page(&self, document: &Html, site_root: &Url) -> NextPage {
        let href = match document
            .select(&self.next_page)
            .next()
            .and_then(|element| element.value().attr("href"))
        {
            Some(href) => href,
            None => return NextPage::End(EndReason::NoLink),
        };

        let url = match resolve(site_root, href) {
            Ok(url) => url,
            Err(_) => return NextPage::End(EndReason::Unresolvable),
        };

        let reference = PageReference::new(url, &self.page_param);
        if reference.explicit_number().is_none() {
            return NextPage::End(EndReason::NoPageNumber);
        }

        NextPage::Page(reference)
    }
}
