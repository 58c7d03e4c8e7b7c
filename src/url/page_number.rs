use url::Url;

/// Extracts the page number from a URL's query string
///
/// Only the first occurrence of `param` is considered. Values that are not
/// positive integers count as absent.
///
/// # Examples
///
/// ```
/// use manual_downloader::url::page_number;
/// use url::Url;
///
/// let url = Url::parse("https://example.com/manual?p=7").unwrap();
/// assert_eq!(page_number(&url, "p"), Some(7));
/// ```
pub fn page_number(url: &Url, param: &str) -> Option<u32> {
    url.query_pairs()
        .find(|(key, _)| key == param)
        .and_then(|(_, value)| value.trim().parse::<u32>().ok())
        .filter(|&number| number > 0)
}
