use crate::{UrlError, UrlResult};
use url::Url;

/// Returns the scheme+host (and port) part of a URL
///
/// # Examples
///
/// ```
/// use manual_downloader::url::site_root;
/// use url::Url;
///
/// let url = Url::parse("https://example.com:8443/manual/abc?p=2#top").unwrap();
/// assert_eq!(site_root(&url).unwrap().as_str(), "https://example.com:8443/");
/// ```
pub fn site_root(url: &Url) -> UrlResult<Url> {
    url.join("/").map_err(|_| UrlError::Unresolvable {
        reference: "/".to_string(),
        base: url.to_string(),
    })
}

/// Resolves an href or src found in viewer markup against the site root
///
/// The viewer emits root-relative paths, so resolution never depends on the
/// page currently being visited.
pub fn resolve(root: &Url, reference: &str) -> UrlResult<Url> {
    let reference = reference.trim();

    if reference.is_empty() {
        return Err(UrlError::Unresolvable {
            reference: reference.to_string(),
            base: root.to_string(),
        });
    }

    root.join(reference).map_err(|_| UrlError::Unresolvable {
        reference: reference.to_string(),
        base: root.to_string(),
    })
}
