//! URL handling module
//!
//! This module provides the page URL template used to address each listing
//! page, resolution of product hrefs against a page's base URL, and the
//! filesystem-safe keys used by the page cache.

mod key;
mod resolve;
mod template;

// Re-export main functions
pub use key::cache_key;
pub use resolve::resolve_link;
pub use template::{PageUrlTemplate, PAGE_PLACEHOLDER};

use crate::UrlError;
use url::Url;

/// Parses a URL and checks that it uses an HTTP(S) scheme
///
/// # Examples
///
/// ```
/// use catalog_walker::url::parse_http_url;
///
/// assert!(parse_http_url("https://www.molex.com/en-us/products").is_ok());
/// assert!(parse_http_url("ftp://www.molex.com/").is_err());
/// ```
pub fn parse_http_url(url_str: &str) -> Result<Url, UrlError> {
    let url = Url::parse(url_str).map_err(|e| UrlError::Parse(format!("{}: {}", url_str, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_http_url() {
        let url = parse_http_url("https://www.molex.com/en-us/products?page=1").unwrap();
        assert_eq!(url.host_str(), Some("www.molex.com"));
    }

    #[test]
    fn test_parse_http_url_rejects_other_schemes() {
        assert!(matches!(
            parse_http_url("mailto:sales@molex.com"),
            Err(UrlError::InvalidScheme(_))
        ));
    }

    #[test]
    fn test_parse_http_url_rejects_garbage() {
        assert!(matches!(parse_http_url("not a url"), Err(UrlError::Parse(_))));
    }
}
