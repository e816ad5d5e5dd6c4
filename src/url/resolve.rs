use url::Url;

/// Resolves a product href against the page it was found on
///
/// Returns `None` when the href cannot form an HTTP(S) URL:
/// - empty or whitespace-only hrefs
/// - `javascript:`, `mailto:`, `tel:` and `data:` links
/// - hrefs that fail to join against the base
///
/// # Examples
///
/// ```
/// use catalog_walker::url::resolve_link;
/// use url::Url;
///
/// let base = Url::parse("https://www.molex.com/en-us/products/connectors").unwrap();
/// assert_eq!(
///     resolve_link("/p/123", &base).as_deref(),
///     Some("https://www.molex.com/p/123")
/// );
/// ```
pub fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) => {
            if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
                Some(absolute_url.to_string())
            } else {
                None
            }
        }
        Err(_) => None,
    }
}
