use regex::Regex;
use std::sync::OnceLock;
use url::Url;

fn non_word_runs() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\W+").expect("static pattern is valid"))
}

/// Derives a filesystem-safe key from a URL
///
/// Every run of non-word characters collapses to a single `_`, so distinct
/// page numbers map to distinct keys while the same URL always maps to the
/// same key.
///
/// ```
/// use catalog_walker::url::cache_key;
/// use url::Url;
///
/// let url = Url::parse("https://www.molex.com/p?page=2").unwrap();
/// assert_eq!(cache_key(&url), "https_www_molex_com_p_page_2");
/// ```
pub fn cache_key(url: &Url) -> String {
    non_word_runs().replace_all(url.as_str(), "_").into_owned()
}
