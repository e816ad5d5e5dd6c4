//! Listing page extractor
//!
//! This module parses listing page HTML into:
//! - The hrefs of product detail-page links, in document order
//! - The product count shown in the listing's count label
//!
//! Extraction never fails. A missing or unreadable count label is the
//! parse-anomaly case and resolves to a count of 0.

use crate::config::{compile_selector, SelectorConfig};
use crate::ConfigError;
use regex::Regex;
use scraper::{Html, Selector};
use std::sync::OnceLock;

/// What a listing page yielded
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Raw product hrefs, unresolved
    pub links: Vec<String>,

    /// Product count from the count label, or 0
    pub product_count: u64,
}

impl Extraction {
    /// Returns true if no product links were found
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

/// Compiled selectors for one listing layout
#[derive(Debug, Clone)]
pub struct Extractor {
    link_selector: Selector,
    link_selector_source: String,
    count_selector: Selector,
}

impl Extractor {
    /// Compiles the configured selectors
    pub fn new(config: &SelectorConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            link_selector: compile_selector(&config.product_links)?,
            link_selector_source: config.product_links.clone(),
            count_selector: compile_selector(&config.product_count)?,
        })
    }

    /// Extracts product links and the product count from a page
    ///
    /// # Example
    ///
    /// ```
    /// use catalog_walker::config::SelectorConfig;
    /// use catalog_walker::crawler::Extractor;
    ///
    /// let extractor = Extractor::new(&SelectorConfig {
    ///     product_links: "h3 > a[href]".to_string(),
    ///     product_count: "h4".to_string(),
    /// })
    /// .unwrap();
    ///
    /// let html = r#"<h4>Showing 42 of 500</h4><h3><a href="/p/1">One</a></h3>"#;
    /// let extraction = extractor.extract(html);
    /// assert_eq!(extraction.links, vec!["/p/1".to_string()]);
    /// assert_eq!(extraction.product_count, 42);
    /// ```
    pub fn extract(&self, html: &str) -> Extraction {
        let document = Html::parse_document(html);

        Extraction {
            links: self.collect_links(&document),
            product_count: self.collect_count(&document),
        }
    }

    /// The product-link selector as written in configuration
    ///
    /// The rendering fallback queries the live DOM with the same selector.
    pub fn link_selector(&self) -> &str {
        &self.link_selector_source
    }

    fn collect_links(&self, document: &Html) -> Vec<String> {
        document
            .select(&self.link_selector)
            .filter_map(|element| element.value().attr("href"))
            .map(str::trim)
            .filter(|href| !href.is_empty())
            .map(str::to_string)
            .collect()
    }

    fn collect_count(&self, document: &Html) -> u64 {
        let label = document
            .select(&self.count_selector)
            .next()
            .map(|element| element.text().collect::<String>());

        parse_product_count(label.as_deref())
    }
}

fn decimal_run() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\d+").expect("static pattern is valid"))
}

/// Parses a product count from its label text
///
/// Takes the first run of decimal digits. Absent text, text without digits,
/// and digit runs too large for `u64` all yield 0.
///
/// ```
/// use catalog_walker::crawler::parse_product_count;
///
/// assert_eq!(parse_product_count(Some("Showing 42 of 500")), 42);
/// assert_eq!(parse_product_count(Some("No results")), 0);
/// assert_eq!(parse_product_count(None), 0);
/// ```
pub fn parse_product_count(text: Option<&str>) -> u64 {
    text.and_then(|t| decimal_run().find(t))
        .and_then(|m| m.as_str().parse::<u64>().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"
        <html><body>
        <div id="productlist-697e85dbef">
            <div><h4>12 products</h4></div>
            <div>
                <div class="filters"><h3><a href="/filter/a">Filter</a></h3></div>
                <div class="results">
                    <article><h3><a href="/en-us/products/part/0190020001">19002-0001</a></h3></article>
                    <article><h3><a href="/en-us/products/part/0190020002">19002-0002</a></h3></article>
                    <article><h3><a href="https://www.molex.com/p/3">Part 3</a></h3></article>
                </div>
            </div>
        </div>
        </body></html>
    "#;

    fn molex_extractor() -> Extractor {
        Extractor::new(&SelectorConfig::default()).unwrap()
    }

    #[test]
    fn test_extracts_links_in_document_order() {
        let extraction = molex_extractor().extract(LISTING);
        assert_eq!(
            extraction.links,
            vec![
                "/en-us/products/part/0190020001".to_string(),
                "/en-us/products/part/0190020002".to_string(),
                "https://www.molex.com/p/3".to_string(),
            ]
        );
    }

    #[test]
    fn test_filter_column_is_not_a_product() {
        let links = molex_extractor().extract(LISTING).links;
        assert!(!links.iter().any(|l| l.contains("/filter/")));
    }

    #[test]
    fn test_extracts_count() {
        assert_eq!(molex_extractor().extract(LISTING).product_count, 12);
    }

    #[test]
    fn test_empty_listing() {
        let html = r#"<html><body><div id="productlist-697e85dbef"><div><h4>0 products</h4></div></div></body></html>"#;
        let extraction = molex_extractor().extract(html);
        assert!(extraction.is_empty());
        assert_eq!(extraction.product_count, 0);
    }

    #[test]
    fn test_missing_count_label_defaults_to_zero() {
        let html = r#"<div id="productlist-697e85dbef"><div></div><div><div></div><div><h3><a href="/p/1">1</a></h3></div></div></div>"#;
        let extraction = molex_extractor().extract(html);
        assert_eq!(extraction.links.len(), 1);
        assert_eq!(extraction.product_count, 0);
    }

    #[test]
    fn test_count_label_with_nested_markup() {
        let html = r#"<div id="productlist-697e85dbef"><div><h4><span>1,204</span> products</h4></div></div>"#;
        assert_eq!(molex_extractor().extract(html).product_count, 1);
    }

    #[test]
    fn test_blank_hrefs_skipped() {
        let extractor = Extractor::new(&SelectorConfig {
            product_links: "h3 > a[href]".to_string(),
            product_count: "h4".to_string(),
        })
        .unwrap();

        let html = r#"<h3><a href="  ">blank</a></h3><h3><a>none</a></h3><h3><a href="/p/2">ok</a></h3>"#;
        assert_eq!(extractor.extract(html).links, vec!["/p/2".to_string()]);
    }

    #[test]
    fn test_link_selector_source() {
        let extractor = molex_extractor();
        assert_eq!(
            extractor.link_selector(),
            crate::config::DEFAULT_PRODUCT_LINKS_SELECTOR
        );
    }

    #[test]
    fn test_parse_product_count() {
        assert_eq!(parse_product_count(Some("Showing 42 of 500")), 42);
        assert_eq!(parse_product_count(Some("12 products")), 12);
        assert_eq!(parse_product_count(Some("Products (7)")), 7);
        assert_eq!(parse_product_count(Some("no digits here")), 0);
        assert_eq!(parse_product_count(Some("")), 0);
        assert_eq!(parse_product_count(None), 0);
    }

    #[test]
    fn test_parse_product_count_overflow() {
        assert_eq!(parse_product_count(Some("99999999999999999999999 items")), 0);
    }
}
