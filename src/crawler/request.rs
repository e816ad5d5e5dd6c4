//! Page requests and the records they produce

use serde::Serialize;
use url::Url;

/// One attempt at a listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub url: Url,
    pub page_number: u32,
    /// Failed attempts before this one
    pub retry_count: u32,
}

impl PageRequest {
    /// First attempt at a page
    pub fn new(url: Url, page_number: u32) -> Self {
        Self {
            url,
            page_number,
            retry_count: 0,
        }
    }

    /// The next attempt at the same page
    pub fn retry(&self) -> Self {
        Self {
            url: self.url.clone(),
            page_number: self.page_number,
            retry_count: self.retry_count + 1,
        }
    }

    /// Returns true for the first attempt at a page
    pub fn is_first_attempt(&self) -> bool {
        self.retry_count == 0
    }
}

/// Fixed category stamped on every record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub url: String,
}

impl Category {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// One product found on a listing page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedRecord {
    #[serde(rename = "Product URL")]
    pub product_url: String,

    #[serde(rename = "Product Count")]
    pub product_count: u64,

    #[serde(rename = "Category Name")]
    pub category_name: String,

    #[serde(rename = "Category URL")]
    pub category_url: String,
}

impl ExtractedRecord {
    pub fn new(product_url: String, product_count: u64, category: &Category) -> Self {
        Self {
            product_url,
            product_count,
            category_name: category.name.clone(),
            category_url: category.url.clone(),
        }
    }
}
