//! Configuration module
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use catalog_walker::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("molex.toml")).unwrap();
//! println!("Walking pages up to {}", config.crawl.page_ceiling);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    CategoryConfig, Config, CrawlConfig, ExhaustionPolicy, FetchConfig, OutputConfig,
    RenderConfig, RetryConfig, SelectorConfig,
};
pub use types::{
    DEFAULT_CATEGORY_NAME, DEFAULT_CATEGORY_URL, DEFAULT_PRODUCT_COUNT_SELECTOR,
    DEFAULT_PRODUCT_LINKS_SELECTOR, DEFAULT_SEED_URL_TEMPLATE,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::{compile_selector, validate};
