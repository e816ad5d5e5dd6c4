use crate::config::types::{
    CategoryConfig, Config, CrawlConfig, FetchConfig, OutputConfig, RenderConfig, RetryConfig,
    SelectorConfig,
};
use crate::url::{parse_http_url, PageUrlTemplate};
use crate::ConfigError;
use crate::UrlError;
use scraper::Selector;

/// Upper bound on retries per page
const MAX_RETRIES_LIMIT: u32 = 10;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawl_config(&config.crawl)?;
    validate_category_config(&config.category)?;
    validate_selector_config(&config.selectors)?;
    validate_retry_config(&config.retry)?;
    validate_fetch_config(&config.fetch)?;
    validate_render_config(&config.render)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates pagination configuration
fn validate_crawl_config(config: &CrawlConfig) -> Result<(), ConfigError> {
    PageUrlTemplate::parse(&config.seed_url_template).map_err(|e| match e {
        UrlError::MissingPlaceholder(_) => ConfigError::Validation(format!(
            "seed_url_template must contain {{page}}, got '{}'",
            config.seed_url_template
        )),
        other => ConfigError::InvalidUrl(format!("Invalid seed_url_template: {}", other)),
    })?;

    if config.first_page < 1 {
        return Err(ConfigError::Validation(format!(
            "first_page must be >= 1, got {}",
            config.first_page
        )));
    }

    if config.first_page > config.page_ceiling {
        return Err(ConfigError::Validation(format!(
            "first_page ({}) must not exceed page_ceiling ({})",
            config.first_page, config.page_ceiling
        )));
    }

    Ok(())
}

/// Validates the fixed category
fn validate_category_config(config: &CategoryConfig) -> Result<(), ConfigError> {
    if config.name.trim().is_empty() {
        return Err(ConfigError::Validation(
            "category name cannot be empty".to_string(),
        ));
    }

    parse_http_url(&config.url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid category url: {}", e)))?;

    Ok(())
}

/// Validates that both selectors compile
fn validate_selector_config(config: &SelectorConfig) -> Result<(), ConfigError> {
    compile_selector(&config.product_links)?;
    compile_selector(&config.product_count)?;
    Ok(())
}

/// Compiles a CSS selector, mapping failures to a config error
pub fn compile_selector(selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector).map_err(|e| ConfigError::InvalidSelector {
        selector: selector.to_string(),
        message: format!("{:?}", e),
    })
}

/// Validates retry configuration
fn validate_retry_config(config: &RetryConfig) -> Result<(), ConfigError> {
    if config.max_retries > MAX_RETRIES_LIMIT {
        return Err(ConfigError::Validation(format!(
            "max_retries must be <= {}, got {}",
            MAX_RETRIES_LIMIT, config.max_retries
        )));
    }

    Ok(())
}

/// Validates HTTP fetch configuration
fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.connect_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "connect_timeout_secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates rendering fallback configuration
fn validate_render_config(config: &RenderConfig) -> Result<(), ConfigError> {
    if config.settle_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "settle_timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.poll_interval_ms == 0 {
        return Err(ConfigError::Validation(
            "poll_interval_ms must be >= 1".to_string(),
        ));
    }

    if config.poll_interval_ms > config.settle_timeout_secs * 1000 {
        return Err(ConfigError::Validation(format!(
            "poll_interval_ms ({}) must not exceed the settle timeout ({}s)",
            config.poll_interval_ms, config.settle_timeout_secs
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.csv_path.is_empty() {
        return Err(ConfigError::Validation(
            "csv_path cannot be empty".to_string(),
        ));
    }

    if matches!(config.cache_dir.as_deref(), Some("")) {
        return Err(ConfigError::Validation(
            "cache_dir cannot be empty; omit it to disable caching".to_string(),
        ));
    }

    Ok(())
}
