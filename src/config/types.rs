use serde::Deserialize;

/// Default listing: the Molex solderless terminals category
pub const DEFAULT_SEED_URL_TEMPLATE: &str = "https://www.molex.com/en-us/products/connectors/solderless-terminals?materialMaster_promotable=true&category_uid=solderless-terminals&page={page}";
pub const DEFAULT_CATEGORY_NAME: &str = "Solderless Terminals";
pub const DEFAULT_CATEGORY_URL: &str = "https://www.molex.com/en-us/products/connectors/solderless-terminals?materialMaster_promotable=true";
pub const DEFAULT_PRODUCT_LINKS_SELECTOR: &str =
    "#productlist-697e85dbef > div:nth-of-type(2) > div:nth-of-type(2) h3 > a[href]";
pub const DEFAULT_PRODUCT_COUNT_SELECTOR: &str = "#productlist-697e85dbef > div:nth-of-type(1) > h4";

/// Main configuration structure
///
/// Every section falls back to its defaults, so an empty file describes the
/// default Molex crawl.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawl: CrawlConfig,
    pub category: CategoryConfig,
    pub selectors: SelectorConfig,
    pub retry: RetryConfig,
    pub fetch: FetchConfig,
    pub render: RenderConfig,
    pub output: OutputConfig,
}

/// What to do when a page runs out of retries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExhaustionPolicy {
    /// Log the page as lost and move on to the next one
    #[default]
    Continue,
    /// Stop the walk after the exhausted page
    Halt,
}

/// Pagination configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlConfig {
    /// Listing URL with a `{page}` placeholder
    pub seed_url_template: String,

    /// First page number to request
    pub first_page: u32,

    /// Last page number to request (inclusive)
    pub page_ceiling: u32,

    /// Behavior after a page exhausts its retries
    pub on_exhausted: ExhaustionPolicy,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            seed_url_template: DEFAULT_SEED_URL_TEMPLATE.to_string(),
            first_page: 1,
            page_ceiling: 285,
            on_exhausted: ExhaustionPolicy::Continue,
        }
    }
}

/// Fixed category stamped on every record
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CategoryConfig {
    pub name: String,
    pub url: String,
}

impl Default for CategoryConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_CATEGORY_NAME.to_string(),
            url: DEFAULT_CATEGORY_URL.to_string(),
        }
    }
}

/// CSS selectors used by the extractor and the rendering fallback
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SelectorConfig {
    /// Anchors pointing at product detail pages
    pub product_links: String,

    /// Element whose text holds the product count label
    pub product_count: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            product_links: DEFAULT_PRODUCT_LINKS_SELECTOR.to_string(),
            product_count: DEFAULT_PRODUCT_COUNT_SELECTOR.to_string(),
        }
    }
}

/// Retry behavior for failed page fetches
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RetryConfig {
    /// Retries allowed per page after the first attempt
    pub max_retries: u32,

    /// Pause before each retry (milliseconds)
    pub delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            delay_ms: 1000,
        }
    }
}

/// Lightweight HTTP fetch configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FetchConfig {
    pub user_agent: String,

    /// Whole-request timeout (seconds)
    pub timeout_secs: u64,

    /// Connection timeout (seconds)
    pub connect_timeout_secs: u64,

    /// Redirect hops followed before giving up
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("catalog-walker/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: 30,
            connect_timeout_secs: 10,
            max_redirects: 10,
        }
    }
}

/// Browser rendering fallback configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RenderConfig {
    /// Launch the browser and use it for pages with no links
    pub enabled: bool,

    /// Run the browser without a window
    pub headless: bool,

    /// How long to wait for product links to appear (seconds)
    pub settle_timeout_secs: u64,

    /// How often to look for product links while waiting (milliseconds)
    pub poll_interval_ms: u64,

    /// Chrome binary; detected automatically when unset
    pub chrome_executable: Option<String>,

    /// Extra browser command-line arguments
    pub chrome_args: Vec<String>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            headless: true,
            settle_timeout_secs: 10,
            poll_interval_ms: 250,
            chrome_executable: None,
            chrome_args: vec![
                "--disable-gpu".to_string(),
                "--start-maximized".to_string(),
                "--lang=en".to_string(),
            ],
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Path to the CSV file receiving the records
    pub csv_path: String,

    /// Directory for raw HTML snapshots; caching is off when unset
    pub cache_dir: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv_path: "molex_output.csv".to_string(),
            cache_dir: Some("cache_dir".to_string()),
        }
    }
}
