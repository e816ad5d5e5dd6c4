//! Browser rendering fallback
//!
//! When the plain HTTP response carries no product links, the page is loaded
//! in a real browser so that scripts can populate the listing. The `Renderer`
//! trait is the seam between the walker and the engine; `ChromeRenderer`
//! drives Chrome through chromiumoxide.

use crate::config::RenderConfig;
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;
use url::Url;

/// Rendering engine failures
///
/// Fatal to the fallback attempt of one page; only launch and shutdown
/// failures end the crawl.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to launch browser: {0}")]
    Launch(String),

    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("DOM query on {url} failed: {message}")]
    Query { url: String, message: String },

    #[error("Failed to shut down browser: {0}")]
    Shutdown(String),

    #[error("No rendering engine is available")]
    Unavailable,
}

/// How long to wait for dynamic content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSettle {
    /// Upper bound on the wait for the link selector to match
    pub timeout: Duration,
    /// Gap between DOM queries while waiting
    pub poll_interval: Duration,
}

impl RenderSettle {
    pub fn from_config(config: &RenderConfig) -> Self {
        Self {
            timeout: Duration::from_secs(config.settle_timeout_secs),
            poll_interval: Duration::from_millis(config.poll_interval_ms),
        }
    }
}

impl Default for RenderSettle {
    fn default() -> Self {
        Self::from_config(&RenderConfig::default())
    }
}

/// A stateful rendering engine
///
/// `&mut self` on every call keeps renders serial: one engine, one page in
/// flight.
#[async_trait]
pub trait Renderer: Send {
    /// Loads `url`, waits up to `settle.timeout` for `selector` to match,
    /// and returns the `href` of every matching element
    ///
    /// An empty result is a successful render of a page without links.
    async fn render_links(
        &mut self,
        url: &Url,
        selector: &str,
        settle: &RenderSettle,
    ) -> Result<Vec<String>, RenderError>;

    /// Releases the engine
    async fn shutdown(&mut self) -> Result<(), RenderError>;
}

/// Runs `query` until it returns a match or `settle.timeout` elapses
///
/// The query runs once immediately and once more at the deadline. No sleep
/// extends past the deadline. Running out of time is not an error: the last
/// (empty) result is returned. A query error ends the wait.
#[cfg_attr(not(feature = "chrome"), allow(dead_code))]
pub(crate) async fn wait_for_matches<T, F, Fut>(
    settle: &RenderSettle,
    mut query: F,
) -> Result<Vec<T>, RenderError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Vec<T>, RenderError>>,
{
    let deadline = Instant::now() + settle.timeout;
    loop {
        let found = query().await?;

        let now = Instant::now();
        if !found.is_empty() || now >= deadline {
            return Ok(found);
        }
        tokio::time::sleep(settle.poll_interval.min(deadline - now)).await;
    }
}

#[cfg(feature = "chrome")]
pub use chrome::ChromeRenderer;

#[cfg(feature = "chrome")]
mod chrome {
    use super::{wait_for_matches, RenderError, RenderSettle, Renderer};
    use crate::config::RenderConfig;
    use async_trait::async_trait;
    use chromiumoxide::browser::{Browser, BrowserConfig};
    use chromiumoxide::Page;
    use futures::StreamExt;
    use tokio::task::JoinHandle;
    use url::Url;

    /// Chrome driven over the DevTools protocol
    pub struct ChromeRenderer {
        browser: Browser,
        page: Page,
        handler: JoinHandle<()>,
    }

    impl ChromeRenderer {
        /// Starts Chrome and opens the tab reused for every render
        pub async fn launch(config: &RenderConfig) -> Result<Self, RenderError> {
            let mut builder = BrowserConfig::builder().args(config.chrome_args.iter());
            if !config.headless {
                builder = builder.with_head();
            }
            if let Some(executable) = &config.chrome_executable {
                builder = builder.chrome_executable(executable);
            }
            let browser_config = builder.build().map_err(RenderError::Launch)?;

            tracing::debug!("Launching browser (headless: {})", config.headless);
            let (browser, mut handler) = Browser::launch(browser_config)
                .await
                .map_err(|e| RenderError::Launch(e.to_string()))?;

            // The CDP event loop must be polled for any command to complete
            let handler = tokio::spawn(async move { while handler.next().await.is_some() {} });

            let page = browser
                .new_page("about:blank")
                .await
                .map_err(|e| RenderError::Launch(format!("failed to open tab: {}", e)))?;

            Ok(Self {
                browser,
                page,
                handler,
            })
        }
    }

    #[async_trait]
    impl Renderer for ChromeRenderer {
        async fn render_links(
            &mut self,
            url: &Url,
            selector: &str,
            settle: &RenderSettle,
        ) -> Result<Vec<String>, RenderError> {
            self.page
                .goto(url.as_str())
                .await
                .map_err(|e| RenderError::Navigation {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;

            let page = &self.page;
            let elements = wait_for_matches(settle, || async move {
                page.find_elements(selector)
                    .await
                    .map_err(|e| RenderError::Query {
                        url: url.to_string(),
                        message: e.to_string(),
                    })
            })
            .await?;

            let mut hrefs = Vec::with_capacity(elements.len());
            for element in elements {
                let href = element
                    .attribute("href")
                    .await
                    .map_err(|e| RenderError::Query {
                        url: url.to_string(),
                        message: e.to_string(),
                    })?;
                if let Some(href) = href {
                    hrefs.push(href);
                }
            }

            Ok(hrefs)
        }

        async fn shutdown(&mut self) -> Result<(), RenderError> {
            let closed = self
                .browser
                .close()
                .await
                .map(|_| ())
                .map_err(|e| RenderError::Shutdown(e.to_string()));

            if let Err(e) = self.browser.wait().await {
                tracing::debug!("Browser process did not exit cleanly: {}", e);
            }
            self.handler.abort();

            closed
        }
    }
}
