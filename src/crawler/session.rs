//! Crawl-wide rendering session
//!
//! One `CrawlSession` exists per run. It owns the rendering engine, lends it
//! to the walker one render at a time, and shuts it down exactly once.

use crate::config::RenderConfig;
use crate::crawler::render::{RenderError, RenderSettle, Renderer};
use tokio::runtime::Handle;
use url::Url;

/// Owner of the rendering engine for a crawl run
///
/// Call [`CrawlSession::close`] when the walk ends. A session dropped without
/// being closed schedules the shutdown on the tokio runtime it was opened on.
pub struct CrawlSession {
    renderer: Option<Box<dyn Renderer>>,
    settle: RenderSettle,
    runtime: Option<Handle>,
    renders: u32,
}

impl CrawlSession {
    /// Takes ownership of an already started engine
    pub fn open(renderer: Box<dyn Renderer>, settle: RenderSettle) -> Self {
        Self {
            renderer: Some(renderer),
            settle,
            runtime: Handle::try_current().ok(),
            renders: 0,
        }
    }

    /// A session without an engine; every render fails with `Unavailable`
    pub fn disabled() -> Self {
        Self {
            renderer: None,
            settle: RenderSettle::default(),
            runtime: None,
            renders: 0,
        }
    }

    /// Starts the configured engine
    ///
    /// Returns a disabled session when rendering is turned off.
    pub async fn launch(config: &RenderConfig) -> Result<Self, RenderError> {
        if !config.enabled {
            tracing::info!("Rendering fallback disabled");
            return Ok(Self::disabled());
        }

        Self::launch_engine(config).await
    }

    #[cfg(feature = "chrome")]
    async fn launch_engine(config: &RenderConfig) -> Result<Self, RenderError> {
        let renderer = crate::crawler::render::ChromeRenderer::launch(config).await?;
        tracing::info!("Rendering fallback ready");
        Ok(Self::open(Box::new(renderer), RenderSettle::from_config(config)))
    }

    #[cfg(not(feature = "chrome"))]
    async fn launch_engine(_config: &RenderConfig) -> Result<Self, RenderError> {
        tracing::warn!("Built without the `chrome` feature; rendering fallback unavailable");
        Ok(Self::disabled())
    }

    /// Returns true if an engine is attached
    pub fn is_enabled(&self) -> bool {
        self.renderer.is_some()
    }

    /// Renders `url` and returns the hrefs matching `selector`
    pub async fn render_links(
        &mut self,
        url: &Url,
        selector: &str,
    ) -> Result<Vec<String>, RenderError> {
        let renderer = self.renderer.as_mut().ok_or(RenderError::Unavailable)?;
        self.renders += 1;
        tracing::debug!("Rendering {} (render #{})", url, self.renders);
        renderer.render_links(url, selector, &self.settle).await
    }

    /// Number of renders requested so far
    pub fn renders(&self) -> u32 {
        self.renders
    }

    /// Shuts the engine down
    pub async fn close(mut self) -> Result<(), RenderError> {
        match self.renderer.take() {
            Some(mut renderer) => {
                tracing::debug!("Closing rendering session after {} renders", self.renders);
                renderer.shutdown().await
            }
            None => Ok(()),
        }
    }
}

impl Drop for CrawlSession {
    fn drop(&mut self) {
        let Some(mut renderer) = self.renderer.take() else {
            return;
        };

        match &self.runtime {
            Some(runtime) => {
                tracing::warn!("Rendering session dropped without close; shutting down in background");
                runtime.spawn(async move {
                    if let Err(e) = renderer.shutdown().await {
                        tracing::warn!("Background render shutdown failed: {}", e);
                    }
                });
            }
            None => {
                tracing::warn!("Rendering session dropped outside a runtime; engine not shut down");
            }
        }
    }
}
