// src/services/session.rs

//! Long-lived rendering session used by the order-history crawl.
//!
//! A session owns exclusive navigation state, so it is driven by one caller
//! at a time. Failures tear the session down; the next request restarts it.

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::models::SessionConfig;
use crate::utils::http;

/// A capability that turns a URL into rendered markup.
#[async_trait]
pub trait Renderer: Send {
    /// Bring the underlying browser (or client) up.
    async fn start(&mut self) -> Result<()>;

    /// Navigate to `url` and return the rendered markup.
    async fn render(&mut self, url: &str) -> Result<String>;

    /// Tear the underlying browser down. Must be safe to call repeatedly.
    async fn shutdown(&mut self);
}

/// Renderer backed by an HTTP client carrying the authenticated cookies.
///
/// Order-history listings are served as static markup, so a plain GET is
/// enough once the session cookie is attached.
pub struct HttpRenderer {
    config: SessionConfig,
    client: Option<reqwest::Client>,
}

impl HttpRenderer {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            client: None,
        }
    }
}

#[async_trait]
impl Renderer for HttpRenderer {
    async fn start(&mut self) -> Result<()> {
        self.client = Some(http::create_async_client(&self.config)?);
        Ok(())
    }

    async fn render(&mut self, url: &str) -> Result<String> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| AppError::session(url, "renderer not started"))?;
        let response = client.get(url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }

    async fn shutdown(&mut self) {
        self.client = None;
    }
}

/// Markup returned by one navigation.
#[derive(Debug, Clone, Default)]
pub struct RenderedPage {
    pub markup: String,
    pub success: bool,
}

impl RenderedPage {
    fn failed() -> Self {
        Self::default()
    }
}

/// Explicit lifecycle wrapper around a [`Renderer`].
pub struct RenderSession<R: Renderer> {
    renderer: R,
    alive: bool,
    consecutive_failures: u32,
    max_consecutive_failures: u32,
    requests: usize,
}

impl<R: Renderer> RenderSession<R> {
    /// Wrap a renderer. `max_consecutive_failures == 0` never escalates.
    pub fn new(renderer: R, max_consecutive_failures: u32) -> Self {
        Self {
            renderer,
            alive: false,
            consecutive_failures: 0,
            max_consecutive_failures,
            requests: 0,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Number of navigations attempted so far.
    pub fn requests(&self) -> usize {
        self.requests
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Start the renderer if it is not already running.
    pub async fn acquire(&mut self) -> Result<()> {
        if !self.alive {
            log::debug!("Starting rendering session");
            self.renderer.start().await?;
            self.alive = true;
        }
        Ok(())
    }

    /// Shut the renderer down; the next `acquire` starts a fresh one.
    pub async fn release(&mut self) {
        if self.alive {
            log::debug!("Shutting down rendering session");
            self.renderer.shutdown().await;
            self.alive = false;
        }
    }

    /// Render a page.
    ///
    /// A failed navigation is not an error: it comes back with
    /// `success == false` and the session torn down. Only when
    /// `max_consecutive_failures` failures happen in a row does this
    /// return `AppError::Session`.
    pub async fn get_page(&mut self, url: &str) -> Result<RenderedPage> {
        self.requests += 1;
        log::debug!("Getting page {}", url);

        let outcome = match self.acquire().await {
            Ok(()) => self.renderer.render(url).await,
            Err(e) => Err(e),
        };

        match outcome {
            Ok(markup) => {
                self.consecutive_failures = 0;
                Ok(RenderedPage {
                    markup,
                    success: true,
                })
            }
            Err(error) => {
                log::warn!("Render failed for {}: {}", url, error);
                self.release().await;
                self.consecutive_failures += 1;

                if self.max_consecutive_failures > 0
                    && self.consecutive_failures >= self.max_consecutive_failures
                {
                    return Err(AppError::session(
                        url,
                        format!(
                            "{} consecutive render failures, last: {}",
                            self.consecutive_failures, error
                        ),
                    ));
                }
                Ok(RenderedPage::failed())
            }
        }
    }
}
