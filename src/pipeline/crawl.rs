// src/pipeline/crawl.rs

//! Order-history discovery pipeline.

use crate::error::Result;
use crate::models::{Config, UrlCategory};
use crate::services::{DiscoveryOutcome, HttpRenderer, OrderHistoryCrawler, RenderSession, Renderer};
use crate::storage::DocumentStore;
use crate::utils::progress;

/// Run discovery over the configured years with an HTTP-backed session.
pub async fn run_crawl(config: &Config, store: &dyn DocumentStore) -> Result<DiscoveryOutcome> {
    run_crawl_with(HttpRenderer::new(config.session.clone()), config, store).await
}

/// Run discovery with a caller-supplied renderer.
///
/// The session is shut down whether or not the crawl succeeds.
pub async fn run_crawl_with<R: Renderer>(
    renderer: R,
    config: &Config,
    store: &dyn DocumentStore,
) -> Result<DiscoveryOutcome> {
    progress::header("Crawl - discovering order documents");
    log::info!(
        "Walking order history from {} back to {}",
        config.crawl.latest_year,
        config.crawl.oldest_year
    );

    let session = RenderSession::new(renderer, config.session.max_consecutive_failures);
    let mut crawler = OrderHistoryCrawler::new(session, &config.session.root_url, &config.crawl)?;

    let result = crawler.discover(config.crawl.years(), store).await;
    let requests = crawler.session().requests();
    crawler.shutdown().await;
    let outcome = result?;

    let pages: u32 = outcome.years.iter().map(|y| y.pages).sum();
    let failed_years = outcome.years.iter().filter(|y| y.render_failed).count();
    let mut items: Vec<(&str, String)> = UrlCategory::ALL
        .iter()
        .map(|c| (c.list_name(), outcome.frontier.set(*c).len().to_string()))
        .collect();
    items.push(("listing pages", pages.to_string()));
    items.push(("render requests", requests.to_string()));
    items.push(("years ended by render failure", failed_years.to_string()));
    progress::summary("Crawl", &items);

    Ok(outcome)
}
