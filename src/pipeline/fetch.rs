// src/pipeline/fetch.rs

//! Document download pipeline.

use crate::error::{AppError, Result};
use crate::models::{Config, UrlCategory};
use crate::services::{DocumentFetcher, FetchOutcome, PageFetcher};
use crate::storage::DocumentStore;
use crate::utils::{http, progress};

/// Download the configured URL list over a shared HTTP client.
pub async fn run_fetch(config: &Config, store: &dyn DocumentStore) -> Result<FetchOutcome> {
    let client = http::create_async_client(&config.session)?;
    run_fetch_with(client, config, store).await
}

/// Download the configured URL list with a caller-supplied fetcher.
pub async fn run_fetch_with<F: PageFetcher>(
    fetcher: F,
    config: &Config,
    store: &dyn DocumentStore,
) -> Result<FetchOutcome> {
    let list = config.fetch.list.as_str();
    progress::header(&format!("Fetch - downloading {list}"));

    if UrlCategory::from_list_name(list).is_none() {
        return Err(AppError::config(format!("unknown URL list {list:?}")));
    }
    let urls = store
        .read_url_list(list)
        .await?
        .ok_or_else(|| AppError::config(format!("no {list} list found; run crawl first")))?;
    log::info!(
        "Downloading {} documents, {} at a time",
        urls.len(),
        config.fetch.max_concurrent
    );

    let fetcher = DocumentFetcher::new(fetcher, &config.session.root_url, config.fetch.max_concurrent)?;
    let outcome = fetcher.fetch_all(&urls, store).await?;

    let total_bytes: usize = outcome.documents.iter().map(|d| d.bytes).sum();
    progress::summary(
        "Fetch",
        &[
            ("urls", outcome.total.to_string()),
            ("written", outcome.written().to_string()),
            ("failed", outcome.failures.len().to_string()),
            ("bytes", total_bytes.to_string()),
        ],
    );
    for failure in &outcome.failures {
        progress::sub_item(&format!("{}: {}", failure.url, failure.error));
    }

    Ok(outcome)
}
