// src/services/fetch.rs

//! Concurrent download of discovered order documents.

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use url::Url;

use crate::error::{AppError, Result};
use crate::storage::{DocumentStore, StoredDocument};
use crate::utils::resolve_url;
use crate::utils::url::extract_order_id;

/// Lightweight URL-to-body request channel.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}

#[async_trait]
impl PageFetcher for reqwest::Client {
    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self.get(url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }
}

/// A document URL that could not be downloaded.
#[derive(Debug)]
pub struct FetchFailure {
    pub url: String,
    pub error: AppError,
}

/// Summary of a download run.
#[derive(Debug, Default)]
pub struct FetchOutcome {
    pub total: usize,
    pub documents: Vec<StoredDocument>,
    pub failures: Vec<FetchFailure>,
}

impl FetchOutcome {
    pub fn written(&self) -> usize {
        self.documents.len()
    }
}

/// Downloads documents over one shared connection pool.
pub struct DocumentFetcher<F: PageFetcher> {
    fetcher: F,
    root: Url,
    max_concurrent: usize,
}

impl<F: PageFetcher> DocumentFetcher<F> {
    pub fn new(fetcher: F, root_url: &str, max_concurrent: usize) -> Result<Self> {
        Ok(Self {
            fetcher,
            root: Url::parse(root_url)?,
            max_concurrent: max_concurrent.max(1),
        })
    }

    /// Download every URL and write it to `store` keyed by its order id.
    ///
    /// At most `max_concurrent` requests are in flight. A URL without a
    /// usable order id, or a failed request, is recorded in
    /// [`FetchOutcome::failures`] without affecting the others. A disk
    /// error aborts the run.
    pub async fn fetch_all(&self, urls: &[String], store: &dyn DocumentStore) -> Result<FetchOutcome> {
        let mut outcome = FetchOutcome {
            total: urls.len(),
            ..FetchOutcome::default()
        };

        let mut downloads = stream::iter(urls)
            .map(|url| async move { (url, self.fetch_one(url, store).await) })
            .buffer_unordered(self.max_concurrent);

        while let Some((url, result)) = downloads.next().await {
            match result? {
                Ok(document) => {
                    log::debug!(
                        "wrote {} ({} bytes, sha256 {})",
                        document.path.display(),
                        document.bytes,
                        document.sha256
                    );
                    outcome.documents.push(document);
                }
                Err(error) => {
                    log::warn!("Failed to download {}: {}", url, error);
                    outcome.failures.push(FetchFailure {
                        url: url.clone(),
                        error,
                    });
                }
            }
        }

        Ok(outcome)
    }

    /// Outer error: storage failure. Inner error: this URL only.
    async fn fetch_one(&self, href: &str, store: &dyn DocumentStore) -> Result<Result<StoredDocument>> {
        let order_id = match extract_order_id(href) {
            Ok(id) => id,
            Err(e) => return Ok(Err(e)),
        };
        let url = resolve_url(&self.root, href);
        log::debug!("downloading {} as {}", url, order_id);

        let body = match self.fetcher.fetch(&url).await {
            Ok(body) => body,
            Err(e) => return Ok(Err(AppError::fetch(url, e))),
        };

        match store.write_document(&order_id, &body).await {
            Ok(document) => Ok(Ok(document)),
            // Rejected key: this URL only, nothing touched the disk
            Err(e @ AppError::Validation(_)) => Ok(Err(e)),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use tempfile::TempDir;

    use super::*;
    use crate::storage::LocalStorage;

    /// Serves `<html>{url}</html>`; URLs containing "broken" fail.
    #[derive(Default)]
    struct FakeSite {
        requested: Mutex<Vec<String>>,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl PageFetcher for FakeSite {
        async fn fetch(&self, url: &str) -> Result<String> {
            self.requested.lock().unwrap().push(url.to_string());
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(5)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if url.contains("broken") {
                return Err(AppError::fetch(url, "503 Service Unavailable"));
            }
            Ok(format!("<html>{url}</html>"))
        }
    }

    fn invoice(id: &str) -> String {
        format!("/gp/css/summary/print.html/ref=ppx_od_dt_b_invoice?ie=UTF8&orderID={id}")
    }

    #[tokio::test]
    async fn test_fetch_all_resolves_and_keys_by_order_id() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStorage::new(tmp.path());
        let fetcher = DocumentFetcher::new(FakeSite::default(), "https://shop.test", 4).unwrap();

        let urls = vec![invoice("111-1"), invoice("222-2")];
        let outcome = fetcher.fetch_all(&urls, &store).await.unwrap();

        assert_eq!(outcome.total, 2);
        assert_eq!(outcome.written(), 2);
        assert!(outcome.failures.is_empty());

        let body = std::fs::read_to_string(tmp.path().join("orders/111-1.html")).unwrap();
        assert_eq!(
            body,
            "<html>https://shop.test/gp/css/summary/print.html/ref=ppx_od_dt_b_invoice?ie=UTF8&orderID=111-1</html>"
        );
    }

    #[tokio::test]
    async fn test_failures_are_isolated_per_url() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStorage::new(tmp.path());
        let fetcher = DocumentFetcher::new(FakeSite::default(), "https://shop.test", 2).unwrap();

        let urls = vec![
            invoice("111-1"),
            "/gp/css/summary/print.html?broken=1&orderID=333-3".to_string(),
            "/gp/css/summary/print.html?ie=UTF8".to_string(),
            invoice("222-2"),
        ];
        let outcome = fetcher.fetch_all(&urls, &store).await.unwrap();

        assert_eq!(outcome.written(), 2);
        assert_eq!(outcome.failures.len(), 2);
        assert!(
            outcome
                .failures
                .iter()
                .any(|f| matches!(f.error, AppError::MissingOrderId(_)))
        );
        assert!(
            outcome
                .failures
                .iter()
                .any(|f| matches!(f.error, AppError::Fetch { .. }))
        );
        assert!(tmp.path().join("orders/222-2.html").exists());
        assert!(!tmp.path().join("orders/333-3.html").exists());
    }

    #[tokio::test]
    async fn test_unusable_order_id_is_isolated() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStorage::new(tmp.path());
        let fetcher = DocumentFetcher::new(FakeSite::default(), "https://shop.test", 1).unwrap();

        let urls = vec![invoice(".hidden"), invoice("111-1"), invoice("a%2Fb")];
        let outcome = fetcher.fetch_all(&urls, &store).await.unwrap();

        assert_eq!(outcome.written(), 1);
        assert_eq!(outcome.failures.len(), 2);
        assert!(
            outcome
                .failures
                .iter()
                .all(|f| matches!(f.error, AppError::Validation(_)))
        );
        assert!(tmp.path().join("orders/111-1.html").exists());
        assert_eq!(store.list_documents().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_concurrency_is_bounded() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStorage::new(tmp.path());
        let fetcher = DocumentFetcher::new(FakeSite::default(), "https://shop.test", 3).unwrap();

        let urls: Vec<_> = (0..12).map(|i| invoice(&format!("{i:03}"))).collect();
        let outcome = fetcher.fetch_all(&urls, &store).await.unwrap();

        assert_eq!(outcome.written(), 12);
        assert!(fetcher.fetcher.peak.load(Ordering::SeqCst) <= 3);
        let requested: HashSet<_> = fetcher.fetcher.requested.lock().unwrap().iter().cloned().collect();
        assert_eq!(requested.len(), 12);
    }

    #[tokio::test]
    async fn test_refetch_is_byte_identical() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStorage::new(tmp.path());
        let fetcher = DocumentFetcher::new(FakeSite::default(), "https://shop.test", 4).unwrap();
        let urls = vec![invoice("111-1"), invoice("222-2")];

        let first = fetcher.fetch_all(&urls, &store).await.unwrap();
        let before = std::fs::read(tmp.path().join("orders/222-2.html")).unwrap();
        let second = fetcher.fetch_all(&urls, &store).await.unwrap();
        let after = std::fs::read(tmp.path().join("orders/222-2.html")).unwrap();

        assert_eq!(before, after);
        let digests = |o: &FetchOutcome| {
            let mut d: Vec<_> = o.documents.iter().map(|d| (d.order_id.clone(), d.sha256.clone())).collect();
            d.sort();
            d
        };
        assert_eq!(digests(&first), digests(&second));
        assert_eq!(store.list_documents().await.unwrap().len(), 2);
    }
}
