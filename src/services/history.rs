// src/services/history.rs

//! Order-history crawl.
//!
//! Walks the paginated order-history listing year by year, newest first,
//! collecting invoice, order-detail and digital-invoice links. A year stops
//! paginating at the first page that contributes no new link.

use std::time::Duration;

use scraper::{Html, Selector};

use crate::error::Result;
use crate::models::{CrawlConfig, UrlCategory, UrlFrontier};
use crate::services::parse_selector;
use crate::services::session::{RenderSession, Renderer};
use crate::storage::DocumentStore;
use crate::utils::url::listing_url;
use crate::utils::wait_a_bit;

/// Links and the displayed order count found on one listing page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingPage {
    pub hrefs: Vec<String>,
    pub displayed_orders: Option<u32>,
}

/// Per-year crawl statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct YearSummary {
    pub year: i32,
    /// Listing pages requested, including the terminating one
    pub pages: u32,
    pub new_urls: usize,
    pub displayed_orders: Option<u32>,
    pub render_failed: bool,
}

/// Result of a full descending-year crawl.
#[derive(Debug, Clone, Default)]
pub struct DiscoveryOutcome {
    pub frontier: UrlFrontier,
    pub years: Vec<YearSummary>,
}

/// Parser for order-history listing pages.
pub struct ListingParser {
    anchors: Selector,
    order_count: Selector,
}

impl ListingParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            anchors: parse_selector("a[href]")?,
            order_count: parse_selector("span.num-orders")?,
        })
    }

    /// Extract every href in document order plus the "N orders" banner.
    pub fn parse(&self, markup: &str) -> ListingPage {
        let document = Html::parse_document(markup);

        let hrefs = document
            .select(&self.anchors)
            .filter_map(|a| a.value().attr("href"))
            .map(str::to_string)
            .collect();

        // <span class="num-orders">93 orders</span> placed in
        let displayed_orders = document.select(&self.order_count).next().and_then(|span| {
            span.text()
                .collect::<String>()
                .split_whitespace()
                .next()
                .and_then(|n| n.replace(',', "").parse().ok())
        });

        ListingPage {
            hrefs,
            displayed_orders,
        }
    }
}

/// Crawler over the order-history listing.
pub struct OrderHistoryCrawler<R: Renderer> {
    session: RenderSession<R>,
    parser: ListingParser,
    root_url: String,
    page_size: u32,
    page_delay: Duration,
}

impl<R: Renderer> OrderHistoryCrawler<R> {
    pub fn new(session: RenderSession<R>, root_url: impl Into<String>, crawl: &CrawlConfig) -> Result<Self> {
        Ok(Self {
            session,
            parser: ListingParser::new()?,
            root_url: root_url.into(),
            page_size: crawl.page_size,
            page_delay: Duration::from_millis(crawl.page_delay_ms),
        })
    }

    pub fn session(&self) -> &RenderSession<R> {
        &self.session
    }

    /// Shut the rendering session down.
    pub async fn shutdown(&mut self) {
        self.session.release().await;
    }

    /// Crawl every year in `years` (expected newest first).
    ///
    /// After each year the three cumulative lists are written to `store`.
    /// Render failures end the current year only; the crawl aborts early
    /// only when the session escalates, or on a storage error.
    pub async fn discover<I>(&mut self, years: I, store: &dyn DocumentStore) -> Result<DiscoveryOutcome>
    where
        I: IntoIterator<Item = i32>,
    {
        let mut outcome = DiscoveryOutcome::default();

        for year in years {
            let summary = match self.crawl_year(year, &mut outcome.frontier).await {
                Ok(summary) => summary,
                Err(e) => {
                    // Keep what this year found before giving up
                    snapshot(&outcome.frontier, store).await?;
                    return Err(e);
                }
            };

            for category in UrlCategory::ALL {
                log::info!(
                    "got {} {} at year {}",
                    outcome.frontier.set(category).len(),
                    category.list_name(),
                    year
                );
            }

            snapshot(&outcome.frontier, store).await?;
            outcome.years.push(summary);
        }

        Ok(outcome)
    }

    async fn crawl_year(&mut self, year: i32, frontier: &mut UrlFrontier) -> Result<YearSummary> {
        let mut summary = YearSummary {
            year,
            ..YearSummary::default()
        };
        let mut page_num = 1;

        loop {
            let url = listing_url(&self.root_url, year, page_num, self.page_size);
            let page = self.session.get_page(&url).await?;
            summary.pages += 1;

            if !page.success {
                summary.render_failed = true;
                break;
            }

            let listing = self.parser.parse(&page.markup);
            if page_num == 1 {
                summary.displayed_orders = listing.displayed_orders;
                if let Some(count) = listing.displayed_orders {
                    log::info!("{} orders listed for {}", count, year);
                }
            }

            let novel = offer_all(frontier, &listing.hrefs);
            summary.new_urls += novel;
            if novel == 0 {
                break;
            }

            page_num += 1;
            wait_a_bit(self.page_delay).await;
        }

        Ok(summary)
    }
}

/// Offer every href to the frontier; returns how many were new.
pub fn offer_all(frontier: &mut UrlFrontier, hrefs: &[String]) -> usize {
    let mut novel = 0;
    for href in hrefs {
        if let Some((category, true)) = frontier.offer(href) {
            log::debug!("adding {} {}", category.list_name(), href);
            novel += 1;
        }
    }
    novel
}

/// Persist all three lists as cumulative snapshots.
pub async fn snapshot(frontier: &UrlFrontier, store: &dyn DocumentStore) -> Result<()> {
    for category in UrlCategory::ALL {
        store
            .write_url_list(category.list_name(), &frontier.set(category).to_vec())
            .await?;
    }
    Ok(())
}
