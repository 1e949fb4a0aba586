//! Service layer for the harvester.
//!
//! This module contains the business logic for:
//! - Page rendering over a restartable session (`RenderSession`)
//! - Order-history discovery (`OrderHistoryCrawler`)
//! - Document download (`DocumentFetcher`)
//! - Record extraction (`OrderExtractor`)

pub mod extract;
pub mod fetch;
pub mod history;
pub mod session;

use scraper::Selector;

use crate::error::{AppError, Result};

pub use extract::{ExtractOutcome, OrderExtractor};
pub use fetch::{DocumentFetcher, FetchFailure, FetchOutcome, PageFetcher};
pub use history::{DiscoveryOutcome, ListingParser, OrderHistoryCrawler, YearSummary};
pub use session::{HttpRenderer, RenderSession, RenderedPage, Renderer};

pub(crate) fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_selector_valid() {
        assert!(parse_selector("div.displayAddressDiv").is_ok());
        assert!(parse_selector("a[href]").is_ok());
    }

    #[test]
    fn test_parse_selector_invalid() {
        assert!(matches!(parse_selector("[[invalid"), Err(AppError::Selector { .. })));
    }
}
