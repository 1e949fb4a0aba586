//! Pipeline entry points for harvester operations.
//!
//! - `run_crawl`: Discover document URLs from the order-history listing
//! - `run_fetch`: Download discovered documents
//! - `run_extract`: Turn stored documents into order and item tables
//! - `run_pipeline`: All three in sequence

pub mod crawl;
pub mod extract;
pub mod fetch;
pub mod pipeline;

use std::path::Path;

use crate::models::Config;
use crate::storage::LocalStorage;

pub use crawl::{run_crawl, run_crawl_with};
pub use extract::run_extract;
pub use fetch::{run_fetch, run_fetch_with};
pub use pipeline::run_pipeline;

/// Storage rooted at the configured account's directory.
pub fn open_storage(config: &Config, storage_dir: &Path) -> LocalStorage {
    LocalStorage::with_documents_dir(config.account_dir(storage_dir), &config.paths.documents_dir)
}
