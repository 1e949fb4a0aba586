//! Storage abstractions for harvested artifacts.
//!
//! ## Directory Structure
//!
//! ```text
//! {storage_dir}/{account}/
//! ├── invoices.json          # Discovered print-invoice URLs
//! ├── order-details.json     # Discovered order-detail URLs
//! ├── digital-invoices.json  # Discovered digital-invoice URLs
//! ├── orders/                # Raw documents, one per order id
//! │   └── 114-3941689-8772232.html
//! ├── orders.csv             # Extracted orders
//! └── items.csv              # Extracted line items
//! ```

pub mod local;
pub mod table;

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::Result;

pub use local::{DOCUMENT_EXTENSION, LocalStorage};
pub use table::TableWriter;

/// A raw document persisted by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredDocument {
    pub order_id: String,
    pub path: PathBuf,
    /// Hex SHA-256 of the written bytes
    pub sha256: String,
    pub bytes: usize,
}

/// Keyed, overwrite-only persistence for URL lists and raw documents.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Replace the named URL list wholesale.
    async fn write_url_list(&self, name: &str, urls: &[String]) -> Result<()>;

    /// Read a URL list, or `None` if it was never written.
    async fn read_url_list(&self, name: &str) -> Result<Option<Vec<String>>>;

    /// Write a raw document keyed by order id, overwriting any prior copy.
    async fn write_document(&self, order_id: &str, body: &str) -> Result<StoredDocument>;

    /// Persisted documents sorted by file name.
    async fn list_documents(&self) -> Result<Vec<PathBuf>>;
}
