// src/pipeline/extract.rs

//! Record extraction pipeline.

use crate::error::Result;
use crate::models::Config;
use crate::services::{ExtractOutcome, OrderExtractor};
use crate::storage::{DocumentStore, LocalStorage, TableWriter};
use crate::utils::progress;

/// Extract every stored document into fresh orders and items tables.
///
/// Both tables are truncated first, so a re-run replaces the previous export.
pub async fn run_extract(config: &Config, store: &LocalStorage) -> Result<ExtractOutcome> {
    progress::header("Extract - parsing stored documents");

    let documents = store.list_documents().await?;
    log::info!(
        "Parsing {} documents from {}",
        documents.len(),
        store.documents_path().display()
    );

    let orders_path = store.root_dir().join(&config.paths.orders_table);
    let items_path = store.root_dir().join(&config.paths.items_table);
    let mut tables = TableWriter::create(&orders_path, &items_path)?;

    let extractor = OrderExtractor::new()?;
    let outcome = extractor.extract_all(&documents, &mut tables).await?;

    progress::summary(
        "Extract",
        &[
            ("documents", outcome.documents.to_string()),
            ("orders", outcome.orders.to_string()),
            ("items", outcome.items.to_string()),
            ("blank orders", outcome.blank_orders.len().to_string()),
        ],
    );
    progress::sub_item(&format!("Orders table: {}", orders_path.display()));
    progress::sub_item(&format!("Items table: {}", items_path.display()));

    Ok(outcome)
}
