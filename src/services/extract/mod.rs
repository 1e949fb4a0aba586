// src/services/extract/mod.rs

//! Extraction of order and item records from stored documents.
//!
//! Every field is extracted on its own: a missing anchor or an unexpected
//! node leaves that one field empty and never aborts the record.

pub mod address;
pub mod fields;
pub mod items;
pub mod nav;

use std::io::Write;
use std::path::{Path, PathBuf};

use scraper::{Html, Selector};

use crate::error::Result;
use crate::models::{ItemRecord, OrderRecord};
use crate::services::parse_selector;
use crate::storage::TableWriter;

use fields::CompiledRule;
use items::ItemPatterns;

/// Counts from one extraction run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractOutcome {
    pub documents: usize,
    pub orders: usize,
    pub items: usize,
    /// Documents where no order field matched
    pub blank_orders: Vec<PathBuf>,
}

/// Parses invoice documents into records.
pub struct OrderExtractor {
    rules: Vec<CompiledRule>,
    address: Selector,
    items: ItemPatterns,
}

impl OrderExtractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            rules: fields::compile_order_rules()?,
            address: parse_selector(address::ADDRESS_SELECTOR)?,
            items: ItemPatterns::new()?,
        })
    }

    /// Parse one document. Never fails; unmatched fields stay empty.
    pub fn extract_document(&self, markup: &str) -> (OrderRecord, Vec<ItemRecord>) {
        let document = Html::parse_document(markup);
        let body = nav::body(&document);

        let mut order = OrderRecord::default();
        fields::apply_rules(&self.rules, body, &mut order);
        address::apply_addresses(&self.address, &document, &mut order);

        let columns = items::collect_columns(&self.items, body);
        let line_items = items::assemble_items(&order.order_number, &columns);

        (order, line_items)
    }

    /// Extract every document in `paths`, in order, into `tables`.
    ///
    /// Each order row is written before its item rows. Read and write
    /// errors abort the run.
    pub async fn extract_all<W: Write>(
        &self,
        paths: &[PathBuf],
        tables: &mut TableWriter<W>,
    ) -> Result<ExtractOutcome> {
        let mut outcome = ExtractOutcome::default();

        for path in paths {
            let markup = read_document(path).await?;
            let (order, line_items) = self.extract_document(&markup);
            outcome.documents += 1;

            if order.is_blank() {
                log::warn!("No order fields matched in {}", path.display());
                outcome.blank_orders.push(path.clone());
            }

            tables.append_order(&order)?;
            tables.append_items(&line_items)?;
            outcome.orders += 1;
            outcome.items += line_items.len();

            log::info!(
                "Appended order {} with {} items",
                order.order_number,
                line_items.len()
            );
        }

        Ok(outcome)
    }
}

/// Stored pages are decoded lossily; invalid bytes do not stop extraction.
async fn read_document(path: &Path) -> Result<String> {
    let bytes = tokio::fs::read(path).await?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
