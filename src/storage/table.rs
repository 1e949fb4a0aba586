//! Append-only order and item tables.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::WriterBuilder;

use crate::error::Result;
use crate::models::{ItemRecord, OrderRecord};

/// Paired writers for the orders and items tables.
///
/// Both tables get their header row on creation, so an extraction over an
/// empty directory still yields two well-formed tables.
pub struct TableWriter<W: Write = File> {
    orders: csv::Writer<W>,
    items: csv::Writer<W>,
    orders_written: usize,
    items_written: usize,
}

impl TableWriter<File> {
    /// Create (truncating) both table files.
    pub fn create(orders_path: &Path, items_path: &Path) -> Result<Self> {
        for path in [orders_path, items_path] {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Self::from_writers(File::create(orders_path)?, File::create(items_path)?)
    }
}

impl<W: Write> TableWriter<W> {
    pub fn from_writers(orders: W, items: W) -> Result<Self> {
        let mut orders = WriterBuilder::new().has_headers(false).from_writer(orders);
        let mut items = WriterBuilder::new().has_headers(false).from_writer(items);

        orders.write_record(OrderRecord::COLUMNS)?;
        items.write_record(ItemRecord::COLUMNS)?;
        orders.flush()?;
        items.flush()?;

        Ok(Self {
            orders,
            items,
            orders_written: 0,
            items_written: 0,
        })
    }

    pub fn append_order(&mut self, order: &OrderRecord) -> Result<()> {
        self.orders.serialize(order)?;
        self.orders.flush()?;
        self.orders_written += 1;
        Ok(())
    }

    pub fn append_items(&mut self, items: &[ItemRecord]) -> Result<()> {
        for item in items {
            self.items.serialize(item)?;
        }
        self.items.flush()?;
        self.items_written += items.len();
        Ok(())
    }

    pub fn orders_written(&self) -> usize {
        self.orders_written
    }

    pub fn items_written(&self) -> usize {
        self.items_written
    }

    /// Flush and hand back the underlying writers.
    pub fn into_inner(self) -> Result<(W, W)> {
        let orders = self
            .orders
            .into_inner()
            .map_err(|e| e.into_error())?;
        let items = self
            .items
            .into_inner()
            .map_err(|e| e.into_error())?;
        Ok((orders, items))
    }
}
