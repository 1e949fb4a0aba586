//! Discovered document references, grouped by category.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Category of a document reference found on a listing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UrlCategory {
    /// Printable invoice (`/gp/css/summary/print.html`)
    Invoice,
    /// Order details page
    OrderDetails,
    /// Digital order summary
    DigitalInvoice,
}

impl UrlCategory {
    pub const ALL: [UrlCategory; 3] = [
        UrlCategory::Invoice,
        UrlCategory::OrderDetails,
        UrlCategory::DigitalInvoice,
    ];

    /// Path fragment identifying this category inside an href.
    pub fn path_marker(self) -> &'static str {
        match self {
            UrlCategory::Invoice => "/gp/css/summary/print.html",
            UrlCategory::OrderDetails => "/gp/your-account/order-details",
            UrlCategory::DigitalInvoice => "/gp/digital/your-account/order-summary",
        }
    }

    /// Name of the persisted list for this category.
    pub fn list_name(self) -> &'static str {
        match self {
            UrlCategory::Invoice => "invoices",
            UrlCategory::OrderDetails => "order-details",
            UrlCategory::DigitalInvoice => "digital-invoices",
        }
    }

    /// Classify an href by substring match, checking categories in order.
    pub fn classify(href: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| href.contains(category.path_marker()))
    }

    pub fn from_list_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.list_name() == name)
    }
}

/// Insertion-ordered set of URLs compared by exact string equality.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderedUrlSet {
    urls: IndexSet<String>,
}

impl OrderedUrlSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert if absent. Returns `true` when the URL was new.
    ///
    /// A repeated URL keeps its original position.
    pub fn insert(&mut self, url: &str) -> bool {
        if self.urls.contains(url) {
            return false;
        }
        self.urls.insert(url.to_string())
    }

    pub fn position(&self, url: &str) -> Option<usize> {
        self.urls.get_index_of(url)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    /// Snapshot in discovery order.
    pub fn to_vec(&self) -> Vec<String> {
        self.urls.iter().cloned().collect()
    }
}

/// The three URL sets accumulated by the crawl.
#[derive(Debug, Clone, Default)]
pub struct UrlFrontier {
    invoices: OrderedUrlSet,
    order_details: OrderedUrlSet,
    digital_invoices: OrderedUrlSet,
}

impl UrlFrontier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, category: UrlCategory) -> &OrderedUrlSet {
        match category {
            UrlCategory::Invoice => &self.invoices,
            UrlCategory::OrderDetails => &self.order_details,
            UrlCategory::DigitalInvoice => &self.digital_invoices,
        }
    }

    fn set_mut(&mut self, category: UrlCategory) -> &mut OrderedUrlSet {
        match category {
            UrlCategory::Invoice => &mut self.invoices,
            UrlCategory::OrderDetails => &mut self.order_details,
            UrlCategory::DigitalInvoice => &mut self.digital_invoices,
        }
    }

    /// Classify `href` and insert it into the matching set.
    ///
    /// Returns `None` for unclassified hrefs, otherwise the category and
    /// whether the URL was new.
    pub fn offer(&mut self, href: &str) -> Option<(UrlCategory, bool)> {
        let category = UrlCategory::classify(href)?;
        let novel = self.set_mut(category).insert(href);
        Some((category, novel))
    }

    /// Total URLs across all categories.
    pub fn len(&self) -> usize {
        UrlCategory::ALL.iter().map(|c| self.set(*c).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
