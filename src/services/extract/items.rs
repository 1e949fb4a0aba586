//! Line items.
//!
//! Five attribute lists are collected independently and zipped by index.
//! The lists need not agree in length: the longest one sets the item
//! count, and a position missing from a shorter list leaves that
//! attribute empty.

use regex::Regex;

use super::fields::isolate;
use super::nav::{self, NodeHandle};
use crate::error::Result;
use crate::models::ItemRecord;

/// Compiled anchors for item attributes.
#[derive(Debug, Clone)]
pub struct ItemPatterns {
    quantity: Regex,
    seller: Regex,
    condition: Regex,
    price: Regex,
    trailing_paren: Regex,
}

impl ItemPatterns {
    pub fn new() -> Result<Self> {
        Ok(Self {
            quantity: Regex::new("of:")?,
            seller: Regex::new("Sold by:")?,
            condition: Regex::new("Condition:")?,
            price: Regex::new(r"\$")?,
            trailing_paren: Regex::new(r" \($")?,
        })
    }
}

/// Per-attribute values by item position; `None` where a value did not resolve.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemColumns {
    pub quantities: Vec<Option<String>>,
    pub descriptions: Vec<Option<String>>,
    pub sellers: Vec<Option<String>>,
    pub conditions: Vec<Option<String>>,
    pub prices: Vec<Option<String>>,
}

impl ItemColumns {
    pub fn item_count(&self) -> usize {
        [
            self.quantities.len(),
            self.descriptions.len(),
            self.sellers.len(),
            self.conditions.len(),
            self.prices.len(),
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
    }
}

fn after<'t>(text: &'t str, marker: &str) -> Option<&'t str> {
    text.split(marker).nth(1).map(str::trim)
}

fn quantity(node: NodeHandle<'_>) -> Option<String> {
    let text = nav::text(node)?;
    text.split("of:").next().map(|q| q.trim().to_string())
}

fn description(node: NodeHandle<'_>) -> Option<String> {
    let holder = nav::next_node(node)?;
    nav::text(holder.first_child()?).map(|d| d.trim().to_string())
}

/// Collect the five attribute lists from a document body.
pub fn collect_columns(patterns: &ItemPatterns, body: NodeHandle<'_>) -> ItemColumns {
    // Quantity and description share the "of:" anchor; condition and price share "Condition:".
    let of_nodes = nav::find_all_text(body, &patterns.quantity);
    let seller_nodes = nav::find_all_text(body, &patterns.seller);
    let condition_nodes = nav::find_all_text(body, &patterns.condition);

    ItemColumns {
        quantities: of_nodes.iter().map(|n| quantity(*n)).collect(),
        descriptions: of_nodes.iter().map(|n| description(*n)).collect(),
        sellers: seller_nodes
            .iter()
            .map(|n| {
                let seller = after(nav::text(*n)?, "Sold by:")?;
                Some(patterns.trailing_paren.replace(seller, "").into_owned())
            })
            .collect(),
        conditions: condition_nodes
            .iter()
            .map(|n| after(nav::text(*n)?, "Condition:").map(str::to_string))
            .collect(),
        prices: condition_nodes
            .iter()
            .map(|n| {
                let price = nav::find_next_text(*n, &patterns.price)?;
                nav::text(price).map(|p| p.trim().replace('$', ""))
            })
            .collect(),
    }
}

fn pick(column: &[Option<String>], index: usize) -> Option<String> {
    column.get(index).cloned().flatten()
}

/// Zip columns into `ItemRecord`s for `order_number`.
pub fn assemble_items(order_number: &str, columns: &ItemColumns) -> Vec<ItemRecord> {
    (0..columns.item_count())
        .map(|i| ItemRecord {
            item_quantity: isolate("item_quantity", || pick(&columns.quantities, i)),
            item_description: isolate("item_description", || pick(&columns.descriptions, i)),
            item_seller: isolate("item_seller", || pick(&columns.sellers, i)),
            item_condition: isolate("item_condition", || pick(&columns.conditions, i)),
            item_price: isolate("item_price", || pick(&columns.prices, i)),
            ..ItemRecord::for_order(order_number)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use scraper::Html;

    use super::*;

    fn values(v: &[&str]) -> Vec<Option<String>> {
        v.iter().map(|s| Some(s.to_string())).collect()
    }

    #[test]
    fn test_item_count_is_longest_column() {
        let columns = ItemColumns {
            quantities: values(&["1", "2", "3"]),
            descriptions: values(&["a", "b"]),
            sellers: values(&["s1", "s2", "s3"]),
            conditions: values(&["New"]),
            prices: values(&["1.00", "2.00", "3.00"]),
        };
        let items = assemble_items("111-1", &columns);

        assert_eq!(items.len(), 3);
        assert!(items.iter().all(|item| item.order_number == "111-1"));
        assert_eq!(items[1].item_description, "b");
        assert_eq!(items[2].item_description, "");
        assert_eq!(items[1].item_condition, "");
        assert_eq!(items[2].item_price, "3.00");
    }

    #[test]
    fn test_unresolved_value_is_empty() {
        let columns = ItemColumns {
            quantities: vec![None, Some("2".to_string())],
            ..ItemColumns::default()
        };
        let items = assemble_items("x", &columns);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].item_quantity, "");
        assert_eq!(items[1].item_quantity, "2");
    }

    #[test]
    fn test_no_anchors_no_items() {
        assert!(assemble_items("x", &ItemColumns::default()).is_empty());
    }

    #[test]
    fn test_collect_columns_from_invoice_markup() {
        let html = Html::parse_document(
            r#"<body><table>
            <tr><td>2 of: <i>Rust in Action</i><br>
            Sold by: Books Inc (<a href="/seller">seller profile</a>)<br>
            Condition: New</td>
            <td>$39.99</td></tr>
            <tr><td>1 of: <i>USB cable</i><br>
            Condition: Used - Good</td>
            <td>$5.49</td></tr>
            </table></body>"#,
        );
        let patterns = ItemPatterns::new().unwrap();
        let columns = collect_columns(&patterns, nav::body(&html));

        assert_eq!(columns.item_count(), 2);
        let items = assemble_items("111-1", &columns);

        assert_eq!(items[0].item_quantity, "2");
        assert_eq!(items[0].item_description, "Rust in Action");
        assert_eq!(items[0].item_seller, "Books Inc");
        assert_eq!(items[0].item_condition, "New");
        assert_eq!(items[0].item_price, "39.99");

        assert_eq!(items[1].item_quantity, "1");
        assert_eq!(items[1].item_description, "USB cable");
        assert_eq!(items[1].item_seller, "");
        assert_eq!(items[1].item_condition, "Used - Good");
        assert_eq!(items[1].item_price, "5.49");
    }
}
