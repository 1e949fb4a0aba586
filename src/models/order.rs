//! Order and line-item records produced by extraction.

use serde::{Deserialize, Serialize};

/// One purchase transaction.
///
/// Every field defaults to an empty string; an empty field means the
/// corresponding anchor was not found in the source document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderRecord {
    pub order_number: String,
    pub order_placed_date: String,
    pub order_total: String,
    pub order_subtotal: String,
    pub order_shipping_and_handling: String,
    pub order_total_pre_tax: String,
    pub order_tax: String,
    pub order_grand_total: String,
    pub payment_method: String,
    pub credit_card: String,
    pub credit_card_charge_date: String,
    pub shipping_person: String,
    pub shipping_address: String,
    pub billing_person: String,
    pub billing_address: String,
}

impl OrderRecord {
    /// Column names in declaration order.
    pub const COLUMNS: [&'static str; 15] = [
        "order_number",
        "order_placed_date",
        "order_total",
        "order_subtotal",
        "order_shipping_and_handling",
        "order_total_pre_tax",
        "order_tax",
        "order_grand_total",
        "payment_method",
        "credit_card",
        "credit_card_charge_date",
        "shipping_person",
        "shipping_address",
        "billing_person",
        "billing_address",
    ];

    /// True when no field could be extracted at all.
    pub fn is_blank(&self) -> bool {
        *self == Self::default()
    }
}

/// One line item within an order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItemRecord {
    /// Parent order; not checked against the orders table
    pub order_number: String,
    pub item_quantity: String,
    pub item_description: String,
    pub item_seller: String,
    pub item_condition: String,
    pub item_price: String,
}

impl ItemRecord {
    /// Column names in declaration order.
    pub const COLUMNS: [&'static str; 6] = [
        "order_number",
        "item_quantity",
        "item_description",
        "item_seller",
        "item_condition",
        "item_price",
    ];

    pub fn for_order(order_number: impl Into<String>) -> Self {
        Self {
            order_number: order_number.into(),
            ..Self::default()
        }
    }
}
