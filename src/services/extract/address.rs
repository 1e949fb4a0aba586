//! Shipping and billing address blocks.

use scraper::{ElementRef, Html, Selector};

use super::nav::{self, NodeHandle};
use crate::models::OrderRecord;

pub const ADDRESS_SELECTOR: &str = "div.displayAddressDiv";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressKind {
    Shipping,
    Billing,
    Unknown,
}

impl AddressKind {
    /// Classify from a label, case-insensitively. "shipping" wins over "billing".
    pub fn from_label(label: &str) -> Self {
        let label = label.to_lowercase();
        if label.contains("shipping") {
            AddressKind::Shipping
        } else if label.contains("billing") {
            AddressKind::Billing
        } else {
            AddressKind::Unknown
        }
    }
}

/// A parsed four-line address block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostalAddress {
    pub person: String,
    /// "street, city/state/zip"
    pub address: String,
}

impl PostalAddress {
    /// Parse name, street, city/state/zip and country lines.
    ///
    /// Lines are trimmed and blank lines dropped; anything other than
    /// exactly four remaining lines is rejected.
    pub fn parse(text: &str) -> Option<Self> {
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        let [name, street, city_state_zip, _country] = lines.as_slice() else {
            return None;
        };
        Some(Self {
            person: name.to_string(),
            address: format!("{street}, {city_state_zip}"),
        })
    }
}

/// Label of the nearest preceding `<b>` next to the block or its parent.
fn label_for(block: NodeHandle<'_>) -> Option<String> {
    nav::preceding_sibling(block, "b")
        .or_else(|| block.parent().and_then(|parent| nav::preceding_sibling(parent, "b")))
        .map(nav::collect_text)
}

pub fn classify(block: ElementRef<'_>) -> AddressKind {
    label_for(*block)
        .map(|label| AddressKind::from_label(&label))
        .unwrap_or(AddressKind::Unknown)
}

/// Fill shipping and billing fields from every address block.
///
/// Each block is handled on its own: an unlabeled or malformed block
/// contributes nothing and does not affect the others.
pub fn apply_addresses(selector: &Selector, document: &Html, order: &mut OrderRecord) {
    for block in document.select(selector) {
        let kind = classify(block);
        let text: String = block.text().collect();
        let Some(parsed) = PostalAddress::parse(&text) else {
            log::debug!("skipping {:?} address with unexpected layout", kind);
            continue;
        };
        match kind {
            AddressKind::Shipping => {
                order.shipping_person = parsed.person;
                order.shipping_address = parsed.address;
            }
            AddressKind::Billing => {
                order.billing_person = parsed.person;
                order.billing_address = parsed.address;
            }
            AddressKind::Unknown => log::debug!("dropping unlabeled address for {}", parsed.person),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selector() -> Selector {
        Selector::parse(ADDRESS_SELECTOR).unwrap()
    }

    fn extract(markup: &str) -> OrderRecord {
        let html = Html::parse_document(markup);
        let mut order = OrderRecord::default();
        apply_addresses(&selector(), &html, &mut order);
        order
    }

    #[test]
    fn test_label_classification_is_case_insensitive() {
        assert_eq!(AddressKind::from_label("BILLING ADDRESS"), AddressKind::Billing);
        assert_eq!(AddressKind::from_label("Shipping Address:"), AddressKind::Shipping);
        assert_eq!(AddressKind::from_label("Sold to"), AddressKind::Unknown);
    }

    #[test]
    fn test_parse_requires_four_lines() {
        let parsed = PostalAddress::parse("\n  Jane Doe\n  1 Main St\n  Springfield, IL 62701\n  United States\n").unwrap();
        assert_eq!(parsed.person, "Jane Doe");
        assert_eq!(parsed.address, "1 Main St, Springfield, IL 62701");

        assert!(PostalAddress::parse("Jane Doe\n1 Main St\nUnited States").is_none());
        assert!(PostalAddress::parse("a\nb\nc\nd\ne").is_none());
    }

    #[test]
    fn test_shipping_and_billing_blocks() {
        let order = extract(
            r#"<body>
            <div><b>Shipping Address:</b><div class="displayAddressDiv">
            Jane Doe
            1 Main St
            Springfield, IL 62701
            United States
            </div></div>
            <b>BILLING address</b><div class="displayAddressDiv">
            John Roe
            9 Elm Ave
            Shelbyville, IL 62565
            United States
            </div>
            </body>"#,
        );
        assert_eq!(order.shipping_person, "Jane Doe");
        assert_eq!(order.shipping_address, "1 Main St, Springfield, IL 62701");
        assert_eq!(order.billing_person, "John Roe");
        assert_eq!(order.billing_address, "9 Elm Ave, Shelbyville, IL 62565");
    }

    #[test]
    fn test_label_found_beside_parent() {
        let order = extract(
            r#"<body><b>Billing Address</b><div><div class="displayAddressDiv">
            John Roe
            9 Elm Ave
            Shelbyville, IL 62565
            United States
            </div></div></body>"#,
        );
        assert_eq!(order.billing_person, "John Roe");
    }

    #[test]
    fn test_unlabeled_block_contributes_nothing() {
        let order = extract(
            r#"<body><div class="displayAddressDiv">
            Jane Doe
            1 Main St
            Springfield, IL 62701
            United States
            </div></body>"#,
        );
        assert_eq!(order, OrderRecord::default());
    }

    #[test]
    fn test_malformed_block_does_not_affect_others() {
        let order = extract(
            r#"<body>
            <b>Shipping Address:</b><div class="displayAddressDiv">Jane Doe</div>
            <b>Billing Address:</b><div class="displayAddressDiv">
            John Roe
            9 Elm Ave
            Shelbyville, IL 62565
            United States
            </div>
            </body>"#,
        );
        assert!(order.shipping_person.is_empty());
        assert_eq!(order.billing_person, "John Roe");
    }
}
