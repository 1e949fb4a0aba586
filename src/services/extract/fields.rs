//! Order-level field rules.
//!
//! Each field is one anchor pattern, a fixed hop path from the anchor, and
//! a finishing transform. Fields are evaluated independently through
//! [`isolate`]; a rule that does not resolve leaves its field empty.

use regex::Regex;

use super::nav::{self, NodeHandle};
use crate::error::Result;
use crate::models::OrderRecord;

/// One hop from the current node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Next node in document order
    Next,
    Parent,
    /// First child (the node's leading content)
    FirstChild,
}

/// How the text reached by a rule becomes a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finish {
    Trim,
    /// Remove currency symbols, then trim
    StripCurrency,
    /// Text after the first `$`, trimmed; no `$` means no value
    AfterCurrency,
    /// The n-th `:`-separated part, trimmed
    ColonPart(usize),
}

impl Finish {
    pub fn apply(self, text: &str) -> Option<String> {
        let value = match self {
            Finish::Trim => text.trim().to_string(),
            Finish::StripCurrency => text.replace('$', "").trim().to_string(),
            Finish::AfterCurrency => text.split('$').nth(1)?.trim().to_string(),
            Finish::ColonPart(n) => text.split(':').nth(n)?.trim().to_string(),
        };
        Some(value)
    }
}

/// Order columns filled by anchor rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderField {
    OrderNumber,
    PlacedDate,
    Total,
    Subtotal,
    ShippingAndHandling,
    TotalPreTax,
    Tax,
    GrandTotal,
    PaymentMethod,
    CreditCard,
    CreditCardChargeDate,
}

impl OrderField {
    pub fn slot(self, order: &mut OrderRecord) -> &mut String {
        match self {
            OrderField::OrderNumber => &mut order.order_number,
            OrderField::PlacedDate => &mut order.order_placed_date,
            OrderField::Total => &mut order.order_total,
            OrderField::Subtotal => &mut order.order_subtotal,
            OrderField::ShippingAndHandling => &mut order.order_shipping_and_handling,
            OrderField::TotalPreTax => &mut order.order_total_pre_tax,
            OrderField::Tax => &mut order.order_tax,
            OrderField::GrandTotal => &mut order.order_grand_total,
            OrderField::PaymentMethod => &mut order.payment_method,
            OrderField::CreditCard => &mut order.credit_card,
            OrderField::CreditCardChargeDate => &mut order.credit_card_charge_date,
        }
    }
}

/// Static description of one field extraction.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field: OrderField,
    /// Regex searched in each text node of the body
    pub anchor: &'static str,
    pub path: &'static [Step],
    pub finish: Finish,
}

use Step::{FirstChild, Next, Parent};

const AMOUNT_CELL: &[Step] = &[Next, Next, FirstChild];

/// Rules for the print-invoice layout, in column order.
pub const ORDER_RULES: &[FieldRule] = &[
    FieldRule {
        field: OrderField::OrderNumber,
        anchor: r"Amazon\.com order number:",
        path: &[Next],
        finish: Finish::Trim,
    },
    FieldRule {
        field: OrderField::PlacedDate,
        anchor: r"Order Placed:",
        path: &[Next],
        finish: Finish::Trim,
    },
    // <b>Order Total: $12.34</b>
    FieldRule {
        field: OrderField::Total,
        anchor: r"Order Total",
        path: &[Parent, FirstChild],
        finish: Finish::AfterCurrency,
    },
    FieldRule {
        field: OrderField::Subtotal,
        anchor: r"Item\(s\) Subtotal:",
        path: AMOUNT_CELL,
        finish: Finish::StripCurrency,
    },
    FieldRule {
        field: OrderField::ShippingAndHandling,
        anchor: r"Shipping & Handling:",
        path: AMOUNT_CELL,
        finish: Finish::StripCurrency,
    },
    FieldRule {
        field: OrderField::TotalPreTax,
        anchor: r"Total before tax:",
        path: AMOUNT_CELL,
        finish: Finish::StripCurrency,
    },
    FieldRule {
        field: OrderField::Tax,
        anchor: r"Estimated tax to be collected:",
        path: AMOUNT_CELL,
        finish: Finish::StripCurrency,
    },
    // Grand total is wrapped in <b> inside its cell
    FieldRule {
        field: OrderField::GrandTotal,
        anchor: r"Grand Total:",
        path: &[Next, Next, FirstChild, FirstChild],
        finish: Finish::StripCurrency,
    },
    FieldRule {
        field: OrderField::PaymentMethod,
        anchor: r"Payment Method:",
        path: &[Next, Next, Next],
        finish: Finish::Trim,
    },
    // "Visa ending in 1234: January 5, 2021: $12.34"
    FieldRule {
        field: OrderField::CreditCard,
        anchor: r"ending in",
        path: &[],
        finish: Finish::ColonPart(0),
    },
    FieldRule {
        field: OrderField::CreditCardChargeDate,
        anchor: r"ending in",
        path: &[],
        finish: Finish::ColonPart(1),
    },
];

/// Run one extraction; a miss yields the empty default.
pub fn isolate<F>(field: &str, extract: F) -> String
where
    F: FnOnce() -> Option<String>,
{
    extract().unwrap_or_else(|| {
        log::trace!("no value for {}", field);
        String::new()
    })
}

/// A [`FieldRule`] with its anchor compiled.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    pub rule: FieldRule,
    anchor: Regex,
}

impl CompiledRule {
    pub fn new(rule: FieldRule) -> Result<Self> {
        Ok(Self {
            anchor: Regex::new(rule.anchor)?,
            rule,
        })
    }

    /// Locate the anchor, walk the path, finish the text.
    pub fn evaluate(&self, body: NodeHandle<'_>) -> Option<String> {
        let anchor = nav::find_text(body, &self.anchor)?;
        let target = walk(anchor, self.rule.path)?;
        self.rule.finish.apply(nav::text(target)?)
    }
}

/// Follow `path` from `start`; `None` if any hop is missing.
pub fn walk<'a>(start: NodeHandle<'a>, path: &[Step]) -> Option<NodeHandle<'a>> {
    path.iter().try_fold(start, |node, step| match step {
        Step::Next => nav::next_node(node),
        Step::Parent => node.parent(),
        Step::FirstChild => node.first_child(),
    })
}

pub fn compile_order_rules() -> Result<Vec<CompiledRule>> {
    ORDER_RULES.iter().copied().map(CompiledRule::new).collect()
}

/// Fill every rule-driven field of `order`, each one isolated.
pub fn apply_rules(rules: &[CompiledRule], body: NodeHandle<'_>, order: &mut OrderRecord) {
    for rule in rules {
        let value = isolate(rule.rule.anchor, || rule.evaluate(body));
        *rule.rule.field.slot(order) = value;
    }
}
