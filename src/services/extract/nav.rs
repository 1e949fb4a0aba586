//! Document-order navigation over a parsed page.
//!
//! Anchors are located by searching text nodes; values are then reached
//! by short structural hops from the anchor. Every hop returns `Option`
//! so a missing node ends the walk without an error.

use ego_tree::NodeRef;
use regex::Regex;
use scraper::{Html, node::Node};

pub type NodeHandle<'a> = NodeRef<'a, Node>;

/// The `<body>` element, or the document root if there is none.
pub fn body(document: &Html) -> NodeHandle<'_> {
    document
        .root_element()
        .children()
        .find(|child| is_element(*child, "body"))
        .unwrap_or_else(|| document.tree.root())
}

/// Next node in document order: first child, else next sibling of the
/// nearest ancestor-or-self that has one.
pub fn next_node(node: NodeHandle<'_>) -> Option<NodeHandle<'_>> {
    if let Some(child) = node.first_child() {
        return Some(child);
    }
    let mut current = node;
    loop {
        if let Some(sibling) = current.next_sibling() {
            return Some(sibling);
        }
        current = current.parent()?;
    }
}

pub fn text(node: NodeHandle<'_>) -> Option<&str> {
    node.value().as_text().map(|t| &**t)
}

pub fn is_element(node: NodeHandle<'_>, name: &str) -> bool {
    node.value()
        .as_element()
        .is_some_and(|element| element.name() == name)
}

/// All text under `node`, concatenated.
pub fn collect_text(node: NodeHandle<'_>) -> String {
    node.descendants().filter_map(text).collect()
}

/// First text node under `root` whose content matches `pattern`.
pub fn find_text<'a>(root: NodeHandle<'a>, pattern: &Regex) -> Option<NodeHandle<'a>> {
    root.descendants()
        .find(|node| text(*node).is_some_and(|t| pattern.is_match(t)))
}

/// Every text node under `root` whose content matches `pattern`.
pub fn find_all_text<'a>(root: NodeHandle<'a>, pattern: &Regex) -> Vec<NodeHandle<'a>> {
    root.descendants()
        .filter(|node| text(*node).is_some_and(|t| pattern.is_match(t)))
        .collect()
}

/// First matching text node after `node` in document order.
pub fn find_next_text<'a>(node: NodeHandle<'a>, pattern: &Regex) -> Option<NodeHandle<'a>> {
    std::iter::successors(next_node(node), |n| next_node(*n))
        .find(|n| text(*n).is_some_and(|t| pattern.is_match(t)))
}

/// Nearest preceding sibling element named `name`.
pub fn preceding_sibling<'a>(node: NodeHandle<'a>, name: &str) -> Option<NodeHandle<'a>> {
    node.prev_siblings().find(|sibling| is_element(*sibling, name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(s: &str) -> Regex {
        Regex::new(s).unwrap()
    }

    #[test]
    fn test_next_node_walks_into_children_then_up() {
        let html = Html::parse_document("<body><b>Label:</b> value<p><i>deep</i></p></body>");
        let root = body(&html);

        let label = find_text(root, &pattern("Label:")).unwrap();
        let value = next_node(label).unwrap();
        assert_eq!(text(value), Some(" value"));

        let p = next_node(value).unwrap();
        assert!(is_element(p, "p"));
        let i = next_node(p).unwrap();
        assert!(is_element(i, "i"));
        assert_eq!(text(next_node(i).unwrap()), Some("deep"));
    }

    #[test]
    fn test_next_node_ends_at_document_end() {
        let html = Html::parse_document("<body>last</body>");
        let last = find_text(body(&html), &pattern("last")).unwrap();
        assert!(next_node(last).is_none());
    }

    #[test]
    fn test_find_all_text_in_document_order() {
        let html = Html::parse_document("<body><p>1 of: A</p><div><span>2 of: B</span></div></body>");
        let found: Vec<_> = find_all_text(body(&html), &pattern("of:"))
            .into_iter()
            .filter_map(text)
            .collect();
        assert_eq!(found, vec!["1 of: A", "2 of: B"]);
    }

    #[test]
    fn test_find_next_text_skips_to_later_nodes() {
        let html = Html::parse_document(
            "<body><p>$1.00</p><p>Condition: New</p><p>seller</p><p>$9.99</p></body>",
        );
        let root = body(&html);
        let condition = find_text(root, &pattern("Condition:")).unwrap();
        let price = find_next_text(condition, &pattern(r"\$")).unwrap();
        assert_eq!(text(price), Some("$9.99"));
    }

    #[test]
    fn test_preceding_sibling_skips_other_elements() {
        let html = Html::parse_document(
            r#"<body><div><b>Shipping Address:</b><br><div class="addr">x</div></div></body>"#,
        );
        let addr = body(&html)
            .descendants()
            .find(|n| {
                n.value()
                    .as_element()
                    .is_some_and(|e| e.attr("class") == Some("addr"))
            })
            .unwrap();
        let label = preceding_sibling(addr, "b").unwrap();
        assert_eq!(collect_text(label), "Shipping Address:");
    }
}
