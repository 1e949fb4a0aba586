// src/utils/url.rs

//! Storefront URL construction and order-id derivation.

use crate::error::{AppError, Result};

/// Query parameter carrying the order identifier in document links.
pub const ORDER_ID_PARAM: &str = "orderID";

/// Build the order-history listing URL for one page of one year.
///
/// Pages are 1-based; `page_size` orders are shown per page.
///
/// # Examples
/// ```
/// use harvester::utils::url::listing_url;
///
/// assert_eq!(
///     listing_url("https://www.amazon.com", 2023, 2, 10),
///     "https://www.amazon.com/gp/your-account/order-history/ref=ppx_yo_dt_b_pagination_1_2\
///      ?ie=UTF8&orderFilter=year-2023&search=&startIndex=10"
/// );
/// ```
pub fn listing_url(root_url: &str, year: i32, page: u32, page_size: u32) -> String {
    let page = page.max(1);
    format!(
        "{}/gp/your-account/order-history/ref=ppx_yo_dt_b_pagination_{}_{}\
         ?ie=UTF8&orderFilter=year-{}&search=&startIndex={}",
        root_url.trim_end_matches('/'),
        page - 1,
        page,
        year,
        (page - 1) * page_size
    )
}

/// Extract the order identifier from a document URL.
///
/// Works on relative and absolute URLs.
pub fn extract_order_id(href: &str) -> Result<String> {
    let base = ::url::Url::parse("https://localhost/")?;
    let parsed = base.join(href)?;

    parsed
        .query_pairs()
        .find(|(key, value)| key == ORDER_ID_PARAM && !value.is_empty())
        .map(|(_, value)| value.into_owned())
        .ok_or_else(|| AppError::MissingOrderId(href.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_url_first_page() {
        assert_eq!(
            listing_url("https://www.amazon.com/", 2021, 1, 10),
            "https://www.amazon.com/gp/your-account/order-history/ref=ppx_yo_dt_b_pagination_0_1?ie=UTF8&orderFilter=year-2021&search=&startIndex=0"
        );
    }

    #[test]
    fn test_listing_url_start_index_uses_page_size() {
        let url = listing_url("https://www.amazon.com", 2021, 4, 10);
        assert!(url.contains("pagination_3_4"));
        assert!(url.ends_with("startIndex=30"));
    }

    #[test]
    fn test_extract_order_id_relative() {
        let href = "/gp/css/summary/print.html/ref=ppx_od_dt_b_invoice?ie=UTF8&orderID=114-3941689-8772232";
        assert_eq!(extract_order_id(href).unwrap(), "114-3941689-8772232");
    }

    #[test]
    fn test_extract_order_id_absolute_with_trailing_params() {
        let href = "https://www.amazon.com/gp/your-account/order-details?orderID=D01-1&ref=x";
        assert_eq!(extract_order_id(href).unwrap(), "D01-1");
    }

    #[test]
    fn test_extract_order_id_missing() {
        assert!(matches!(
            extract_order_id("/gp/css/summary/print.html?ie=UTF8"),
            Err(AppError::MissingOrderId(_))
        ));
    }
}
