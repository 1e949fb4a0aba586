//! Utility functions and helpers.

pub mod http;
pub mod progress;
pub mod url;

use std::time::Duration;

/// Resolve a potentially relative URL against a base URL.
pub fn resolve_url(base: &::url::Url, href: &str) -> String {
    base.join(href)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}

/// Base delay scaled by a uniform factor in `[0.5, 1.5)`.
pub fn jittered(base: Duration) -> Duration {
    let jitter_factor = 0.5 + fastrand::f64();
    base.mul_f64(jitter_factor)
}

/// Sleep for a jittered interval; a zero base returns immediately.
pub async fn wait_a_bit(base: Duration) {
    if base.is_zero() {
        return;
    }
    tokio::time::sleep(jittered(base)).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_url() {
        let base = ::url::Url::parse("https://www.amazon.com").unwrap();
        assert_eq!(
            resolve_url(&base, "/gp/css/summary/print.html?orderID=1"),
            "https://www.amazon.com/gp/css/summary/print.html?orderID=1"
        );
        assert_eq!(
            resolve_url(&base, "https://other.com/x"),
            "https://other.com/x"
        );
    }

    #[test]
    fn test_jitter_stays_within_half_of_base() {
        let base = Duration::from_millis(1000);
        for _ in 0..200 {
            let delay = jittered(base);
            assert!(delay >= Duration::from_millis(500));
            assert!(delay < Duration::from_millis(1500));
        }
    }

    #[test]
    fn test_zero_base_has_no_jitter() {
        assert_eq!(jittered(Duration::ZERO), Duration::ZERO);
    }
}
