// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use reqwest::header::{COOKIE, HeaderMap, HeaderValue};

use crate::error::{AppError, Result};
use crate::models::SessionConfig;

/// Create a configured asynchronous HTTP client.
///
/// When the session carries a cookie header it is sent with every request,
/// so the client browses as the already authenticated user.
pub fn create_async_client(config: &SessionConfig) -> Result<reqwest::Client> {
    let mut headers = HeaderMap::new();
    if let Some(cookie) = config.cookie.as_deref().filter(|c| !c.trim().is_empty()) {
        let value = HeaderValue::from_str(cookie.trim())
            .map_err(|e| AppError::config(format!("session.cookie is not a valid header: {e}")))?;
        headers.insert(COOKIE, value);
    }

    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .default_headers(headers)
        .build()?;
    Ok(client)
}
