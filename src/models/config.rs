//! Application configuration structures.

use std::fs;
use std::iter::Rev;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Remote session settings shared by rendering and fetching
    #[serde(default)]
    pub session: SessionConfig,

    /// Order history pagination settings
    #[serde(default)]
    pub crawl: CrawlConfig,

    /// Document download settings
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Output layout under the storage directory
    #[serde(default)]
    pub paths: PathsConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.session.root_url.trim().is_empty() {
            return Err(AppError::validation("session.root_url is empty"));
        }
        url::Url::parse(&self.session.root_url)?;
        if self.session.user_agent.trim().is_empty() {
            return Err(AppError::validation("session.user_agent is empty"));
        }
        if self.session.timeout_secs == 0 {
            return Err(AppError::validation("session.timeout_secs must be > 0"));
        }
        if self.crawl.page_size == 0 {
            return Err(AppError::validation("crawl.page_size must be > 0"));
        }
        if self.crawl.oldest_year > self.crawl.latest_year {
            return Err(AppError::validation(format!(
                "crawl.oldest_year ({}) is after crawl.latest_year ({})",
                self.crawl.oldest_year, self.crawl.latest_year
            )));
        }
        if self.fetch.max_concurrent == 0 {
            return Err(AppError::validation("fetch.max_concurrent must be > 0"));
        }
        if self.paths.account.trim().is_empty() {
            return Err(AppError::validation("paths.account is empty"));
        }
        Ok(())
    }

    /// Directory holding every artifact for the configured account.
    pub fn account_dir(&self, storage_dir: &Path) -> PathBuf {
        storage_dir.join(&self.paths.account)
    }
}

/// Settings for the remote storefront session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Site root that relative document links are resolved against
    #[serde(default = "defaults::root_url")]
    pub root_url: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Cookie header of an already authenticated session
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookie: Option<String>,

    /// Consecutive render failures tolerated before the crawl gives up (0 = never)
    #[serde(default = "defaults::max_consecutive_failures")]
    pub max_consecutive_failures: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            root_url: defaults::root_url(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            cookie: None,
            max_consecutive_failures: defaults::max_consecutive_failures(),
        }
    }
}

/// Order history pagination settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlConfig {
    /// First (most recent) year walked
    #[serde(default = "defaults::latest_year")]
    pub latest_year: i32,

    /// Last (oldest) year walked, inclusive
    #[serde(default = "defaults::oldest_year")]
    pub oldest_year: i32,

    /// Orders shown per listing page
    #[serde(default = "defaults::page_size")]
    pub page_size: u32,

    /// Base delay between listing pages; jittered by ±50%
    #[serde(default = "defaults::page_delay")]
    pub page_delay_ms: u64,
}

impl CrawlConfig {
    /// Years to walk, most recent first.
    pub fn years(&self) -> Rev<RangeInclusive<i32>> {
        (self.oldest_year..=self.latest_year).rev()
    }
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            latest_year: defaults::latest_year(),
            oldest_year: defaults::oldest_year(),
            page_size: defaults::page_size(),
            page_delay_ms: defaults::page_delay(),
        }
    }
}

/// Document download settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Maximum concurrent downloads
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,

    /// Persisted URL list used as the download work list
    #[serde(default = "defaults::fetch_list")]
    pub list: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_concurrent: defaults::max_concurrent(),
            list: defaults::fetch_list(),
        }
    }
}

/// File layout relative to the account directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "defaults::account")]
    pub account: String,

    #[serde(default = "defaults::documents_dir")]
    pub documents_dir: String,

    #[serde(default = "defaults::orders_table")]
    pub orders_table: String,

    #[serde(default = "defaults::items_table")]
    pub items_table: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            account: defaults::account(),
            documents_dir: defaults::documents_dir(),
            orders_table: defaults::orders_table(),
            items_table: defaults::items_table(),
        }
    }
}

mod defaults {
    use chrono::Datelike;

    // Session defaults
    pub fn root_url() -> String {
        "https://www.amazon.com".into()
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn max_consecutive_failures() -> u32 {
        5
    }

    // Crawl defaults
    pub fn latest_year() -> i32 {
        chrono::Local::now().year()
    }
    pub fn oldest_year() -> i32 {
        2000
    }
    pub fn page_size() -> u32 {
        10
    }
    pub fn page_delay() -> u64 {
        1500
    }

    // Fetch defaults
    pub fn max_concurrent() -> usize {
        8
    }
    pub fn fetch_list() -> String {
        "invoices".into()
    }

    // Path defaults
    pub fn account() -> String {
        "default".into()
    }
    pub fn documents_dir() -> String {
        "orders".into()
    }
    pub fn orders_table() -> String {
        "orders.csv".into()
    }
    pub fn items_table() -> String {
        "items.csv".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_user_agent() {
        let mut config = Config::default();
        config.session.user_agent = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_concurrency() {
        let mut config = Config::default();
        config.fetch.max_concurrent = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_inverted_year_range() {
        let mut config = Config::default();
        config.crawl.latest_year = 2010;
        config.crawl.oldest_year = 2011;
        assert!(config.validate().is_err());
    }

    #[test]
    fn years_descend_inclusive() {
        let crawl = CrawlConfig {
            latest_year: 2023,
            oldest_year: 2021,
            ..CrawlConfig::default()
        };
        assert_eq!(crawl.years().collect::<Vec<_>>(), vec![2023, 2022, 2021]);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [crawl]
            latest_year = 2023

            [paths]
            account = "account3"
            "#,
        )
        .unwrap();

        assert_eq!(config.crawl.latest_year, 2023);
        assert_eq!(config.crawl.oldest_year, 2000);
        assert_eq!(config.paths.account, "account3");
        assert_eq!(config.paths.documents_dir, "orders");
        assert_eq!(config.session.root_url, "https://www.amazon.com");
        assert_eq!(config.fetch.list, "invoices");
    }
}
