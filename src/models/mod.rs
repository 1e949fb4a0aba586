// src/models/mod.rs

//! Domain models for the harvester.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod frontier;
mod order;

// Re-export all public types
pub use config::{Config, CrawlConfig, FetchConfig, PathsConfig, SessionConfig};
pub use frontier::{OrderedUrlSet, UrlCategory, UrlFrontier};
pub use order::{ItemRecord, OrderRecord};
