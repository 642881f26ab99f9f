//! Dizipal Playlist Crawler Core Library
//!
//! This crate crawls a Dizipal mirror and turns its catalog into an
//! M3U-like playlist of page links or direct streams.
//!
//! # Features
//! - Resolve the current mirror from a published domain config
//! - Collect content pages from sitemaps or paginated listings
//! - Classify pages into series, films and platform collections
//! - Resolve pages to direct stream URLs
//! - Rate-limited HTTP client to stay polite towards the mirror

pub mod classify;
pub mod client;
pub mod collector;
pub mod config;
pub mod domain;
pub mod error;
pub mod parser;
pub mod playlist;
pub mod scraper;
pub mod stream;
pub mod title;
pub mod types;

// Re-export main types for convenience
pub use classify::{classify, classify_collection};
pub use client::{ClientConfig, DizipalClient, FetchOutcome, RateLimiter};
pub use config::{Delays, PlatformKeyword, PlaylistLimits, ScraperConfig};
pub use domain::resolve_domain;
pub use error::{DizipalError, Result};
pub use playlist::{emit, DEFAULT_OUTPUT};
pub use crate::scraper::DizipalScraper;
pub use stream::resolve_stream;
pub use title::extract_title;
pub use types::{Catalog, CatalogSummary, Classified, Collection, ContentKind, EpisodeLink, PlaylistEntry, Strategy};
