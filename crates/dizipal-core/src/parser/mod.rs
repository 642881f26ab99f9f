//! Parsers for the documents the crawler reads
//!
//! - `sitemap`: sitemap indexes, URL sets and plain URL lists
//! - `listing`: paginated category/collection pages
//! - `episodes`: season selectors and episode blocks on series pages
//! - `player`: player frames and the stream URL inside them

pub mod episodes;
pub mod listing;
pub mod player;
pub mod sitemap;

// Re-export main parsing functions
pub use episodes::{parse_episode_items, parse_season_label, parse_season_numbers};
pub use listing::{parse_listing, ListingPage};
pub use player::{find_player_frame, find_stream_url};
pub use sitemap::{filter_recent, parse_sitemap, sitemap_month, SitemapDocument};
