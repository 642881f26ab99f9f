//! Crawl configuration and the site's lookup tables
//!
//! Every value here has a default matching the live site. The CLI overrides
//! a handful of them; tests shrink the delays to zero.

use std::time::Duration;

use chrono::Datelike;

use crate::client::ClientConfig;

/// Where the current mirror address is published.
pub const DOMAIN_CONFIG_URL: &str =
    "https://raw.githubusercontent.com/koprulu555/domain-kontrol2/refs/heads/main/dizipaldomain.txt";

/// Key of the line carrying the current mirror in the domain config.
pub const DOMAIN_CONFIG_KEY: &str = "guncel_domain";

/// Mirror used whenever the domain config cannot be read.
pub const FALLBACK_DOMAIN: &str = "https://dizipal1222.com";

/// A platform keyword and the section label its content is filed under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformKeyword {
    /// Substring looked up in the URL path; also the `/koleksiyon/` slug
    pub keyword: String,
    /// Section label in the playlist
    pub label: String,
}

impl PlatformKeyword {
    pub fn new(keyword: &str, label: &str) -> Self {
        Self {
            keyword: keyword.to_string(),
            label: label.to_string(),
        }
    }
}

/// Platform table in match order. First hit wins.
pub fn default_platforms() -> Vec<PlatformKeyword> {
    [
        ("netflix", "Netflix"),
        ("exxen", "Exxen"),
        ("blutv", "BluTV"),
        ("disney", "Disney+"),
        ("amazon-prime", "Amazon Prime"),
        ("tod-bein", "TOD"),
        ("gain", "GAIN"),
        ("mubi", "Mubi"),
    ]
    .into_iter()
    .map(|(keyword, label)| PlatformKeyword::new(keyword, label))
    .collect()
}

/// Genre name and the site's numeric `tur` id.
pub type Genre = (&'static str, u32);

/// Film genres used by the listing crawl.
pub const FILM_GENRES: &[Genre] = &[
    ("aksiyon", 2),
    ("macera", 13),
    ("animasyon", 3),
    ("komedi", 11),
    ("korku", 12),
    ("gerilim", 9),
    ("dram", 7),
    ("fantastik", 8),
    ("bilimkurgu", 5),
    ("aile", 1),
    ("belgesel", 4),
    ("biyografi", 6),
    ("muzik", 14),
    ("romantik", 16),
    ("savas", 17),
    ("spor", 18),
    ("suç", 19),
    ("tarih", 20),
    ("western", 21),
    ("yerli", 24),
    ("erotik", 25),
];

/// Series genres used by the listing crawl.
pub const SERIES_GENRES: &[Genre] = &[
    ("aksiyon", 2),
    ("macera", 13),
    ("animasyon", 3),
    ("komedi", 11),
    ("korku", 12),
    ("gerilim", 9),
    ("dram", 7),
    ("fantastik", 8),
    ("bilimkurgu", 5),
    ("aile", 1),
    ("belgesel", 4),
    ("suç", 19),
    ("tarih", 20),
    ("polisiye", 10),
    ("yerli", 24),
    ("erotik", 25),
    ("anime", 26),
];

/// Oldest year the film listing crawl walks down to.
pub const OLDEST_FILM_YEAR: i32 = 1960;

/// Politeness delays between successive requests of the crawl.
#[derive(Debug, Clone)]
pub struct Delays {
    /// Between pages of one listing
    pub page: Duration,
    /// Between season pages of one series
    pub season: Duration,
    /// Between seeds, and between items of the stream pipeline
    pub seed: Duration,
}

impl Default for Delays {
    fn default() -> Self {
        Self {
            page: Duration::from_secs(1),
            season: Duration::from_millis(500),
            seed: Duration::from_secs(2),
        }
    }
}

impl Delays {
    /// No waiting at all. Only meant for tests against local mock servers.
    pub fn none() -> Self {
        Self {
            page: Duration::ZERO,
            season: Duration::ZERO,
            seed: Duration::ZERO,
        }
    }
}

/// Per-section output ceilings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaylistLimits {
    pub series: usize,
    pub films: usize,
    pub platform: usize,
}

impl Default for PlaylistLimits {
    fn default() -> Self {
        Self {
            series: 1000,
            films: 500,
            platform: 200,
        }
    }
}

impl PlaylistLimits {
    /// No truncation at all.
    pub fn unlimited() -> Self {
        Self {
            series: usize::MAX,
            films: usize::MAX,
            platform: usize::MAX,
        }
    }
}

/// Configuration for `DizipalScraper`.
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    /// HTTP client settings
    pub client: ClientConfig,
    /// Remote plaintext file naming the current mirror
    pub domain_config_url: String,
    /// Mirror used when the domain config is unusable
    pub fallback_domain: String,
    /// Timeout for the domain config request in seconds
    pub domain_timeout_secs: u64,
    /// Keep dated child sitemaps from the last N months; `None` keeps all
    pub sitemap_months: Option<u32>,
    /// Politeness delays
    pub delays: Delays,
    /// Newest year of the film listing crawl
    pub newest_film_year: i32,
    /// Oldest year of the film listing crawl
    pub oldest_film_year: i32,
    /// Platform keywords in match order
    pub platforms: Vec<PlatformKeyword>,
    /// Film genres for the listing crawl
    pub film_genres: Vec<Genre>,
    /// Series genres for the listing crawl
    pub series_genres: Vec<Genre>,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            client: ClientConfig::default(),
            domain_config_url: DOMAIN_CONFIG_URL.to_string(),
            fallback_domain: FALLBACK_DOMAIN.to_string(),
            domain_timeout_secs: 10,
            sitemap_months: Some(3),
            delays: Delays::default(),
            newest_film_year: chrono::Utc::now().year(),
            oldest_film_year: OLDEST_FILM_YEAR,
            platforms: default_platforms(),
            film_genres: FILM_GENRES.to_vec(),
            series_genres: SERIES_GENRES.to_vec(),
        }
    }
}

impl ScraperConfig {
    /// Film years walked by the listing crawl, newest first.
    pub fn film_years(&self) -> impl Iterator<Item = i32> {
        (self.oldest_film_year..=self.newest_film_year).rev()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_order_is_declared_order() {
        let keywords: Vec<String> = default_platforms().into_iter().map(|p| p.keyword).collect();
        assert_eq!(
            keywords,
            ["netflix", "exxen", "blutv", "disney", "amazon-prime", "tod-bein", "gain", "mubi"]
        );
    }

    #[test]
    fn test_default_limits() {
        let limits = PlaylistLimits::default();
        assert_eq!(limits.series, 1000);
        assert_eq!(limits.films, 500);
        assert_eq!(limits.platform, 200);
    }

    #[test]
    fn test_film_years_descending() {
        let config = ScraperConfig {
            newest_film_year: 2025,
            oldest_film_year: 2023,
            ..ScraperConfig::default()
        };
        assert_eq!(config.film_years().collect::<Vec<_>>(), vec![2025, 2024, 2023]);
    }

    #[test]
    fn test_default_delays() {
        let delays = Delays::default();
        assert_eq!(delays.page, Duration::from_secs(1));
        assert_eq!(delays.season, Duration::from_millis(500));
        assert_eq!(delays.seed, Duration::from_secs(2));
        assert_eq!(Delays::none().page, Duration::ZERO);
    }
}
