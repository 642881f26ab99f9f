//! Main Dizipal crawler API
//!
//! Ties the client, collectors, classifier and stream resolver together.
//! Each strategy is a straight pipeline: collect → classify → catalog.

use std::time::Duration;

use chrono::Utc;
use tokio::time::sleep;
use tracing::{debug, info, warn};
use url::Url;

use crate::classify::{classify_collection, match_platform, split_main_pages};
use crate::client::DizipalClient;
use crate::collector::{default_seeds, Collector};
use crate::config::ScraperConfig;
use crate::domain::resolve_domain;
use crate::error::{DizipalError, Result};
use crate::stream::resolve_stream;
use crate::title::extract_title;
use crate::types::{Catalog, Collection, ContentKind, EpisodeLink, PlaylistEntry, Strategy, FILMS_LABEL, SERIES_LABEL};

/// Main crawler API for one Dizipal mirror
///
/// # Example
/// ```no_run
/// use dizipal_core::{emit, DizipalScraper, PlaylistLimits, ScraperConfig, Strategy};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let scraper = DizipalScraper::connect(ScraperConfig::default()).await?;
///     let catalog = scraper.build_catalog(Strategy::Sitemap).await?;
///     println!("{}", emit(&catalog, &PlaylistLimits::default()));
///     Ok(())
/// }
/// ```
pub struct DizipalScraper {
    client: DizipalClient,
    config: ScraperConfig,
    base: Url,
}

impl DizipalScraper {
    /// Resolve the current mirror and create a scraper for it.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created or the
    /// configured fallback domain is not a valid URL.
    pub async fn connect(config: ScraperConfig) -> Result<Self> {
        let client = DizipalClient::with_config(config.client.clone())?;
        let domain = resolve_domain(
            &client,
            &config.domain_config_url,
            &config.fallback_domain,
            Duration::from_secs(config.domain_timeout_secs),
        )
        .await;
        Self::with_client(client, config, &domain)
    }

    /// Create a scraper for a known mirror, skipping domain resolution.
    ///
    /// # Errors
    /// `DizipalError::InvalidUrl` if `domain` is not an absolute URL.
    pub fn with_domain(config: ScraperConfig, domain: &str) -> Result<Self> {
        let client = DizipalClient::with_config(config.client.clone())?;
        Self::with_client(client, config, domain)
    }

    /// Create a scraper with a pre-configured client.
    pub fn with_client(client: DizipalClient, config: ScraperConfig, domain: &str) -> Result<Self> {
        let base = Url::parse(domain.trim_end_matches('/'))?;
        if base.cannot_be_a_base() {
            return Err(DizipalError::InvalidUrl(domain.to_string()));
        }
        Ok(Self { client, config, base })
    }

    /// Mirror this scraper works against.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    fn collector(&self) -> Collector<'_> {
        Collector::new(&self.client, &self.config, &self.base)
    }

    /// Page URLs from the mirror's sitemaps.
    pub async fn collect_sitemap(&self) -> Result<Collection> {
        self.collector().collect_sitemap(Utc::now().date_naive()).await
    }

    /// Page URLs from walking every seed listing.
    pub async fn collect_listings(&self) -> Collection {
        let seeds = default_seeds(&self.config);
        info!(seeds = seeds.len(), "crawling listings");
        self.collector().collect_listings(&seeds).await
    }

    /// Episode links of one series landing page.
    pub async fn episodes_for_series(&self, series_url: &str) -> Vec<EpisodeLink> {
        self.collector().episodes_for_series(series_url).await
    }

    /// Direct stream URL of one content page, if it can be found.
    pub async fn resolve_stream(&self, page_url: &str) -> Option<String> {
        resolve_stream(&self.client, page_url, self.base.as_str()).await
    }

    /// Run one strategy end to end.
    ///
    /// # Errors
    /// `DizipalError::NoSource` when the strategy found nothing to work with.
    pub async fn build_catalog(&self, strategy: Strategy) -> Result<Catalog> {
        let catalog = match strategy {
            Strategy::Sitemap => {
                let collection = self.collect_sitemap().await?;
                Catalog::from_classified(&classify_collection(&collection, &self.config.platforms))
            }
            Strategy::Crawl => {
                let collection = self.collect_listings().await;
                if collection.is_empty() {
                    return Err(DizipalError::NoSource(format!(
                        "no listing on {} yielded content links",
                        self.base
                    )));
                }
                Catalog::from_classified(&classify_collection(&collection, &self.config.platforms))
            }
            Strategy::Streams => self.build_stream_catalog().await?,
        };

        for section in catalog.summary().sections {
            info!(label = %section.label, count = section.count, "section");
        }
        Ok(catalog)
    }

    /// Sitemap → series and film pages → episodes → streams.
    ///
    /// Items whose stream cannot be resolved are skipped.
    async fn build_stream_catalog(&self) -> Result<Catalog> {
        let collection = self.collect_sitemap().await?;
        let (series_pages, film_pages) = split_main_pages(collection.urls());
        info!(series = series_pages.len(), films = film_pages.len(), "resolving streams");

        let mut catalog = Catalog::new();
        let mut skipped = 0usize;

        for series_url in &series_pages {
            for episode in self.episodes_for_series(series_url).await {
                match self.resolve_stream(&episode.url).await {
                    Some(stream) => {
                        let entry = PlaylistEntry::new(episode.display_title(), stream);
                        self.file_stream(&mut catalog, ContentKind::SeriesEpisode, &episode.url, entry);
                    }
                    None => skipped += 1,
                }
            }
            sleep(self.config.delays.seed).await;
        }

        for film_url in &film_pages {
            match self.resolve_stream(film_url).await {
                Some(stream) => {
                    let entry = PlaylistEntry::new(extract_title(film_url), stream);
                    self.file_stream(&mut catalog, ContentKind::Film, film_url, entry);
                }
                None => skipped += 1,
            }
            sleep(self.config.delays.seed).await;
        }

        if skipped > 0 {
            warn!(skipped, "pages without a resolvable stream");
        }
        Ok(catalog)
    }

    fn file_stream(&self, catalog: &mut Catalog, kind: ContentKind, page_url: &str, entry: PlaylistEntry) {
        let inserted = match match_platform(page_url, &self.config.platforms) {
            Some(platform) => catalog.insert(ContentKind::PlatformItem, &platform.label, page_url, entry),
            None => {
                let label = match kind {
                    ContentKind::Film => FILMS_LABEL,
                    _ => SERIES_LABEL,
                };
                catalog.insert(kind, label, page_url, entry)
            }
        };
        if !inserted {
            debug!(url = %page_url, "stream already in playlist");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_domain_strips_trailing_slash() {
        let scraper = DizipalScraper::with_domain(ScraperConfig::default(), "https://dizipal1222.com/").unwrap();
        assert_eq!(scraper.base_url().as_str(), "https://dizipal1222.com/");
        assert_eq!(scraper.base_url().host_str(), Some("dizipal1222.com"));
    }

    #[test]
    fn test_with_domain_rejects_garbage() {
        let result = DizipalScraper::with_domain(ScraperConfig::default(), "dizipal");
        match result {
            Err(DizipalError::InvalidUrl(_)) => {}
            _ => panic!("Expected InvalidUrl error"),
        }
    }

    #[test]
    fn test_with_domain_rejects_non_base_url() {
        let result = DizipalScraper::with_domain(ScraperConfig::default(), "mailto:admin@dizipal.com");
        assert!(matches!(result, Err(DizipalError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_unreachable_mirror_has_no_source() {
        let scraper = DizipalScraper::with_domain(ScraperConfig::default(), "http://127.0.0.1:9").unwrap();
        let result = scraper.build_catalog(Strategy::Sitemap).await;
        assert!(matches!(result, Err(DizipalError::NoSource(_))));
    }
}
