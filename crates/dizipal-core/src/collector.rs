//! URL collection strategies
//!
//! - Sitemap: `/sitemap.xml`, its recent children, every `<loc>` on the
//!   mirror's origin.
//! - Listings: walk every seed listing page by page, following series
//!   landing pages into their seasons.
//!
//! A failed page never aborts a crawl. It is logged and counts as a page
//! without results.

use std::collections::HashMap;

use chrono::NaiveDate;
use tokio::time::sleep;
use tracing::{debug, info, warn};
use url::Url;

use crate::classify::{is_episode_page, is_film_page, is_series_page};
use crate::client::{DizipalClient, FetchOutcome};
use crate::config::ScraperConfig;
use crate::error::{DizipalError, Result};
use crate::parser::{filter_recent, parse_episode_items, parse_listing, parse_season_numbers, parse_sitemap, SitemapDocument};
use crate::types::{Collection, EpisodeLink};

/// A listing endpoint the crawl starts from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seed {
    /// Human-readable name for logs
    pub label: String,
    /// Path and query relative to the mirror root
    pub path: String,
    /// Platform whose collection page this is
    pub platform: Option<String>,
    /// Genre this listing is filtered by
    pub genre: Option<String>,
}

impl Seed {
    pub fn new(label: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            path: path.into(),
            platform: None,
            genre: None,
        }
    }

    pub fn genre(label: impl Into<String>, path: impl Into<String>, genre: &str) -> Self {
        Self {
            genre: Some(genre.to_string()),
            ..Self::new(label, path)
        }
    }

    pub fn platform(label: impl Into<String>, path: impl Into<String>, platform: &str) -> Self {
        Self {
            platform: Some(platform.to_string()),
            ..Self::new(label, path)
        }
    }

    /// Absolute URL of page `page` of this listing.
    pub fn page_url(&self, base: &Url, page: u32) -> Result<Url> {
        let mut url = base.join(&self.path)?;
        url.query_pairs_mut().append_pair("sayfa", &page.to_string());
        Ok(url)
    }
}

/// Seeds in crawl order: indexes, films by genre and year, series by genre,
/// platform collections.
pub fn default_seeds(config: &ScraperConfig) -> Vec<Seed> {
    let mut seeds = vec![
        Seed::new("diziler", "/diziler"),
        Seed::new("filmler", "/filmler"),
        Seed::new("son bölümler", "/diziler/son-bolumler"),
    ];

    for (genre, id) in &config.film_genres {
        for year in config.film_years() {
            seeds.push(Seed::genre(
                format!("film {} {}", genre, year),
                format!("/filmler?kelime=&yil={}&tur={}&siralama=", year, id),
                genre,
            ));
        }
    }

    for (genre, id) in &config.series_genres {
        seeds.push(Seed::genre(
            format!("dizi {}", genre),
            format!("/diziler?kelime=&durum=&tur={}&type=&siralama=", id),
            genre,
        ));
    }

    for platform in &config.platforms {
        seeds.push(Seed::platform(
            format!("koleksiyon {}", platform.keyword),
            format!("/koleksiyon/{}", platform.keyword),
            &platform.label,
        ));
    }

    seeds
}

/// Runs the collection strategies against one mirror.
pub struct Collector<'a> {
    client: &'a DizipalClient,
    config: &'a ScraperConfig,
    base: &'a Url,
}

impl<'a> Collector<'a> {
    pub fn new(client: &'a DizipalClient, config: &'a ScraperConfig, base: &'a Url) -> Self {
        Self { client, config, base }
    }

    /// Resolve `href` against the mirror, keeping it only on the same origin.
    pub fn absolutize(&self, href: &str) -> Option<String> {
        let mut url = self.base.join(href.trim()).ok()?;
        if url.origin() != self.base.origin() {
            return None;
        }
        url.set_fragment(None);
        Some(url.to_string())
    }

    /// Gather every page URL listed in the mirror's sitemaps.
    ///
    /// # Errors
    /// `DizipalError::NoSource` when the root sitemap cannot be read or no
    /// URL on the mirror's origin is found.
    pub async fn collect_sitemap(&self, today: NaiveDate) -> Result<Collection> {
        let root_url = self.base.join("/sitemap.xml")?;
        info!(url = %root_url, "reading sitemap");

        let root = match self.client.fetch_outcome(root_url.as_str()).await {
            FetchOutcome::Body(body) => parse_sitemap(&body),
            FetchOutcome::Empty => {
                return Err(DizipalError::NoSource(format!("{} is empty", root_url)));
            }
            FetchOutcome::Failed(err) => {
                return Err(DizipalError::NoSource(format!("{}: {}", root_url, err)));
            }
        };

        let mut collection = Collection::new();
        match root {
            SitemapDocument::UrlSet(urls) => self.add_same_origin(&mut collection, &urls),
            SitemapDocument::Index(children) => {
                let total = children.len();
                let children = match self.config.sitemap_months {
                    Some(months) => filter_recent(children, months, today),
                    None => children,
                };
                info!(kept = children.len(), total, "child sitemaps selected");

                for child in &children {
                    // children are re-rooted onto the current mirror
                    let Some(child_url) = self.reroot(child) else {
                        debug!(%child, "skipping unparseable child sitemap");
                        continue;
                    };
                    match self.client.fetch_outcome(&child_url).await {
                        FetchOutcome::Body(body) => match parse_sitemap(&body) {
                            SitemapDocument::UrlSet(urls) => {
                                let before = collection.len();
                                self.add_same_origin(&mut collection, &urls);
                                debug!(url = %child_url, added = collection.len() - before, "child sitemap read");
                            }
                            SitemapDocument::Index(_) => {
                                debug!(url = %child_url, "nested sitemap index ignored");
                            }
                        },
                        FetchOutcome::Empty => debug!(url = %child_url, "child sitemap empty"),
                        FetchOutcome::Failed(err) => {
                            warn!(url = %child_url, error = %err, "child sitemap failed");
                        }
                    }
                }
            }
        }

        if collection.is_empty() {
            return Err(DizipalError::NoSource(format!(
                "sitemap lists no pages on {}",
                self.base
            )));
        }

        info!(urls = collection.len(), "sitemap collection finished");
        Ok(collection)
    }

    /// Path and query of `url` on the current mirror.
    fn reroot(&self, url: &str) -> Option<String> {
        let parsed = Url::parse(url).ok()?;
        let mut target = self.base.join(parsed.path()).ok()?;
        target.set_query(parsed.query());
        Some(target.to_string())
    }

    fn add_same_origin(&self, collection: &mut Collection, urls: &[String]) {
        for url in urls {
            match Url::parse(url) {
                Ok(parsed) if parsed.origin() == self.base.origin() => {
                    collection.insert(parsed.to_string());
                }
                _ => debug!(%url, "dropping URL outside the mirror"),
            }
        }
    }

    /// Walk one listing until a page has no content links or no next page.
    ///
    /// Returns absolute content URLs in discovery order.
    pub async fn crawl_listing(&self, seed: &Seed) -> Vec<String> {
        let mut found: Vec<String> = Vec::new();
        let mut page = 1;

        loop {
            let url = match seed.page_url(self.base, page) {
                Ok(url) => url,
                Err(err) => {
                    warn!(seed = %seed.label, error = %err, "bad seed path");
                    break;
                }
            };

            let listing = match self.client.fetch_outcome(url.as_str()).await {
                FetchOutcome::Body(body) => parse_listing(&body),
                FetchOutcome::Empty => break,
                FetchOutcome::Failed(err) => {
                    warn!(seed = %seed.label, page, error = %err, "listing page failed");
                    break;
                }
            };

            let mut added = 0;
            for href in &listing.links {
                if let Some(link) = self.absolutize(href) {
                    if !found.contains(&link) {
                        found.push(link);
                        added += 1;
                    }
                }
            }
            debug!(seed = %seed.label, page, added, "listing page read");

            // a page repeating earlier results would otherwise loop forever
            if added == 0 || !listing.has_next_page {
                break;
            }

            page += 1;
            sleep(self.config.delays.page).await;
        }

        found
    }

    /// Episode links of a series, season by season.
    ///
    /// Without a season selector the landing page itself is read as the
    /// episode list. Failures yield what was gathered so far.
    pub async fn episodes_for_series(&self, series_url: &str) -> Vec<EpisodeLink> {
        let html = match self.client.fetch_outcome(series_url).await {
            FetchOutcome::Body(body) => body,
            FetchOutcome::Empty => return Vec::new(),
            FetchOutcome::Failed(err) => {
                warn!(url = %series_url, error = %err, "series page failed");
                return Vec::new();
            }
        };

        let mut episodes: Vec<EpisodeLink> = Vec::new();
        match parse_season_numbers(&html) {
            Some(seasons) if !seasons.is_empty() => {
                for (i, season) in seasons.iter().enumerate() {
                    if i > 0 {
                        sleep(self.config.delays.season).await;
                    }
                    let season_url = format!("{}/sezon-{}", series_url.trim_end_matches('/'), season);
                    match self.client.fetch_outcome(&season_url).await {
                        FetchOutcome::Body(body) => {
                            self.push_episodes(&mut episodes, parse_episode_items(&body));
                        }
                        FetchOutcome::Empty => {}
                        FetchOutcome::Failed(err) => {
                            warn!(url = %season_url, error = %err, "season page failed");
                        }
                    }
                }
            }
            _ => self.push_episodes(&mut episodes, parse_episode_items(&html)),
        }

        debug!(url = %series_url, episodes = episodes.len(), "series expanded");
        episodes
    }

    fn push_episodes(&self, episodes: &mut Vec<EpisodeLink>, parsed: Vec<EpisodeLink>) {
        for mut episode in parsed {
            let Some(url) = self.absolutize(&episode.url) else {
                continue;
            };
            if episodes.iter().any(|e| e.url == url) {
                continue;
            }
            episode.url = url;
            episodes.push(episode);
        }
    }

    /// Crawl the given seeds into one collection.
    ///
    /// Series landing pages are expanded into episodes once, however many
    /// listings mention them.
    pub async fn collect_listings(&self, seeds: &[Seed]) -> Collection {
        let mut collection = Collection::new();
        let mut expanded: HashMap<String, Vec<String>> = HashMap::new();

        for seed in seeds {
            let links = self.crawl_listing(seed).await;
            let before = collection.len();

            for link in &links {
                if is_episode_page(link) || (is_film_page(link) && !is_series_page(link)) {
                    add(&mut collection, link.clone(), seed);
                } else if is_series_page(link) {
                    if !expanded.contains_key(link) {
                        let episodes = self
                            .episodes_for_series(link)
                            .await
                            .into_iter()
                            .map(|e| e.url)
                            .collect();
                        expanded.insert(link.clone(), episodes);
                    }
                    for episode in expanded.get(link).into_iter().flatten() {
                        add(&mut collection, episode.clone(), seed);
                    }
                }
            }

            info!(
                seed = %seed.label,
                links = links.len(),
                added = collection.len() - before,
                "seed crawled"
            );

            if !links.is_empty() {
                sleep(self.config.delays.seed).await;
            }
        }

        collection
    }
}

fn add(collection: &mut Collection, url: String, seed: &Seed) {
    match (&seed.platform, &seed.genre) {
        (Some(platform), _) => collection.insert_tagged(url, platform),
        (None, Some(genre)) => collection.insert_genre(url, genre),
        (None, None) => collection.insert(url),
    };
}
