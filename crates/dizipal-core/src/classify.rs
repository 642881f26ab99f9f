//! URL classification into series, films, genre and platform buckets
//!
//! Platform membership is decided first and beats the content type: the
//! site lists the same pages under genre listings and platform
//! collections, and the platform section is where they belong.

use crate::config::PlatformKeyword;
use crate::types::{Classified, Collection, ContentKind};

const SERIES_MARKER: &str = "/dizi/";
const FILM_MARKER: &str = "/film/";
const SEASON_MARKER: &str = "/sezon-";
const EPISODE_MARKER: &str = "/bolum-";

/// Path and query of an absolute URL; the input itself if it does not parse.
fn path_of(url: &str) -> String {
    match url::Url::parse(url) {
        Ok(parsed) => match parsed.query() {
            Some(query) => format!("{}?{}", parsed.path(), query),
            None => parsed.path().to_string(),
        },
        Err(_) => url.to_string(),
    }
}

/// First platform whose keyword occurs in the URL path.
pub fn match_platform<'a>(url: &str, platforms: &'a [PlatformKeyword]) -> Option<&'a PlatformKeyword> {
    let path = path_of(url).to_lowercase();
    platforms.iter().find(|p| path.contains(&p.keyword))
}

/// Content type from path markers alone.
///
/// Series episodes need both the season and the episode marker.
pub fn content_kind(url: &str) -> Option<ContentKind> {
    let path = path_of(url);
    if path.contains(SEASON_MARKER) && path.contains(EPISODE_MARKER) {
        Some(ContentKind::SeriesEpisode)
    } else if path.contains(FILM_MARKER) {
        Some(ContentKind::Film)
    } else {
        None
    }
}

/// Series landing page: series marker without season or episode marker.
pub fn is_series_page(url: &str) -> bool {
    let path = path_of(url);
    path.contains(SERIES_MARKER) && !path.contains(SEASON_MARKER) && !path.contains(EPISODE_MARKER)
}

/// Film page.
pub fn is_film_page(url: &str) -> bool {
    path_of(url).contains(FILM_MARKER)
}

/// Episode page.
pub fn is_episode_page(url: &str) -> bool {
    path_of(url).contains(EPISODE_MARKER)
}

/// Partition URLs into buckets. URLs matching nothing are dropped.
///
/// # Example
/// ```
/// use dizipal_core::classify::classify;
/// use dizipal_core::config::default_platforms;
///
/// let urls = [
///     "https://dizipal1222.com/dizi/leyla/sezon-1/bolum-1",
///     "https://dizipal1222.com/film/roma",
///     "https://dizipal1222.com/film/netflix-ozel",
///     "https://dizipal1222.com/iletisim",
/// ];
/// let classified = classify(urls, &default_platforms());
/// assert_eq!(classified.series.len(), 1);
/// assert_eq!(classified.films.len(), 1);
/// assert_eq!(classified.platforms["Netflix"].len(), 1);
/// ```
pub fn classify<'u, I>(urls: I, platforms: &[PlatformKeyword]) -> Classified
where
    I: IntoIterator<Item = &'u str>,
{
    classify_with(urls, platforms, None)
}

/// Like [`classify`], honouring the tags of a collection.
///
/// A platform tag beats everything; a genre tag moves a series episode or
/// film into that genre's bucket.
pub fn classify_collection(collection: &Collection, platforms: &[PlatformKeyword]) -> Classified {
    classify_with(collection.urls(), platforms, Some(collection))
}

fn classify_with<'u, I>(urls: I, platforms: &[PlatformKeyword], tags: Option<&Collection>) -> Classified
where
    I: IntoIterator<Item = &'u str>,
{
    let mut classified = Classified::default();

    for url in urls {
        let platform = tags
            .and_then(|c| c.platform_tag(url))
            .map(str::to_string)
            .or_else(|| match_platform(url, platforms).map(|p| p.label.clone()));

        if let Some(label) = platform {
            classified.platforms.entry(label).or_default().push(url.to_string());
            continue;
        }

        let genre = tags.and_then(|c| c.genre_tag(url)).map(str::to_string);
        match (content_kind(url), genre) {
            (Some(ContentKind::SeriesEpisode), Some(genre)) => {
                classified.series_genres.entry(genre).or_default().push(url.to_string());
            }
            (Some(ContentKind::SeriesEpisode), None) => classified.series.push(url.to_string()),
            (Some(ContentKind::Film), Some(genre)) => {
                classified.film_genres.entry(genre).or_default().push(url.to_string());
            }
            (Some(ContentKind::Film), None) => classified.films.push(url.to_string()),
            _ => {}
        }
    }

    sort_bucket(&mut classified.series);
    sort_bucket(&mut classified.films);
    for bucket in classified
        .series_genres
        .values_mut()
        .chain(classified.film_genres.values_mut())
        .chain(classified.platforms.values_mut())
    {
        sort_bucket(bucket);
    }

    classified
}

fn sort_bucket(urls: &mut Vec<String>) {
    urls.sort();
    urls.dedup();
}

/// Split sitemap URLs into series landing pages and film pages.
pub fn split_main_pages<'u, I>(urls: I) -> (Vec<String>, Vec<String>)
where
    I: IntoIterator<Item = &'u str>,
{
    let mut series = Vec::new();
    let mut films = Vec::new();
    for url in urls {
        if is_series_page(url) {
            series.push(url.to_string());
        } else if is_film_page(url) {
            films.push(url.to_string());
        }
    }
    (series, films)
}
