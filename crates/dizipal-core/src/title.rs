//! Display titles derived from content URLs.

use std::sync::LazyLock;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};

use crate::types::ContentKind;

static CONTENT_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/(dizi|film)/([^/?#]+)").expect("content path pattern"));
static SEASON: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"/sezon-(\d+)").expect("season pattern"));
static EPISODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"/bolum-(\d+)").expect("episode pattern"));

/// Title used when a URL does not look like a content page.
pub const UNTITLED: &str = "İsimsiz";

/// What the path of a content URL says about it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentPath {
    /// `SeriesEpisode` for `/dizi/`, `Film` for `/film/`
    pub kind: ContentKind,
    /// Path segment right after the marker, percent-decoded
    pub slug: String,
    pub season: Option<u32>,
    pub episode: Option<u32>,
}

/// Parse the series/film marker, slug and season/episode numbers.
///
/// # Examples
/// ```
/// use dizipal_core::title::parse_content_path;
///
/// let path = parse_content_path("https://dizipal1222.com/dizi/leyla/sezon-2/bolum-9").unwrap();
/// assert_eq!(path.slug, "leyla");
/// assert_eq!((path.season, path.episode), (Some(2), Some(9)));
/// assert!(parse_content_path("https://dizipal1222.com/koleksiyon/netflix").is_none());
/// ```
pub fn parse_content_path(url: &str) -> Option<ContentPath> {
    let caps = CONTENT_PATH.captures(url)?;
    let kind = match caps.get(1)?.as_str() {
        "dizi" => ContentKind::SeriesEpisode,
        _ => ContentKind::Film,
    };
    let raw = caps.get(2)?.as_str();
    let slug = urlencoding::decode(raw)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| raw.to_string());

    Some(ContentPath {
        kind,
        slug,
        season: marker_number(&SEASON, url),
        episode: marker_number(&EPISODE, url),
    })
}

/// Number captured by a `/<marker>-(\d+)` pattern.
fn marker_number(re: &Regex, url: &str) -> Option<u32> {
    re.captures(url)?.get(1)?.as_str().parse().ok()
}

/// Derive a readable title from a content URL.
///
/// Never fails: anything that is not a `/dizi/` or `/film/` URL yields
/// [`UNTITLED`].
///
/// # Examples
/// ```
/// use dizipal_core::title::extract_title;
///
/// assert_eq!(
///     extract_title("https://dizipal1222.com/dizi/enfes-bir-aksam/sezon-1/bolum-7"),
///     "Enfes Bir Aksam S01E07"
/// );
/// assert_eq!(extract_title("https://dizipal1222.com/film/kis-uykusu"), "Kis Uykusu");
/// assert_eq!(extract_title("not a url"), "İsimsiz");
/// ```
pub fn extract_title(url: &str) -> String {
    let Some(path) = parse_content_path(url) else {
        return UNTITLED.to_string();
    };

    let name = title_case(&path.slug.replace('-', " "));
    if name.is_empty() {
        return UNTITLED.to_string();
    }

    match (path.season, path.episode) {
        (Some(season), Some(episode)) => format!("{} {}", name, episode_code(season, episode)),
        _ => name,
    }
}

/// `S{season}E{episode}`, each padded to at least two digits.
pub fn episode_code(season: u32, episode: u32) -> String {
    format!("S{:02}E{:02}", season, episode)
}

/// Upper-case the first letter of every word, lower-case the rest.
fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
