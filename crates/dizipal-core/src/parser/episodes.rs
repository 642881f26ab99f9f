//! Episode parser for series pages
//!
//! A series page either carries a season selector (each season then lives
//! at `<series>/sezon-<n>`) or lists its episodes directly as
//! `div.episode-item` blocks.

use scraper::{ElementRef, Html, Selector};

use crate::title::parse_content_path;
use crate::types::EpisodeLink;

/// Season numbers offered by the season selector.
///
/// Returns `None` when the page has no selector at all, and the digit-valued
/// options otherwise.
pub fn parse_season_numbers(html: &str) -> Option<Vec<u32>> {
    let document = Html::parse_document(html);
    let select_selector = Selector::parse("select[name='sezon']").ok()?;
    let select = document.select(&select_selector).next()?;

    let option_selector = Selector::parse("option[value]").ok()?;
    let mut seasons: Vec<u32> = select
        .select(&option_selector)
        .filter_map(|option| option.value().attr("value"))
        .filter_map(|value| value.trim().parse().ok())
        .collect();
    seasons.dedup();
    Some(seasons)
}

/// Parse `div.episode-item` blocks into episode links.
///
/// Only links pointing at an episode page are kept. URLs are returned as
/// written in the markup.
pub fn parse_episode_items(html: &str) -> Vec<EpisodeLink> {
    let document = Html::parse_document(html);
    let mut episodes: Vec<EpisodeLink> = Vec::new();

    if let Ok(selector) = Selector::parse("div.episode-item") {
        for item in document.select(&selector) {
            if let Some(episode) = parse_episode_item(&item) {
                if !episodes.iter().any(|e| e.url == episode.url) {
                    episodes.push(episode);
                }
            }
        }
    }

    episodes
}

fn parse_episode_item(item: &ElementRef) -> Option<EpisodeLink> {
    let link_selector = Selector::parse("a[href]").ok()?;
    let url = item
        .select(&link_selector)
        .next()?
        .value()
        .attr("href")?
        .trim()
        .to_string();
    if !url.contains("/bolum-") {
        return None;
    }

    let name = first_text(item, "div.name");
    let label = first_text(item, "div.episode").unwrap_or_default();

    let (season, episode) = match parse_season_label(&label).or_else(|| parse_episode_code(&label)) {
        Some((season, episode)) => (Some(season), Some(episode)),
        None => parse_content_path(&url)
            .map(|path| (path.season, path.episode))
            .unwrap_or((None, None)),
    };

    Some(EpisodeLink {
        url,
        name,
        season,
        episode,
    })
}

fn first_text(element: &ElementRef, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    let text = element
        .select(&selector)
        .next()?
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Parse the site's "`N. Sezon M. Bölüm`" label.
///
/// # Examples
/// ```
/// use dizipal_core::parser::parse_season_label;
///
/// assert_eq!(parse_season_label("2. Sezon 11. Bölüm"), Some((2, 11)));
/// assert_eq!(parse_season_label("Fragman"), None);
/// ```
pub fn parse_season_label(text: &str) -> Option<(u32, u32)> {
    let re = regex_lite::Regex::new(r"(?i)(\d+)\.\s*Sezon\s*(\d+)\.\s*B[öo]l[üu]m").ok()?;
    let caps = re.captures(text)?;
    let season = caps.get(1)?.as_str().parse().ok()?;
    let episode = caps.get(2)?.as_str().parse().ok()?;
    Some((season, episode))
}

/// Parse episode code from text in format SxxExx or NxM.
fn parse_episode_code(text: &str) -> Option<(u32, u32)> {
    // Pattern: S01E01, s01e01, S1E1, etc.
    let re = regex_lite::Regex::new(r"(?i)S(\d{1,3})E(\d{1,4})").ok()?;
    if let Some(caps) = re.captures(text) {
        let season = caps.get(1)?.as_str().parse().ok()?;
        let episode = caps.get(2)?.as_str().parse().ok()?;
        return Some((season, episode));
    }

    // Alternative pattern: 1x05, 01x05
    let re_alt = regex_lite::Regex::new(r"(\d{1,3})x(\d{1,4})").ok()?;
    let caps = re_alt.captures(text)?;
    let season = caps.get(1)?.as_str().parse().ok()?;
    let episode = caps.get(2)?.as_str().parse().ok()?;
    Some((season, episode))
}
