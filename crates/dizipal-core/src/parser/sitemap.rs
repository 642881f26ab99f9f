//! Sitemap parser
//!
//! Handles `<sitemapindex>` and `<urlset>` XML as well as the plain
//! one-URL-per-line lists some mirrors serve instead.

use chrono::{Datelike, NaiveDate};

/// A parsed sitemap document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapDocument {
    /// Child sitemap URLs
    Index(Vec<String>),
    /// Page URLs
    UrlSet(Vec<String>),
}

impl SitemapDocument {
    pub fn urls(&self) -> &[String] {
        match self {
            SitemapDocument::Index(urls) | SitemapDocument::UrlSet(urls) => urls,
        }
    }
}

/// Parse a sitemap body.
///
/// # Examples
/// ```
/// use dizipal_core::parser::{parse_sitemap, SitemapDocument};
///
/// let xml = "<urlset><url><loc>https://dizipal1222.com/film/roma</loc></url></urlset>";
/// assert_eq!(
///     parse_sitemap(xml),
///     SitemapDocument::UrlSet(vec!["https://dizipal1222.com/film/roma".to_string()])
/// );
/// ```
pub fn parse_sitemap(text: &str) -> SitemapDocument {
    if text.contains("<loc") {
        let urls = extract_locs(text);
        if text.contains("<sitemapindex") {
            SitemapDocument::Index(urls)
        } else {
            SitemapDocument::UrlSet(urls)
        }
    } else {
        let urls = extract_lines(text);
        if !urls.is_empty() && urls.iter().all(|u| looks_like_sitemap(u)) {
            SitemapDocument::Index(urls)
        } else {
            SitemapDocument::UrlSet(urls)
        }
    }
}

/// Contents of every `<loc>` element.
fn extract_locs(text: &str) -> Vec<String> {
    let Ok(re) = regex_lite::Regex::new(r"(?s)<loc>\s*(.*?)\s*</loc>") else {
        return Vec::new();
    };
    re.captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| {
            let raw = m.as_str();
            let raw = raw
                .strip_prefix("<![CDATA[")
                .and_then(|s| s.strip_suffix("]]>"))
                .unwrap_or(raw);
            decode_entities(raw.trim())
        })
        .filter(|url| !url.is_empty())
        .collect()
}

/// First token of every line starting with `http`.
fn extract_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| line.starts_with("http"))
        .filter_map(|line| line.split_whitespace().next())
        .map(str::to_string)
        .collect()
}

fn looks_like_sitemap(url: &str) -> bool {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.ends_with(".xml") || path.ends_with(".xml.gz") || path.ends_with(".txt")
}

fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Year and month embedded in a child sitemap's file name.
///
/// # Examples
/// ```
/// use dizipal_core::parser::sitemap_month;
///
/// assert_eq!(sitemap_month("https://dizipal1222.com/sitemap-2026-08.xml"), Some((2026, 8)));
/// assert_eq!(sitemap_month("https://dizipal1222.com/sitemap-pages.xml"), None);
/// ```
pub fn sitemap_month(url: &str) -> Option<(i32, u32)> {
    let path = url.split(['?', '#']).next()?;
    let file_name = path.rsplit('/').next()?;
    let re = regex_lite::Regex::new(r"(\d{4})-(\d{2})").ok()?;
    let caps = re.captures(file_name)?;
    let year: i32 = caps.get(1)?.as_str().parse().ok()?;
    let month: u32 = caps.get(2)?.as_str().parse().ok()?;
    if (1..=12).contains(&month) {
        Some((year, month))
    } else {
        None
    }
}

/// Keep child sitemaps from the last `months` months.
///
/// Children without a recognizable year-month are always kept. With
/// `months = 3` in October, August counts as recent and July does not.
pub fn filter_recent(children: Vec<String>, months: u32, today: NaiveDate) -> Vec<String> {
    let current = today.year() as i64 * 12 + today.month0() as i64;
    children
        .into_iter()
        .filter(|child| match sitemap_month(child) {
            Some((year, month)) => {
                let age = current - (year as i64 * 12 + month as i64 - 1);
                age < months as i64
            }
            None => true,
        })
        .collect()
}
