//! Listing page parser
//!
//! Category, genre and collection pages all share one layout: a grid of
//! content anchors plus a pagination bar.

use scraper::{Html, Selector};

/// Anchor selectors in priority order. The first one yielding content
/// links wins. Anchors outside the grid never count.
const LINK_SELECTORS: &[&str] = &["article.type2 ul li a", "div.episode-item a"];

/// Markers of a "next page" affordance.
const NEXT_PAGE_SELECTORS: &[&str] = &[
    "a[rel='next']",
    "link[rel='next']",
    ".pagination .next:not(.disabled) a",
    ".pagination a.next",
];

/// Content links and pagination state of one listing page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingPage {
    /// `href` values pointing at series or film pages, as written
    pub links: Vec<String>,
    /// Whether the page offers a next page
    pub has_next_page: bool,
}

/// Whether an `href` points at a series or film page.
pub fn is_content_href(href: &str) -> bool {
    href.contains("/dizi/") || href.contains("/film/")
}

/// Parse a listing page.
///
/// # Example
/// ```
/// use dizipal_core::parser::parse_listing;
///
/// let html = r#"<article class="type2"><ul>
///     <li><a href="/dizi/leyla">Leyla</a></li>
///     <li><a href="/film/roma">Roma</a></li>
/// </ul></article><a rel="next" href="?sayfa=2">»</a>"#;
/// let page = parse_listing(html);
/// assert_eq!(page.links, vec!["/dizi/leyla", "/film/roma"]);
/// assert!(page.has_next_page);
/// ```
pub fn parse_listing(html: &str) -> ListingPage {
    let document = Html::parse_document(html);

    let links = LINK_SELECTORS
        .iter()
        .map(|selector| select_content_links(&document, selector))
        .find(|links| !links.is_empty())
        .unwrap_or_default();

    ListingPage {
        links,
        has_next_page: detect_next_page(&document),
    }
}

fn select_content_links(document: &Html, selector: &str) -> Vec<String> {
    let Ok(selector) = Selector::parse(selector) else {
        return Vec::new();
    };

    let mut links: Vec<String> = Vec::new();
    for anchor in document.select(&selector) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let href = href.trim();
        if is_content_href(href) && !links.iter().any(|l| l == href) {
            links.push(href.to_string());
        }
    }
    links
}

fn detect_next_page(document: &Html) -> bool {
    NEXT_PAGE_SELECTORS.iter().any(|selector_str| {
        Selector::parse(selector_str)
            .map(|selector| document.select(&selector).next().is_some())
            .unwrap_or(false)
    })
}
