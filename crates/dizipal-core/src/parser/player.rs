//! Player frame parser
//!
//! Content pages embed a third-party player in an iframe; the frame's
//! inline script carries the direct stream address.

use scraper::{Html, Selector};

/// Iframe selectors in priority order.
const FRAME_SELECTORS: &[&str] = &[".series-player-container iframe[src]", "div#vast_new iframe[src]"];

/// Stream patterns in priority order. Each captures the URL in group 1.
const STREAM_PATTERNS: &[&str] = &[r#"file:"([^"]+)""#, r#"file: "([^"]+)""#, r#"src="([^"]+\.m3u8)""#];

/// `src` of the embedded player frame, as written in the markup.
pub fn find_player_frame(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    FRAME_SELECTORS.iter().find_map(|selector_str| {
        let selector = Selector::parse(selector_str).ok()?;
        document
            .select(&selector)
            .filter_map(|frame| frame.value().attr("src"))
            .map(str::trim)
            .find(|src| !src.is_empty())
            .map(str::to_string)
    })
}

/// Direct stream URL inside the player frame's markup.
///
/// # Examples
/// ```
/// use dizipal_core::parser::find_stream_url;
///
/// let script = r#"<script>player.setup({ file: "https://cdn.example/v/master.m3u8" })</script>"#;
/// assert_eq!(find_stream_url(script).as_deref(), Some("https://cdn.example/v/master.m3u8"));
/// ```
pub fn find_stream_url(frame_html: &str) -> Option<String> {
    STREAM_PATTERNS.iter().find_map(|pattern| {
        let re = regex_lite::Regex::new(pattern).ok()?;
        let url = re.captures(frame_html)?.get(1)?.as_str().trim();
        if url.is_empty() {
            None
        } else {
            Some(url.replace("\\/", "/"))
        }
    })
}
