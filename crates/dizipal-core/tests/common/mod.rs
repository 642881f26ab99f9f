#![allow(dead_code)]

use dizipal_core::{ClientConfig, Delays, ScraperConfig};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Config pointed at a mock server, with no politeness delays and only the
/// given platform table.
pub fn test_config(server: &MockServer) -> ScraperConfig {
    ScraperConfig {
        client: ClientConfig {
            requests_per_second: 1000.0,
            timeout_secs: 5,
            ..ClientConfig::default()
        },
        domain_config_url: format!("{}/dizipaldomain.txt", server.uri()),
        delays: Delays::none(),
        film_genres: Vec::new(),
        series_genres: Vec::new(),
        ..ScraperConfig::default()
    }
}

pub async fn mount_page(server: &MockServer, at: &str, body: impl Into<String>) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(200).set_body_string(body.into()))
        .mount(server)
        .await;
}

pub async fn mount_listing_page(server: &MockServer, at: &str, page: u32, body: impl Into<String>) {
    Mock::given(method("GET"))
        .and(path(at))
        .and(query_param("sayfa", page.to_string().as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_string(body.into()))
        .mount(server)
        .await;
}

/// Listing markup in the site's grid layout.
pub fn listing(hrefs: &[&str], next: bool) -> String {
    let items: String = hrefs
        .iter()
        .map(|href| format!(r#"<li><a href="{}">x</a></li>"#, href))
        .collect();
    let next = if next { r#"<a rel="next" href="?sayfa=next">»</a>"# } else { "" };
    format!(
        r#"<html><body><article class="type2"><ul>{}</ul></article>{}</body></html>"#,
        items, next
    )
}

/// `div.episode-item` blocks for the given episode paths.
pub fn episode_blocks(name: &str, hrefs: &[&str]) -> String {
    hrefs
        .iter()
        .map(|href| {
            format!(
                r#"<div class="episode-item"><a href="{}"><div class="name">{}</div></a></div>"#,
                href, name
            )
        })
        .collect()
}
