//! Mirror domain resolution
//!
//! The site moves between numbered mirrors. The current one is published as
//! a `guncel_domain=<url>` line in a plaintext file owned by someone else, so
//! its contents are treated as untrusted and optional.

use std::time::Duration;

use tracing::{info, warn};

use crate::client::DizipalClient;
use crate::config::DOMAIN_CONFIG_KEY;

/// Extract the mirror from a domain config body.
///
/// Returns the value of the first non-empty `guncel_domain=` line with any
/// trailing slash removed, provided it is an `http(s)` URL.
///
/// # Examples
/// ```
/// use dizipal_core::domain::parse_domain_config;
///
/// assert_eq!(
///     parse_domain_config("# mirrors\nguncel_domain=https://dizipal1300.com/\n").as_deref(),
///     Some("https://dizipal1300.com")
/// );
/// assert_eq!(parse_domain_config("guncel_domain=\n"), None);
/// ```
pub fn parse_domain_config(text: &str) -> Option<String> {
    let prefix = format!("{}=", DOMAIN_CONFIG_KEY);
    text.lines()
        .map(str::trim)
        .filter_map(|line| line.strip_prefix(prefix.as_str()))
        .map(|value| value.trim().trim_end_matches('/'))
        .find(|value| !value.is_empty())
        .filter(|value| is_http_url(value))
        .map(str::to_string)
}

fn is_http_url(value: &str) -> bool {
    url::Url::parse(value)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.host().is_some())
        .unwrap_or(false)
}

/// Resolve the current mirror, degrading to `fallback` on any failure.
///
/// Never fails. One network read.
pub async fn resolve_domain(
    client: &DizipalClient,
    config_url: &str,
    fallback: &str,
    timeout: Duration,
) -> String {
    let fallback = fallback.trim_end_matches('/').to_string();

    match client.fetch_with_timeout(config_url, timeout).await {
        Ok(body) => match parse_domain_config(&body) {
            Some(domain) => {
                info!(%domain, "resolved current mirror");
                domain
            }
            None => {
                warn!(%fallback, "domain config has no usable entry, using fallback");
                fallback
            }
        },
        Err(err) => {
            warn!(error = %err, %fallback, "could not read domain config, using fallback");
            fallback
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_domain_config_strips_slashes() {
        assert_eq!(
            parse_domain_config("guncel_domain=https://dizipal1500.com//").as_deref(),
            Some("https://dizipal1500.com")
        );
    }

    #[test]
    fn test_parse_domain_config_ignores_other_lines() {
        let text = "eski_domain=https://dizipal1000.com\n  guncel_domain = x\nguncel_domain=https://dizipal1501.com\n";
        assert_eq!(parse_domain_config(text).as_deref(), Some("https://dizipal1501.com"));
    }

    #[test]
    fn test_parse_domain_config_rejects_non_http() {
        assert_eq!(parse_domain_config("guncel_domain=javascript:alert(1)"), None);
        assert_eq!(parse_domain_config("guncel_domain=dizipal1500.com"), None);
    }

    #[test]
    fn test_parse_domain_config_missing() {
        assert_eq!(parse_domain_config(""), None);
        assert_eq!(parse_domain_config("<html>404</html>"), None);
    }

    #[tokio::test]
    async fn test_resolve_domain_unreachable_uses_fallback() {
        let client = DizipalClient::new().unwrap();
        let domain = resolve_domain(
            &client,
            "http://127.0.0.1:9/dizipaldomain.txt",
            "https://dizipal1222.com/",
            Duration::from_secs(2),
        )
        .await;
        assert_eq!(domain, "https://dizipal1222.com");
    }
}
