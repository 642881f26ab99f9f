//! Run orchestration for the `dizipal` binary

use std::path::PathBuf;

use anyhow::Context;
use serde::Serialize;
use tracing::info;

use dizipal_core::{emit, CatalogSummary, DizipalScraper, PlaylistLimits, ScraperConfig, Strategy};

/// Options collected from the command line.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub output: PathBuf,
    pub strategy: Strategy,
    pub months: Option<u32>,
    pub domain: Option<String>,
    pub stats: bool,
}

/// What `--stats` prints.
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub mirror: String,
    pub strategy: Strategy,
    pub output: PathBuf,
    #[serde(flatten)]
    pub summary: CatalogSummary,
}

/// Scraper configuration for the given options.
///
/// `--months 0` disables the sitemap recency window.
pub fn scraper_config(options: &RunOptions) -> ScraperConfig {
    let mut config = ScraperConfig::default();
    if let Some(months) = options.months {
        config.sitemap_months = if months == 0 { None } else { Some(months) };
    }
    config
}

/// Build the playlist and write it to `options.output`.
///
/// # Errors
/// * `DizipalError::NoSource` (wrapped) when the strategy found nothing
/// * I/O errors writing the output file
pub async fn run(options: RunOptions) -> anyhow::Result<()> {
    let config = scraper_config(&options);
    let scraper = match &options.domain {
        Some(domain) => DizipalScraper::with_domain(config, domain)?,
        None => DizipalScraper::connect(config).await?,
    };
    info!(mirror = %scraper.base_url(), strategy = ?options.strategy, "starting");

    let catalog = scraper.build_catalog(options.strategy).await?;
    let playlist = emit(&catalog, &PlaylistLimits::default());

    tokio::fs::write(&options.output, playlist)
        .await
        .with_context(|| format!("failed to write {}", options.output.display()))?;

    let summary = catalog.summary();
    info!(path = %options.output.display(), entries = summary.total, "playlist written");

    if options.stats {
        let report = RunReport {
            mirror: scraper.base_url().to_string(),
            strategy: options.strategy,
            output: options.output.clone(),
            summary,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(months: Option<u32>) -> RunOptions {
        RunOptions {
            output: PathBuf::from("dizipal.m3u"),
            strategy: Strategy::Sitemap,
            months,
            domain: None,
            stats: false,
        }
    }

    #[test]
    fn test_scraper_config_months() {
        assert_eq!(scraper_config(&options(None)).sitemap_months, Some(3));
        assert_eq!(scraper_config(&options(Some(12))).sitemap_months, Some(12));
        assert_eq!(scraper_config(&options(Some(0))).sitemap_months, None);
    }

    #[test]
    fn test_report_json_shape() {
        let report = RunReport {
            mirror: "https://dizipal1222.com/".to_string(),
            strategy: Strategy::Crawl,
            output: PathBuf::from("dizipal.m3u"),
            summary: CatalogSummary {
                sections: Vec::new(),
                total: 0,
            },
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["strategy"], "Crawl");
        assert_eq!(json["total"], 0);
        assert!(json["sections"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_run_rejects_bad_domain() {
        let options = RunOptions {
            domain: Some("not a url".to_string()),
            ..options(None)
        };
        assert!(run(options).await.is_err());
    }
}
