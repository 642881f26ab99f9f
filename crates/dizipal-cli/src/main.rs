//! `dizipal` command-line front end
//!
//! Resolves the current mirror, runs one collection strategy and writes the
//! playlist file.

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, ValueEnum};
use dizipal_core::{DizipalError, Strategy, DEFAULT_OUTPUT};
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use commands::RunOptions;

#[derive(Debug, Parser)]
#[command(
    name = "dizipal",
    version,
    about = "Crawl the current Dizipal mirror into an M3U playlist"
)]
struct Cli {
    /// Playlist file to write
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// How content pages are gathered
    #[arg(short, long, value_enum, default_value_t = StrategyArg::Sitemap)]
    strategy: StrategyArg,

    /// Only read dated child sitemaps from the last N months (0 reads all)
    #[arg(long, value_name = "N")]
    months: Option<u32>,

    /// Use this mirror instead of resolving the current one
    #[arg(long, value_name = "URL")]
    domain: Option<String>,

    /// Print per-section counts as JSON when done
    #[arg(long, default_value_t = false)]
    stats: bool,

    /// Log more (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Copy, Clone, ValueEnum, PartialEq, Eq)]
enum StrategyArg {
    Sitemap,
    Crawl,
    Streams,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Sitemap => Strategy::Sitemap,
            StrategyArg::Crawl => Strategy::Crawl,
            StrategyArg::Streams => Strategy::Streams,
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("dizipal={0},dizipal_core={0}", default_level).into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let options = RunOptions {
        output: cli.output,
        strategy: cli.strategy.into(),
        months: cli.months,
        domain: cli.domain,
        stats: cli.stats,
    };

    match commands::run(options).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Some(DizipalError::NoSource(reason)) = err.downcast_ref::<DizipalError>() {
                error!(%reason, "nothing to write, the mirror offered no usable source");
            } else {
                error!("{:#}", err);
            }
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["dizipal"]);
        assert_eq!(cli.output, PathBuf::from("dizipal.m3u"));
        assert_eq!(cli.strategy, StrategyArg::Sitemap);
        assert_eq!(cli.months, None);
        assert!(!cli.stats);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::parse_from([
            "dizipal",
            "-o",
            "out.m3u",
            "--strategy",
            "streams",
            "--months",
            "6",
            "--domain",
            "https://dizipal1300.com",
            "--stats",
            "-vv",
        ]);
        assert_eq!(cli.output, PathBuf::from("out.m3u"));
        assert_eq!(Strategy::from(cli.strategy), Strategy::Streams);
        assert_eq!(cli.months, Some(6));
        assert_eq!(cli.domain.as_deref(), Some("https://dizipal1300.com"));
        assert!(cli.stats);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_rejects_unknown_strategy() {
        assert!(Cli::try_parse_from(["dizipal", "--strategy", "rss"]).is_err());
    }
}
