//! Buildwatch CLI - construction progress dashboard.

use std::path::PathBuf;

use anyhow::{Context, Result};
use buildwatch_core::SiteConfig;
use buildwatch_dashboard::{render_json, render_text, Dashboard};
use buildwatch_imagery::{HttpMosaicProvider, ImageryProvider, PlaceholderProvider};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "buildwatch")]
#[command(
    about = "Satellite before/after view and finish-date prediction for a construction site",
    long_about = None
)]
struct Cli {
    /// Current % complete (0-100); defaults to the site's configured value
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(0..=100))]
    percent: Option<u8>,

    /// Show the extrapolation chart
    #[arg(long)]
    chart: bool,

    /// Days between printed chart rows
    #[arg(long, default_value = "30")]
    chart_step: usize,

    /// Print the dashboard as JSON
    #[arg(long)]
    json: bool,

    /// Site config file (JSON); built-in site when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Never contact the mosaic service
    #[arg(long)]
    offline: bool,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => SiteConfig::load(path)
            .with_context(|| format!("Failed to load site config {}", path.display()))?,
        None => SiteConfig::default(),
    };
    debug!("Site: {} ({} .. {})", config.name, config.start_date, config.reference_date);

    let provider = select_provider(&config, cli.offline);
    info!("Imagery provider: {}", provider.name());

    let percent = cli.percent.unwrap_or(config.default_percent);
    let mut dashboard = Dashboard::new(config, provider);
    let view = dashboard.view(percent as f64, cli.chart).await;

    if cli.json {
        println!("{}", render_json(&view)?);
    } else {
        print!("{}", render_text(&view, cli.chart_step));
    }

    Ok(())
}

fn select_provider(config: &SiteConfig, offline: bool) -> Box<dyn ImageryProvider> {
    match (&config.imagery.endpoint, offline) {
        (Some(url), false) => Box::new(HttpMosaicProvider::new(url.clone())),
        _ => Box::new(PlaceholderProvider),
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["buildwatch"]).unwrap();
        assert_eq!(cli.percent, None);
        assert!(!cli.chart);
        assert_eq!(cli.chart_step, 30);
        assert!(!cli.offline);
    }

    #[test]
    fn test_percent_range() {
        let cli = Cli::try_parse_from(["buildwatch", "--percent", "100"]).unwrap();
        assert_eq!(cli.percent, Some(100));
        assert!(Cli::try_parse_from(["buildwatch", "--percent", "101"]).is_err());
        assert!(Cli::try_parse_from(["buildwatch", "--percent", "-1"]).is_err());
    }

    #[test]
    fn test_provider_selection() {
        let mut config = SiteConfig::default();
        assert_eq!(select_provider(&config, false).name(), "placeholder");

        config.imagery.endpoint = Some("http://localhost:8080".to_string());
        assert_eq!(select_provider(&config, false).name(), "http://localhost:8080");
        assert_eq!(select_provider(&config, true).name(), "placeholder");
    }

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
