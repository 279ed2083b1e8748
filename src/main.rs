//! Image-Spider main entry point
//!
//! This is the command-line interface for the Image-Spider crawler.

use anyhow::Context;
use clap::Parser;
use image_spider::config::{load_config, prepare_output_dir, resolve_depth, validate, Config};
use image_spider::crawler::crawl;
use image_spider::output::print_statistics;
use image_spider::url::parse_start_url;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use url::Url;

/// Image-Spider: recursively download images from a website
///
/// Visits the given URL, downloads every .jpg, .jpeg, .png, .gif and .bmp
/// image it references and, with -r, follows links down to the given depth.
#[derive(Parser, Debug)]
#[command(name = "spider")]
#[command(version)]
#[command(about = "Recursively download images from a website", long_about = None)]
struct Cli {
    /// Enable recursive download
    #[arg(short = 'r')]
    recursive: bool,

    /// Maximum depth level for recursive download (requires -r)
    #[arg(short = 'l', value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    level: Option<u32>,

    /// Path to save downloaded files [default: ./data/]
    #[arg(short = 'p', value_name = "PATH")]
    path: Option<PathBuf>,

    /// Optional TOML file with fetcher, header and crawler settings
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate options and show what would be crawled without any network activity
    #[arg(long)]
    dry_run: bool,

    /// The URL to crawl for images
    #[arg(value_name = "URL")]
    url: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    // Errors are reported once, by anyhow, on the way out of main
    let (config, start_url) = prepare(&cli)?;

    if cli.dry_run {
        handle_dry_run(&config, &start_url, cli.recursive);
    } else {
        handle_crawl(&config, &start_url).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("image_spider=info,warn"),
            1 => EnvFilter::new("image_spider=debug,info"),
            2 => EnvFilter::new("image_spider=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Resolves every option into the effective configuration
///
/// All configuration errors surface here, before any request is made.
fn prepare(cli: &Cli) -> anyhow::Result<(Config, Url)> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?
        }
        None => Config::default(),
    };

    config.crawler.max_depth = resolve_depth(cli.recursive, cli.level)?;
    if let Some(path) = &cli.path {
        config.crawler.output_dir = path.display().to_string();
    }
    validate(&config)?;

    let start_url = parse_start_url(&cli.url)?;

    let output_dir = prepare_output_dir(std::path::Path::new(&config.crawler.output_dir))?;
    config.crawler.output_dir = output_dir.display().to_string();

    tracing::info!("Recursive: {}", cli.recursive);
    tracing::info!("Depth: {}", config.crawler.max_depth);
    tracing::info!("Output Path: {}", config.crawler.output_dir);
    tracing::info!("Target URL: {}", start_url);

    Ok((config, start_url))
}

/// Handles the --dry-run mode: shows the effective settings and exits
fn handle_dry_run(config: &Config, start_url: &Url, recursive: bool) {
    println!("=== Image-Spider Dry Run ===\n");

    println!("Crawl:");
    println!("  Target URL: {}", start_url);
    println!("  Recursive: {}", recursive);
    println!("  Max depth: {}", config.crawler.max_depth);
    println!("  Output path: {}", config.crawler.output_dir);

    println!("\nFetcher:");
    println!(
        "  Page delay: {}-{}ms",
        config.fetcher.page_delay_min_ms, config.fetcher.page_delay_max_ms
    );
    println!(
        "  Retry delay: {}-{}ms",
        config.fetcher.retry_delay_min_ms, config.fetcher.retry_delay_max_ms
    );
    println!("  Max attempts: {}", config.fetcher.max_attempts);
    println!("  Timeout: {}s", config.fetcher.timeout_secs);

    println!("\nHeaders:");
    println!("  User-Agent: {}", config.user_agent.user_agent);
    println!("  Accept: {}", config.user_agent.accept);
    println!("  Accept-Language: {}", config.user_agent.accept_language);

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
///
/// Per-page and per-image failures are already logged by the crawler and
/// do not change the exit status.
async fn handle_crawl(config: &Config, start_url: &Url) -> anyhow::Result<()> {
    let stats = crawl(config, start_url).await.context("Crawl failed")?;

    print_statistics(&stats);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_recursive_with_level() {
        let cli = Cli::try_parse_from(["spider", "-r", "-l", "3", "-p", "/tmp/x", "http://x.test/"])
            .unwrap();
        assert!(cli.recursive);
        assert_eq!(cli.level, Some(3));
        assert_eq!(cli.path, Some(PathBuf::from("/tmp/x")));
        assert_eq!(cli.url, "http://x.test/");
    }

    #[test]
    fn test_level_must_be_positive() {
        assert!(Cli::try_parse_from(["spider", "-r", "-l", "0", "http://x.test/"]).is_err());
        assert!(Cli::try_parse_from(["spider", "-r", "-l", "abc", "http://x.test/"]).is_err());
    }

    #[test]
    fn test_url_is_required() {
        assert!(Cli::try_parse_from(["spider", "-r"]).is_err());
    }

    #[test]
    fn test_level_without_recursion_fails_before_network() {
        let cli = Cli::try_parse_from(["spider", "-l", "3", "http://x.test/"]).unwrap();
        let error = prepare(&cli).unwrap_err();
        assert!(error.to_string().contains("-r"));
    }

    #[test]
    fn test_prepare_creates_output_dir() {
        let tmp = tempfile::TempDir::new().unwrap();
        let out = tmp.path().join("images");
        let cli = Cli::try_parse_from([
            "spider",
            "-r",
            "-p",
            out.to_str().unwrap(),
            "http://x.test/",
        ])
        .unwrap();

        let (config, start_url) = prepare(&cli).unwrap();
        assert!(out.is_dir());
        assert_eq!(config.crawler.max_depth, 1);
        assert_eq!(start_url.as_str(), "http://x.test/");
    }
}
