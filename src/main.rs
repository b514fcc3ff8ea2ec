//! YCrawler main entry point
//!
//! This is the command-line interface for the news front-page crawler.

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use ycrawler::config::{validate, CrawlerConfig, DEFAULT_OUTPUT_DIR};
use ycrawler::crawler::crawl;

/// YCrawler: async crawler for news.ycombinator.com
///
/// Polls the front page, downloads every new article together with its
/// comment page and the links posted in the comments.
#[derive(Parser, Debug)]
#[command(name = "ycrawler")]
#[command(version)]
#[command(about = "Async crawler for news.ycombinator.com", long_about = None)]
struct Cli {
    /// Output files directory
    #[arg(short, long, value_name = "DIR", default_value = DEFAULT_OUTPUT_DIR)]
    output: PathBuf,

    /// Main page check interval (seconds)
    #[arg(short, long, value_name = "SECONDS", default_value_t = 60)]
    interval: u64,

    /// Show debug messages
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.debug);

    let config = CrawlerConfig {
        output_dir: cli.output,
        interval: Duration::from_secs(cli.interval),
        ..CrawlerConfig::default()
    };

    if let Err(e) = validate(&config) {
        tracing::error!("Invalid configuration: {}", e);
        return Err(e.into());
    }

    tracing::info!(
        "Crawling {} into {} every {}s",
        config.site_root,
        config.output_dir.display(),
        config.interval.as_secs()
    );

    let shutdown = CancellationToken::new();
    let trigger = shutdown.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, finishing current cycle");
        trigger.cancel();
    });

    match crawl(config, shutdown).await {
        Ok(()) => {
            tracing::info!("Crawler stopped");
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawler failed to start: {}", e);
            Err(e.into())
        }
    }
}

/// Sets up the logging/tracing subscriber
fn setup_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("ycrawler=debug,info")
    } else {
        EnvFilter::new("ycrawler=info,warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Resolves on Ctrl-C, or SIGTERM on Unix
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Unable to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
            }
            Err(e) => {
                tracing::error!("Unable to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
