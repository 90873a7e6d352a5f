// Page inspector CLI
//
// Inspects a live page or a saved HTML file and prints the report.

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kodegen_tools_pageinspect::cli::{Args, Command};
use kodegen_tools_pageinspect::config::InspectConfig;
use kodegen_tools_pageinspect::output::render;
use kodegen_tools_pageinspect::snapshot::PerformanceTimeline;
use kodegen_tools_pageinspect::{
    BrowserPage, HighlightOutcome, PageReport, StaticPage, highlight_image, inspect_page,
    launch_browser, spawn_inspection,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays parseable
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("info".parse()?))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let config = args.config()?;

    match &args.command {
        Command::Url { url } => {
            let report = inspect_live(url, &config).await?;
            println!("{}", render(&report, args.format)?);
        }
        Command::Html {
            file,
            base_url,
            timeline,
        } => {
            let html = tokio::fs::read_to_string(file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let mut page = StaticPage::from_html(&html, base_url)?;
            if let Some(path) = timeline {
                let raw = tokio::fs::read_to_string(path)
                    .await
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                let timeline: PerformanceTimeline = serde_json::from_str(&raw)
                    .with_context(|| format!("Invalid timeline JSON in {}", path.display()))?;
                page = page.with_timeline(timeline);
            }
            let report = inspect_page(&page, &config).await?;
            println!("{}", render(&report, args.format)?);
        }
        Command::Highlight { url, source } => highlight_live(url, source, &config).await?,
    }

    Ok(())
}

async fn inspect_live(url: &str, config: &InspectConfig) -> Result<PageReport> {
    let launched = launch_browser(config.headless()).await?;

    let result = async {
        let page = BrowserPage::open(&launched.browser, url, config).await?;
        let message = spawn_inspection(Arc::new(page), config.clone()).await?;
        Ok::<_, anyhow::Error>(message.stats)
    }
    .await;

    launched.shutdown().await?;
    result
}

async fn highlight_live(url: &str, source: &str, config: &InspectConfig) -> Result<()> {
    let launched = launch_browser(config.headless()).await?;

    let result = async {
        let page = Arc::new(BrowserPage::open(&launched.browser, url, config).await?);
        match highlight_image(page, source, config.highlight_duration()).await? {
            HighlightOutcome::Highlighted(release) => {
                tracing::info!("Highlighted {source}");
                release.await?;
            }
            HighlightOutcome::NotFound => tracing::warn!("No image with src {source}"),
        }
        Ok::<_, anyhow::Error>(())
    }
    .await;

    launched.shutdown().await?;
    result
}
