//! Command-line arguments for `kodegen-pageinspect`

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use crate::config::{InspectConfig, InspectConfigBuilder};
use crate::errors::InspectResult;
use crate::output::OutputFormat;

#[derive(Debug, Parser)]
#[command(
    name = "kodegen-pageinspect",
    version,
    about = "Report content, weight, paint, palette and tracker statistics for a page"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    #[arg(long, value_enum, default_value_t = OutputFormat::Json, global = true)]
    pub format: OutputFormat,

    /// Milliseconds to wait before detecting third-party services
    #[arg(long, global = true)]
    pub settle_ms: Option<u64>,

    /// Show the browser window (debug builds only)
    #[arg(long, default_value_t = false, global = true)]
    pub headed: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Inspect a live page in a browser tab
    Url { url: String },
    /// Inspect a saved HTML file
    Html {
        file: PathBuf,
        /// URL the file was loaded from; relative references resolve against it
        #[arg(long)]
        base_url: String,
        /// Performance timeline JSON captured alongside the file
        #[arg(long)]
        timeline: Option<PathBuf>,
    },
    /// Open a page and highlight one image
    Highlight {
        url: String,
        /// Exact `src` attribute of the image
        #[arg(long)]
        source: String,
    },
}

impl Args {
    /// Map command-line options onto the configuration builder
    ///
    /// # Errors
    ///
    /// Returns `InspectError::Config` when the resulting configuration is
    /// rejected.
    pub fn config(&self) -> InspectResult<InspectConfig> {
        let mut builder: InspectConfigBuilder = InspectConfig::builder().headless(!self.headed);
        if let Some(ms) = self.settle_ms {
            builder = builder.settle_delay(Duration::from_millis(ms));
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_subcommand() {
        let args = Args::try_parse_from([
            "kodegen-pageinspect",
            "html",
            "page.html",
            "--base-url",
            "https://example.com/",
            "--format",
            "text",
            "--settle-ms",
            "0",
        ])
        .unwrap();

        assert_eq!(args.format, OutputFormat::Text);
        let config = args.config().unwrap();
        assert!(config.settle_delay().is_zero());
        assert!(matches!(args.command, Command::Html { timeline: None, .. }));
    }

    #[test]
    fn test_highlight_requires_source() {
        assert!(
            Args::try_parse_from(["kodegen-pageinspect", "highlight", "https://example.com/"])
                .is_err()
        );
    }
}
