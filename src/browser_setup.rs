//! Browser discovery and launch for live inspection

use anyhow::{Context, Result};
use chromiumoxide::browser::{Browser, BrowserConfigBuilder, HeadlessMode};
use chromiumoxide::fetcher::{BrowserFetcher, BrowserFetcherOptions};
use futures::StreamExt;
use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, trace, warn};

/// Extra Chrome switches; the browser keeps its own user agent so pages
/// serve what a regular visitor would get
const LAUNCH_ARGS: &[&str] = &[
    "--disable-infobars",
    "--disable-notifications",
    "--disable-extensions",
    "--no-first-run",
    "--no-default-browser-check",
    "--mute-audio",
];

/// Environment variable that overrides browser discovery
pub const CHROMIUM_PATH_ENV: &str = "CHROMIUM_PATH";

/// Well-known install locations for the current platform
fn platform_candidates() -> &'static [&'static str] {
    if cfg!(target_os = "windows") {
        &[
            r"%PROGRAMFILES%\Google\Chrome\Application\chrome.exe",
            r"%PROGRAMFILES(X86)%\Google\Chrome\Application\chrome.exe",
            r"%LOCALAPPDATA%\Google\Chrome\Application\chrome.exe",
            r"%PROGRAMFILES%\Chromium\Application\chrome.exe",
        ]
    } else if cfg!(target_os = "macos") {
        &[
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            "/Applications/Chromium.app/Contents/MacOS/Chromium",
            "~/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            "~/Applications/Chromium.app/Contents/MacOS/Chromium",
            "/opt/homebrew/bin/chromium",
        ]
    } else {
        &[
            "/usr/bin/google-chrome",
            "/usr/bin/google-chrome-stable",
            "/usr/bin/chromium",
            "/usr/bin/chromium-browser",
            "/snap/bin/chromium",
            "/opt/google/chrome/chrome",
        ]
    }
}

/// Expand a leading `~/` and Windows `%VAR%` tokens
///
/// Unknown variables are left in place, which makes the path fail the
/// existence check instead of pointing somewhere unexpected.
fn expand_candidate(raw: &str) -> Option<PathBuf> {
    if let Some(rest) = raw.strip_prefix("~/") {
        return dirs::home_dir().map(|home| home.join(rest));
    }
    if !raw.contains('%') {
        return Some(PathBuf::from(raw));
    }

    let mut expanded = String::with_capacity(raw.len());
    let mut pieces = raw.split('%');
    if let Some(head) = pieces.next() {
        expanded.push_str(head);
    }
    let mut in_var = true;
    for piece in pieces {
        if in_var {
            match std::env::var(piece) {
                Ok(value) => expanded.push_str(&value),
                Err(_) => {
                    expanded.push('%');
                    expanded.push_str(piece);
                    expanded.push('%');
                }
            }
        } else {
            expanded.push_str(piece);
        }
        in_var = !in_var;
    }
    Some(PathBuf::from(expanded))
}

fn which(command: &str) -> Option<PathBuf> {
    let output = Command::new("which").arg(command).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let path = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!path.is_empty()).then(|| PathBuf::from(path))
}

/// Find a Chrome/Chromium executable
///
/// Checks `CHROMIUM_PATH` first, then well-known install locations, then
/// `which` on Unix.
///
/// # Errors
///
/// Returns an error when no executable is found.
pub fn find_browser_executable() -> Result<PathBuf> {
    if let Ok(path) = std::env::var(CHROMIUM_PATH_ENV) {
        let path = PathBuf::from(path);
        if path.exists() {
            info!("Using browser from {CHROMIUM_PATH_ENV}: {}", path.display());
            return Ok(path);
        }
        warn!(
            "{CHROMIUM_PATH_ENV} points to a missing file: {}",
            path.display()
        );
    }

    if let Some(path) = platform_candidates()
        .iter()
        .filter_map(|raw| expand_candidate(raw))
        .find(|path| path.exists())
    {
        info!("Found browser at: {}", path.display());
        return Ok(path);
    }

    if !cfg!(target_os = "windows")
        && let Some(path) = ["chromium", "chromium-browser", "google-chrome", "chrome"]
            .into_iter()
            .find_map(which)
    {
        info!("Found browser on PATH: {}", path.display());
        return Ok(path);
    }

    Err(anyhow::anyhow!("Chrome/Chromium executable not found"))
}

/// Download a managed Chromium into the user cache directory
///
/// # Errors
///
/// Returns an error when the cache directory cannot be created or the
/// download fails.
pub async fn download_managed_browser() -> Result<PathBuf> {
    let cache_dir = dirs::cache_dir()
        .unwrap_or_else(|| {
            let fallback = std::env::temp_dir();
            warn!(
                "No user cache directory, downloading browser under {}",
                fallback.display()
            );
            fallback
        })
        .join("kodegen-pageinspect")
        .join("chromium");

    tokio::fs::create_dir_all(&cache_dir)
        .await
        .context("Failed to create browser cache directory")?;

    info!("Downloading managed Chromium to {}", cache_dir.display());
    let fetcher = BrowserFetcher::new(
        BrowserFetcherOptions::builder()
            .with_path(&cache_dir)
            .build()
            .context("Failed to build fetcher options")?,
    );
    let revision = fetcher.fetch().await.context("Failed to fetch browser")?;

    Ok(revision.executable_path)
}

/// A running browser and the task driving its CDP connection
pub struct LaunchedBrowser {
    pub browser: Browser,
    handler: JoinHandle<()>,
    user_data_dir: PathBuf,
}

impl LaunchedBrowser {
    /// Close the browser, stop the handler and remove the profile directory
    ///
    /// # Errors
    ///
    /// Returns an error when the browser refuses to close.
    pub async fn shutdown(mut self) -> Result<()> {
        self.browser
            .close()
            .await
            .context("Failed to close browser")?;
        if let Err(e) = self.browser.wait().await {
            debug!("Browser process wait failed: {e}");
        }
        self.handler.abort();

        if let Err(e) = tokio::fs::remove_dir_all(&self.user_data_dir).await {
            debug!(
                "Could not remove profile directory {}: {e}",
                self.user_data_dir.display()
            );
        }
        Ok(())
    }
}

/// Find or download a browser and launch it
///
/// Each launch gets its own profile directory under the temp dir.
///
/// # Errors
///
/// Returns an error when no browser can be found or downloaded, or the
/// launch fails.
pub async fn launch_browser(headless: bool) -> Result<LaunchedBrowser> {
    let chrome_path = match find_browser_executable() {
        Ok(path) => path,
        Err(e) => {
            warn!("{e}; falling back to a managed download");
            download_managed_browser().await?
        }
    };

    let user_data_dir =
        std::env::temp_dir().join(format!("kodegen_pageinspect_{}", std::process::id()));
    tokio::fs::create_dir_all(&user_data_dir)
        .await
        .context("Failed to create user data directory")?;

    let mut builder = BrowserConfigBuilder::default()
        .request_timeout(Duration::from_secs(30))
        .window_size(1440, 900)
        .user_data_dir(user_data_dir.clone())
        .chrome_executable(chrome_path);

    builder = if headless {
        builder.headless_mode(HeadlessMode::default())
    } else {
        builder.with_head()
    };

    let config = builder
        .args(LAUNCH_ARGS.iter().copied())
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build browser config: {e}"))?;

    let (browser, mut handler) = Browser::launch(config)
        .await
        .context("Failed to launch browser")?;

    let handler = tokio::spawn(async move {
        while let Some(event) = handler.next().await {
            if let Err(e) = event {
                let message = e.to_string();
                // Chrome emits CDP events chromiumoxide has no type for
                if message.contains("data did not match any variant of untagged enum Message")
                    || message.contains("Failed to deserialize WS response")
                {
                    trace!("Ignoring unrecognized CDP message: {message}");
                } else {
                    error!("Browser handler error: {e:?}");
                }
            }
        }
        debug!("Browser handler task completed");
    });

    Ok(LaunchedBrowser {
        browser,
        handler,
        user_data_dir,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_launch_args_leave_identity_alone() {
        assert!(
            LAUNCH_ARGS
                .iter()
                .all(|arg| !arg.starts_with("--user-agent") && !arg.contains("AutomationControlled"))
        );
    }

    #[test]
    fn test_expand_plain_path() {
        assert_eq!(
            expand_candidate("/usr/bin/chromium"),
            Some(PathBuf::from("/usr/bin/chromium"))
        );
    }

    #[test]
    fn test_expand_unknown_variable_is_kept() {
        let expanded = expand_candidate(r"%PAGEINSPECT_SURELY_UNSET%\chrome.exe").unwrap();
        assert_eq!(
            expanded,
            PathBuf::from(r"%PAGEINSPECT_SURELY_UNSET%\chrome.exe")
        );
    }
}
