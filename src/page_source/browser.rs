//! Live page source backed by a Chrome tab

use anyhow::Context;
use chromiumoxide::{Browser, Page};
use futures::FutureExt;
use futures::future::BoxFuture;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::PageSource;
use super::js_scripts::{
    DOCUMENT_SNAPSHOT_SCRIPT, HAS_STYLE_TEMPLATE, HIDE_OVERLAY_SCRIPT, INJECT_STYLE_TEMPLATE,
    LOCATE_IMAGE_TEMPLATE, MARK_TEMPLATE, SCROLL_INTO_VIEW_TEMPLATE, SERVICE_SIGNALS_TEMPLATE,
    TIMELINE_SCRIPT, UNMARK_TEMPLATE, render_script,
};
use crate::config::InspectConfig;
use crate::errors::{InspectError, InspectResult};
use crate::highlight::HighlightTarget;
use crate::snapshot::{DocumentSnapshot, PerformanceTimeline, ServiceSignals};

#[derive(Deserialize)]
struct LocatedImage {
    token: Option<String>,
}

/// A loaded browser tab
#[derive(Clone)]
pub struct BrowserPage {
    page: Page,
}

impl BrowserPage {
    #[must_use]
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    /// Open `url` in a new tab and wait for navigation to finish
    ///
    /// # Errors
    ///
    /// Returns `InspectError::Browser` when the tab cannot be opened or the
    /// load exceeds the configured timeout.
    pub async fn open(browser: &Browser, url: &str, config: &InspectConfig) -> InspectResult<Self> {
        let timeout = Duration::from_secs(config.page_load_timeout_secs());

        let page = tokio::time::timeout(timeout, browser.new_page(url))
            .await
            .map_err(|_| {
                InspectError::Browser(format!(
                    "Timed out after {}s opening {url}",
                    timeout.as_secs()
                ))
            })?
            .with_context(|| format!("Failed to open {url}"))?;

        tokio::time::timeout(timeout, page.wait_for_navigation())
            .await
            .map_err(|_| {
                InspectError::Browser(format!(
                    "Timed out after {}s waiting for {url} to load",
                    timeout.as_secs()
                ))
            })?
            .with_context(|| format!("Navigation to {url} failed"))?;

        info!("Loaded {url}");
        Ok(Self::new(page))
    }

    #[must_use]
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Hide the accessibility checker overlay so it does not skew metrics
    ///
    /// # Errors
    ///
    /// Returns `InspectError::Browser` when the script cannot be evaluated.
    pub async fn hide_overlays(&self) -> InspectResult<()> {
        let hidden: u64 = self.evaluate(HIDE_OVERLAY_SCRIPT, "overlay").await?;
        if hidden > 0 {
            debug!("Hid {hidden} accessibility overlay tips");
        }
        Ok(())
    }

    async fn evaluate<T: DeserializeOwned>(
        &self,
        script: &str,
        what: &'static str,
    ) -> InspectResult<T> {
        let result = self
            .page
            .evaluate(script)
            .await
            .with_context(|| format!("Failed to execute {what} script"))?;

        result
            .into_value::<T>()
            .map_err(|source| InspectError::Snapshot { what, source })
    }
}

impl PageSource for BrowserPage {
    fn document(&self) -> BoxFuture<'_, InspectResult<DocumentSnapshot>> {
        async move {
            if let Err(e) = self.hide_overlays().await {
                warn!("Could not hide overlays: {e}");
            }
            self.evaluate(DOCUMENT_SNAPSHOT_SCRIPT, "document").await
        }
        .boxed()
    }

    fn timeline(&self) -> BoxFuture<'_, InspectResult<PerformanceTimeline>> {
        self.evaluate(TIMELINE_SCRIPT, "timeline").boxed()
    }

    fn service_signals<'a>(
        &'a self,
        globals: &'a [&'static str],
    ) -> BoxFuture<'a, InspectResult<ServiceSignals>> {
        async move {
            let script = render_script(SERVICE_SIGNALS_TEMPLATE, &[("__GLOBALS__", json!(globals))]);
            self.evaluate(&script, "service signals").await
        }
        .boxed()
    }
}

impl HighlightTarget for BrowserPage {
    /// Value of the element's `data-pageinspect-id` attribute
    type Element = String;

    fn locate_image<'a>(
        &'a self,
        source: &'a str,
    ) -> BoxFuture<'a, InspectResult<Option<String>>> {
        async move {
            let script = render_script(LOCATE_IMAGE_TEMPLATE, &[("__SOURCE__", json!(source))]);
            let located: LocatedImage = self.evaluate(&script, "image locator").await?;
            Ok(located.token)
        }
        .boxed()
    }

    fn scroll_into_view<'a>(&'a self, element: &'a String) -> BoxFuture<'a, InspectResult<()>> {
        async move {
            let script = render_script(SCROLL_INTO_VIEW_TEMPLATE, &[("__TOKEN__", json!(element))]);
            let _: bool = self.evaluate(&script, "scroll").await?;
            Ok(())
        }
        .boxed()
    }

    fn has_style<'a>(&'a self, id: &'a str) -> BoxFuture<'a, InspectResult<bool>> {
        async move {
            let script = render_script(HAS_STYLE_TEMPLATE, &[("__ID__", json!(id))]);
            self.evaluate(&script, "style check").await
        }
        .boxed()
    }

    fn inject_style<'a>(&'a self, id: &'a str, css: &'a str) -> BoxFuture<'a, InspectResult<()>> {
        async move {
            let script = render_script(
                INJECT_STYLE_TEMPLATE,
                &[("__ID__", json!(id)), ("__CSS__", json!(css))],
            );
            let injected: bool = self.evaluate(&script, "style injection").await?;
            if !injected {
                debug!("Highlight style {id} already present");
            }
            Ok(())
        }
        .boxed()
    }

    fn mark<'a>(&'a self, element: &'a String, class: &'a str) -> BoxFuture<'a, InspectResult<bool>> {
        async move {
            let script = render_script(
                MARK_TEMPLATE,
                &[("__TOKEN__", json!(element)), ("__CLASS__", json!(class))],
            );
            self.evaluate(&script, "highlight mark").await
        }
        .boxed()
    }

    fn unmark<'a>(
        &'a self,
        element: &'a String,
        class: &'a str,
    ) -> BoxFuture<'a, InspectResult<()>> {
        async move {
            let script = render_script(
                UNMARK_TEMPLATE,
                &[("__TOKEN__", json!(element)), ("__CLASS__", json!(class))],
            );
            let _: bool = self.evaluate(&script, "highlight release").await?;
            Ok(())
        }
        .boxed()
    }
}
