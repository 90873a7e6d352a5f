//! Highlight locator
//!
//! Finds the first `<img>` whose `src` attribute equals a requested URL,
//! scrolls it into view and marks it for a fixed interval. The locator keeps
//! no state: overlapping requests are reconciled by a hold count stored on
//! the element itself, so the mark stays until the last release.

use futures::future::BoxFuture;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::errors::{InspectError, InspectResult};
use crate::utils::{HIGHLIGHT_CLASS, HIGHLIGHT_CSS, HIGHLIGHT_STYLE_ID};

/// DOM primitives the locator needs from a page
///
/// `Element` is a handle that stays valid across awaits. Operations on an
/// element that has since been removed from the page are no-ops.
pub trait HighlightTarget: Send + Sync {
    type Element: Clone + Send + Sync + 'static;

    /// First `<img>` whose `src` attribute equals `source` exactly
    fn locate_image<'a>(
        &'a self,
        source: &'a str,
    ) -> BoxFuture<'a, InspectResult<Option<Self::Element>>>;

    /// Smoothly scroll the element to the center of the viewport
    fn scroll_into_view<'a>(&'a self, element: &'a Self::Element)
    -> BoxFuture<'a, InspectResult<()>>;

    /// Whether a style element with `id` is present
    fn has_style<'a>(&'a self, id: &'a str) -> BoxFuture<'a, InspectResult<bool>>;

    /// Append a style element with `id` and `css` unless one is present
    ///
    /// The presence check and the insert happen in one step on the page, so
    /// concurrent callers that both saw `has_style` return false still leave
    /// a single element.
    fn inject_style<'a>(&'a self, id: &'a str, css: &'a str) -> BoxFuture<'a, InspectResult<()>>;

    /// Add one hold on the element and apply `class`
    ///
    /// Returns false when the element is no longer on the page.
    fn mark<'a>(
        &'a self,
        element: &'a Self::Element,
        class: &'a str,
    ) -> BoxFuture<'a, InspectResult<bool>>;

    /// Drop one hold; remove `class` when no holds remain
    fn unmark<'a>(
        &'a self,
        element: &'a Self::Element,
        class: &'a str,
    ) -> BoxFuture<'a, InspectResult<()>>;
}

/// Result of a highlight request
#[derive(Debug)]
pub enum HighlightOutcome {
    /// The image was marked; the release fires after the configured duration
    Highlighted(PendingRelease),
    /// No matching image; nothing was changed
    NotFound,
}

impl HighlightOutcome {
    #[must_use]
    pub fn is_highlighted(&self) -> bool {
        matches!(self, Self::Highlighted(_))
    }
}

/// The scheduled release of one highlight
///
/// Dropping it does not cancel the release. Awaiting it resolves once the
/// mark has been dropped.
#[derive(Debug)]
pub struct PendingRelease {
    handle: JoinHandle<()>,
}

impl Future for PendingRelease {
    type Output = InspectResult<()>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.handle).poll(cx) {
            Poll::Ready(Ok(())) => Poll::Ready(Ok(())),
            Poll::Ready(Err(_)) => Poll::Ready(Err(InspectError::Cancelled)),
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Highlight the first image whose `src` equals `source`
///
/// Scrolls the image to the viewport center, injects the highlight style
/// once per page (checked by element id), marks the image and schedules the
/// release after `duration`. A missing image is not an error, including one
/// removed from the page before the mark lands.
///
/// # Errors
///
/// Returns the target's error when a DOM primitive fails before the image is
/// marked. Failures during the scheduled release are logged.
pub async fn highlight_image<T>(
    target: Arc<T>,
    source: &str,
    duration: Duration,
) -> InspectResult<HighlightOutcome>
where
    T: HighlightTarget + 'static,
{
    if source.is_empty() {
        return Ok(HighlightOutcome::NotFound);
    }

    let Some(element) = target.locate_image(source).await? else {
        log::debug!("No image with src {source}; nothing to highlight");
        return Ok(HighlightOutcome::NotFound);
    };

    target.scroll_into_view(&element).await?;
    if !target.has_style(HIGHLIGHT_STYLE_ID).await? {
        target
            .inject_style(HIGHLIGHT_STYLE_ID, HIGHLIGHT_CSS)
            .await?;
    }
    if !target.mark(&element, HIGHLIGHT_CLASS).await? {
        log::debug!("Image with src {source} was removed before it could be marked");
        return Ok(HighlightOutcome::NotFound);
    }

    let source = source.to_string();
    let handle = tokio::spawn(async move {
        tokio::time::sleep(duration).await;
        if let Err(e) = target.unmark(&element, HIGHLIGHT_CLASS).await {
            log::warn!("Failed to release highlight on {source}: {e}");
        }
    });

    Ok(HighlightOutcome::Highlighted(PendingRelease { handle }))
}
