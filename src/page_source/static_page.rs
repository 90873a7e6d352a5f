//! In-memory page built from static HTML
//!
//! Snapshots are taken once at construction; the parsed tree is not kept.
//! Service signals stay mutable so a page that loads its trackers late can
//! be simulated. Highlight state lives in a mutex-guarded image table that
//! mirrors what the browser keeps on the DOM elements.

use futures::FutureExt;
use futures::future::BoxFuture;
use parking_lot::Mutex;
use std::collections::BTreeSet;

use super::PageSource;
use crate::errors::InspectResult;
use crate::highlight::HighlightTarget;
use crate::snapshot::{DocumentSnapshot, PerformanceTimeline, ServiceSignals, StaticHtml};

#[derive(Debug, Clone)]
struct ImageState {
    src: String,
    attached: bool,
    holds: u32,
    classes: BTreeSet<String>,
}

#[derive(Debug, Default)]
struct DomState {
    images: Vec<ImageState>,
    style_ids: Vec<String>,
    scrolled: Vec<String>,
}

pub struct StaticPage {
    document: DocumentSnapshot,
    timeline: PerformanceTimeline,
    signals: Mutex<ServiceSignals>,
    dom: Mutex<DomState>,
}

impl StaticPage {
    /// Parse `html` as if it had been loaded from `page_url`
    ///
    /// # Errors
    ///
    /// Returns `InspectError::InvalidUrl` when `page_url` is not absolute.
    pub fn from_html(html: &str, page_url: &str) -> InspectResult<Self> {
        let parsed = StaticHtml::parse(html, page_url)?;
        Ok(Self::from_snapshots(
            parsed.document_snapshot(),
            PerformanceTimeline::default(),
            parsed.service_signals(),
        ))
    }

    #[must_use]
    pub fn from_snapshots(
        document: DocumentSnapshot,
        timeline: PerformanceTimeline,
        signals: ServiceSignals,
    ) -> Self {
        let images = document
            .image_sources
            .iter()
            .map(|src| ImageState {
                src: src.clone(),
                attached: true,
                holds: 0,
                classes: BTreeSet::new(),
            })
            .collect();

        Self {
            document,
            timeline,
            signals: Mutex::new(signals),
            dom: Mutex::new(DomState {
                images,
                ..DomState::default()
            }),
        }
    }

    /// Use `timeline` as the page's performance timeline
    #[must_use]
    pub fn with_timeline(mut self, timeline: PerformanceTimeline) -> Self {
        self.timeline = timeline;
        self
    }

    /// Define a page global, as a tracker snippet would
    pub fn define_global(&self, name: &str) {
        let mut signals = self.signals.lock();
        if !signals.has_global(name) {
            signals.globals.push(name.to_string());
        }
    }

    /// Add a `<script src>` after load
    pub fn add_script_source(&self, src: &str) {
        self.signals.lock().script_sources.push(src.to_string());
    }

    /// Detach the first attached image with this `src`
    ///
    /// Returns whether an image was removed.
    pub fn remove_image(&self, src: &str) -> bool {
        let mut dom = self.dom.lock();
        match dom
            .images
            .iter_mut()
            .find(|image| image.attached && image.src == src)
        {
            Some(image) => {
                image.attached = false;
                true
            }
            None => false,
        }
    }

    /// Whether any image with this `src` currently carries `class`
    #[must_use]
    pub fn has_class(&self, src: &str, class: &str) -> bool {
        self.dom
            .lock()
            .images
            .iter()
            .any(|image| image.src == src && image.classes.contains(class))
    }

    /// Outstanding highlight holds on the first image with this `src`
    #[must_use]
    pub fn hold_count(&self, src: &str) -> u32 {
        self.dom
            .lock()
            .images
            .iter()
            .find(|image| image.src == src)
            .map_or(0, |image| image.holds)
    }

    /// Number of injected style elements with this id
    #[must_use]
    pub fn style_count(&self, id: &str) -> usize {
        self.dom
            .lock()
            .style_ids
            .iter()
            .filter(|style_id| *style_id == id)
            .count()
    }

    /// Sources of images scrolled into view, oldest first
    #[must_use]
    pub fn scrolled(&self) -> Vec<String> {
        self.dom.lock().scrolled.clone()
    }
}

impl PageSource for StaticPage {
    fn document(&self) -> BoxFuture<'_, InspectResult<DocumentSnapshot>> {
        futures::future::ready(Ok(self.document.clone())).boxed()
    }

    fn timeline(&self) -> BoxFuture<'_, InspectResult<PerformanceTimeline>> {
        futures::future::ready(Ok(self.timeline.clone())).boxed()
    }

    fn service_signals<'a>(
        &'a self,
        globals: &'a [&'static str],
    ) -> BoxFuture<'a, InspectResult<ServiceSignals>> {
        let mut signals = self.signals.lock().clone();
        signals
            .globals
            .retain(|name| globals.iter().any(|global| *global == name.as_str()));
        futures::future::ready(Ok(signals)).boxed()
    }
}

impl HighlightTarget for StaticPage {
    /// Index into the image table
    type Element = usize;

    fn locate_image<'a>(
        &'a self,
        source: &'a str,
    ) -> BoxFuture<'a, InspectResult<Option<usize>>> {
        let index = self
            .dom
            .lock()
            .images
            .iter()
            .position(|image| image.attached && image.src == source);
        futures::future::ready(Ok(index)).boxed()
    }

    fn scroll_into_view<'a>(&'a self, element: &'a usize) -> BoxFuture<'a, InspectResult<()>> {
        let mut dom = self.dom.lock();
        if let Some(src) = dom
            .images
            .get(*element)
            .filter(|image| image.attached)
            .map(|image| image.src.clone())
        {
            dom.scrolled.push(src);
        }
        futures::future::ready(Ok(())).boxed()
    }

    fn has_style<'a>(&'a self, id: &'a str) -> BoxFuture<'a, InspectResult<bool>> {
        let present = self.dom.lock().style_ids.iter().any(|style_id| style_id == id);
        futures::future::ready(Ok(present)).boxed()
    }

    fn inject_style<'a>(&'a self, id: &'a str, _css: &'a str) -> BoxFuture<'a, InspectResult<()>> {
        let mut dom = self.dom.lock();
        if !dom.style_ids.iter().any(|style_id| style_id == id) {
            dom.style_ids.push(id.to_string());
        }
        futures::future::ready(Ok(())).boxed()
    }

    fn mark<'a>(&'a self, element: &'a usize, class: &'a str) -> BoxFuture<'a, InspectResult<bool>> {
        let mut dom = self.dom.lock();
        let marked = match dom
            .images
            .get_mut(*element)
            .filter(|image| image.attached)
        {
            Some(image) => {
                image.holds += 1;
                image.classes.insert(class.to_string());
                true
            }
            None => false,
        };
        futures::future::ready(Ok(marked)).boxed()
    }

    fn unmark<'a>(&'a self, element: &'a usize, class: &'a str) -> BoxFuture<'a, InspectResult<()>> {
        if let Some(image) = self
            .dom
            .lock()
            .images
            .get_mut(*element)
            .filter(|image| image.attached)
        {
            image.holds = image.holds.saturating_sub(1);
            if image.holds == 0 {
                image.classes.remove(class);
            }
        }
        futures::future::ready(Ok(())).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><body>
        <img src="/a.png"><img src="/b.png"><img src="/a.png">
        <script src="https://www.googletagmanager.com/gtm.js?id=GTM-X"></script>
    </body></html>"#;

    #[tokio::test]
    async fn test_signals_filter_globals() {
        let page = StaticPage::from_html(PAGE, "https://example.com/").unwrap();
        page.define_global("dataLayer");
        page.define_global("somethingElse");

        let signals = page.service_signals(&["dataLayer", "_fbq"]).await.unwrap();
        assert_eq!(signals.globals, vec!["dataLayer"]);
        assert_eq!(signals.script_sources.len(), 1);
    }

    #[tokio::test]
    async fn test_locate_skips_removed_images() {
        let page = StaticPage::from_html(PAGE, "https://example.com/").unwrap();
        assert_eq!(page.locate_image("/a.png").await.unwrap(), Some(0));
        assert!(page.remove_image("/a.png"));
        assert_eq!(page.locate_image("/a.png").await.unwrap(), Some(2));
        assert_eq!(page.locate_image("https://example.com/a.png").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_marks_are_counted() {
        let page = StaticPage::from_html(PAGE, "https://example.com/").unwrap();
        assert!(page.mark(&1, "hl").await.unwrap());
        assert!(page.mark(&1, "hl").await.unwrap());
        page.unmark(&1, "hl").await.unwrap();
        assert!(page.has_class("/b.png", "hl"));
        page.unmark(&1, "hl").await.unwrap();
        assert!(!page.has_class("/b.png", "hl"));
        assert_eq!(page.hold_count("/b.png"), 0);
    }

    #[tokio::test]
    async fn test_mark_reports_detached_image() {
        let page = StaticPage::from_html(PAGE, "https://example.com/").unwrap();
        assert!(page.remove_image("/b.png"));
        assert!(!page.mark(&1, "hl").await.unwrap());
        assert!(!page.has_class("/b.png", "hl"));
    }

    #[tokio::test]
    async fn test_style_injection_is_idempotent() {
        let page = StaticPage::from_html(PAGE, "https://example.com/").unwrap();
        page.inject_style("hl-style", ".hl {}").await.unwrap();
        page.inject_style("hl-style", ".hl {}").await.unwrap();
        assert_eq!(page.style_count("hl-style"), 1);
    }
}
