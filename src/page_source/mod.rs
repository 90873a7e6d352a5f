//! Page sources
//!
//! A page source produces the snapshots the extractors run on. Live pages
//! are read through a browser tab; saved pages are parsed from HTML.

pub mod browser;
pub mod js_scripts;
pub mod static_page;

use futures::future::BoxFuture;
use std::sync::Arc;

use crate::errors::InspectResult;
use crate::snapshot::{DocumentSnapshot, PerformanceTimeline, ServiceSignals};

pub use browser::BrowserPage;
pub use static_page::StaticPage;

/// Something the engine can take snapshots of
///
/// Each call reads the page afresh. `service_signals` is called after the
/// settle delay, so it may observe state that `document` did not.
pub trait PageSource: Send + Sync {
    fn document(&self) -> BoxFuture<'_, InspectResult<DocumentSnapshot>>;

    fn timeline(&self) -> BoxFuture<'_, InspectResult<PerformanceTimeline>>;

    /// Service signals, checking only the listed page globals
    fn service_signals<'a>(
        &'a self,
        globals: &'a [&'static str],
    ) -> BoxFuture<'a, InspectResult<ServiceSignals>>;
}

impl<S: PageSource + ?Sized> PageSource for Arc<S> {
    fn document(&self) -> BoxFuture<'_, InspectResult<DocumentSnapshot>> {
        (**self).document()
    }

    fn timeline(&self) -> BoxFuture<'_, InspectResult<PerformanceTimeline>> {
        (**self).timeline()
    }

    fn service_signals<'a>(
        &'a self,
        globals: &'a [&'static str],
    ) -> BoxFuture<'a, InspectResult<ServiceSignals>> {
        (**self).service_signals(globals)
    }
}
