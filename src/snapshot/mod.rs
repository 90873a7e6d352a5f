//! Snapshots of the page the extractors run against.
//!
//! A snapshot is plain data captured in one read of the page. Extractors are
//! pure functions of snapshots, which keeps them independent of where the
//! page lives (a live browser tab or static HTML).

pub mod document;
pub mod html;
pub mod signals;
pub mod timeline;

pub use document::{BodySnapshot, DocumentSnapshot, ElementColors};
pub use html::StaticHtml;
pub use signals::ServiceSignals;
pub use timeline::{LayoutShift, NavigationTiming, PaintTiming, PerformanceTimeline, ResourceTiming};
