pub mod assembler;
pub mod browser_setup;
pub mod cache;
pub mod cli;
pub mod config;
pub mod errors;
pub mod extractors;
pub mod highlight;
pub mod messages;
pub mod output;
pub mod page_source;
pub mod report;
pub mod snapshot;
pub mod utils;

pub use assembler::{ImmediateSlices, assemble_report, inspect_page, inspect_page_with};
pub use browser_setup::{
    LaunchedBrowser, download_managed_browser, find_browser_executable, launch_browser,
};
pub use cache::{ReportCache, TabId, TabStatus};
pub use config::{InspectConfig, InspectConfigBuilder};
pub use errors::{InspectError, InspectResult};
pub use extractors::{ServiceProbe, ServiceRegistry, detect_services};
pub use highlight::{HighlightOutcome, HighlightTarget, PendingRelease, highlight_image};
pub use messages::{
    InboundMessage, ReportRequest, StatsMessage, dispatch_inbound, spawn_inspection,
};
pub use page_source::{BrowserPage, PageSource, StaticPage};
pub use report::{DetectedService, DetectedServices, Fixed, PageReport, SpeedProfile, TopImage};
