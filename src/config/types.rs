//! Core configuration type for page inspection

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::utils::{
    DEFAULT_HIGHLIGHT_DURATION, DEFAULT_INFERRED_COLOR_LIMIT, DEFAULT_PAGE_LOAD_TIMEOUT_SECS,
    DEFAULT_REPORT_CACHE_CAPACITY, DEFAULT_SETTLE_DELAY, DEFAULT_TOP_IMAGE_LIMIT,
};

/// Main configuration struct for page inspection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InspectConfig {
    /// Wait between the immediate extraction pass and service detection
    ///
    /// Tag managers and form embeds often inject their markers after load;
    /// reading service signals too early misses them.
    ///
    /// Default: 1 second
    pub(crate) settle_delay: Duration,

    /// How long a highlighted image keeps its mark
    ///
    /// Default: 3 seconds
    pub(crate) highlight_duration: Duration,

    /// Number of heaviest images listed in the report
    ///
    /// Default: 5
    pub(crate) top_image_limit: usize,

    /// Number of inferred palette colors appended after the theme-color meta
    ///
    /// Default: 5
    pub(crate) inferred_color_limit: usize,

    pub(crate) headless: bool,

    /// Timeout in seconds for `page.goto()` in live inspection
    ///
    /// Default: 30 seconds
    pub(crate) page_load_timeout_secs: u64,

    /// Number of per-tab reports kept by `ReportCache`
    ///
    /// Default: 64
    pub(crate) report_cache_capacity: usize,
}

impl Default for InspectConfig {
    fn default() -> Self {
        Self {
            settle_delay: DEFAULT_SETTLE_DELAY,
            highlight_duration: DEFAULT_HIGHLIGHT_DURATION,
            top_image_limit: DEFAULT_TOP_IMAGE_LIMIT,
            inferred_color_limit: DEFAULT_INFERRED_COLOR_LIMIT,
            headless: true,
            page_load_timeout_secs: DEFAULT_PAGE_LOAD_TIMEOUT_SECS,
            report_cache_capacity: DEFAULT_REPORT_CACHE_CAPACITY,
        }
    }
}
