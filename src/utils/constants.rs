//! Shared configuration constants for pageinspect
//!
//! This module contains default values and fixed tables used throughout the
//! codebase to ensure consistency and avoid magic numbers.

use std::time::Duration;

/// Default settle window before service detection runs: 1 second
///
/// Tag managers and embedded forms inject their globals and iframes after
/// the load event. Trackers injected later than this window are missed.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(1);

/// How long an image highlight stays visible: 3 seconds
pub const DEFAULT_HIGHLIGHT_DURATION: Duration = Duration::from_secs(3);

/// Maximum number of images listed in `topImages`
pub const DEFAULT_TOP_IMAGE_LIMIT: usize = 5;

/// Maximum number of inferred colors appended after the meta theme color
pub const DEFAULT_INFERRED_COLOR_LIMIT: usize = 5;

/// Default timeout for page navigation in seconds
pub const DEFAULT_PAGE_LOAD_TIMEOUT_SECS: u64 = 30;

/// Number of tab reports kept by the session cache
pub const DEFAULT_REPORT_CACHE_CAPACITY: usize = 64;

/// Bytes per megabyte (binary)
pub const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Elements whose resolved colors feed the theme palette
pub const COLOR_SCAN_SELECTOR: &str = "body, h1, h2, a, button, p, div, header, footer";

/// Id of the injected highlight stylesheet
pub const HIGHLIGHT_STYLE_ID: &str = "pageinspect-highlight-style";

/// Class applied to the highlighted image
pub const HIGHLIGHT_CLASS: &str = "pageinspect-image-highlight";

/// Stylesheet injected once per document for image highlighting
pub const HIGHLIGHT_CSS: &str = "
  .pageinspect-image-highlight {
    outline: 4px solid #FFA500 !important;
    box-shadow: 0 0 20px #FFA500 !important;
    transition: outline 0.2s ease-in-out, box-shadow 0.2s ease-in-out;
  }
";
