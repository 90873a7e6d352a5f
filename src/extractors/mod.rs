//! Report extractors.
//!
//! Each extractor is a pure function over a snapshot and produces one slice
//! of the `PageReport`. They do not depend on each other and may run in any
//! order. None of them fails: malformed input is skipped locally.

pub mod colors;
pub mod content;
pub mod css_url;
pub mod images;
pub mod links;
pub mod network;
pub mod paint;
pub mod services;

pub use colors::{extract_theme_colors, is_neutral, normalize_color};
pub use content::{ContentMetrics, count_words, extract_content_metrics};
pub use css_url::extract_css_urls;
pub use images::{ImageCandidate, ImageInventory, collect_image_urls, extract_image_inventory};
pub use links::{LinkAudit, audit_links};
pub use network::{NetworkMetrics, estimate_load_times, extract_network_metrics};
pub use paint::{PaintMetrics, extract_paint_metrics};
pub use services::{ServiceProbe, ServiceRegistry, detect_services};
