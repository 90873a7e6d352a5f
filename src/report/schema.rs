use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::fixed::Fixed;

/// Named bandwidth profiles used for load-time estimates
///
/// Rates are the nominal link speed divided by 8 and multiplied by 1024,
/// giving bytes per second. Declaration order is the order the profiles
/// appear in a serialized report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SpeedProfile {
    #[serde(rename = "Slow 3G (400 Kbps)")]
    Slow3g,
    #[serde(rename = "Fast 3G (1.6 Mbps)")]
    Fast3g,
    #[serde(rename = "4G (10 Mbps)")]
    FourG,
    #[serde(rename = "Fiber (100 Mbps)")]
    Fiber,
}

impl SpeedProfile {
    pub const ALL: [SpeedProfile; 4] = [Self::Slow3g, Self::Fast3g, Self::FourG, Self::Fiber];

    /// Nominal link speed in kilobits per second
    #[must_use]
    pub const fn kbps(self) -> f64 {
        match self {
            Self::Slow3g => 400.0,
            Self::Fast3g => 1_600.0,
            Self::FourG => 10_000.0,
            Self::Fiber => 100_000.0,
        }
    }

    /// Throughput in bytes per second
    #[must_use]
    pub fn bytes_per_second(self) -> f64 {
        self.kbps() / 8.0 * 1024.0
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Slow3g => "Slow 3G (400 Kbps)",
            Self::Fast3g => "Fast 3G (1.6 Mbps)",
            Self::FourG => "4G (10 Mbps)",
            Self::Fiber => "Fiber (100 Mbps)",
        }
    }
}

impl fmt::Display for SpeedProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One of the largest images on the page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopImage {
    pub name: String,
    #[serde(rename = "sizeMB")]
    pub size_mb: Fixed<3>,
    #[serde(rename = "sourceURL")]
    pub source_url: String,
}

/// A third-party service found on the page and the identifiers seen for it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedService {
    /// Unique identifiers in discovery order
    #[serde(default)]
    pub ids: Vec<String>,
}

impl DetectedService {
    /// Add an identifier unless it was already recorded
    pub fn push_id(&mut self, id: impl Into<String>) {
        let id = id.into();
        if !id.is_empty() && !self.ids.contains(&id) {
            self.ids.push(id);
        }
    }
}

/// Services keyed by display name
pub type DetectedServices = BTreeMap<String, DetectedService>;

/// The complete analysis of one page load
///
/// Empty collections and missing optional metrics are left out of the JSON
/// entirely; renderers treat a missing key as "nothing to show". Layout
/// shift and the speed-profile estimates are always present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageReport {
    pub word_count: u64,
    pub link_count: u64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub edit_links: Vec<String>,
    #[serde(rename = "pageSizeMB")]
    pub page_size_mb: Fixed<2>,
    pub actual_load_time_sec: Fixed<2>,
    pub estimated_times_by_speed_profile: BTreeMap<SpeedProfile, Fixed<2>>,
    pub image_count: u64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub top_images: Vec<TopImage>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub theme_colors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_contentful_paint_ms: Option<Fixed<2>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub largest_contentful_paint_ms: Option<Fixed<2>>,
    pub cumulative_layout_shift: Fixed<3>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub detected_services: DetectedServices,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub body_classes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_id: Option<String>,
}
