//! Performance-timeline snapshot
//!
//! Mirrors the subset of `PerformanceResourceTiming`,
//! `PerformanceNavigationTiming`, paint timing and layout-shift entries the
//! extractors read. Every field defaults, so a page that exposes no timeline
//! at all deserializes to an empty timeline rather than failing.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceTiming {
    /// Absolute URL of the fetched resource
    pub name: String,
    /// Bytes sent over the network (0 for cache hits without revalidation)
    #[serde(default)]
    pub transfer_size: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationTiming {
    #[serde(default)]
    pub transfer_size: u64,
    /// Milliseconds from navigation start to load end
    #[serde(default)]
    pub duration: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaintTiming {
    /// `first-paint`, `first-contentful-paint` or `largest-contentful-paint`
    pub name: String,
    #[serde(default)]
    pub start_time: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutShift {
    #[serde(default)]
    pub value: f64,
    #[serde(default)]
    pub had_recent_input: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceTimeline {
    #[serde(default)]
    pub resources: Vec<ResourceTiming>,
    #[serde(default)]
    pub navigation: Option<NavigationTiming>,
    #[serde(default)]
    pub paints: Vec<PaintTiming>,
    #[serde(default)]
    pub layout_shifts: Vec<LayoutShift>,
}

impl PerformanceTimeline {
    /// Transfer size of the first resource entry named exactly `url`
    ///
    /// Browsers can record the same URL more than once (redirects, repeated
    /// fetches); the earliest entry wins.
    #[must_use]
    pub fn transfer_size_of(&self, url: &str) -> Option<u64> {
        self.resources
            .iter()
            .find(|entry| entry.name == url)
            .map(|entry| entry.transfer_size)
    }

    /// First paint entry with the given name
    #[must_use]
    pub fn first_paint_named(&self, name: &str) -> Option<&PaintTiming> {
        self.paints.iter().find(|entry| entry.name == name)
    }
}
