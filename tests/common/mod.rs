//! Fixtures shared by the page inspector test suite

use kodegen_tools_pageinspect::snapshot::{
    LayoutShift, NavigationTiming, PaintTiming, PerformanceTimeline, ResourceTiming,
};

/// URL every fixture page is loaded from
#[allow(dead_code)]
pub const PAGE_URL: &str = "https://example.com/news/article.html";

/// Wraps `head` and `body` markup in a document
#[allow(dead_code)]
pub fn create_test_html(head: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Fixture</title>
    {head}
</head>
{body}
</html>"#
    )
}

/// Resource timing entries from `(url, bytes)` pairs
#[allow(dead_code)]
pub fn resources(entries: &[(&str, u64)]) -> Vec<ResourceTiming> {
    entries
        .iter()
        .map(|(name, transfer_size)| ResourceTiming {
            name: (*name).to_string(),
            transfer_size: *transfer_size,
        })
        .collect()
}

/// A timeline with only a navigation entry
#[allow(dead_code)]
pub fn navigation_timeline(transfer_size: u64, duration_ms: f64) -> PerformanceTimeline {
    PerformanceTimeline {
        navigation: Some(NavigationTiming {
            transfer_size,
            duration: duration_ms,
        }),
        ..Default::default()
    }
}

#[allow(dead_code)]
pub fn paint(name: &str, start_time: f64) -> PaintTiming {
    PaintTiming {
        name: name.to_string(),
        start_time,
    }
}

#[allow(dead_code)]
pub fn shift(value: f64, had_recent_input: bool) -> LayoutShift {
    LayoutShift {
        value,
        had_recent_input,
    }
}
