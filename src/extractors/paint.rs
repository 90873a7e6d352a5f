//! Paint timing and cumulative layout shift.

use crate::report::Fixed;
use crate::snapshot::PerformanceTimeline;

pub const FIRST_CONTENTFUL_PAINT: &str = "first-contentful-paint";
pub const LARGEST_CONTENTFUL_PAINT: &str = "largest-contentful-paint";

#[derive(Debug, Clone, PartialEq)]
pub struct PaintMetrics {
    pub first_contentful_paint_ms: Option<Fixed<2>>,
    pub largest_contentful_paint_ms: Option<Fixed<2>>,
    pub cumulative_layout_shift: Fixed<3>,
}

/// Read paint and layout-shift metrics from the timeline
///
/// Paint metrics are absent when the browser recorded no entry. Layout
/// shift is always reported: no entries means no shift, `0.000`. Shifts
/// within the recent-input window are user-caused and excluded.
#[must_use]
pub fn extract_paint_metrics(timeline: &PerformanceTimeline) -> PaintMetrics {
    let paint_ms = |name: &str| {
        timeline
            .first_paint_named(name)
            .map(|entry| Fixed::new(entry.start_time))
    };

    let shift: f64 = timeline
        .layout_shifts
        .iter()
        .filter(|entry| !entry.had_recent_input)
        .map(|entry| entry.value)
        .sum();

    PaintMetrics {
        first_contentful_paint_ms: paint_ms(FIRST_CONTENTFUL_PAINT),
        largest_contentful_paint_ms: paint_ms(LARGEST_CONTENTFUL_PAINT),
        cumulative_layout_shift: Fixed::new(shift.max(0.0)),
    }
}
