//! Page weight, measured load time and per-profile download estimates.

use std::collections::BTreeMap;

use crate::report::{Fixed, SpeedProfile};
use crate::snapshot::PerformanceTimeline;
use crate::utils::BYTES_PER_MB;

#[derive(Debug, Clone, PartialEq)]
pub struct NetworkMetrics {
    pub total_bytes: u64,
    pub page_size_mb: Fixed<2>,
    pub actual_load_time_sec: Fixed<2>,
    pub estimated_times: BTreeMap<SpeedProfile, Fixed<2>>,
}

/// Seconds needed to move `total_bytes` at each profile's throughput
#[must_use]
pub fn estimate_load_times(total_bytes: u64) -> BTreeMap<SpeedProfile, Fixed<2>> {
    SpeedProfile::ALL
        .into_iter()
        .map(|profile| {
            let seconds = total_bytes as f64 / profile.bytes_per_second();
            (profile, Fixed::new(seconds))
        })
        .collect()
}

#[must_use]
pub fn extract_network_metrics(timeline: &PerformanceTimeline) -> NetworkMetrics {
    let resource_bytes: u64 = timeline
        .resources
        .iter()
        .map(|entry| entry.transfer_size)
        .fold(0, u64::saturating_add);
    let navigation_bytes = timeline
        .navigation
        .as_ref()
        .map_or(0, |navigation| navigation.transfer_size);
    let total_bytes = resource_bytes.saturating_add(navigation_bytes);

    // Without a navigation entry the load time is reported as zero
    let load_seconds = timeline
        .navigation
        .as_ref()
        .map_or(0.0, |navigation| navigation.duration / 1000.0);

    NetworkMetrics {
        total_bytes,
        page_size_mb: Fixed::new(total_bytes as f64 / BYTES_PER_MB),
        actual_load_time_sec: Fixed::new(load_seconds),
        estimated_times: estimate_load_times(total_bytes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{NavigationTiming, ResourceTiming};

    #[test]
    fn test_navigation_only() {
        let timeline = PerformanceTimeline {
            navigation: Some(NavigationTiming {
                transfer_size: 2_097_152,
                duration: 4000.0,
            }),
            ..Default::default()
        };

        let metrics = extract_network_metrics(&timeline);
        assert_eq!(metrics.page_size_mb, "2.00");
        assert_eq!(metrics.actual_load_time_sec, "4.00");
        // 2 MiB at 51 200 B/s
        assert_eq!(metrics.estimated_times[&SpeedProfile::Slow3g], "40.96");
        assert_eq!(metrics.estimated_times[&SpeedProfile::Fiber], "0.16");
    }

    #[test]
    fn test_resources_add_to_navigation() {
        let timeline = PerformanceTimeline {
            resources: vec![
                ResourceTiming {
                    name: "https://x.test/a.js".into(),
                    transfer_size: 524_288,
                },
                ResourceTiming {
                    name: "https://x.test/b.css".into(),
                    transfer_size: 524_288,
                },
            ],
            navigation: Some(NavigationTiming {
                transfer_size: 1_048_576,
                duration: 1234.0,
            }),
            ..Default::default()
        };

        let metrics = extract_network_metrics(&timeline);
        assert_eq!(metrics.total_bytes, 2_097_152);
        assert_eq!(metrics.page_size_mb, "2.00");
        assert_eq!(metrics.actual_load_time_sec, "1.23");
    }

    #[test]
    fn test_oversized_transfer_sizes_saturate() {
        let timeline = PerformanceTimeline {
            resources: vec![
                ResourceTiming {
                    name: "https://x.test/a.bin".into(),
                    transfer_size: u64::MAX,
                },
                ResourceTiming {
                    name: "https://x.test/b.bin".into(),
                    transfer_size: u64::MAX,
                },
            ],
            navigation: Some(NavigationTiming {
                transfer_size: 1,
                duration: 0.0,
            }),
            ..Default::default()
        };

        let metrics = extract_network_metrics(&timeline);
        assert_eq!(metrics.total_bytes, u64::MAX);
    }

    #[test]
    fn test_empty_timeline_reports_zeroes_for_every_profile() {
        let metrics = extract_network_metrics(&PerformanceTimeline::default());
        assert_eq!(metrics.page_size_mb, "0.00");
        assert_eq!(metrics.actual_load_time_sec, "0.00");
        assert_eq!(metrics.estimated_times.len(), 4);
        assert!(metrics.estimated_times.values().all(|t| *t == "0.00"));
    }

    #[test]
    fn test_profile_rates() {
        assert_eq!(SpeedProfile::Slow3g.bytes_per_second(), 51_200.0);
        assert_eq!(SpeedProfile::Fast3g.bytes_per_second(), 204_800.0);
        assert_eq!(SpeedProfile::FourG.bytes_per_second(), 1_280_000.0);
        assert_eq!(SpeedProfile::Fiber.bytes_per_second(), 12_800_000.0);
    }
}
