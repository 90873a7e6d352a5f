//! Report assembler
//!
//! Runs the immediate extractors on one snapshot, waits the settle delay,
//! runs service detection on a fresh read of the page and merges every
//! slice into a `PageReport`.

use crate::config::InspectConfig;
use crate::errors::InspectResult;
use crate::extractors::{
    ContentMetrics, ImageInventory, LinkAudit, NetworkMetrics, PaintMetrics, ServiceRegistry,
    audit_links, extract_content_metrics, extract_image_inventory, extract_network_metrics,
    extract_paint_metrics, extract_theme_colors,
};
use crate::page_source::PageSource;
use crate::report::{DetectedServices, PageReport};
use crate::snapshot::{DocumentSnapshot, PerformanceTimeline, ServiceSignals};

/// Every slice that does not wait for the settle delay
#[derive(Debug, Clone, PartialEq)]
pub struct ImmediateSlices {
    pub content: ContentMetrics,
    pub links: LinkAudit,
    pub network: NetworkMetrics,
    pub paint: PaintMetrics,
    pub images: ImageInventory,
    pub theme_colors: Vec<String>,
}

impl ImmediateSlices {
    #[must_use]
    pub fn extract(
        document: &DocumentSnapshot,
        timeline: &PerformanceTimeline,
        config: &InspectConfig,
    ) -> Self {
        Self {
            content: extract_content_metrics(document),
            links: audit_links(document),
            network: extract_network_metrics(timeline),
            paint: extract_paint_metrics(timeline),
            images: extract_image_inventory(document, timeline, config.top_image_limit()),
            theme_colors: extract_theme_colors(document, config.inferred_color_limit()),
        }
    }

    /// Merge with the deferred service slice
    #[must_use]
    pub fn into_report(self, detected_services: DetectedServices) -> PageReport {
        PageReport {
            word_count: self.content.word_count,
            link_count: self.links.link_count,
            edit_links: self.links.edit_links,
            page_size_mb: self.network.page_size_mb,
            actual_load_time_sec: self.network.actual_load_time_sec,
            estimated_times_by_speed_profile: self.network.estimated_times,
            image_count: self.images.image_count,
            top_images: self.images.top_images,
            theme_colors: self.theme_colors,
            first_contentful_paint_ms: self.paint.first_contentful_paint_ms,
            largest_contentful_paint_ms: self.paint.largest_contentful_paint_ms,
            cumulative_layout_shift: self.paint.cumulative_layout_shift,
            detected_services,
            body_classes: self.content.body_classes,
            body_id: self.content.body_id,
        }
    }
}

/// Build a report from snapshots already in hand, without waiting
#[must_use]
pub fn assemble_report(
    document: &DocumentSnapshot,
    timeline: &PerformanceTimeline,
    signals: &ServiceSignals,
    config: &InspectConfig,
) -> PageReport {
    ImmediateSlices::extract(document, timeline, config)
        .into_report(ServiceRegistry::default().detect(signals))
}

/// Inspect a page with the default service probes
///
/// # Errors
///
/// Returns an error only when the document snapshot cannot be read.
pub async fn inspect_page<S>(source: &S, config: &InspectConfig) -> InspectResult<PageReport>
where
    S: PageSource + ?Sized,
{
    inspect_page_with(source, config, &ServiceRegistry::default()).await
}

/// Inspect a page with a caller-supplied probe registry
///
/// A timeline or service-signal read that fails degrades to an empty input;
/// the report is still produced.
///
/// # Errors
///
/// Returns an error only when the document snapshot cannot be read.
pub async fn inspect_page_with<S>(
    source: &S,
    config: &InspectConfig,
    registry: &ServiceRegistry,
) -> InspectResult<PageReport>
where
    S: PageSource + ?Sized,
{
    let document = source.document().await?;
    let timeline = match source.timeline().await {
        Ok(timeline) => timeline,
        Err(e) => {
            log::warn!("Performance timeline unavailable, using empty timeline: {e}");
            PerformanceTimeline::default()
        }
    };

    let immediate = ImmediateSlices::extract(&document, &timeline, config);
    log::debug!(
        "Immediate pass done: {} words, {} links, {} images",
        immediate.content.word_count,
        immediate.links.link_count,
        immediate.images.image_count
    );

    tokio::time::sleep(config.settle_delay()).await;

    let globals = registry.probed_globals();
    let signals = match source.service_signals(&globals).await {
        Ok(signals) => signals,
        Err(e) => {
            log::warn!("Service signals unavailable, reporting no services: {e}");
            ServiceSignals::default()
        }
    };

    Ok(immediate.into_report(registry.detect(&signals)))
}
