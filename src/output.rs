//! Rendering reports for the terminal

use std::fmt::Write;

use crate::report::PageReport;

/// Output format selected on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed report JSON
    #[default]
    Json,
    /// Section-by-section summary
    Text,
}

/// Render `report` in the requested format
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render(report: &PageReport, format: OutputFormat) -> serde_json::Result<String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(report),
        OutputFormat::Text => Ok(render_text(report)),
    }
}

/// Section-by-section summary; sections with nothing to show are left out
#[must_use]
pub fn render_text(report: &PageReport) -> String {
    let mut out = String::new();

    // Writing to a String cannot fail
    let _ = write_text(&mut out, report);
    out
}

fn write_text(out: &mut String, report: &PageReport) -> std::fmt::Result {
    writeln!(out, "Content")?;
    writeln!(out, "  Words: {}", report.word_count)?;
    writeln!(out, "  Links: {}", report.link_count)?;
    if let Some(id) = &report.body_id {
        writeln!(out, "  Body id: {id}")?;
    }
    if !report.body_classes.is_empty() {
        writeln!(out, "  Body classes: {}", report.body_classes.join(" "))?;
    }

    if !report.edit_links.is_empty() {
        writeln!(out, "\nEdit links")?;
        for link in &report.edit_links {
            writeln!(out, "  {link}")?;
        }
    }

    writeln!(out, "\nPerformance")?;
    writeln!(out, "  Page size: {} MB", report.page_size_mb)?;
    writeln!(out, "  Load time: {} s", report.actual_load_time_sec)?;
    if let Some(fcp) = report.first_contentful_paint_ms {
        writeln!(out, "  First contentful paint: {fcp} ms")?;
    }
    if let Some(lcp) = report.largest_contentful_paint_ms {
        writeln!(out, "  Largest contentful paint: {lcp} ms")?;
    }
    writeln!(
        out,
        "  Cumulative layout shift: {}",
        report.cumulative_layout_shift
    )?;

    writeln!(out, "\nEstimated load time")?;
    for (profile, seconds) in &report.estimated_times_by_speed_profile {
        writeln!(out, "  {profile}: {seconds} s")?;
    }

    writeln!(out, "\nImages: {}", report.image_count)?;
    for image in &report.top_images {
        writeln!(
            out,
            "  {} ({} MB) {}",
            image.name, image.size_mb, image.source_url
        )?;
    }

    if !report.theme_colors.is_empty() {
        writeln!(out, "\nTheme colors")?;
        writeln!(out, "  {}", report.theme_colors.join(" "))?;
    }

    if !report.detected_services.is_empty() {
        writeln!(out, "\nDetected services")?;
        for (name, service) in &report.detected_services {
            if service.ids.is_empty() {
                writeln!(out, "  {name}")?;
            } else {
                writeln!(out, "  {name}: {}", service.ids.join(", "))?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::assemble_report;
    use crate::config::InspectConfig;
    use crate::snapshot::{DocumentSnapshot, PerformanceTimeline, ServiceSignals};

    #[test]
    fn test_empty_sections_are_omitted() {
        let report = assemble_report(
            &DocumentSnapshot::default(),
            &PerformanceTimeline::default(),
            &ServiceSignals::default(),
            &InspectConfig::default(),
        );
        let text = render_text(&report);

        assert!(text.contains("Cumulative layout shift: 0.000"));
        assert!(text.contains("Slow 3G (400 Kbps): 0.00 s"));
        assert!(!text.contains("Edit links"));
        assert!(!text.contains("Theme colors"));
        assert!(!text.contains("Detected services"));
        assert!(!text.contains("First contentful paint"));
    }

    #[test]
    fn test_services_are_sorted() {
        let signals = ServiceSignals {
            globals: vec!["hj".into(), "_fbq".into()],
            script_sources: vec!["https://www.googletagmanager.com/gtm.js?id=GTM-1".into()],
            ..Default::default()
        };
        let report = assemble_report(
            &DocumentSnapshot::default(),
            &PerformanceTimeline::default(),
            &signals,
            &InspectConfig::default(),
        );
        let text = render_text(&report);

        let pixel = text.find("Facebook Pixel").unwrap();
        let gtm = text.find("Google Tag Manager: GTM-1").unwrap();
        let hotjar = text.find("Hotjar").unwrap();
        assert!(pixel < gtm && gtm < hotjar);
    }
}
