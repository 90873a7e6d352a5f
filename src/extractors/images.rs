//! Image inventory: every image URL on the page and the heaviest downloads.

use url::Url;

use super::css_url::extract_css_urls;
use crate::report::{Fixed, TopImage};
use crate::snapshot::{DocumentSnapshot, PerformanceTimeline};
use crate::utils::{BYTES_PER_MB, last_path_segment, resolve_url};

/// Name used when an image URL has no usable path segment
const FALLBACK_IMAGE_NAME: &str = "image";

/// A unique image URL and the bytes transferred for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageCandidate {
    pub url: String,
    pub transfer_size: u64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageInventory {
    pub image_count: u64,
    pub top_images: Vec<TopImage>,
}

/// Unique absolute image URLs in discovery order
///
/// `<img>` sources come first, then background images. Duplicates are
/// dropped by exact absolute URL; references that do not resolve are
/// skipped.
#[must_use]
pub fn collect_image_urls(document: &DocumentSnapshot) -> Vec<String> {
    let base: Option<Url> = document.base();
    let mut urls: Vec<String> = Vec::new();
    let mut push = |raw: &str| {
        if let Some(url) = resolve_url(base.as_ref(), raw)
            && !urls.contains(&url)
        {
            urls.push(url);
        }
    };

    for src in &document.image_sources {
        push(src);
    }

    for value in &document.background_images {
        if value.trim().eq_ignore_ascii_case("none") {
            continue;
        }
        for reference in extract_css_urls(value) {
            push(&reference);
        }
    }

    urls
}

/// Pair each URL with its transfer size from the timeline
///
/// The first resource entry whose name equals the URL decides the size.
/// URLs without an entry, or with a zero transfer size (served from
/// cache), are left out: there is nothing to rank them by.
#[must_use]
pub fn measure_images(urls: &[String], timeline: &PerformanceTimeline) -> Vec<ImageCandidate> {
    urls.iter()
        .filter_map(|url| {
            let transfer_size = timeline.transfer_size_of(url)?;
            (transfer_size > 0).then(|| ImageCandidate {
                url: url.clone(),
                transfer_size,
            })
        })
        .collect()
}

/// Display name for an image URL
#[must_use]
pub fn image_name(url: &str) -> String {
    last_path_segment(url).unwrap_or_else(|| FALLBACK_IMAGE_NAME.to_string())
}

#[must_use]
pub fn extract_image_inventory(
    document: &DocumentSnapshot,
    timeline: &PerformanceTimeline,
    limit: usize,
) -> ImageInventory {
    let urls = collect_image_urls(document);
    let mut candidates = measure_images(&urls, timeline);

    // Stable sort: equal sizes keep discovery order
    candidates.sort_by(|a, b| b.transfer_size.cmp(&a.transfer_size));

    let top_images = candidates
        .into_iter()
        .take(limit)
        .map(|candidate| TopImage {
            name: image_name(&candidate.url),
            size_mb: Fixed::new(candidate.transfer_size as f64 / BYTES_PER_MB),
            source_url: candidate.url,
        })
        .collect();

    log::debug!("Image inventory: {} unique image URLs", urls.len());

    ImageInventory {
        image_count: urls.len() as u64,
        top_images,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::ResourceTiming;

    fn resource(name: &str, transfer_size: u64) -> ResourceTiming {
        ResourceTiming {
            name: name.into(),
            transfer_size,
        }
    }

    #[test]
    fn test_urls_are_resolved_and_deduplicated() {
        let document = DocumentSnapshot {
            base_url: "https://example.com/blog/".into(),
            image_sources: vec![
                "hero.jpg".into(),
                "https://example.com/blog/hero.jpg".into(),
                "/logo.svg".into(),
            ],
            background_images: vec![
                r#"url("hero.jpg"), url("pattern.png")"#.into(),
                "none".into(),
            ],
            ..Default::default()
        };

        assert_eq!(
            collect_image_urls(&document),
            vec![
                "https://example.com/blog/hero.jpg",
                "https://example.com/logo.svg",
                "https://example.com/blog/pattern.png",
            ]
        );
    }

    #[test]
    fn test_ranking_excludes_unsized_and_keeps_first_entry() {
        let document = DocumentSnapshot {
            base_url: "https://example.com/".into(),
            image_sources: vec![
                "/small.png".into(),
                "/big.jpg".into(),
                "/cached.gif".into(),
                "/untracked.webp".into(),
            ],
            ..Default::default()
        };
        let timeline = PerformanceTimeline {
            resources: vec![
                resource("https://example.com/small.png", 10_240),
                resource("https://example.com/big.jpg", 512_000),
                resource("https://example.com/big.jpg", 1),
                resource("https://example.com/cached.gif", 0),
            ],
            ..Default::default()
        };

        let inventory = extract_image_inventory(&document, &timeline, 5);
        assert_eq!(inventory.image_count, 4);
        assert_eq!(inventory.top_images.len(), 2);
        assert_eq!(inventory.top_images[0].name, "big.jpg");
        assert_eq!(inventory.top_images[0].size_mb, "0.488");
        assert_eq!(inventory.top_images[1].name, "small.png");
        assert_eq!(inventory.top_images[1].size_mb, "0.010");
    }

    #[test]
    fn test_limit_applies_after_sorting() {
        let document = DocumentSnapshot {
            base_url: "https://example.com/".into(),
            image_sources: (1..=7).map(|i| format!("/{i}.png")).collect(),
            ..Default::default()
        };
        let timeline = PerformanceTimeline {
            resources: (1..=7)
                .map(|i| resource(&format!("https://example.com/{i}.png"), i * 1000))
                .collect(),
            ..Default::default()
        };

        let inventory = extract_image_inventory(&document, &timeline, 5);
        let names: Vec<_> = inventory.top_images.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["7.png", "6.png", "5.png", "4.png", "3.png"]);
    }

    #[test]
    fn test_image_name_fallback() {
        assert_eq!(image_name("https://example.com/"), "image");
        assert_eq!(image_name("https://example.com/a/b.png?w=2"), "b.png");
    }
}
