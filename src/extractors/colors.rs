//! Theme color inference
//!
//! Seeds the palette with the page's declared `theme-color`, then adds the
//! most frequent non-grayscale colors used by structural and interactive
//! elements. Background, text and each border color are tallied as
//! separate occurrences.

use crate::snapshot::{DocumentSnapshot, ElementColors};

/// Colors the browser reports for "no color"
fn is_transparent(color: &str) -> bool {
    color.is_empty() || color == "transparent" || color.starts_with("rgba(0, 0, 0, 0)")
}

/// Normalize a resolved color value
///
/// `rgb()` and `rgba()` become lowercase `#rrggbb`; alpha is dropped, so a
/// translucent color counts as its opaque equivalent. Other notations
/// (`#abc`, named colors, `color()`) are only lowercased.
#[must_use]
pub fn normalize_color(color: &str) -> Option<String> {
    let color = color.trim();
    if is_transparent(color) {
        return None;
    }

    let lower = color.to_ascii_lowercase();
    if !lower.starts_with("rgb") {
        return Some(lower);
    }

    let channels: Vec<u8> = lower
        .split(|c: char| !(c.is_ascii_digit() || c == '.'))
        .filter(|part| !part.is_empty())
        .take(3)
        .filter_map(|part| part.parse::<f64>().ok())
        .map(|value| value.round().clamp(0.0, 255.0) as u8)
        .collect();

    match channels.as_slice() {
        [r, g, b] => Some(format!("#{r:02x}{g:02x}{b:02x}")),
        _ => Some(lower),
    }
}

/// Coarse grayscale filter
///
/// Drops pure white and black, and any hex color whose first three digits
/// repeat one value (`#111…`, `#eee…`). Non-hex notations always pass.
#[must_use]
pub fn is_neutral(color: &str) -> bool {
    if color == "#ffffff" || color == "#000000" {
        return true;
    }

    let Some(digits) = color.strip_prefix('#') else {
        return false;
    };
    let head: Vec<char> = digits.chars().take(3).collect();
    matches!(head.as_slice(), [a, b, c] if a.is_ascii_hexdigit() && a == b && b == c)
}

/// Split a resolved border color into one value per listed edge
///
/// `rgb(1, 2, 3) rgb(4, 5, 6)` names two colors; commas inside the color
/// functions do not separate edges.
#[must_use]
pub fn split_border_colors(value: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start: Option<usize> = None;

    for (index, ch) in value.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            c if c.is_whitespace() && depth == 0 => {
                if let Some(begin) = start.take() {
                    parts.push(&value[begin..index]);
                }
                continue;
            }
            _ => {}
        }
        if start.is_none() {
            start = Some(index);
        }
    }
    if let Some(begin) = start {
        parts.push(&value[begin..]);
    }
    parts
}

/// Occurrence counts in first-seen order
#[derive(Debug, Default)]
struct ColorTally {
    counts: Vec<(String, u32)>,
}

impl ColorTally {
    fn record(&mut self, raw: &str) {
        let Some(color) = normalize_color(raw) else {
            return;
        };
        if is_neutral(&color) {
            return;
        }
        match self.counts.iter_mut().find(|(known, _)| *known == color) {
            Some((_, count)) => *count += 1,
            None => self.counts.push((color, 1)),
        }
    }

    fn record_element(&mut self, element: &ElementColors) {
        self.record(&element.background_color);
        self.record(&element.color);
        // TODO: skip border colors when the resolved border width is zero; the
        // snapshot does not carry widths yet, so unrendered borders still count.
        for edge in split_border_colors(&element.border_color) {
            self.record(edge);
        }
    }

    /// Colors by descending count; ties keep first-seen order
    fn ranked(mut self) -> Vec<String> {
        self.counts.sort_by(|a, b| b.1.cmp(&a.1));
        self.counts.into_iter().map(|(color, _)| color).collect()
    }
}

/// Build the theme palette
///
/// The declared `theme-color` is kept verbatim and always first. Up to
/// `inferred_limit` ranked colors follow, skipping any already present.
#[must_use]
pub fn extract_theme_colors(document: &DocumentSnapshot, inferred_limit: usize) -> Vec<String> {
    let mut palette: Vec<String> = Vec::new();

    if let Some(declared) = document
        .theme_color
        .as_deref()
        .map(str::trim)
        .filter(|declared| !declared.is_empty())
    {
        palette.push(declared.to_string());
    }

    let mut tally = ColorTally::default();
    for element in &document.element_colors {
        tally.record_element(element);
    }

    for color in tally.ranked().into_iter().take(inferred_limit) {
        if !palette.contains(&color) {
            palette.push(color);
        }
    }

    palette
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(background: &str, color: &str, border: &str) -> ElementColors {
        ElementColors {
            tag: "div".into(),
            background_color: background.into(),
            color: color.into(),
            border_color: border.into(),
        }
    }

    #[test]
    fn test_normalize_color() {
        assert_eq!(normalize_color("rgb(17, 34, 51)").as_deref(), Some("#112233"));
        assert_eq!(
            normalize_color("rgba(255, 0, 128, 0.5)").as_deref(),
            Some("#ff0080")
        );
        assert_eq!(normalize_color("rgb(10 20 30 / 40%)").as_deref(), Some("#0a141e"));
        assert_eq!(normalize_color("RED").as_deref(), Some("red"));
        assert_eq!(normalize_color("transparent"), None);
        assert_eq!(normalize_color("rgba(0, 0, 0, 0)"), None);
        assert_eq!(normalize_color(""), None);
    }

    #[test]
    fn test_is_neutral() {
        assert!(is_neutral("#ffffff"));
        assert!(is_neutral("#000000"));
        assert!(is_neutral("#333333"));
        assert!(is_neutral("#eee123"));
        assert!(!is_neutral("#112233"));
        assert!(!is_neutral("red"));
    }

    #[test]
    fn test_split_border_colors() {
        assert_eq!(
            split_border_colors("rgb(1, 2, 3) rgb(4, 5, 6)"),
            vec!["rgb(1, 2, 3)", "rgb(4, 5, 6)"]
        );
        assert_eq!(split_border_colors("rgb(1, 2, 3)"), vec!["rgb(1, 2, 3)"]);
        assert!(split_border_colors("").is_empty());
    }

    #[test]
    fn test_meta_color_first_then_ranked() {
        let document = DocumentSnapshot {
            theme_color: Some("#112233".into()),
            element_colors: vec![
                element("rgb(200, 16, 46)", "rgb(51, 51, 51)", "rgb(0, 0, 0)"),
                element("rgb(0, 94, 184)", "rgb(200, 16, 46)", "rgb(200, 16, 46)"),
                element("rgb(255, 255, 255)", "rgb(0, 94, 184)", "rgb(0, 94, 184)"),
                element("transparent", "rgb(12, 120, 60)", ""),
            ],
            ..Default::default()
        };

        let palette = extract_theme_colors(&document, 5);
        assert_eq!(palette, vec!["#112233", "#c8102e", "#005eb8", "#0c783c"]);
    }

    #[test]
    fn test_background_and_border_count_separately() {
        let document = DocumentSnapshot {
            element_colors: vec![
                element("rgb(1, 2, 3)", "rgb(9, 8, 7)", "rgb(1, 2, 3)"),
                element("", "rgb(9, 8, 7)", ""),
                element("", "rgb(4, 5, 6)", ""),
            ],
            ..Default::default()
        };

        // #010203 twice on one element, #090807 once on each of two
        let palette = extract_theme_colors(&document, 5);
        assert_eq!(palette, vec!["#010203", "#090807", "#040506"]);
    }

    #[test]
    fn test_palette_caps_inferred_colors() {
        let element_colors = (1..=9u8)
            .map(|i| element(&format!("rgb({i}, {}, 200)", i * 20), "", ""))
            .collect();
        let document = DocumentSnapshot {
            theme_color: Some("#abcdef".into()),
            element_colors,
            ..Default::default()
        };

        let palette = extract_theme_colors(&document, 5);
        assert_eq!(palette.len(), 6);
        assert_eq!(palette[0], "#abcdef");
    }
}
