//! Content metrics: word count and the body element's identity.

use regex::Regex;
use std::sync::LazyLock;

use crate::snapshot::DocumentSnapshot;

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("BUG: hardcoded whitespace regex is invalid"));

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentMetrics {
    pub word_count: u64,
    pub body_classes: Vec<String>,
    pub body_id: Option<String>,
}

/// Count the pieces of `text` between whitespace runs
///
/// Leading or trailing whitespace produces one empty piece, and empty text
/// counts as one word. Rendered text rarely has either, so the count is
/// kept simple rather than exact.
#[must_use]
pub fn count_words(text: &str) -> u64 {
    WHITESPACE_RUN.split(text).count() as u64
}

#[must_use]
pub fn extract_content_metrics(document: &DocumentSnapshot) -> ContentMetrics {
    ContentMetrics {
        word_count: count_words(&document.body.text),
        body_classes: document
            .body
            .classes
            .iter()
            .filter(|class| !class.is_empty())
            .cloned()
            .collect(),
        body_id: document.body.id.clone().filter(|id| !id.is_empty()),
    }
}
