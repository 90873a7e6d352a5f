//! Link audit: total anchors and absolute "edit-" links.

use crate::snapshot::DocumentSnapshot;
use crate::utils::is_http_url;

const EDIT_MARKER: &str = "edit-";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkAudit {
    pub link_count: u64,
    pub edit_links: Vec<String>,
}

/// Audit every anchor on the page
///
/// Every `<a>` counts towards `link_count`, with or without an `href`. Only
/// literal `http(s)://` hrefs containing `edit-` are listed; relative,
/// `javascript:` and `mailto:` links never are. The raw attribute value is
/// reported, not a resolved URL.
#[must_use]
pub fn audit_links(document: &DocumentSnapshot) -> LinkAudit {
    let edit_links = document
        .link_hrefs
        .iter()
        .flatten()
        .filter(|href| is_http_url(href) && href.contains(EDIT_MARKER))
        .cloned()
        .collect();

    LinkAudit {
        link_count: document.link_hrefs.len() as u64,
        edit_links,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document_with(hrefs: &[Option<&str>]) -> DocumentSnapshot {
        DocumentSnapshot {
            link_hrefs: hrefs.iter().map(|href| href.map(str::to_string)).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_only_absolute_edit_links_are_listed() {
        let document = document_with(&[
            Some("https://example.com/node/7/edit-layout"),
            Some("http://example.com/edit-profile"),
            Some("/node/8/edit-layout"),
            Some("javascript:edit-thing()"),
            Some("mailto:edit-team@example.com"),
            Some("https://example.com/about"),
            None,
        ]);

        let audit = audit_links(&document);
        assert_eq!(audit.link_count, 7);
        assert_eq!(
            audit.edit_links,
            vec![
                "https://example.com/node/7/edit-layout",
                "http://example.com/edit-profile"
            ]
        );
    }

    #[test]
    fn test_no_links() {
        let audit = audit_links(&DocumentSnapshot::default());
        assert_eq!(audit, LinkAudit::default());
    }
}
