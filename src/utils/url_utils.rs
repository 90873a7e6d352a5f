//! URL helpers shared by the extractors.
//!
//! All helpers are infallible from the caller's point of view: a malformed
//! URL yields `None` and the caller skips the candidate.

use url::Url;

/// Resolve `candidate` against `base`, returning the serialized absolute URL
///
/// Returns `None` for empty input or when the URL cannot be parsed.
#[must_use]
pub fn resolve_url(base: Option<&Url>, candidate: &str) -> Option<String> {
    let candidate = candidate.trim();
    if candidate.is_empty() {
        return None;
    }

    let parsed = match base {
        Some(base) => base.join(candidate),
        None => Url::parse(candidate),
    };

    parsed.ok().map(String::from)
}

/// Check whether a raw attribute value is a literal absolute http(s) URL
#[must_use]
pub fn is_http_url(raw: &str) -> bool {
    raw.starts_with("http://") || raw.starts_with("https://")
}

/// Last non-empty path segment of an absolute URL
#[must_use]
pub fn last_path_segment(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    parsed
        .path_segments()?
        .filter(|segment| !segment.is_empty())
        .next_back()
        .map(str::to_string)
}

/// First value of query parameter `name`, if the URL parses and has one
#[must_use]
pub fn query_param(url: &str, name: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    parsed
        .query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_relative_against_base() {
        let base = Url::parse("https://example.com/blog/post.html").ok();
        assert_eq!(
            resolve_url(base.as_ref(), "../img/a.png").as_deref(),
            Some("https://example.com/img/a.png")
        );
        assert_eq!(resolve_url(base.as_ref(), "   "), None);
    }

    #[test]
    fn test_resolve_without_base_requires_absolute() {
        assert_eq!(resolve_url(None, "/img/a.png"), None);
        assert_eq!(
            resolve_url(None, "https://cdn.example.com/a.png").as_deref(),
            Some("https://cdn.example.com/a.png")
        );
    }

    #[test]
    fn test_last_path_segment() {
        assert_eq!(
            last_path_segment("https://x.test/a/b/hero.jpg?v=2").as_deref(),
            Some("hero.jpg")
        );
        assert_eq!(last_path_segment("https://x.test/a/b/").as_deref(), Some("b"));
        assert_eq!(last_path_segment("https://x.test/"), None);
        assert_eq!(last_path_segment("not a url"), None);
    }

    #[test]
    fn test_query_param() {
        let src = "https://www.googletagmanager.com/gtm.js?id=GTM-ABC123&l=dataLayer";
        assert_eq!(query_param(src, "id").as_deref(), Some("GTM-ABC123"));
        assert_eq!(query_param(src, "missing"), None);
        assert_eq!(query_param("https://x.test/?id=", "id"), None);
        assert_eq!(query_param("::bad::", "id"), None);
    }
}
