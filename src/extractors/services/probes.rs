//! Capability probes for third-party services
//!
//! Each probe answers two questions about one service from the captured
//! signals: is the service present, and which identifiers does it expose.
//! New services are added by adding probes to the registry; the dispatcher
//! never changes.

use regex::Regex;
use serde_json::Value;

use crate::snapshot::ServiceSignals;
use crate::utils::query_param;

pub const GOOGLE_TAG_MANAGER: &str = "Google Tag Manager";
pub const GOOGLE_ANALYTICS: &str = "Google Analytics";
pub const FACEBOOK_PIXEL: &str = "Facebook Pixel";
pub const HOTJAR: &str = "Hotjar";
pub const HUBSPOT: &str = "HubSpot";

/// One detection signal for one named service
pub trait ServiceProbe: Send + Sync {
    /// Display name the detection is reported under
    fn name(&self) -> &str;

    /// Identifiers this signal exposes, unique and in discovery order
    fn ids(&self, signals: &ServiceSignals) -> Vec<String>;

    /// Whether this signal confirms the service
    ///
    /// By default a signal confirms the service when it yields at least
    /// one identifier.
    fn detect(&self, signals: &ServiceSignals) -> bool {
        !self.ids(signals).is_empty()
    }

    /// Page globals this probe inspects, so page sources know what to read
    fn globals(&self) -> &[&'static str] {
        &[]
    }
}

fn push_unique(ids: &mut Vec<String>, id: String) {
    if !id.is_empty() && !ids.contains(&id) {
        ids.push(id);
    }
}

/// Presence of any of a set of page globals; no identifiers
pub struct GlobalProbe {
    pub name: &'static str,
    pub globals: &'static [&'static str],
}

impl ServiceProbe for GlobalProbe {
    fn name(&self) -> &str {
        self.name
    }

    fn ids(&self, _signals: &ServiceSignals) -> Vec<String> {
        Vec::new()
    }

    fn detect(&self, signals: &ServiceSignals) -> bool {
        self.globals.iter().any(|global| signals.has_global(global))
    }

    fn globals(&self) -> &[&'static str] {
        self.globals
    }
}

/// Where a loader probe looks for matching URLs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderSource {
    /// `<script src>`
    Script,
    /// `<iframe>` inside `<noscript>`
    NoscriptFrame,
}

/// Loader URLs containing a marker; the identifier is the `id` parameter
///
/// A matching URL that cannot be parsed or carries no `id` contributes
/// nothing.
pub struct LoaderProbe {
    pub name: &'static str,
    pub source: LoaderSource,
    pub marker: &'static str,
}

impl ServiceProbe for LoaderProbe {
    fn name(&self) -> &str {
        self.name
    }

    fn ids(&self, signals: &ServiceSignals) -> Vec<String> {
        let sources = match self.source {
            LoaderSource::Script => &signals.script_sources,
            LoaderSource::NoscriptFrame => &signals.noscript_frame_sources,
        };

        let mut ids = Vec::new();
        for src in sources.iter().filter(|src| src.contains(self.marker)) {
            if let Some(id) = query_param(src, "id") {
                push_unique(&mut ids, id);
            }
        }
        ids
    }
}

/// Embedded iframe whose source matches a provider pattern; no identifiers
pub struct FrameProbe {
    pub name: &'static str,
    pub pattern: Regex,
}

impl ServiceProbe for FrameProbe {
    fn name(&self) -> &str {
        self.name
    }

    fn ids(&self, _signals: &ServiceSignals) -> Vec<String> {
        Vec::new()
    }

    fn detect(&self, signals: &ServiceSignals) -> bool {
        signals
            .frame_sources
            .iter()
            .any(|src| !src.is_empty() && self.pattern.is_match(src))
    }
}

/// Identifiers from the page's serialized settings payload
///
/// `pointer` is a JSON pointer into the payload. It may name a string or an
/// array of strings. A missing or malformed payload yields nothing.
pub struct SettingsProbe {
    pub name: &'static str,
    pub pointer: &'static str,
}

impl ServiceProbe for SettingsProbe {
    fn name(&self) -> &str {
        self.name
    }

    fn ids(&self, signals: &ServiceSignals) -> Vec<String> {
        let Some(payload) = signals.settings_payload.as_deref() else {
            return Vec::new();
        };
        let settings: Value = match serde_json::from_str(payload) {
            Ok(settings) => settings,
            Err(e) => {
                log::debug!("Ignoring unparseable settings payload: {e}");
                return Vec::new();
            }
        };

        let mut ids = Vec::new();
        match settings.pointer(self.pointer) {
            Some(Value::String(id)) => push_unique(&mut ids, id.clone()),
            Some(Value::Array(values)) => {
                // First occurrence wins; non-string entries are skipped
                for id in values.iter().filter_map(Value::as_str) {
                    push_unique(&mut ids, id.to_string());
                }
            }
            _ => {}
        }
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signals() -> ServiceSignals {
        ServiceSignals::default()
    }

    #[test]
    fn test_global_probe() {
        let probe = GlobalProbe {
            name: GOOGLE_ANALYTICS,
            globals: &["ga", "gtag", "_gaq"],
        };
        let mut s = signals();
        assert!(!probe.detect(&s));
        s.globals.push("gtag".into());
        assert!(probe.detect(&s));
        assert!(probe.ids(&s).is_empty());
    }

    #[test]
    fn test_loader_probe_requires_id() {
        let probe = LoaderProbe {
            name: GOOGLE_TAG_MANAGER,
            source: LoaderSource::Script,
            marker: "googletagmanager.com/gtm.js",
        };
        let mut s = signals();
        s.script_sources = vec![
            "https://www.googletagmanager.com/gtm.js".into(),
            "https://www.googletagmanager.com/gtm.js?id=GTM-ABC123".into(),
            "https://www.googletagmanager.com/gtm.js?id=GTM-ABC123&l=dl".into(),
            "https://cdn.example.com/app.js?id=OTHER".into(),
        ];
        assert_eq!(probe.ids(&s), vec!["GTM-ABC123"]);
        assert!(probe.detect(&s));

        s.script_sources.truncate(1);
        assert!(!probe.detect(&s));
    }

    #[test]
    fn test_frame_probe_is_case_insensitive() {
        let probe = FrameProbe {
            name: "Airtable Form",
            pattern: Regex::new(r"(?i)airtable\.com/(embed|shr)").unwrap(),
        };
        let mut s = signals();
        s.frame_sources = vec!["https://AIRTABLE.com/embed/shrXYZ".into()];
        assert!(probe.detect(&s));
        s.frame_sources = vec!["https://airtable.com/app123".into()];
        assert!(!probe.detect(&s));
    }

    #[test]
    fn test_settings_probe() {
        let tags = SettingsProbe {
            name: GOOGLE_TAG_MANAGER,
            pointer: "/gtm/tagIds",
        };
        let tag = SettingsProbe {
            name: GOOGLE_ANALYTICS,
            pointer: "/gtag/tagId",
        };
        let mut s = signals();
        s.settings_payload =
            Some(r#"{"gtm":{"tagIds":["GTM-1","GTM-2","GTM-1",4]},"gtag":{"tagId":"G-XYZ"}}"#.into());
        assert_eq!(tags.ids(&s), vec!["GTM-1", "GTM-2"]);
        assert_eq!(tag.ids(&s), vec!["G-XYZ"]);

        s.settings_payload = Some("{not json".into());
        assert!(tags.ids(&s).is_empty());
        assert!(!tag.detect(&s));
    }
}
