//! Third-party service detection
//!
//! Runs every registered probe over one set of signals and merges the
//! results by service name. A service confirmed by several signals appears
//! once, with the union of the identifiers those signals exposed.

pub mod probes;

use regex::Regex;
use std::sync::LazyLock;

use crate::report::{DetectedService, DetectedServices};
use crate::snapshot::ServiceSignals;

pub use probes::{
    FACEBOOK_PIXEL, FrameProbe, GOOGLE_ANALYTICS, GOOGLE_TAG_MANAGER, GlobalProbe, HOTJAR, HUBSPOT,
    LoaderProbe, LoaderSource, ServiceProbe, SettingsProbe,
};

/// Iframe-embedded form providers and the source patterns that identify them
const FORM_PROVIDERS: &[(&str, &str)] = &[
    ("Fireside21 Form", r"forms\.house\.gov"),
    ("IQ Form", r"iqconnect\.house\.gov"),
    ("Google Form", r"docs\.google\.com/forms"),
    ("Airtable Form", r"airtable\.com/(embed|shr)"),
    ("Microsoft Form", r"forms\.office\.com"),
];

static FORM_PATTERNS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    FORM_PROVIDERS
        .iter()
        .map(|&(name, pattern)| {
            let regex = Regex::new(&format!("(?i){pattern}"))
                .expect("BUG: hardcoded form provider pattern is invalid");
            (name, regex)
        })
        .collect()
});

/// An ordered set of probes
pub struct ServiceRegistry {
    probes: Vec<Box<dyn ServiceProbe>>,
}

impl ServiceRegistry {
    /// A registry with no probes
    #[must_use]
    pub fn empty() -> Self {
        Self { probes: Vec::new() }
    }

    /// Add a probe; probes run in registration order
    #[must_use]
    pub fn with_probe(mut self, probe: impl ServiceProbe + 'static) -> Self {
        self.probes.push(Box::new(probe));
        self
    }

    pub fn register(&mut self, probe: Box<dyn ServiceProbe>) {
        self.probes.push(probe);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.probes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }

    /// Every page global some probe inspects, without duplicates
    #[must_use]
    pub fn probed_globals(&self) -> Vec<&'static str> {
        let mut globals: Vec<&'static str> = Vec::new();
        for global in self.probes.iter().flat_map(|probe| probe.globals().iter()) {
            if !globals.contains(global) {
                globals.push(global);
            }
        }
        globals
    }

    /// Run all probes and merge their findings
    #[must_use]
    pub fn detect(&self, signals: &ServiceSignals) -> DetectedServices {
        let mut services = DetectedServices::new();

        for probe in &self.probes {
            if !probe.detect(signals) {
                continue;
            }
            let entry = services
                .entry(probe.name().to_string())
                .or_insert_with(DetectedService::default);
            for id in probe.ids(signals) {
                entry.push_id(id);
            }
        }

        log::debug!(
            "Service detection: {} services from {} probes",
            services.len(),
            self.probes.len()
        );
        services
    }
}

impl Default for ServiceRegistry {
    /// Tag managers, analytics, pixels, session recorders and form embeds
    fn default() -> Self {
        let mut registry = Self::empty()
            .with_probe(GlobalProbe {
                name: GOOGLE_TAG_MANAGER,
                globals: &["dataLayer", "google_tag_manager"],
            })
            .with_probe(GlobalProbe {
                name: GOOGLE_ANALYTICS,
                globals: &["ga", "gtag", "_gaq"],
            })
            .with_probe(GlobalProbe {
                name: FACEBOOK_PIXEL,
                globals: &["_fbq"],
            })
            .with_probe(GlobalProbe {
                name: HOTJAR,
                globals: &["hj"],
            })
            .with_probe(GlobalProbe {
                name: HUBSPOT,
                globals: &["_hsq"],
            })
            .with_probe(LoaderProbe {
                name: GOOGLE_TAG_MANAGER,
                source: LoaderSource::Script,
                marker: "googletagmanager.com/gtm.js",
            })
            .with_probe(LoaderProbe {
                name: GOOGLE_ANALYTICS,
                source: LoaderSource::Script,
                marker: "googletagmanager.com/gtag/js",
            })
            .with_probe(LoaderProbe {
                name: GOOGLE_TAG_MANAGER,
                source: LoaderSource::NoscriptFrame,
                marker: "googletagmanager.com/ns.html",
            });

        for (name, pattern) in FORM_PATTERNS.iter() {
            registry.register(Box::new(FrameProbe {
                name: *name,
                pattern: pattern.clone(),
            }));
        }

        registry
            .with_probe(SettingsProbe {
                name: GOOGLE_TAG_MANAGER,
                pointer: "/gtm/tagIds",
            })
            .with_probe(SettingsProbe {
                name: GOOGLE_ANALYTICS,
                pointer: "/gtag/tagId",
            })
    }
}

/// Detect services with the default probe set
#[must_use]
pub fn detect_services(signals: &ServiceSignals) -> DetectedServices {
    ServiceRegistry::default().detect(signals)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gtm_script_id() {
        let signals = ServiceSignals {
            script_sources: vec!["https://www.googletagmanager.com/gtm.js?id=GTM-ABC123".into()],
            ..Default::default()
        };

        let services = detect_services(&signals);
        assert_eq!(services.len(), 1);
        assert_eq!(services[GOOGLE_TAG_MANAGER].ids, vec!["GTM-ABC123"]);
    }

    #[test]
    fn test_signals_for_one_service_merge() {
        let signals = ServiceSignals {
            globals: vec!["dataLayer".into(), "google_tag_manager".into()],
            script_sources: vec!["https://www.googletagmanager.com/gtm.js?id=GTM-A".into()],
            noscript_frame_sources: vec![
                "https://www.googletagmanager.com/ns.html?id=GTM-B".into(),
                "https://www.googletagmanager.com/ns.html?id=GTM-A".into(),
            ],
            settings_payload: Some(r#"{"gtm":{"tagIds":["GTM-C"]}}"#.into()),
            ..Default::default()
        };

        let services = detect_services(&signals);
        assert_eq!(services.len(), 1);
        assert_eq!(
            services[GOOGLE_TAG_MANAGER].ids,
            vec!["GTM-A", "GTM-B", "GTM-C"]
        );
    }

    #[test]
    fn test_bare_detections() {
        let signals = ServiceSignals {
            globals: vec!["_fbq".into(), "hj".into(), "_hsq".into(), "_gaq".into()],
            frame_sources: vec![
                "https://forms.office.com/Pages/ResponsePage.aspx?id=1".into(),
                "https://iqconnect.house.gov/iqextranet/form".into(),
            ],
            ..Default::default()
        };

        let services = detect_services(&signals);
        let names: Vec<_> = services.keys().map(String::as_str).collect();
        assert_eq!(
            names,
            vec![
                FACEBOOK_PIXEL,
                GOOGLE_ANALYTICS,
                HOTJAR,
                HUBSPOT,
                "IQ Form",
                "Microsoft Form"
            ]
        );
        assert!(services.values().all(|service| service.ids.is_empty()));
    }

    #[test]
    fn test_malformed_inputs_do_not_stop_other_signals() {
        let signals = ServiceSignals {
            script_sources: vec![
                "https://www.googletagmanager.com/gtag/js?id=G-OK".into(),
                "googletagmanager.com/gtm.js?id=RELATIVE".into(),
            ],
            settings_payload: Some("<!-- not json -->".into()),
            ..Default::default()
        };

        let services = detect_services(&signals);
        assert_eq!(services.len(), 1);
        assert_eq!(services[GOOGLE_ANALYTICS].ids, vec!["G-OK"]);
    }

    #[test]
    fn test_probed_globals_are_unique() {
        let globals = ServiceRegistry::default().probed_globals();
        assert_eq!(
            globals,
            vec!["dataLayer", "google_tag_manager", "ga", "gtag", "_gaq", "_fbq", "hj", "_hsq"]
        );
    }

    #[test]
    fn test_custom_registry() {
        let registry = ServiceRegistry::empty().with_probe(GlobalProbe {
            name: "Intercom",
            globals: &["Intercom"],
        });
        let signals = ServiceSignals {
            globals: vec!["Intercom".into()],
            ..Default::default()
        };
        assert_eq!(registry.len(), 1);
        assert!(registry.detect(&signals).contains_key("Intercom"));
    }
}
