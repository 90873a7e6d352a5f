//! Service-detection signals
//!
//! Captured separately from the document snapshot because service detection
//! reads the page again after the settle window.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSignals {
    /// Names of probed globals that are defined and truthy on `window`
    #[serde(default)]
    pub globals: Vec<String>,
    /// Resolved `src` of every `<script src>`
    #[serde(default)]
    pub script_sources: Vec<String>,
    /// Resolved `src` of iframes inside `<noscript>`
    #[serde(default)]
    pub noscript_frame_sources: Vec<String>,
    /// Resolved `src` of every `<iframe>`
    #[serde(default)]
    pub frame_sources: Vec<String>,
    /// Text of the serialized settings script, when the page carries one
    #[serde(default)]
    pub settings_payload: Option<String>,
}

impl ServiceSignals {
    #[must_use]
    pub fn has_global(&self, name: &str) -> bool {
        self.globals.iter().any(|global| global == name)
    }
}
