//! Document snapshot
//!
//! The DOM facts the synchronous extractors need, captured in one read of
//! the page. Browser pages fill it from resolved (computed) styles; static
//! HTML fills it from markup and inline `style` attributes.

use serde::{Deserialize, Serialize};
use url::Url;

/// The page's `<body>` element
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodySnapshot {
    /// Rendered text (`innerText`)
    #[serde(default)]
    pub text: String,
    /// Class tokens in DOM order
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub id: Option<String>,
}

/// Resolved colors of one element matched by the palette selector
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementColors {
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub background_color: String,
    #[serde(default)]
    pub color: String,
    /// Border color as resolved; may name one color per box edge
    #[serde(default)]
    pub border_color: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSnapshot {
    /// URL relative references are resolved against
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub body: BodySnapshot,
    /// Raw `href` attribute of every `<a>`, `None` when the attribute is missing
    #[serde(default)]
    pub link_hrefs: Vec<Option<String>>,
    /// Non-empty `src` of every `<img>`, in document order
    #[serde(default)]
    pub image_sources: Vec<String>,
    /// Resolved `background-image` values other than `none`
    #[serde(default)]
    pub background_images: Vec<String>,
    /// Literal `content` of `<meta name="theme-color">`
    #[serde(default)]
    pub theme_color: Option<String>,
    #[serde(default)]
    pub element_colors: Vec<ElementColors>,
}

impl DocumentSnapshot {
    /// Parsed base URL, `None` when the page reported something unusable
    #[must_use]
    pub fn base(&self) -> Option<Url> {
        Url::parse(&self.base_url).ok()
    }
}
