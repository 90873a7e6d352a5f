//! Static HTML snapshots
//!
//! Builds document and service snapshots from markup alone, for pages that
//! were saved to disk or fetched without a browser. There is no layout or
//! cascade here: "resolved" styles come from inline `style` attributes, the
//! rendered text is the text content of `<body>` with block boundaries
//! turned into line breaks, and no script globals can be observed.

use ego_tree::iter::Edge;
use scraper::{ElementRef, Html, Node, Selector};
use std::sync::LazyLock;
use url::Url;

use super::document::{BodySnapshot, DocumentSnapshot, ElementColors};
use super::signals::ServiceSignals;
use crate::errors::InspectResult;
use crate::utils::{COLOR_SCAN_SELECTOR, resolve_url};

// These are parsed once at first access and cached forever.
// Hardcoded selectors should NEVER fail to parse - if they do, it's a compile-time bug.

static BODY_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("body").expect("BUG: hardcoded CSS selector 'body' is invalid")
});

static BASE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("base[href]").expect("BUG: hardcoded CSS selector 'base[href]' is invalid")
});

static ANCHOR_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("a").expect("BUG: hardcoded CSS selector 'a' is invalid")
});

static IMG_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("img").expect("BUG: hardcoded CSS selector 'img' is invalid")
});

static STYLED_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("[style]").expect("BUG: hardcoded CSS selector '[style]' is invalid")
});

static THEME_COLOR_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"meta[name="theme-color"]"#)
        .expect("BUG: hardcoded CSS selector 'meta[name=\"theme-color\"]' is invalid")
});

static COLOR_SCAN: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(COLOR_SCAN_SELECTOR).expect("BUG: hardcoded palette selector is invalid")
});

static SCRIPT_SRC_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("script[src]").expect("BUG: hardcoded CSS selector 'script[src]' is invalid")
});

static IFRAME_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("iframe[src]").expect("BUG: hardcoded CSS selector 'iframe[src]' is invalid")
});

static NOSCRIPT_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("noscript").expect("BUG: hardcoded CSS selector 'noscript' is invalid")
});

static SETTINGS_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"script[data-drupal-selector="drupal-settings-json"]"#)
        .expect("BUG: hardcoded settings payload selector is invalid")
});

/// Elements whose text never renders
const HIDDEN_TEXT_ELEMENTS: &[&str] = &["script", "style", "noscript", "template", "head"];

/// Elements that start a new line in rendered text
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "details", "dialog", "div", "dl",
    "dt", "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5",
    "h6", "header", "hr", "li", "main", "nav", "ol", "p", "pre", "section", "summary", "table",
    "td", "th", "tr", "ul",
];

/// A parsed HTML document with the URL it was loaded from
pub struct StaticHtml {
    document: Html,
    base: Url,
}

impl StaticHtml {
    /// Parse `html` as if it had been loaded from `page_url`
    ///
    /// A `<base href>` in the document overrides `page_url` for resolving
    /// relative references, as it does in a browser.
    pub fn parse(html: &str, page_url: &str) -> InspectResult<Self> {
        let page_url = Url::parse(page_url)?;
        let document = Html::parse_document(html);

        let base = document
            .select(&BASE_SELECTOR)
            .next()
            .and_then(|base| base.value().attr("href"))
            .and_then(|href| page_url.join(href).ok())
            .unwrap_or(page_url);

        Ok(Self { document, base })
    }

    #[must_use]
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Capture the document snapshot
    #[must_use]
    pub fn document_snapshot(&self) -> DocumentSnapshot {
        let body = self.document.select(&BODY_SELECTOR).next();

        let body_snapshot = body
            .map(|body| BodySnapshot {
                text: rendered_text(body),
                classes: body.value().classes().map(str::to_string).collect(),
                id: body
                    .value()
                    .id()
                    .filter(|id| !id.is_empty())
                    .map(str::to_string),
            })
            .unwrap_or_default();

        let link_hrefs = self
            .document
            .select(&ANCHOR_SELECTOR)
            .map(|anchor| anchor.value().attr("href").map(str::to_string))
            .collect();

        let image_sources = self
            .document
            .select(&IMG_SELECTOR)
            .filter_map(|img| img.value().attr("src"))
            .filter(|src| !src.trim().is_empty())
            .map(str::to_string)
            .collect();

        let background_images = self
            .document
            .select(&STYLED_SELECTOR)
            .filter_map(|el| background_image_of(&inline_declarations(el)))
            .collect();

        let theme_color = self
            .document
            .select(&THEME_COLOR_SELECTOR)
            .next()
            .and_then(|meta| meta.value().attr("content"))
            .map(str::to_string);

        let element_colors = self
            .document
            .select(&COLOR_SCAN)
            .map(|el| {
                let declarations = inline_declarations(el);
                let lookup = |property: &str| {
                    declarations
                        .iter()
                        .rev()
                        .find(|(name, _)| name == property)
                        .map(|(_, value)| value.clone())
                        .unwrap_or_default()
                };
                ElementColors {
                    tag: el.value().name().to_string(),
                    background_color: lookup("background-color"),
                    color: lookup("color"),
                    border_color: lookup("border-color"),
                }
            })
            .collect();

        DocumentSnapshot {
            base_url: self.base.to_string(),
            body: body_snapshot,
            link_hrefs,
            image_sources,
            background_images,
            theme_color,
            element_colors,
        }
    }

    /// Capture the service-detection signals
    #[must_use]
    pub fn service_signals(&self) -> ServiceSignals {
        let base = Some(&self.base);

        let script_sources = self
            .document
            .select(&SCRIPT_SRC_SELECTOR)
            .filter_map(|script| script.value().attr("src"))
            .filter_map(|src| resolve_url(base, src))
            .collect();

        let frame_sources = self
            .document
            .select(&IFRAME_SELECTOR)
            .filter(|frame| !has_noscript_ancestor(*frame))
            .filter_map(|frame| frame.value().attr("src"))
            .filter_map(|src| resolve_url(base, src))
            .collect();

        // With scripting enabled the parser keeps <noscript> content as raw
        // text, so the fallback iframes have to be parsed out of it.
        let noscript_frame_sources = self
            .document
            .select(&NOSCRIPT_SELECTOR)
            .flat_map(|noscript| {
                let inner = noscript.text().collect::<String>();
                let fragment = Html::parse_fragment(&inner);
                let mut sources: Vec<String> = fragment
                    .select(&IFRAME_SELECTOR)
                    .filter_map(|frame| frame.value().attr("src"))
                    .map(str::to_string)
                    .collect();
                sources.extend(
                    noscript
                        .select(&IFRAME_SELECTOR)
                        .filter_map(|frame| frame.value().attr("src"))
                        .map(str::to_string),
                );
                sources
            })
            .filter_map(|src| resolve_url(base, &src))
            .collect();

        let settings_payload = self
            .document
            .select(&SETTINGS_SELECTOR)
            .next()
            .map(|script| script.text().collect::<String>());

        ServiceSignals {
            globals: Vec::new(),
            script_sources,
            noscript_frame_sources,
            frame_sources,
            settings_payload,
        }
    }
}

fn has_noscript_ancestor(el: ElementRef<'_>) -> bool {
    el.ancestors().any(|node| {
        node.value()
            .as_element()
            .is_some_and(|ancestor| ancestor.name() == "noscript")
    })
}

/// Approximate `innerText`: text content with block boundaries as newlines
fn rendered_text(body: ElementRef<'_>) -> String {
    let mut text = String::new();
    let mut hidden_depth = 0usize;

    for edge in body.traverse() {
        match edge {
            Edge::Open(node) => match node.value() {
                Node::Element(el) if HIDDEN_TEXT_ELEMENTS.contains(&el.name()) => {
                    hidden_depth += 1;
                }
                Node::Element(el) if hidden_depth == 0 && BLOCK_ELEMENTS.contains(&el.name()) => {
                    text.push('\n');
                }
                Node::Text(chunk) if hidden_depth == 0 => text.push_str(chunk),
                _ => {}
            },
            Edge::Close(node) => {
                if let Node::Element(el) = node.value() {
                    if HIDDEN_TEXT_ELEMENTS.contains(&el.name()) {
                        hidden_depth = hidden_depth.saturating_sub(1);
                    } else if hidden_depth == 0 && BLOCK_ELEMENTS.contains(&el.name()) {
                        text.push('\n');
                    }
                }
            }
        }
    }

    text.trim().to_string()
}

/// Split an inline `style` attribute into lowercase property/value pairs
///
/// Semicolons inside parentheses or quotes (data URLs, `url("a;b")`) do not
/// end a declaration.
fn inline_declarations(el: ElementRef<'_>) -> Vec<(String, String)> {
    let Some(style) = el.value().attr("style") else {
        return Vec::new();
    };

    let mut declarations = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;

    for ch in style.chars() {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(ch),
            (None, '(') => depth += 1,
            (None, ')') => depth = depth.saturating_sub(1),
            (None, ';') if depth == 0 => {
                declarations.extend(split_declaration(&current));
                current.clear();
                continue;
            }
            _ => {}
        }
        current.push(ch);
    }
    declarations.extend(split_declaration(&current));
    declarations
}

fn split_declaration(raw: &str) -> Option<(String, String)> {
    let (name, value) = raw.split_once(':')?;
    let name = name.trim().to_ascii_lowercase();
    let value = value.trim().trim_end_matches("!important").trim();
    if name.is_empty() || value.is_empty() {
        return None;
    }
    Some((name, value.to_string()))
}

/// The background image an inline style resolves to, if any
fn background_image_of(declarations: &[(String, String)]) -> Option<String> {
    declarations
        .iter()
        .rev()
        .find_map(|(name, value)| match name.as_str() {
            "background-image" => Some(value.clone()),
            "background" if value.contains("url(") => Some(value.clone()),
            _ => None,
        })
        .filter(|value| !value.eq_ignore_ascii_case("none"))
}
