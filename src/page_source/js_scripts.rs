//! JavaScript evaluation scripts
//!
//! Each snapshot script returns a JSON object shaped like the matching
//! `snapshot` type. Highlight scripts address elements through the
//! `data-pageinspect-id` attribute assigned by `locate_image_script`.

/// Attribute carrying the locator's element token
pub const ELEMENT_TOKEN_ATTR: &str = "data-pageinspect-id";

/// Hide the accessibility checker's per-element tooltip overlay
///
/// The overlay is a `<every-element-tip>` custom element whose text and
/// colors would skew the word count and palette. A tag rule in an injected
/// stylesheet also covers tips added later. Returns the number of tips
/// currently on the page.
pub const HIDE_OVERLAY_SCRIPT: &str = r#"
    (() => {
        if (!document.getElementById('pageinspect-overlay-style')) {
            const style = document.createElement('style');
            style.id = 'pageinspect-overlay-style';
            style.textContent = 'every-element-tip { display: none !important; }';
            (document.head || document.documentElement).appendChild(style);
        }
        return document.getElementsByTagName('every-element-tip').length;
    })()
"#;

/// Capture the document snapshot
pub const DOCUMENT_SNAPSHOT_SCRIPT: &str = r#"
    (() => {
        const body = document.body;
        const bodySnapshot = body ? {
            text: body.innerText || '',
            classes: Array.from(body.classList),
            id: body.id || null
        } : { text: '', classes: [], id: null };

        const linkHrefs = Array.from(document.querySelectorAll('a'))
            .map(a => a.getAttribute('href'));

        const imageSources = Array.from(document.querySelectorAll('img'))
            .map(img => img.getAttribute('src'))
            .filter(src => src);

        const backgroundImages = [];
        document.querySelectorAll('*').forEach(el => {
            const bg = getComputedStyle(el).backgroundImage;
            if (bg && bg !== 'none') {
                backgroundImages.push(bg);
            }
        });

        const themeMeta = document.querySelector('meta[name="theme-color"]');

        const elementColors = Array.from(
            document.querySelectorAll('body, h1, h2, a, button, p, div, header, footer')
        ).map(el => {
            const style = getComputedStyle(el);
            return {
                tag: el.tagName.toLowerCase(),
                backgroundColor: style.backgroundColor || '',
                color: style.color || '',
                borderColor: style.borderColor || ''
            };
        });

        return {
            baseUrl: document.baseURI,
            body: bodySnapshot,
            linkHrefs,
            imageSources,
            backgroundImages,
            themeColor: themeMeta ? themeMeta.getAttribute('content') : null,
            elementColors
        };
    })()
"#;

/// Capture the performance timeline
///
/// Largest-contentful-paint and layout-shift entries are only exposed to
/// observers, so they are read through buffered `PerformanceObserver`s and
/// the script resolves once the buffered entries have been delivered.
pub const TIMELINE_SCRIPT: &str = r#"
    new Promise(resolve => {
        const largestPaints = [];
        const layoutShifts = [];
        const observers = [];

        const observe = (type, sink) => {
            try {
                const observer = new PerformanceObserver(list => {
                    list.getEntries().forEach(entry => sink.push(entry));
                });
                observer.observe({ type, buffered: true });
                observers.push({ observer, sink });
            } catch (e) {
                // Entry type unsupported by this browser
            }
        };

        observe('largest-contentful-paint', largestPaints);
        observe('layout-shift', layoutShifts);

        setTimeout(() => {
            observers.forEach(({ observer, sink }) => {
                observer.takeRecords().forEach(entry => sink.push(entry));
                observer.disconnect();
            });

            const resources = performance.getEntriesByType('resource').map(entry => ({
                name: entry.name,
                transferSize: entry.transferSize || 0
            }));

            const nav = performance.getEntriesByType('navigation')[0];
            const navigation = nav ? {
                transferSize: nav.transferSize || 0,
                duration: nav.duration || 0
            } : null;

            const paints = performance.getEntriesByType('paint')
                .concat(largestPaints)
                .map(entry => ({ name: entry.name || entry.entryType, startTime: entry.startTime }));

            resolve({
                resources,
                navigation,
                paints,
                layoutShifts: layoutShifts.map(entry => ({
                    value: entry.value,
                    hadRecentInput: entry.hadRecentInput
                }))
            });
        }, 50);
    })
"#;

/// Capture service signals; `__GLOBALS__` is replaced with a JSON array
pub const SERVICE_SIGNALS_TEMPLATE: &str = r#"
    (() => {
        const globals = __GLOBALS__.filter(name => {
            try {
                return Boolean(window[name]);
            } catch (e) {
                return false;
            }
        });

        const scriptSources = Array.from(document.querySelectorAll('script[src]'))
            .map(script => script.src);

        const noscriptFrameSources = [];
        document.querySelectorAll('noscript').forEach(noscript => {
            // Parsed into a detached document so fallback pixels never load
            const holder = new DOMParser().parseFromString(
                noscript.textContent || noscript.innerHTML,
                'text/html'
            );
            holder.querySelectorAll('iframe[src]').forEach(frame => {
                try {
                    noscriptFrameSources.push(
                        new URL(frame.getAttribute('src'), document.baseURI).href
                    );
                } catch (e) {
                    // Malformed URL
                }
            });
        });

        const frameSources = Array.from(document.querySelectorAll('iframe[src]'))
            .map(frame => frame.src);

        const settings = document.querySelector(
            'script[data-drupal-selector="drupal-settings-json"]'
        );

        return {
            globals,
            scriptSources,
            noscriptFrameSources,
            frameSources,
            settingsPayload: settings ? settings.textContent : null
        };
    })()
"#;

/// Find the first matching image and return `{ token }`, null when absent
///
/// `__SOURCE__` is replaced with a JSON string literal.
pub const LOCATE_IMAGE_TEMPLATE: &str = r#"
    (() => {
        const source = __SOURCE__;
        const img = Array.from(document.querySelectorAll('img'))
            .find(img => img.getAttribute('src') === source);
        if (!img) {
            return { token: null };
        }
        if (!img.hasAttribute('data-pageinspect-id')) {
            window.__pageinspectNextId = (window.__pageinspectNextId || 0) + 1;
            img.setAttribute('data-pageinspect-id', 'pi-' + window.__pageinspectNextId);
        }
        return { token: img.getAttribute('data-pageinspect-id') };
    })()
"#;

/// Scroll the element with token `__TOKEN__` to the viewport center
pub const SCROLL_INTO_VIEW_TEMPLATE: &str = r#"
    (() => {
        const el = document.querySelector('[data-pageinspect-id=' + JSON.stringify(__TOKEN__) + ']');
        if (el) {
            el.scrollIntoView({ behavior: 'smooth', block: 'center' });
        }
        return Boolean(el);
    })()
"#;

/// Whether a style element with id `__ID__` exists
pub const HAS_STYLE_TEMPLATE: &str = r#"
    (() => Boolean(document.getElementById(__ID__)))()
"#;

/// Append a style element with id `__ID__` and text `__CSS__`
///
/// Returns false without touching the page when the id is already present.
pub const INJECT_STYLE_TEMPLATE: &str = r#"
    (() => {
        if (document.getElementById(__ID__)) {
            return false;
        }
        const style = document.createElement('style');
        style.id = __ID__;
        style.textContent = __CSS__;
        (document.head || document.documentElement).appendChild(style);
        return true;
    })()
"#;

/// Add one hold to element `__TOKEN__` and apply class `__CLASS__`
pub const MARK_TEMPLATE: &str = r#"
    (() => {
        const el = document.querySelector('[data-pageinspect-id=' + JSON.stringify(__TOKEN__) + ']');
        if (!el) {
            return false;
        }
        const holds = parseInt(el.dataset.pageinspectHolds || '0', 10) + 1;
        el.dataset.pageinspectHolds = String(holds);
        el.classList.add(__CLASS__);
        return true;
    })()
"#;

/// Drop one hold from element `__TOKEN__`; remove `__CLASS__` at zero
pub const UNMARK_TEMPLATE: &str = r#"
    (() => {
        const el = document.querySelector('[data-pageinspect-id=' + JSON.stringify(__TOKEN__) + ']');
        if (!el) {
            return false;
        }
        const holds = Math.max(parseInt(el.dataset.pageinspectHolds || '0', 10) - 1, 0);
        if (holds === 0) {
            delete el.dataset.pageinspectHolds;
            el.classList.remove(__CLASS__);
        } else {
            el.dataset.pageinspectHolds = String(holds);
        }
        return true;
    })()
"#;

/// Substitute `(placeholder, value)` pairs, encoding each value as a JSON
/// literal
pub fn render_script(template: &str, substitutions: &[(&str, serde_json::Value)]) -> String {
    substitutions
        .iter()
        .fold(template.to_string(), |script, (placeholder, value)| {
            script.replace(placeholder, &value.to_string())
        })
}
