//! Post body rendering.
//!
//! Author-submitted post bodies arrive either as plain text (one paragraph per
//! line) or as loosely structured HTML. Rendering happens in two stages:
//!
//! 1. **Paragraphing**: if the body carries no tag-shaped markup, every
//!    non-blank line is trimmed, escaped and wrapped in `<p>`.
//! 2. **Sanitization**: the result is run through an allow-list sanitizer.
//!    Anything not on the list is dropped; `<script>`/`<style>` lose their
//!    content entirely; URLs with non-allowed schemes are removed.
//!
//! If the sanitizer fails the renderer returns an empty string. Unsanitized
//! markup never leaves this module.

use std::collections::HashSet;
use std::sync::LazyLock;

use maud::html;
use regex::Regex;

use crate::error::{Error, Result};

/// Regex for tag-shaped substrings (`<tag ...>` or `</tag>`).
///
/// A heuristic, not a parse: plain text such as `a <b and c> d` is classified
/// as HTML and passed straight to the sanitizer.
static TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)</?[a-z][a-z0-9-]*(?:\s[^<>]*)?/?>").expect("tag regex should compile")
});

/// Tags permitted in rendered post bodies.
pub const DEFAULT_TAGS: &[&str] = &[
    "p", "br", "b", "i", "u", "strong", "em", "h1", "h2", "h3", "h4", "h5", "h6", "blockquote",
    "ol", "ul", "li", "a", "img", "code", "pre", "span", "div", "figure", "figcaption", "table",
    "thead", "tbody", "tr", "td", "th",
];

/// Attributes permitted on any allowed tag.
pub const DEFAULT_ATTRIBUTES: &[&str] = &[
    "href", "src", "alt", "title", "class", "id", "target", "rel", "width", "height", "style",
];

/// URL schemes permitted in `href`/`src`. None of these execute code.
pub const DEFAULT_URL_SCHEMES: &[&str] = &[
    "http", "https", "mailto", "tel", "ftp", "ftps", "callto", "sms", "cid", "xmpp",
];

/// Tags removed together with everything inside them.
pub const DEFAULT_CLEAN_CONTENT_TAGS: &[&str] = &["script", "style"];

// =============================================================================
// AllowList
// =============================================================================

/// The closed set of tags, attributes and URL schemes a rendered body may use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowList {
    /// Permitted element names.
    pub tags: HashSet<String>,
    /// Attributes permitted on every permitted element.
    pub attributes: HashSet<String>,
    /// Permitted URL schemes (without the trailing `:`).
    pub url_schemes: HashSet<String>,
    /// Elements dropped along with their content. Must not overlap `tags`.
    pub clean_content_tags: HashSet<String>,
}

impl Default for AllowList {
    fn default() -> Self {
        Self {
            tags: to_set(DEFAULT_TAGS),
            attributes: to_set(DEFAULT_ATTRIBUTES),
            url_schemes: to_set(DEFAULT_URL_SCHEMES),
            clean_content_tags: to_set(DEFAULT_CLEAN_CONTENT_TAGS),
        }
    }
}

impl AllowList {
    /// Allow an additional tag.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        let tag = tag.into().to_ascii_lowercase();
        self.clean_content_tags.remove(&tag);
        self.tags.insert(tag);
        self
    }

    /// Remove a tag from the list.
    pub fn without_tag(mut self, tag: &str) -> Self {
        self.tags.remove(&tag.to_ascii_lowercase());
        self
    }

    /// Remove an attribute from the list.
    pub fn without_attribute(mut self, attribute: &str) -> Self {
        self.attributes.remove(&attribute.to_ascii_lowercase());
        self
    }

    /// Returns `true` if the given URL scheme is permitted.
    pub fn allows_scheme(&self, scheme: &str) -> bool {
        self.url_schemes.contains(&scheme.to_ascii_lowercase())
    }
}

fn to_set(items: &[&str]) -> HashSet<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

// =============================================================================
// Sanitizer
// =============================================================================

/// An HTML sanitizer primitive.
///
/// Implementations must be deterministic for a fixed input and allow-list.
pub trait Sanitizer: Send + Sync {
    /// Reduce `html` to the structure permitted by `allow`.
    fn sanitize(&self, html: &str, allow: &AllowList) -> Result<String>;
}

/// Sanitizer backed by [ammonia](https://docs.rs/ammonia) (html5ever parsing).
#[derive(Debug, Clone, Copy, Default)]
pub struct AmmoniaSanitizer;

impl Sanitizer for AmmoniaSanitizer {
    fn sanitize(&self, html: &str, allow: &AllowList) -> Result<String> {
        if !allow.tags.is_disjoint(&allow.clean_content_tags) {
            // ammonia asserts on this; surface it as a failure instead.
            return Err(Error::Sanitizer(
                "tag and clean-content lists overlap".to_string(),
            ));
        }

        let mut builder = ammonia::Builder::empty();
        builder
            .tags(allow.tags.iter().map(String::as_str).collect())
            .clean_content_tags(allow.clean_content_tags.iter().map(String::as_str).collect())
            .generic_attributes(allow.attributes.iter().map(String::as_str).collect())
            .url_schemes(allow.url_schemes.iter().map(String::as_str).collect())
            .url_relative(ammonia::UrlRelative::PassThrough)
            // `rel` is author-controlled here, so ammonia must not inject its own.
            .link_rel(None)
            .strip_comments(true);

        Ok(builder.clean(html).to_string())
    }
}

// =============================================================================
// ContentRenderer
// =============================================================================

/// Converts raw post bodies into sanitized HTML fragments.
#[derive(Debug, Clone, Default)]
pub struct ContentRenderer<S = AmmoniaSanitizer> {
    allow: AllowList,
    sanitizer: S,
}

impl ContentRenderer<AmmoniaSanitizer> {
    /// Create a renderer with the default allow-list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a renderer with a custom allow-list.
    pub fn with_allow_list(allow: AllowList) -> Self {
        Self {
            allow,
            sanitizer: AmmoniaSanitizer,
        }
    }
}

impl<S: Sanitizer> ContentRenderer<S> {
    /// Create a renderer with a custom sanitizer.
    pub fn with_sanitizer(allow: AllowList, sanitizer: S) -> Self {
        Self { allow, sanitizer }
    }

    /// The allow-list this renderer enforces.
    pub fn allow_list(&self) -> &AllowList {
        &self.allow
    }

    /// Render a raw post body to a sanitized HTML fragment.
    ///
    /// Plain text is split into paragraphs first; markup and empty input go
    /// straight to the sanitizer. Returns an empty string if sanitization fails.
    pub fn render(&self, raw: &str) -> String {
        if raw.is_empty() || looks_like_html(raw) {
            self.sanitize(raw)
        } else {
            self.sanitize(&render_plaintext_to_html(raw))
        }
    }

    /// Run the sanitize stage alone. Fails closed.
    pub fn sanitize(&self, html: &str) -> String {
        match self.sanitizer.sanitize(html, &self.allow) {
            Ok(clean) => clean,
            Err(e) => {
                tracing::warn!(error = %e, input_len = html.len(), "sanitizer failed, rendering nothing");
                String::new()
            }
        }
    }
}

/// Returns `true` if `raw` contains a tag-shaped substring.
pub fn looks_like_html(raw: &str) -> bool {
    TAG_REGEX.is_match(raw)
}

/// Wrap each non-blank line of `raw` in an escaped `<p>` element.
pub fn render_plaintext_to_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 16);
    for line in raw.split('\n').map(str::trim).filter(|l| !l.is_empty()) {
        out.push_str(&html! { p { (line) } }.into_string());
    }
    out
}
