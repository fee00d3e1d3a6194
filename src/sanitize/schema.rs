//! Explicit allow-list driving the sanitizer.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;

/// Allow-list over tags, attributes and URL schemes.
///
/// Anything absent is dropped. Tags in `clean_content_tags` lose their whole
/// subtree; any other disallowed tag is unwrapped, promoting its children to
/// the nearest retained ancestor.
#[derive(Debug, Clone, Default)]
pub struct SanitizeSchema {
    tags: HashSet<String>,
    tag_attributes: HashMap<String, HashSet<String>>,
    generic_attributes: HashSet<String>,
    url_attributes: HashSet<String>,
    url_schemes: HashSet<String>,
    clean_content_tags: HashSet<String>,
}

impl SanitizeSchema {
    /// Schema with nothing allowed.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn add_tags<'a>(&mut self, tags: impl IntoIterator<Item = &'a str>) -> &mut Self {
        self.tags.extend(tags.into_iter().map(str::to_string));
        self
    }

    pub fn add_tag_attributes<'a>(
        &mut self,
        tag: &str,
        attributes: impl IntoIterator<Item = &'a str>,
    ) -> &mut Self {
        self.tag_attributes
            .entry(tag.to_string())
            .or_default()
            .extend(attributes.into_iter().map(str::to_string));
        self
    }

    pub fn add_generic_attributes<'a>(
        &mut self,
        attributes: impl IntoIterator<Item = &'a str>,
    ) -> &mut Self {
        self.generic_attributes
            .extend(attributes.into_iter().map(str::to_string));
        self
    }

    pub fn add_url_attributes<'a>(
        &mut self,
        attributes: impl IntoIterator<Item = &'a str>,
    ) -> &mut Self {
        self.url_attributes
            .extend(attributes.into_iter().map(str::to_string));
        self
    }

    pub fn add_url_schemes<'a>(
        &mut self,
        schemes: impl IntoIterator<Item = &'a str>,
    ) -> &mut Self {
        self.url_schemes
            .extend(schemes.into_iter().map(str::to_string));
        self
    }

    pub fn add_clean_content_tags<'a>(
        &mut self,
        tags: impl IntoIterator<Item = &'a str>,
    ) -> &mut Self {
        self.clean_content_tags
            .extend(tags.into_iter().map(str::to_string));
        self
    }

    pub fn allows_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub fn strips_content(&self, tag: &str) -> bool {
        self.clean_content_tags.contains(tag)
    }

    pub fn allows_attribute(&self, tag: &str, attribute: &str) -> bool {
        self.generic_attributes.contains(attribute)
            || self
                .tag_attributes
                .get(tag)
                .is_some_and(|set| set.contains(attribute))
    }

    pub fn is_url_attribute(&self, attribute: &str) -> bool {
        self.url_attributes.contains(attribute)
    }

    pub fn allows_scheme(&self, scheme: &str) -> bool {
        self.url_schemes.contains(scheme)
    }
}

/// The schema used by the pipeline unless the host replaces it.
pub fn default_schema() -> &'static SanitizeSchema {
    static DEFAULT: Lazy<SanitizeSchema> = Lazy::new(build_default_schema);
    &DEFAULT
}

fn build_default_schema() -> SanitizeSchema {
    let mut schema = SanitizeSchema::empty();

    schema.add_tags([
        "a",
        "abbr",
        "blockquote",
        "br",
        "code",
        "dd",
        "del",
        "div",
        "dl",
        "dt",
        "em",
        "figcaption",
        "figure",
        "h1",
        "h2",
        "h3",
        "h4",
        "h5",
        "h6",
        "hr",
        "i",
        "img",
        "input",
        "ins",
        "kbd",
        "li",
        "mark",
        "ol",
        "p",
        "pre",
        "s",
        "section",
        "span",
        "strong",
        "sub",
        "sup",
        "table",
        "tbody",
        "td",
        "th",
        "thead",
        "tr",
        "u",
        "ul",
        // SVG vocabulary for KaTeX stretchy glyphs and inline diagrams.
        "svg",
        "g",
        "path",
        "line",
        "rect",
        "circle",
        "ellipse",
        "polygon",
        "polyline",
        "text",
        "tspan",
        "defs",
        "use",
        "marker",
    ]);

    schema.add_generic_attributes([
        "class",
        "id",
        "title",
        "lang",
        "dir",
        "role",
        "aria-hidden",
        "aria-label",
        "data-line",
        "data-math-style",
        "data-admonition",
        "data-admonition-icon",
        "data-admonition-title",
        "data-chart",
        "data-chart-flavor",
        "data-diagram-remote",
        "data-diagram-url",
    ]);

    schema.add_tag_attributes("a", ["href", "target", "rel"]);
    schema.add_tag_attributes(
        "img",
        ["src", "alt", "width", "height", "loading", "decoding"],
    );
    schema.add_tag_attributes("code", ["data-language"]);
    schema.add_tag_attributes("pre", ["data-language"]);
    schema.add_tag_attributes("input", ["type", "checked", "disabled"]);
    schema.add_tag_attributes("ol", ["start"]);
    schema.add_tag_attributes("th", ["align", "colspan", "rowspan", "scope"]);
    schema.add_tag_attributes("td", ["align", "colspan", "rowspan"]);
    // KaTeX output positions glyphs through inline styles; the value filter
    // still applies.
    schema.add_tag_attributes("span", ["style"]);

    schema.add_tag_attributes(
        "svg",
        [
            "viewBox",
            "viewbox",
            "xmlns",
            "width",
            "height",
            "preserveAspectRatio",
            "preserveaspectratio",
            "version",
        ],
    );
    schema.add_tag_attributes("g", ["transform"]);
    schema.add_tag_attributes(
        "path",
        [
            "d",
            "fill",
            "stroke",
            "stroke-width",
            "stroke-linecap",
            "stroke-linejoin",
            "opacity",
        ],
    );
    schema.add_tag_attributes("line", ["x1", "x2", "y1", "y2", "stroke", "stroke-width"]);
    schema.add_tag_attributes(
        "rect",
        ["x", "y", "width", "height", "rx", "ry", "fill", "stroke", "stroke-width"],
    );
    schema.add_tag_attributes("circle", ["cx", "cy", "r", "fill", "stroke", "stroke-width"]);
    schema.add_tag_attributes(
        "ellipse",
        ["cx", "cy", "rx", "ry", "fill", "stroke", "stroke-width"],
    );
    schema.add_tag_attributes("polygon", ["points", "fill", "stroke", "stroke-width"]);
    schema.add_tag_attributes("polyline", ["points", "fill", "stroke", "stroke-width"]);
    schema.add_tag_attributes(
        "text",
        ["x", "y", "fill", "text-anchor", "dominant-baseline", "font-size"],
    );
    schema.add_tag_attributes("tspan", ["x", "y", "dx", "dy", "font-size", "fill"]);
    schema.add_tag_attributes("use", ["href", "x", "y", "width", "height"]);
    schema.add_tag_attributes(
        "marker",
        ["refX", "refY", "orient", "markerWidth", "markerHeight", "viewBox"],
    );

    schema.add_url_attributes(["href", "src", "data-diagram-url"]);
    schema.add_url_schemes(["http", "https", "mailto", "tel"]);

    schema.add_clean_content_tags([
        "script", "style", "iframe", "object", "embed", "noscript",
    ]);

    schema
}
