//! Allow-list sanitization over the hypertext tree.
//!
//! This is the sole XSS defense for content that may contain arbitrary raw
//! markup from the bridge, so it runs unconditionally on every render,
//! between the bridge and the dispatcher. Rejections are silent: nodes and
//! attributes outside the schema are dropped, never repaired or reported.

mod schema;

use std::collections::BTreeMap;

use url::Url;

pub use schema::{SanitizeSchema, default_schema};

use crate::hypertext::HtNode;

/// Sanitize the node sequence in place.
pub fn sanitize(nodes: &mut Vec<HtNode>, schema: &SanitizeSchema) {
    let drained = std::mem::take(nodes);
    *nodes = sanitize_nodes(drained, schema);
}

fn sanitize_nodes(nodes: Vec<HtNode>, schema: &SanitizeSchema) -> Vec<HtNode> {
    let mut out = Vec::with_capacity(nodes.len());

    for node in nodes {
        match node {
            HtNode::Text(text) => out.push(HtNode::Text(text)),
            HtNode::Element(element) => {
                if schema.strips_content(&element.tag_name) {
                    continue;
                }
                if !schema.allows_tag(&element.tag_name) {
                    // Unwrap: the children are promoted to this position.
                    out.extend(sanitize_nodes(element.children, schema));
                    continue;
                }

                let mut element = element;
                element.properties =
                    filter_properties(&element.tag_name, element.properties, schema);
                element.children = sanitize_nodes(element.children, schema);
                out.push(HtNode::Element(element));
            }
        }
    }

    out
}

fn filter_properties(
    tag: &str,
    properties: BTreeMap<String, String>,
    schema: &SanitizeSchema,
) -> BTreeMap<String, String> {
    properties
        .into_iter()
        .filter_map(|(name, value)| {
            // Event handlers are never eligible, regardless of schema contents.
            if name.starts_with("on") {
                return None;
            }
            if !schema.allows_attribute(tag, &name) {
                return None;
            }
            if schema.is_url_attribute(&name) && !allowed_url(&value, schema) {
                return None;
            }
            if name == "style" {
                return sanitize_style_attribute(&value).map(|clean| (name, clean));
            }
            Some((name, value))
        })
        .collect()
}

/// Relative references (including bare note ids) pass; absolute URLs must
/// carry an allow-listed scheme.
fn allowed_url(value: &str, schema: &SanitizeSchema) -> bool {
    match Url::parse(value) {
        Ok(url) => schema.allows_scheme(url.scheme()),
        Err(_) => true,
    }
}

fn sanitize_style_attribute(value: &str) -> Option<String> {
    let mut sanitized = Vec::new();

    for declaration in value.split(';') {
        let decl = declaration.trim();
        if decl.is_empty() {
            continue;
        }

        if is_safe_style_declaration(decl) {
            sanitized.push(decl);
        }
    }

    if sanitized.is_empty() {
        None
    } else {
        Some(sanitized.join("; "))
    }
}

fn is_safe_style_declaration(decl: &str) -> bool {
    let lower = decl.to_ascii_lowercase();

    const FORBIDDEN_SUBSTRINGS: [&str; 7] = [
        "expression(",
        "javascript:",
        "vbscript:",
        "-moz-binding",
        "behavior:",
        "behaviour:",
        "@import",
    ];

    if FORBIDDEN_SUBSTRINGS
        .iter()
        .any(|needle| lower.contains(needle))
    {
        return false;
    }

    !contains_unsafe_url(&lower)
}

fn contains_unsafe_url(lower_decl: &str) -> bool {
    let mut offset = 0;

    while let Some(start) = lower_decl[offset..].find("url(") {
        let open = offset + start + 4;
        let rest = &lower_decl[open..];
        if let Some(close_rel) = rest.find(')') {
            let close = open + close_rel;
            let target = &lower_decl[open..close];
            let trimmed = target.trim_matches(|c: char| c.is_whitespace() || c == '\'');
            let trimmed = trimmed.trim_matches('"');

            if is_unsafe_url(trimmed) {
                return true;
            }

            offset = close + 1;
        } else {
            // malformed url, treat as unsafe
            return true;
        }
    }

    false
}

fn is_unsafe_url(url: &str) -> bool {
    if url.starts_with("data:image/") {
        return false;
    }

    url.starts_with("javascript:")
        || url.starts_with("vbscript:")
        || url.starts_with("data:")
        || url.starts_with("file:")
        || url.contains("javascript:")
        || url.contains("vbscript:")
}
