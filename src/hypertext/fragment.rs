//! Permissive raw-markup scanner.
//!
//! Feeds embedded HTML fragments into the shared [`TreeBuilder`]. The
//! contract matches the parser frontend's: malformed input never fails,
//! it degrades to literal text. Raw-text elements (`script`, `style`,
//! `textarea`, `title`) capture their contents verbatim so the sanitizer can
//! judge the whole subtree.

use std::collections::BTreeMap;

use super::{HtElement, HtNode, TreeBuilder, is_void};

const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "textarea", "title"];

enum TagToken {
    Open {
        name: String,
        properties: BTreeMap<String, String>,
        self_closing: bool,
    },
    Close {
        name: String,
    },
    Skip,
}

pub(crate) fn feed(builder: &mut TreeBuilder, input: &str) {
    let mut rest = input;

    while let Some(lt) = rest.find('<') {
        builder.append_text(&decode_entities(&rest[..lt]));
        rest = &rest[lt..];

        let Some((token, consumed)) = scan_tag(rest) else {
            // Not a tag after all: the `<` is literal text.
            builder.append_text("<");
            rest = &rest[1..];
            continue;
        };
        rest = &rest[consumed..];

        match token {
            TagToken::Open {
                name,
                properties,
                self_closing,
            } => {
                let element = HtElement {
                    tag_name: name.clone(),
                    properties,
                    children: Vec::new(),
                };
                if self_closing || is_void(&name) {
                    builder.append(HtNode::Element(element));
                } else if RAW_TEXT_ELEMENTS.contains(&name.as_str()) {
                    let (content, skipped) = raw_text_span(rest, &name);
                    let mut element = element;
                    if !content.is_empty() {
                        element.children.push(HtNode::Text(content));
                    }
                    builder.append(HtNode::Element(element));
                    rest = &rest[skipped..];
                } else {
                    builder.open(element);
                }
            }
            TagToken::Close { name } => builder.close(&name),
            TagToken::Skip => {}
        }
    }

    builder.append_text(&decode_entities(rest));
}

/// Scan one tag at the start of `input` (which begins with `<`). Returns the
/// token and the number of bytes consumed, or `None` when the `<` does not
/// open anything tag-shaped.
fn scan_tag(input: &str) -> Option<(TagToken, usize)> {
    if let Some(after) = input.strip_prefix("<!--") {
        // Comment; an unterminated one swallows the rest of the fragment.
        let consumed = match after.find("-->") {
            Some(end) => 4 + end + 3,
            None => input.len(),
        };
        return Some((TagToken::Skip, consumed));
    }

    if input.starts_with("<!") || input.starts_with("<?") {
        let consumed = match input.find('>') {
            Some(end) => end + 1,
            None => input.len(),
        };
        return Some((TagToken::Skip, consumed));
    }

    if let Some(after) = input.strip_prefix("</") {
        let name = scan_name(after)?;
        let close_at = input.find('>')?;
        return Some((TagToken::Close { name }, close_at + 1));
    }

    let after = &input[1..];
    let name = scan_name(after)?;
    let mut cursor = 1 + name.len();
    let mut properties = BTreeMap::new();

    loop {
        let rest = &input[cursor..];
        let trimmed = rest.trim_start();
        cursor += rest.len() - trimmed.len();

        if input[cursor..].starts_with("/>") {
            return Some((
                TagToken::Open {
                    name,
                    properties,
                    self_closing: true,
                },
                cursor + 2,
            ));
        }
        if input[cursor..].starts_with('>') {
            return Some((
                TagToken::Open {
                    name,
                    properties,
                    self_closing: false,
                },
                cursor + 1,
            ));
        }
        if input[cursor..].is_empty() {
            // Unterminated tag: treat the `<` as literal text.
            return None;
        }

        let (attribute, advanced) = scan_attribute(&input[cursor..])?;
        if let Some((attr_name, attr_value)) = attribute {
            properties.insert(attr_name, attr_value);
        }
        cursor += advanced;
    }
}

fn scan_name(input: &str) -> Option<String> {
    let mut chars = input.chars();
    let first = chars.next()?;
    if !first.is_ascii_alphabetic() {
        return None;
    }

    let tail = input[1..]
        .chars()
        .take_while(|ch| ch.is_ascii_alphanumeric() || *ch == '-')
        .count();
    Some(input[..1 + tail].to_ascii_lowercase())
}

/// Scan one attribute. Returns `None` when no progress can be made (caller
/// then treats the tag as malformed).
fn scan_attribute(input: &str) -> Option<(Option<(String, String)>, usize)> {
    let name_len = input
        .chars()
        .take_while(|ch| !ch.is_whitespace() && !matches!(ch, '=' | '>' | '/'))
        .map(char::len_utf8)
        .sum::<usize>();
    if name_len == 0 {
        // Stray `/` or other noise: consume one char and move on.
        return Some((None, input.chars().next()?.len_utf8()));
    }

    let name = input[..name_len].to_ascii_lowercase();
    let mut cursor = name_len;

    if !input[cursor..].starts_with('=') {
        return Some((Some((name, String::new())), cursor));
    }
    cursor += 1;

    let rest = &input[cursor..];
    if let Some(quote) = rest.chars().next().filter(|ch| matches!(ch, '"' | '\'')) {
        let inner = &rest[1..];
        match inner.find(quote) {
            Some(end) => {
                let value = decode_entities(&inner[..end]);
                Some((Some((name, value)), cursor + 1 + end + 1))
            }
            // Unterminated quote: the whole tag is malformed.
            None => None,
        }
    } else {
        let value_len = rest
            .chars()
            .take_while(|ch| !ch.is_whitespace() && *ch != '>')
            .map(char::len_utf8)
            .sum::<usize>();
        let value = decode_entities(&rest[..value_len]);
        Some((Some((name, value)), cursor + value_len))
    }
}

/// Contents of a raw-text element: everything up to its case-insensitive
/// closing tag, or the rest of the fragment when unterminated.
fn raw_text_span(input: &str, name: &str) -> (String, usize) {
    let closer = format!("</{name}");
    match find_ascii_ci(input, &closer) {
        Some(start) => {
            let content = input[..start].to_string();
            let after = &input[start..];
            let consumed = match after.find('>') {
                Some(gt) => start + gt + 1,
                None => input.len(),
            };
            (content, consumed)
        }
        None => (input.to_string(), input.len()),
    }
}

fn find_ascii_ci(haystack: &str, needle: &str) -> Option<usize> {
    let haystack = haystack.as_bytes();
    let needle = needle.as_bytes();
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    (0..=haystack.len() - needle.len())
        .find(|&i| haystack[i..i + needle.len()].eq_ignore_ascii_case(needle))
}

fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];

        let replaced = [
            ("&amp;", "&"),
            ("&lt;", "<"),
            ("&gt;", ">"),
            ("&quot;", "\""),
            ("&apos;", "'"),
            ("&#39;", "'"),
        ]
        .iter()
        .find_map(|(entity, value)| rest.strip_prefix(entity).map(|tail| (*value, tail)));

        match replaced {
            Some((value, tail)) => {
                out.push_str(value);
                rest = tail;
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
