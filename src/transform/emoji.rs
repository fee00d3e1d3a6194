//! Stage 1: `:shortcode:` expansion in text nodes.
//!
//! Code spans and code blocks are distinct node kinds, so their literals are
//! never touched.

use crate::syntax::{SyntaxKind, SyntaxNode};

pub(super) fn expand_shortcodes(root: &mut SyntaxNode) {
    root.walk_mut(&mut |node| {
        if let SyntaxKind::Text(text) = &mut node.kind
            && text.contains(':')
        {
            *text = expand(text);
        }
    });
}

fn expand(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find(':') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];

        match after.find(':') {
            Some(end) if end > 0 && is_shortcode(&after[..end]) => {
                if let Some(emoji) = emojis::get_by_shortcode(&after[..end]) {
                    out.push_str(emoji.as_str());
                    rest = &after[end + 1..];
                    continue;
                }
                out.push(':');
                rest = after;
            }
            _ => {
                out.push(':');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

fn is_shortcode(candidate: &str) -> bool {
    candidate.chars().all(|ch| {
        ch.is_ascii_lowercase() || ch.is_ascii_digit() || matches!(ch, '_' | '+' | '-')
    })
}
