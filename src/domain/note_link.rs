//! Internal note cross-link tokens.
//!
//! Note links are written as `[title](:note:<id>)` in the source. The parser
//! cannot treat the prefixed form as a link target, so a pre-pass strips the
//! marker before parsing and the anchor handler re-classifies the bare id at
//! dispatch time.

/// Marker prepended to note ids inside link targets.
pub const NOTE_ID_PREFIX: &str = ":note:";

const MIN_NOTE_ID_LEN: usize = 8;
const MAX_NOTE_ID_LEN: usize = 64;

/// Remove note-id markers from every inline link target.
///
/// Repeated markers are stripped in a single pass, so the rewrite is
/// idempotent: running it twice yields the same result as once.
pub fn strip_note_id_prefixes(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut rest = source;

    while let Some(pos) = rest.find("](") {
        let after = pos + 2;
        out.push_str(&rest[..after]);
        rest = &rest[after..];
        while let Some(stripped) = rest.strip_prefix(NOTE_ID_PREFIX) {
            rest = stripped;
        }
    }

    out.push_str(rest);
    out
}

/// Inverse of the pre-pass for a single identifier: re-attach the marker.
pub fn prefix_note_id(note_id: &str) -> String {
    format!("{NOTE_ID_PREFIX}{note_id}")
}

/// Structural predicate distinguishing note ids from ordinary URLs.
///
/// A note id has no path separator, no scheme, and consists of id characters
/// only (letters, digits, `-`, `_`) within a bounded length.
pub fn looks_like_note_id(href: &str) -> bool {
    let len = href.len();
    if !(MIN_NOTE_ID_LEN..=MAX_NOTE_ID_LEN).contains(&len) {
        return false;
    }

    href.chars()
        .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_marker_from_link_target() {
        let source = "See [other note](:note:03330bd0-9e32-4b9c-a111-3c8a3bffa8f3).";
        let rewritten = strip_note_id_prefixes(source);
        assert_eq!(
            rewritten,
            "See [other note](03330bd0-9e32-4b9c-a111-3c8a3bffa8f3)."
        );
    }

    #[test]
    fn strip_is_idempotent() {
        let source = "[a](:note::note:abcdef0123) and [b](https://example.com)";
        let once = strip_note_id_prefixes(source);
        let twice = strip_note_id_prefixes(&once);
        assert_eq!(once, "[a](abcdef0123) and [b](https://example.com)");
        assert_eq!(once, twice);
    }

    #[test]
    fn strip_then_prefix_round_trips() {
        let token = ":note:7def6396-0d9c-4efc-a7b2-0f9c1a3318b5";
        let source = format!("[x]({token})");
        let rewritten = strip_note_id_prefixes(&source);
        let id = &rewritten["[x](".len()..rewritten.len() - 1];
        assert_eq!(prefix_note_id(id), token);
    }

    #[test]
    fn predicate_accepts_ids_and_rejects_urls() {
        assert!(looks_like_note_id("7def6396-0d9c-4efc-a7b2-0f9c1a3318b5"));
        assert!(looks_like_note_id("c2h5oh_note_0001"));
        assert!(!looks_like_note_id("https://example.com/page"));
        assert!(!looks_like_note_id("../relative/path"));
        assert!(!looks_like_note_id("img.png"));
        assert!(!looks_like_note_id("short"));
    }
}
