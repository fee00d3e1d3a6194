//! Checkbox toggles written back into the markdown source.

use tracing::warn;

use crate::workspace::ContentSink;

/// Flip the nth task marker (`- [ ]` / `- [x]`) of the source, counting from
/// zero in document order. Returns `None` when the index is out of range,
/// which happens when the source changed under a stale tree.
pub fn toggle_task_at(source: &str, index: usize) -> Option<String> {
    let mut remaining = index;
    let mut offset = 0;

    for line in source.split_inclusive('\n') {
        if let Some(marker) = task_state_offset(line) {
            if remaining == 0 {
                let at = offset + marker;
                let state = &source[at..at + 1];
                let flipped = if state == " " { "x" } else { " " };

                let mut out = String::with_capacity(source.len());
                out.push_str(&source[..at]);
                out.push_str(flipped);
                out.push_str(&source[at + 1..]);
                return Some(out);
            }
            remaining -= 1;
        }
        offset += line.len();
    }

    None
}

/// Byte offset, within the line, of the state character inside `[ ]`/`[x]`.
fn task_state_offset(line: &str) -> Option<usize> {
    let trimmed = line.trim_start();
    let indent = line.len() - trimmed.len();

    let after_bullet = trimmed
        .strip_prefix("- ")
        .or_else(|| trimmed.strip_prefix("* "))
        .or_else(|| trimmed.strip_prefix("+ "))?;
    let state = after_bullet.strip_prefix('[')?;
    let ch = state.chars().next()?;
    if !matches!(ch, ' ' | 'x' | 'X') || !state[ch.len_utf8()..].starts_with(']') {
        return None;
    }

    Some(indent + 3)
}

/// Apply a toggle and push the updated source through the content sink.
/// Returns whether a marker was actually flipped.
pub async fn toggle_checkbox(source: &str, index: usize, content: &dyn ContentSink) -> bool {
    match toggle_task_at(source, index) {
        Some(updated) => {
            content.update_content(updated).await;
            true
        }
        None => {
            warn!(
                target: "taccuino::render::checkbox",
                index,
                "checkbox index has no matching task marker"
            );
            false
        }
    }
}
