//! Stage 6: `data-line` position annotation.
//!
//! Reverse-lookup features outside this crate (synchronized scrolling)
//! resolve rendered elements back to source lines through this attribute.

use crate::syntax::SyntaxNode;

pub(super) fn stamp_lines(root: &mut SyntaxNode) {
    root.walk_mut(&mut |node| {
        if let Some(position) = node.position {
            node.attributes
                .entry("data-line".to_string())
                .or_insert_with(|| position.line.to_string());
        }
    });
}
