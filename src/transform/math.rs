//! Stage 3: math span/block normalization.
//!
//! Parsed math spans are trimmed and flagged; rendering happens later at the
//! hypertext stage. Empty spans degrade back to their literal text.

use super::TransformOutcome;
use crate::syntax::{SyntaxKind, SyntaxNode};

pub(super) fn normalize_math(root: &mut SyntaxNode, outcome: &mut TransformOutcome) {
    root.walk_mut(&mut |node| {
        let SyntaxKind::Math { literal, display } = &node.kind else {
            return;
        };
        let display = *display;
        let trimmed = literal.trim().to_string();

        if trimmed.is_empty() {
            let delimiter = if display { "$$" } else { "$" };
            node.kind = SyntaxKind::Text(format!("{delimiter}{literal}{delimiter}"));
        } else {
            node.kind = SyntaxKind::Math {
                literal: trimmed,
                display,
            };
            outcome.contains_math = true;
        }
    });
}
