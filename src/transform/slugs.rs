//! Stage 5: heading slug assignment.

use tracing::warn;

use super::{HeadingEntry, TransformOutcome};
use crate::domain::slug::HeadingSlugger;
use crate::syntax::{SyntaxKind, SyntaxNode};

const FALLBACK_ANCHOR: &str = "section";

pub(super) fn assign_heading_ids(root: &mut SyntaxNode, outcome: &mut TransformOutcome) {
    let mut slugger = HeadingSlugger::new();

    root.walk_mut(&mut |node| {
        let SyntaxKind::Heading { level } = node.kind else {
            return;
        };

        let text = normalize_whitespace(&node.text_content());
        let slug = match slugger.anchor_for(&text) {
            Ok(slug) => slug,
            Err(err) => {
                warn!(
                    target: "taccuino::render::slugs",
                    heading = %text,
                    error = %err,
                    "heading produced no slug; using fallback anchor"
                );
                slugger
                    .anchor_for(FALLBACK_ANCHOR)
                    .unwrap_or_else(|_| FALLBACK_ANCHOR.to_string())
            }
        };

        node.attributes.insert("id".to_string(), slug.clone());
        outcome.headings.push(HeadingEntry { level, slug, text });
    });
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::parse;

    #[test]
    fn duplicate_headings_receive_distinct_ids() {
        let mut tree = parse("## Overview\n\n## Overview");
        let mut outcome = TransformOutcome::default();
        assign_heading_ids(&mut tree, &mut outcome);

        let slugs: Vec<_> = outcome.headings.iter().map(|h| h.slug.as_str()).collect();
        assert_eq!(slugs, vec!["overview", "overview-1"]);
    }

    #[test]
    fn empty_heading_falls_back() {
        let mut tree = parse("## \u{00a0}\n\nbody");
        let mut outcome = TransformOutcome::default();
        assign_heading_ids(&mut tree, &mut outcome);

        for heading in &outcome.headings {
            assert!(!heading.slug.is_empty());
        }
    }

    #[test]
    fn heading_entry_keeps_level_and_text() {
        let mut tree = parse("### Install `cargo`");
        let mut outcome = TransformOutcome::default();
        assign_heading_ids(&mut tree, &mut outcome);

        assert_eq!(outcome.headings.len(), 1);
        assert_eq!(outcome.headings[0].level, 3);
        assert_eq!(outcome.headings[0].text, "Install cargo");
        assert_eq!(outcome.headings[0].slug, "install-cargo");
    }
}
