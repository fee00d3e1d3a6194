//! Ordered syntax-tree transform chain.
//!
//! Stages run in a fixed order because later stages depend on earlier
//! annotations. Every stage is total: when the construct it targets is
//! absent, the stage is a no-op, and a stage-internal failure degrades the
//! affected node instead of aborting the pass.

mod admonition;
mod diagrams;
mod emoji;
mod math;
mod positions;
mod slugs;

use url::Url;

use crate::syntax::SyntaxNode;

/// One table-of-contents entry collected while assigning heading slugs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingEntry {
    pub level: u8,
    pub slug: String,
    pub text: String,
}

/// Side outputs of the transform chain, consumed by the pipeline output.
#[derive(Debug, Default, Clone)]
pub struct TransformOutcome {
    pub headings: Vec<HeadingEntry>,
    pub contains_math: bool,
    pub contains_diagram: bool,
}

/// Run the full chain over the tree.
pub fn apply(root: &mut SyntaxNode, diagram_endpoint: &Url) -> TransformOutcome {
    let mut outcome = TransformOutcome::default();

    emoji::expand_shortcodes(root);
    admonition::recognize_blocks(root);
    math::normalize_math(root, &mut outcome);
    diagrams::recognize_remote_directives(root, diagram_endpoint, &mut outcome);
    diagrams::recognize_chart_blocks(root, &mut outcome);
    slugs::assign_heading_ids(root, &mut outcome);
    positions::stamp_lines(root);

    outcome
}
