//! Stage 2: `:::kind` fenced admonition blocks.
//!
//! The opening marker may carry a title (`:::warning Check twice`). A block
//! closes at a paragraph whose last line is `:::`; the marker pair may also
//! live inside a single paragraph. Unterminated or unknown markers are left
//! exactly as parsed.

use crate::syntax::{AdmonitionKind, SyntaxKind, SyntaxNode};

pub(super) fn recognize_blocks(root: &mut SyntaxNode) {
    for child in &mut root.children {
        recognize_blocks(child);
    }

    if root.children.is_empty() {
        return;
    }

    let children = std::mem::take(&mut root.children);
    root.children = rewrite_sequence(children);
}

struct OpenMarker {
    kind: AdmonitionKind,
    title: Option<String>,
}

fn rewrite_sequence(children: Vec<SyntaxNode>) -> Vec<SyntaxNode> {
    let mut out = Vec::with_capacity(children.len());
    let mut index = 0;

    while index < children.len() {
        let child = &children[index];
        if let Some(open) = opening_marker(child) {
            if let Some(block) = single_paragraph_block(child, &open) {
                out.push(block);
                index += 1;
                continue;
            }

            if let Some(close) =
                (index + 1..children.len()).find(|&j| closes_block(&children[j]))
            {
                out.push(spanning_block(&children[index..=close], &open));
                index = close + 1;
                continue;
            }
        }

        out.push(child.clone());
        index += 1;
    }

    out
}

fn opening_marker(node: &SyntaxNode) -> Option<OpenMarker> {
    if !matches!(node.kind, SyntaxKind::Paragraph) {
        return None;
    }

    let SyntaxKind::Text(text) = &node.children.first()?.kind else {
        return None;
    };
    let rest = text.strip_prefix(":::")?;
    let mut words = rest.trim().splitn(2, char::is_whitespace);
    let kind = AdmonitionKind::from_marker(words.next()?)?;
    let title = words
        .next()
        .map(|title| title.trim().to_string())
        .filter(|title| !title.is_empty());

    Some(OpenMarker { kind, title })
}

fn closes_block(node: &SyntaxNode) -> bool {
    if !matches!(node.kind, SyntaxKind::Paragraph) {
        return false;
    }
    matches!(&node.children.last(), Some(last) if is_close_marker(last))
}

fn is_close_marker(node: &SyntaxNode) -> bool {
    matches!(&node.kind, SyntaxKind::Text(text) if text.trim() == ":::")
}

fn new_block(open: &OpenMarker, position: Option<crate::syntax::Position>) -> SyntaxNode {
    let mut block = SyntaxNode::new(SyntaxKind::Admonition { kind: open.kind });
    block.position = position;
    if let Some(title) = &open.title {
        block
            .attributes
            .insert("title".to_string(), title.clone());
    }
    block
}

/// Marker pair contained in one paragraph: the close marker is this
/// paragraph's last inline and is not the opening marker itself.
fn single_paragraph_block(node: &SyntaxNode, open: &OpenMarker) -> Option<SyntaxNode> {
    if node.children.len() < 2 || !is_close_marker(node.children.last()?) {
        return None;
    }

    let mut block = new_block(open, node.position);
    let body = trim_breaks(&node.children[1..node.children.len() - 1]);
    if !body.is_empty() {
        block.children.push(paragraph_of(body, node.position));
    }
    Some(block)
}

/// Marker pair spanning several blocks: `nodes` runs from the opening
/// paragraph through the closing one, inclusive.
fn spanning_block(nodes: &[SyntaxNode], open: &OpenMarker) -> SyntaxNode {
    let opening = &nodes[0];
    let closing = &nodes[nodes.len() - 1];
    let mut block = new_block(open, opening.position);

    let lead = trim_breaks(&opening.children[1..]);
    if !lead.is_empty() {
        block.children.push(paragraph_of(lead, opening.position));
    }

    for middle in &nodes[1..nodes.len() - 1] {
        block.children.push(middle.clone());
    }

    let tail = trim_breaks(&closing.children[..closing.children.len() - 1]);
    if !tail.is_empty() {
        block.children.push(paragraph_of(tail, closing.position));
    }

    block
}

fn paragraph_of(inlines: Vec<SyntaxNode>, position: Option<crate::syntax::Position>) -> SyntaxNode {
    let mut paragraph = SyntaxNode::new(SyntaxKind::Paragraph);
    paragraph.position = position;
    paragraph.children = inlines;
    paragraph
}

/// Drop the soft/hard breaks that separated the markers from the body.
fn trim_breaks(inlines: &[SyntaxNode]) -> Vec<SyntaxNode> {
    let is_break =
        |node: &SyntaxNode| matches!(node.kind, SyntaxKind::SoftBreak | SyntaxKind::LineBreak);

    let start = inlines.iter().position(|n| !is_break(n));
    let end = inlines.iter().rposition(|n| !is_break(n));
    match (start, end) {
        (Some(start), Some(end)) => inlines[start..=end].to_vec(),
        _ => Vec::new(),
    }
}
