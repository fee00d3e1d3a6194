//! Stage 4: diagram recognition over fenced code blocks.
//!
//! Two independent recognizers. Remote directives cover the diagram
//! languages a rendering server understands; the block keeps its payload and
//! gains the server callout URL. Chart directives (`chart`, `chart(yaml)`,
//! `flowchart`, `mermaid`) become typed blocks rendered by embedded
//! components.

use tracing::warn;
use url::Url;

use super::TransformOutcome;
use crate::error::RenderError;
use crate::syntax::{ChartDirective, SyntaxKind, SyntaxNode};

/// Fence languages forwarded to the remote rendering server. `mermaid` is
/// absent on purpose: it belongs to the embedded chart family below.
const REMOTE_LANGUAGES: &[&str] = &[
    "plantuml",
    "c4plantuml",
    "graphviz",
    "dot",
    "ditaa",
    "blockdiag",
    "seqdiag",
    "actdiag",
    "nwdiag",
    "packetdiag",
    "rackdiag",
    "erd",
    "nomnoml",
    "svgbob",
    "wavedrom",
];

pub(super) fn recognize_remote_directives(
    root: &mut SyntaxNode,
    endpoint: &Url,
    outcome: &mut TransformOutcome,
) {
    root.walk_mut(&mut |node| {
        let rewrite = match &node.kind {
            SyntaxKind::CodeBlock { info, literal } => {
                remote_language(info).map(|language| (language.to_string(), literal.clone()))
            }
            _ => None,
        };

        let Some((language, payload)) = rewrite else {
            return;
        };

        match callout_url(endpoint, &language) {
            Ok(callout_url) => {
                outcome.contains_diagram = true;
                node.kind = SyntaxKind::RemoteDiagram {
                    language,
                    callout_url,
                    payload,
                };
            }
            Err(err) => {
                warn!(
                    target: "taccuino::render::diagrams",
                    language = %language,
                    error = %err,
                    "diagram endpoint unusable; keeping code block"
                );
            }
        }
    });
}

pub(super) fn recognize_chart_blocks(root: &mut SyntaxNode, outcome: &mut TransformOutcome) {
    root.walk_mut(&mut |node| {
        let rewrite = match &node.kind {
            SyntaxKind::CodeBlock { info, literal } => {
                chart_directive(info).map(|(directive, yaml)| (directive, yaml, literal.clone()))
            }
            _ => None,
        };

        if let Some((directive, yaml_flavored, payload)) = rewrite {
            outcome.contains_diagram = true;
            node.kind = SyntaxKind::ChartBlock {
                directive,
                payload,
                yaml_flavored,
            };
        }
    });
}

fn remote_language(info: &str) -> Option<&str> {
    let first = info.split_whitespace().next()?;
    let language = first.strip_prefix("kroki-").unwrap_or(first);
    REMOTE_LANGUAGES.contains(&language).then_some(language)
}

fn chart_directive(info: &str) -> Option<(ChartDirective, bool)> {
    match info.split_whitespace().next()? {
        "chart" => Some((ChartDirective::Chart, false)),
        "chart(yaml)" => Some((ChartDirective::Chart, true)),
        "flowchart" => Some((ChartDirective::Flowchart, false)),
        "mermaid" => Some((ChartDirective::Mermaid, false)),
        _ => None,
    }
}

fn callout_url(endpoint: &Url, language: &str) -> Result<String, RenderError> {
    let mut url = endpoint.clone();
    url.path_segments_mut()
        .map_err(|()| RenderError::DiagramEndpoint {
            message: format!("`{endpoint}` cannot carry diagram paths"),
        })?
        .pop_if_empty()
        .push(language)
        .push("svg");
    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::parse;

    fn kroki() -> Url {
        Url::parse("https://kroki.io").expect("endpoint")
    }

    fn find<'a>(
        node: &'a SyntaxNode,
        pred: &impl Fn(&SyntaxNode) -> bool,
    ) -> Option<&'a SyntaxNode> {
        if pred(node) {
            return Some(node);
        }
        node.children.iter().find_map(|child| find(child, pred))
    }

    #[test]
    fn remote_directive_gets_callout_url() {
        let mut tree = parse("```plantuml\nA -> B\n```");
        let mut outcome = TransformOutcome::default();
        recognize_remote_directives(&mut tree, &kroki(), &mut outcome);

        let node = find(&tree, &|n| {
            matches!(n.kind, SyntaxKind::RemoteDiagram { .. })
        })
        .expect("diagram node");
        let SyntaxKind::RemoteDiagram {
            language,
            callout_url,
            payload,
        } = &node.kind
        else {
            unreachable!();
        };
        assert_eq!(language, "plantuml");
        assert_eq!(callout_url, "https://kroki.io/plantuml/svg");
        assert_eq!(payload, "A -> B\n");
        assert!(outcome.contains_diagram);
    }

    #[test]
    fn kroki_prefixed_fences_are_accepted() {
        assert_eq!(remote_language("kroki-graphviz"), Some("graphviz"));
        assert_eq!(remote_language("rust"), None);
    }

    #[test]
    fn chart_yaml_flavor_is_recorded() {
        let mut tree = parse("```chart(yaml)\ntype: bar\n```");
        let mut outcome = TransformOutcome::default();
        recognize_chart_blocks(&mut tree, &mut outcome);

        let node = find(&tree, &|n| matches!(n.kind, SyntaxKind::ChartBlock { .. }))
            .expect("chart node");
        let SyntaxKind::ChartBlock {
            directive,
            payload,
            yaml_flavored,
        } = &node.kind
        else {
            unreachable!();
        };
        assert_eq!(*directive, ChartDirective::Chart);
        assert!(*yaml_flavored);
        assert_eq!(payload, "type: bar\n");
    }

    #[test]
    fn ordinary_code_blocks_pass_through() {
        let mut tree = parse("```rust\nfn main() {}\n```");
        let mut outcome = TransformOutcome::default();
        recognize_remote_directives(&mut tree, &kroki(), &mut outcome);
        recognize_chart_blocks(&mut tree, &mut outcome);

        assert!(find(&tree, &|n| matches!(n.kind, SyntaxKind::CodeBlock { .. })).is_some());
        assert!(!outcome.contains_diagram);
    }
}
