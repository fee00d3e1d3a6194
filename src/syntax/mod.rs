//! Owned syntax tree produced by the parser frontend and rewritten by the
//! transform chain.
//!
//! Every node is a tagged variant plus a generic attribute map, an ordered
//! child list, and an optional parse position. The tree is acyclic, rooted
//! and finite by construction (children are owned values).

mod parser;

use std::collections::BTreeMap;

pub use parser::parse;

/// Line/column of the first character of a node in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

/// Callout directives handled by embedded chart components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartDirective {
    Chart,
    Flowchart,
    Mermaid,
}

impl ChartDirective {
    pub fn as_str(self) -> &'static str {
        match self {
            ChartDirective::Chart => "chart",
            ChartDirective::Flowchart => "flowchart",
            ChartDirective::Mermaid => "mermaid",
        }
    }
}

/// Admonition callout kinds, in the order they render icons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmonitionKind {
    Note,
    Tip,
    Important,
    Warning,
    Danger,
}

impl AdmonitionKind {
    /// Parse the word following the `:::` marker.
    pub fn from_marker(word: &str) -> Option<Self> {
        match word {
            "note" => Some(AdmonitionKind::Note),
            "tip" => Some(AdmonitionKind::Tip),
            "important" => Some(AdmonitionKind::Important),
            "warning" => Some(AdmonitionKind::Warning),
            "danger" => Some(AdmonitionKind::Danger),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AdmonitionKind::Note => "note",
            AdmonitionKind::Tip => "tip",
            AdmonitionKind::Important => "important",
            AdmonitionKind::Warning => "warning",
            AdmonitionKind::Danger => "danger",
        }
    }

    /// Icon name rendered in the block header.
    pub fn icon(self) -> &'static str {
        match self {
            AdmonitionKind::Note => "info",
            AdmonitionKind::Tip => "bulb",
            AdmonitionKind::Important => "exclamation",
            AdmonitionKind::Warning => "alert-triangle",
            AdmonitionKind::Danger => "flame",
        }
    }
}

/// Closed variant set of the syntax tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxKind {
    Document,
    Paragraph,
    Heading {
        level: u8,
    },
    Text(String),
    Emphasis,
    Strong,
    Strikethrough,
    Code(String),
    CodeBlock {
        info: String,
        literal: String,
    },
    HtmlBlock(String),
    HtmlInline(String),
    Link {
        url: String,
        title: String,
    },
    Image {
        url: String,
        title: String,
    },
    BlockQuote,
    List {
        ordered: bool,
        start: usize,
    },
    Item {
        /// `Some(checked)` for GFM task-list items.
        task: Option<bool>,
    },
    Table,
    TableRow {
        header: bool,
    },
    TableCell,
    Math {
        literal: String,
        display: bool,
    },
    ThematicBreak,
    SoftBreak,
    LineBreak,
    // Introduced by the transform chain; never produced by the parser.
    Admonition {
        kind: AdmonitionKind,
    },
    ChartBlock {
        directive: ChartDirective,
        payload: String,
        yaml_flavored: bool,
    },
    RemoteDiagram {
        language: String,
        callout_url: String,
        payload: String,
    },
}

/// One node of the syntax tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxNode {
    pub kind: SyntaxKind,
    pub attributes: BTreeMap<String, String>,
    pub children: Vec<SyntaxNode>,
    pub position: Option<Position>,
}

impl SyntaxNode {
    pub fn new(kind: SyntaxKind) -> Self {
        Self {
            kind,
            attributes: BTreeMap::new(),
            children: Vec::new(),
            position: None,
        }
    }

    pub fn with_position(kind: SyntaxKind, position: Position) -> Self {
        Self {
            kind,
            attributes: BTreeMap::new(),
            children: Vec::new(),
            position: Some(position),
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self::new(SyntaxKind::Text(content.into()))
    }

    /// Collect the plain text of this subtree (text and inline code).
    pub fn text_content(&self) -> String {
        fn walk(node: &SyntaxNode, buffer: &mut String) {
            match &node.kind {
                SyntaxKind::Text(text) => buffer.push_str(text),
                SyntaxKind::Code(literal) => buffer.push_str(literal),
                SyntaxKind::SoftBreak | SyntaxKind::LineBreak => buffer.push(' '),
                _ => {}
            }
            for child in &node.children {
                walk(child, buffer);
            }
        }

        let mut text = String::new();
        walk(self, &mut text);
        text
    }

    /// Visit the subtree in pre-order, mutably.
    pub fn walk_mut(&mut self, visit: &mut impl FnMut(&mut SyntaxNode)) {
        visit(self);
        for child in &mut self.children {
            child.walk_mut(visit);
        }
    }
}
