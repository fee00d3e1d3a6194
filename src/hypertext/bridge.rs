//! Syntax tree → hypertext tree.
//!
//! When `allow_raw_markup` is set, raw HTML embedded in the source is parsed
//! and merged into the tree instead of escaped. Admonitions and diagram
//! placeholders rely on this, which is exactly why the sanitizer must run on
//! the bridge's output, never before it.

use tracing::warn;

use super::fragment;
use super::math::render_math_html;
use super::{HtElement, HtNode, TreeBuilder};
use crate::syntax::{SyntaxKind, SyntaxNode};

/// Convert the syntax tree into hypertext nodes.
pub fn to_hypertext(root: &SyntaxNode, allow_raw_markup: bool) -> Vec<HtNode> {
    let mut builder = TreeBuilder::new();
    visit_children(root, &mut builder, allow_raw_markup);
    builder.finish()
}

fn visit_children(node: &SyntaxNode, builder: &mut TreeBuilder, raw: bool) {
    for child in &node.children {
        visit(child, builder, raw);
    }
}

fn visit(node: &SyntaxNode, builder: &mut TreeBuilder, raw: bool) {
    match &node.kind {
        SyntaxKind::Document => visit_children(node, builder, raw),
        SyntaxKind::Paragraph => container(node, "p", builder, raw),
        SyntaxKind::Heading { level } => {
            let tag = heading_tag(*level);
            container(node, tag, builder, raw);
        }
        SyntaxKind::Text(text) => builder.append_text(text),
        SyntaxKind::Emphasis => container(node, "em", builder, raw),
        SyntaxKind::Strong => container(node, "strong", builder, raw),
        SyntaxKind::Strikethrough => container(node, "del", builder, raw),
        SyntaxKind::Code(literal) => {
            let mut code = element_from(node, "code");
            code.children.push(HtNode::Text(literal.clone()));
            builder.append(HtNode::Element(code));
        }
        SyntaxKind::CodeBlock { info, literal } => {
            builder.append(HtNode::Element(code_block_element(node, info, literal)));
        }
        SyntaxKind::HtmlBlock(markup) | SyntaxKind::HtmlInline(markup) => {
            if raw {
                fragment::feed(builder, markup);
            } else {
                builder.append_text(markup);
            }
        }
        SyntaxKind::Link { url, title } => {
            let mut anchor = element_from(node, "a");
            anchor.properties.insert("href".to_string(), url.clone());
            if !title.is_empty() {
                anchor.properties.insert("title".to_string(), title.clone());
            }
            builder.open(anchor);
            visit_children(node, builder, raw);
            builder.close("a");
        }
        SyntaxKind::Image { url, title } => {
            let mut img = element_from(node, "img");
            img.properties.insert("src".to_string(), url.clone());
            img.properties
                .insert("alt".to_string(), node.text_content());
            if !title.is_empty() {
                img.properties.insert("title".to_string(), title.clone());
            }
            builder.append(HtNode::Element(img));
        }
        SyntaxKind::BlockQuote => container(node, "blockquote", builder, raw),
        SyntaxKind::List { ordered, start } => {
            let tag = if *ordered { "ol" } else { "ul" };
            let mut list = element_from(node, tag);
            if *ordered && *start != 1 {
                list.properties
                    .insert("start".to_string(), start.to_string());
            }
            builder.open(list);
            visit_children(node, builder, raw);
            builder.close(tag);
        }
        SyntaxKind::Item { task } => {
            let mut item = element_from(node, "li");
            if task.is_some() {
                item.properties
                    .insert("class".to_string(), "task-list-item".to_string());
            }
            builder.open(item);
            if let Some(checked) = task {
                let mut input = HtElement::new("input");
                input
                    .properties
                    .insert("type".to_string(), "checkbox".to_string());
                if *checked {
                    input.properties.insert("checked".to_string(), String::new());
                }
                builder.append(HtNode::Element(input));
            }
            visit_children(node, builder, raw);
            builder.close("li");
        }
        SyntaxKind::Table => visit_table(node, builder, raw),
        // Rows and cells outside a table wrapper degrade to their content.
        SyntaxKind::TableRow { .. } | SyntaxKind::TableCell => {
            visit_children(node, builder, raw);
        }
        SyntaxKind::Math { literal, display } => visit_math(node, literal, *display, builder),
        SyntaxKind::ThematicBreak => {
            builder.append(HtNode::Element(element_from(node, "hr")));
        }
        SyntaxKind::SoftBreak => builder.append_text("\n"),
        SyntaxKind::LineBreak => builder.append(HtNode::Element(HtElement::new("br"))),
        SyntaxKind::Admonition { kind } => {
            let mut block = element_from(node, "div");
            block.properties.insert(
                "class".to_string(),
                format!("admonition admonition-{}", kind.as_str()),
            );
            block
                .properties
                .insert("data-admonition".to_string(), kind.as_str().to_string());
            block.properties.insert(
                "data-admonition-icon".to_string(),
                kind.icon().to_string(),
            );
            if let Some(title) = block.properties.remove("title") {
                block
                    .properties
                    .insert("data-admonition-title".to_string(), title);
            }
            builder.open(block);
            visit_children(node, builder, raw);
            builder.close("div");
        }
        SyntaxKind::ChartBlock {
            directive,
            payload,
            yaml_flavored,
        } => {
            let mut block = element_from(node, "div");
            block
                .properties
                .insert("data-chart".to_string(), directive.as_str().to_string());
            block.properties.insert(
                "data-chart-flavor".to_string(),
                if *yaml_flavored { "yaml" } else { "json" }.to_string(),
            );
            block.children.push(HtNode::Text(payload.clone()));
            builder.append(HtNode::Element(block));
        }
        SyntaxKind::RemoteDiagram {
            language,
            callout_url,
            payload,
        } => {
            let mut block = element_from(node, "div");
            block
                .properties
                .insert("data-diagram-remote".to_string(), language.clone());
            block
                .properties
                .insert("data-diagram-url".to_string(), callout_url.clone());
            block.children.push(HtNode::Text(payload.clone()));
            builder.append(HtNode::Element(block));
        }
    }
}

fn container(node: &SyntaxNode, tag: &str, builder: &mut TreeBuilder, raw: bool) {
    builder.open(element_from(node, tag));
    visit_children(node, builder, raw);
    builder.close(tag);
}

/// Element seeded with the node's transform-stage attributes (`id`,
/// `data-line`, ...).
fn element_from(node: &SyntaxNode, tag: &str) -> HtElement {
    HtElement {
        tag_name: tag.to_string(),
        properties: node.attributes.clone(),
        children: Vec::new(),
    }
}

fn heading_tag(level: u8) -> &'static str {
    match level {
        1 => "h1",
        2 => "h2",
        3 => "h3",
        4 => "h4",
        5 => "h5",
        _ => "h6",
    }
}

fn code_block_element(node: &SyntaxNode, info: &str, literal: &str) -> HtElement {
    let language = info.split_whitespace().next().filter(|s| !s.is_empty());

    let mut pre = element_from(node, "pre");
    let mut code = HtElement::new("code");
    if let Some(language) = language {
        pre.properties
            .insert("data-language".to_string(), language.to_string());
        code.properties
            .insert("class".to_string(), format!("language-{language}"));
    }
    code.children.push(HtNode::Text(literal.to_string()));
    pre.children.push(HtNode::Element(code));
    pre
}

fn visit_table(node: &SyntaxNode, builder: &mut TreeBuilder, raw: bool) {
    builder.open(element_from(node, "table"));

    let (header_rows, body_rows): (Vec<_>, Vec<_>) =
        node.children.iter().partition(|row| {
            matches!(row.kind, SyntaxKind::TableRow { header: true })
        });

    if !header_rows.is_empty() {
        builder.open(HtElement::new("thead"));
        for row in header_rows {
            visit_table_row(row, builder, raw, true);
        }
        builder.close("thead");
    }
    if !body_rows.is_empty() {
        builder.open(HtElement::new("tbody"));
        for row in body_rows {
            visit_table_row(row, builder, raw, false);
        }
        builder.close("tbody");
    }

    builder.close("table");
}

fn visit_table_row(row: &SyntaxNode, builder: &mut TreeBuilder, raw: bool, header: bool) {
    builder.open(element_from(row, "tr"));
    for cell in &row.children {
        let tag = if header { "th" } else { "td" };
        builder.open(element_from(cell, tag));
        visit_children(cell, builder, raw);
        builder.close(tag);
    }
    builder.close("tr");
}

fn visit_math(node: &SyntaxNode, literal: &str, display: bool, builder: &mut TreeBuilder) {
    let wrapper_tag = if display { "div" } else { "span" };
    let style = if display { "display" } else { "inline" };

    match render_math_html(literal, display) {
        Ok(html) => {
            let mut wrapper = element_from(node, wrapper_tag);
            wrapper
                .properties
                .insert("data-math-style".to_string(), style.to_string());
            builder.open(wrapper);
            fragment::feed(builder, &html);
            builder.close(wrapper_tag);
        }
        Err(err) => {
            warn!(
                target: "taccuino::render::math",
                error = %err,
                "KaTeX rendering failed; falling back to literal"
            );
            let mut fallback = element_from(node, "code");
            fallback
                .properties
                .insert("data-math-style".to_string(), style.to_string());
            fallback.children.push(HtNode::Text(literal.to_string()));
            builder.append(HtNode::Element(fallback));
        }
    }
}
