//! Built-in tag handlers.

use async_trait::async_trait;

use super::{DispatchContext, LinkTarget, NodeHandler, UiNode, passthrough};
use crate::domain::note_link;
use crate::hypertext::{HtElement, HtNode};
use crate::syntax::ChartDirective;

/// `img`: attachment keys render through the attachment component, anything
/// else through the generic expandable image. A missing attachment degrades
/// to the generic image, unreported.
pub(super) struct ImgHandler;

#[async_trait]
impl NodeHandler for ImgHandler {
    async fn render(
        &self,
        element: &HtElement,
        _children: Vec<UiNode>,
        cx: &mut DispatchContext<'_>,
    ) -> UiNode {
        let src = element.property("src").unwrap_or_default().to_string();
        let alt = element.property("alt").unwrap_or_default().to_string();

        if !src.is_empty() && !src.contains('/') {
            if let Some(metadata) = cx.workspace.attachment(&src).await {
                return UiNode::AttachmentImage {
                    key: src,
                    metadata,
                    alt,
                };
            }
        }

        UiNode::ExpandableImage {
            src,
            alt,
            title: element.property("title").map(str::to_string),
        }
    }
}

/// `a`: classify the href; the view resolves note targets through
/// [`super::LinkRouter`] on click. The anchor always renders.
pub(super) struct AnchorHandler;

#[async_trait]
impl NodeHandler for AnchorHandler {
    async fn render(
        &self,
        element: &HtElement,
        children: Vec<UiNode>,
        _cx: &mut DispatchContext<'_>,
    ) -> UiNode {
        let href = element.property("href").unwrap_or_default().to_string();
        let target = if note_link::looks_like_note_id(&href) {
            LinkTarget::Note { note_id: href }
        } else {
            LinkTarget::External { url: href }
        };

        UiNode::Link {
            target,
            properties: element.properties.clone(),
            children,
        }
    }
}

/// `input`: checkboxes become interactive and consume the pass-local index
/// counter; every other input type passes through unchanged.
pub(super) struct InputHandler;

#[async_trait]
impl NodeHandler for InputHandler {
    async fn render(
        &self,
        element: &HtElement,
        children: Vec<UiNode>,
        cx: &mut DispatchContext<'_>,
    ) -> UiNode {
        if element.property("type") != Some("checkbox") {
            return passthrough(element, children);
        }

        UiNode::Checkbox {
            index: cx.next_checkbox_index(),
            checked: element.property("checked").is_some(),
        }
    }
}

/// `pre`: hand the fence to the code component together with the configured
/// highlighting theme.
pub(super) struct PreHandler;

#[async_trait]
impl NodeHandler for PreHandler {
    async fn render(
        &self,
        element: &HtElement,
        _children: Vec<UiNode>,
        cx: &mut DispatchContext<'_>,
    ) -> UiNode {
        let language = element
            .property("data-language")
            .map(str::to_string)
            .or_else(|| language_from_code_child(element));

        UiNode::CodeFence {
            language,
            code: element.text_content(),
            theme: cx.config.code_block_theme.clone(),
        }
    }
}

fn language_from_code_child(element: &HtElement) -> Option<String> {
    element.children.iter().find_map(|child| match child {
        HtNode::Element(code) if code.tag_name == "code" => code
            .property("class")?
            .split_whitespace()
            .find_map(|class| class.strip_prefix("language-"))
            .map(str::to_string),
        _ => None,
    })
}

/// `div`: chart and remote-diagram placeholders become their components;
/// every other div stays a generic container.
pub(super) struct DivHandler;

#[async_trait]
impl NodeHandler for DivHandler {
    async fn render(
        &self,
        element: &HtElement,
        children: Vec<UiNode>,
        _cx: &mut DispatchContext<'_>,
    ) -> UiNode {
        if let Some(directive) = element.property("data-chart") {
            let directive = match directive {
                "chart" => ChartDirective::Chart,
                "flowchart" => ChartDirective::Flowchart,
                "mermaid" => ChartDirective::Mermaid,
                _ => return passthrough(element, children),
            };
            return UiNode::Chart {
                directive,
                payload: element.text_content(),
                yaml_flavored: element.property("data-chart-flavor") == Some("yaml"),
            };
        }

        if let Some(language) = element.property("data-diagram-remote") {
            return UiNode::RemoteDiagram {
                language: language.to_string(),
                callout_url: element
                    .property("data-diagram-url")
                    .unwrap_or_default()
                    .to_string(),
                payload: element.text_content(),
            };
        }

        passthrough(element, children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RenderConfig;
    use crate::dispatch::NodeDispatcher;
    use crate::domain::attachments::{AttachmentMetadata, AttachmentSource};
    use crate::workspace::{StorageId, Workspace};

    struct StubWorkspace;

    #[async_trait]
    impl Workspace for StubWorkspace {
        fn active_storage(&self) -> Option<StorageId> {
            None
        }

        fn storages(&self) -> Vec<StorageId> {
            Vec::new()
        }

        async fn resolve_note_path(&self, _storage: &str, _note_id: &str) -> Option<String> {
            None
        }

        async fn attachment(&self, key: &str) -> Option<AttachmentMetadata> {
            (key == "paste-1f2d3c").then(|| AttachmentMetadata {
                id: "att-1".to_string(),
                content_type: "image/png".to_string(),
                source: AttachmentSource::Store {
                    object_key: "paste-1f2d3c.png".to_string(),
                },
            })
        }
    }

    fn img(src: &str) -> HtNode {
        let mut element = HtElement::new("img");
        element
            .properties
            .insert("src".to_string(), src.to_string());
        element
            .properties
            .insert("alt".to_string(), "shot".to_string());
        HtNode::Element(element)
    }

    async fn dispatch_one(node: HtNode) -> UiNode {
        let dispatcher = NodeDispatcher::new();
        let config = RenderConfig::new("dark", "monokai");
        let workspace = StubWorkspace;
        let mut cx = DispatchContext::new(&workspace, &config);
        let mut nodes = dispatcher.dispatch(&[node], &mut cx).await;
        nodes.remove(0)
    }

    #[tokio::test]
    async fn attachment_key_renders_attachment_image() {
        let rendered = dispatch_one(img("paste-1f2d3c")).await;
        let UiNode::AttachmentImage { key, metadata, alt } = rendered else {
            panic!("expected attachment image, got {rendered:?}");
        };
        assert_eq!(key, "paste-1f2d3c");
        assert_eq!(metadata.id, "att-1");
        assert_eq!(alt, "shot");
    }

    #[tokio::test]
    async fn path_src_renders_expandable_image() {
        let rendered = dispatch_one(img("shots/app.png")).await;
        assert!(matches!(rendered, UiNode::ExpandableImage { src, .. } if src == "shots/app.png"));
    }

    #[tokio::test]
    async fn unknown_attachment_key_degrades_to_expandable_image() {
        let rendered = dispatch_one(img("paste-missing99")).await;
        assert!(matches!(rendered, UiNode::ExpandableImage { .. }));
    }

    #[tokio::test]
    async fn note_hrefs_classify_as_note_targets() {
        let mut anchor = HtElement::new("a");
        anchor.properties.insert(
            "href".to_string(),
            "7def6396-0d9c-4efc-a7b2-0f9c1a3318b5".to_string(),
        );
        let rendered = dispatch_one(HtNode::Element(anchor)).await;
        let UiNode::Link { target, .. } = rendered else {
            panic!("expected link, got {rendered:?}");
        };
        assert_eq!(
            target,
            LinkTarget::Note {
                note_id: "7def6396-0d9c-4efc-a7b2-0f9c1a3318b5".to_string()
            }
        );
    }

    #[tokio::test]
    async fn non_checkbox_inputs_pass_through() {
        let mut input = HtElement::new("input");
        input
            .properties
            .insert("type".to_string(), "text".to_string());
        let rendered = dispatch_one(HtNode::Element(input)).await;
        assert!(matches!(rendered, UiNode::Element { tag_name, .. } if tag_name == "input"));
    }

    #[tokio::test]
    async fn pre_blocks_become_code_fences_with_theme() {
        let mut code = HtElement::new("code");
        code.properties
            .insert("class".to_string(), "language-rust".to_string());
        code.children
            .push(HtNode::Text("fn main() {}\n".to_string()));
        let mut pre = HtElement::new("pre");
        pre.children.push(HtNode::Element(code));

        let rendered = dispatch_one(HtNode::Element(pre)).await;
        let UiNode::CodeFence {
            language,
            code,
            theme,
        } = rendered
        else {
            panic!("expected code fence");
        };
        assert_eq!(language.as_deref(), Some("rust"));
        assert_eq!(code, "fn main() {}\n");
        assert_eq!(theme, "monokai");
    }

    #[tokio::test]
    async fn chart_divs_become_chart_nodes() {
        let mut div = HtElement::new("div");
        div.properties
            .insert("data-chart".to_string(), "chart".to_string());
        div.properties
            .insert("data-chart-flavor".to_string(), "yaml".to_string());
        div.children.push(HtNode::Text("type: bar\n".to_string()));

        let rendered = dispatch_one(HtNode::Element(div)).await;
        let UiNode::Chart {
            directive,
            payload,
            yaml_flavored,
        } = rendered
        else {
            panic!("expected chart");
        };
        assert_eq!(directive, ChartDirective::Chart);
        assert_eq!(payload, "type: bar\n");
        assert!(yaml_flavored);
    }

    #[tokio::test]
    async fn plain_divs_stay_generic_containers() {
        let mut div = HtElement::new("div");
        div.children.push(HtNode::Text("x".to_string()));
        let rendered = dispatch_one(HtNode::Element(div)).await;
        assert!(matches!(rendered, UiNode::Element { tag_name, .. } if tag_name == "div"));
    }
}
