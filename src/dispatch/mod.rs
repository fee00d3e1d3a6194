//! Node-render dispatch: hypertext tree → UI element tree.
//!
//! Dispatch is by tag name over a fixed handler mapping; unknown tags fall
//! back to a generic container. Handlers may suspend (attachment lookups),
//! and they never fail: missing data degrades to a best-effort default node.

mod checkbox;
mod handlers;
mod links;

use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::pin::Pin;

use async_trait::async_trait;

pub use checkbox::{toggle_checkbox, toggle_task_at};
pub use links::LinkRouter;

use crate::config::RenderConfig;
use crate::domain::attachments::AttachmentMetadata;
use crate::hypertext::{HtElement, HtNode};
use crate::syntax::ChartDirective;
use crate::workspace::Workspace;

/// Where an anchor leads once classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkTarget {
    /// Cross-link to another note, resolved on click by [`LinkRouter`].
    Note { note_id: String },
    /// Anything else; opened in an external browsing context.
    External { url: String },
}

/// One node of the UI element tree handed to the view layer.
#[derive(Debug, Clone, PartialEq)]
pub enum UiNode {
    /// Generic container for tags without a special handler.
    Element {
        tag_name: String,
        properties: BTreeMap<String, String>,
        children: Vec<UiNode>,
    },
    Text(String),
    /// Image backed by a workspace attachment.
    AttachmentImage {
        key: String,
        metadata: AttachmentMetadata,
        alt: String,
    },
    /// Image shown through the generic zoomable viewer.
    ExpandableImage {
        src: String,
        alt: String,
        title: Option<String>,
    },
    /// Anchor with intercepted navigation.
    Link {
        target: LinkTarget,
        properties: BTreeMap<String, String>,
        children: Vec<UiNode>,
    },
    /// Interactive checkbox bound to the nth task marker of the source.
    Checkbox { index: usize, checked: bool },
    /// Code fence; highlighting is the component's concern.
    CodeFence {
        language: Option<String>,
        code: String,
        theme: String,
    },
    /// Embedded chart/flowchart component input.
    Chart {
        directive: ChartDirective,
        payload: String,
        yaml_flavored: bool,
    },
    /// Diagram rendered by a remote server callout.
    RemoteDiagram {
        language: String,
        callout_url: String,
        payload: String,
    },
}

/// Mutable per-pass state threaded through the handlers.
pub struct DispatchContext<'a> {
    pub workspace: &'a dyn Workspace,
    pub config: &'a RenderConfig,
    checkbox_index: usize,
}

impl<'a> DispatchContext<'a> {
    pub fn new(workspace: &'a dyn Workspace, config: &'a RenderConfig) -> Self {
        Self {
            workspace,
            config,
            checkbox_index: 0,
        }
    }

    /// Current checkbox index, post-incremented. Starts at 0 on every pass,
    /// so index n corresponds to the (n+1)-th task marker of the source.
    pub fn next_checkbox_index(&mut self) -> usize {
        let index = self.checkbox_index;
        self.checkbox_index += 1;
        index
    }
}

/// A render function bound to one tag name.
#[async_trait]
pub trait NodeHandler: Send + Sync {
    async fn render(
        &self,
        element: &HtElement,
        children: Vec<UiNode>,
        cx: &mut DispatchContext<'_>,
    ) -> UiNode;
}

/// Generic container fallback shared by handlers that decline an element.
pub(crate) fn passthrough(element: &HtElement, children: Vec<UiNode>) -> UiNode {
    UiNode::Element {
        tag_name: element.tag_name.clone(),
        properties: element.properties.clone(),
        children,
    }
}

/// Tag-keyed handler registry.
pub struct NodeDispatcher {
    handlers: HashMap<&'static str, Box<dyn NodeHandler>>,
}

impl NodeDispatcher {
    /// Registry with the required special-cased handlers installed.
    pub fn new() -> Self {
        let mut handlers: HashMap<&'static str, Box<dyn NodeHandler>> = HashMap::new();
        handlers.insert("img", Box::new(handlers::ImgHandler));
        handlers.insert("a", Box::new(handlers::AnchorHandler));
        handlers.insert("input", Box::new(handlers::InputHandler));
        handlers.insert("pre", Box::new(handlers::PreHandler));
        handlers.insert("div", Box::new(handlers::DivHandler));
        Self { handlers }
    }

    /// Replace or add a handler; used by hosts with custom components.
    #[must_use]
    pub fn with_handler(mut self, tag: &'static str, handler: Box<dyn NodeHandler>) -> Self {
        self.handlers.insert(tag, handler);
        self
    }

    /// Render a sanitized node sequence into the UI element tree.
    pub async fn dispatch(
        &self,
        nodes: &[HtNode],
        cx: &mut DispatchContext<'_>,
    ) -> Vec<UiNode> {
        let mut out = Vec::with_capacity(nodes.len());
        for node in nodes {
            out.push(self.render_node(node, cx).await);
        }
        out
    }

    fn render_node<'a, 'b>(
        &'a self,
        node: &'a HtNode,
        cx: &'a mut DispatchContext<'b>,
    ) -> Pin<Box<dyn Future<Output = UiNode> + Send + 'a>>
    where
        'b: 'a,
    {
        Box::pin(async move {
            match node {
                HtNode::Text(text) => UiNode::Text(text.clone()),
                HtNode::Element(element) => {
                    let mut children = Vec::with_capacity(element.children.len());
                    for child in &element.children {
                        children.push(self.render_node(child, &mut *cx).await);
                    }

                    match self.handlers.get(element.tag_name.as_str()) {
                        Some(handler) => handler.render(element, children, cx).await,
                        None => passthrough(element, children),
                    }
                }
            }
        })
    }
}

impl Default for NodeDispatcher {
    fn default() -> Self {
        Self::new()
    }
}
