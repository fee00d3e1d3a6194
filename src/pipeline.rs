//! The full render pipeline: pre-pass, parse, transform, bridge, sanitize,
//! dispatch.
//!
//! The pipeline itself is infallible: every stage degrades locally and the
//! sanitizer runs unconditionally between the bridge and the dispatcher.

use url::Url;

use crate::config::RenderConfig;
use crate::dispatch::{DispatchContext, NodeDispatcher, UiNode};
use crate::domain::note_link;
use crate::hypertext;
use crate::sanitize::{self, SanitizeSchema};
use crate::syntax;
use crate::transform::{self, HeadingEntry};
use crate::workspace::Workspace;

const DEFAULT_DIAGRAM_ENDPOINT: &str = "https://kroki.io";

/// Construction-time pipeline configuration.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// Base URL of the remote diagram rendering server.
    pub diagram_endpoint: Url,
    /// Whether raw HTML embedded in the source is merged into the tree.
    pub allow_raw_markup: bool,
    /// Sanitization allow-list applied to every render.
    pub schema: SanitizeSchema,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            diagram_endpoint: Url::parse(DEFAULT_DIAGRAM_ENDPOINT)
                .expect("default diagram endpoint is a valid URL"),
            allow_raw_markup: true,
            schema: sanitize::default_schema().clone(),
        }
    }
}

/// Output of one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedDocument {
    /// The displayed UI element tree.
    pub tree: Vec<UiNode>,
    /// Heading outline (level, slug, text) in document order.
    pub toc: Vec<HeadingEntry>,
    /// Whether the document rendered any math, so the view can load fonts.
    pub contains_math: bool,
    /// Whether the document rendered any chart or remote diagram.
    pub contains_diagram: bool,
}

/// The markdown rendering pipeline.
pub struct MarkdownPipeline {
    settings: PipelineSettings,
    dispatcher: NodeDispatcher,
}

impl MarkdownPipeline {
    pub fn new(settings: PipelineSettings) -> Self {
        Self {
            settings,
            dispatcher: NodeDispatcher::new(),
        }
    }

    /// Replace the dispatcher, keeping the settings. Used by hosts that
    /// register custom component handlers.
    #[must_use]
    pub fn with_dispatcher(mut self, dispatcher: NodeDispatcher) -> Self {
        self.dispatcher = dispatcher;
        self
    }

    /// Run the full chain over one source text.
    pub async fn render(
        &self,
        source: &str,
        config: &RenderConfig,
        workspace: &dyn Workspace,
    ) -> RenderedDocument {
        let prepared = note_link::strip_note_id_prefixes(source);
        let mut tree = syntax::parse(&prepared);
        let outcome = transform::apply(&mut tree, &self.settings.diagram_endpoint);

        let mut nodes = hypertext::to_hypertext(&tree, self.settings.allow_raw_markup);
        sanitize::sanitize(&mut nodes, &self.settings.schema);

        let mut cx = DispatchContext::new(workspace, config);
        let ui = self.dispatcher.dispatch(&nodes, &mut cx).await;

        RenderedDocument {
            tree: ui,
            toc: outcome.headings,
            contains_math: outcome.contains_math,
            contains_diagram: outcome.contains_diagram,
        }
    }
}

impl Default for MarkdownPipeline {
    fn default() -> Self {
        Self::new(PipelineSettings::default())
    }
}
