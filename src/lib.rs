//! Markdown rendering pipeline for the Taccuino desktop note-taking app.
//!
//! Source text flows through a fixed chain:
//!
//! 1. note-link pre-pass + permissive parse ([`syntax`])
//! 2. ordered tree transforms: emoji, admonitions, math, diagrams, slugs,
//!    positions ([`transform`])
//! 3. hypertext bridge, merging embedded raw markup ([`hypertext`])
//! 4. allow-list sanitization, unconditionally ([`sanitize`])
//! 5. tag-dispatched rendering into the UI element tree ([`dispatch`])
//!
//! The [`controller::RenderController`] wraps the chain with the
//! invalidation state machine: identical requests are skipped, overlapping
//! requests are dropped (single-flight), and stale completions are
//! discarded via a monotonic run sequence.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use taccuino_markdown::{MarkdownPipeline, RenderConfig, RenderController, Workspace};
//!
//! async fn show(workspace: Arc<dyn Workspace>, source: &str) {
//!     let controller = RenderController::new(MarkdownPipeline::default(), workspace);
//!     let config = RenderConfig::new("dark", "monokai");
//!     controller.request(source, &config).await;
//! }
//! ```

pub mod config;
pub mod controller;
pub mod dispatch;
pub mod domain;
pub mod error;
pub mod hypertext;
pub mod pipeline;
pub mod sanitize;
pub mod syntax;
pub mod transform;
pub mod workspace;

pub use config::RenderConfig;
pub use controller::{RenderController, RequestOutcome};
pub use dispatch::{
    LinkRouter, LinkTarget, NodeDispatcher, NodeHandler, UiNode, toggle_checkbox, toggle_task_at,
};
pub use error::RenderError;
pub use pipeline::{MarkdownPipeline, PipelineSettings, RenderedDocument};
pub use sanitize::{SanitizeSchema, default_schema, sanitize};
pub use workspace::{ContentSink, Navigator, Notifier, StorageId, Workspace};
