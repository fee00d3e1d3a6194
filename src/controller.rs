//! Render invalidation controller.
//!
//! One instance per document view, created on mount and dropped on unmount.
//! It serializes pipeline runs (at most one in flight), skips runs whose
//! `(source, theme key)` pair already produced the displayed output, and
//! tags every run with a monotonic sequence number so a completion that is
//! no longer the latest requested state is discarded instead of committed.

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, warn};

use crate::config::RenderConfig;
use crate::pipeline::{MarkdownPipeline, RenderedDocument};
use crate::workspace::Workspace;

/// What happened to a render request.
#[derive(Debug, Clone)]
pub enum RequestOutcome {
    /// The pipeline ran and its output is now displayed.
    Completed(Arc<RenderedDocument>),
    /// Identical to the displayed `(source, theme key)`; nothing ran.
    Unchanged,
    /// A run was already in flight; the request was dropped, not queued.
    /// Re-request once the in-flight run completes.
    Dropped,
    /// The run finished but a newer invalidation superseded it; its output
    /// was discarded.
    Superseded,
}

#[derive(Default)]
struct ControllerState {
    rendering: bool,
    last_source: Option<String>,
    last_theme_key: Option<String>,
    latest_run: u64,
    displayed: Option<Arc<RenderedDocument>>,
}

pub struct RenderController {
    pipeline: MarkdownPipeline,
    workspace: Arc<dyn Workspace>,
    state: Mutex<ControllerState>,
}

impl RenderController {
    pub fn new(pipeline: MarkdownPipeline, workspace: Arc<dyn Workspace>) -> Self {
        Self {
            pipeline,
            workspace,
            state: Mutex::new(ControllerState::default()),
        }
    }

    /// Request a render of `source` under `config`.
    ///
    /// The idle-state check, the idempotence check, and the transition to
    /// rendering happen under one lock acquisition, so a re-entrant trigger
    /// cannot start a second run.
    pub async fn request(&self, source: &str, config: &RenderConfig) -> RequestOutcome {
        let run = {
            let mut state = lock_state(&self.state, "request");
            if state.rendering {
                debug!(
                    target: "taccuino::render::controller",
                    "render already in flight; dropping request"
                );
                return RequestOutcome::Dropped;
            }
            if state.last_source.as_deref() == Some(source)
                && state.last_theme_key.as_deref() == Some(config.theme_key())
            {
                return RequestOutcome::Unchanged;
            }
            state.rendering = true;
            state.latest_run += 1;
            state.latest_run
        };

        let document = self
            .pipeline
            .render(source, config, self.workspace.as_ref())
            .await;

        let mut state = lock_state(&self.state, "completion");
        state.rendering = false;
        if run != state.latest_run {
            debug!(
                target: "taccuino::render::controller",
                run,
                latest = state.latest_run,
                "discarding superseded render completion"
            );
            return RequestOutcome::Superseded;
        }

        state.last_source = Some(source.to_string());
        state.last_theme_key = Some(config.theme_key().to_string());
        let document = Arc::new(document);
        state.displayed = Some(Arc::clone(&document));
        RequestOutcome::Completed(document)
    }

    /// External "dependent resource loaded" signal: the displayed output may
    /// have rendered with incomplete data, so the idempotence pair is
    /// cleared and any in-flight run is marked stale. The next `request`
    /// re-runs unconditionally.
    pub fn resources_invalidated(&self) {
        let mut state = lock_state(&self.state, "resources_invalidated");
        state.last_source = None;
        state.last_theme_key = None;
        state.latest_run += 1;
    }

    /// Convenience for the invalidation signal followed by a re-request.
    pub async fn refresh(&self, source: &str, config: &RenderConfig) -> RequestOutcome {
        self.resources_invalidated();
        self.request(source, config).await
    }

    /// The committed output of the most recent completed run, if any.
    pub fn displayed(&self) -> Option<Arc<RenderedDocument>> {
        lock_state(&self.state, "displayed").displayed.clone()
    }

    pub fn is_rendering(&self) -> bool {
        lock_state(&self.state, "is_rendering").rendering
    }
}

fn lock_state<'a>(
    lock: &'a Mutex<ControllerState>,
    op: &'static str,
) -> MutexGuard<'a, ControllerState> {
    match lock.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            warn!(
                target: "taccuino::render::controller",
                op,
                result = "poisoned_recovered",
                "Recovered from poisoned controller lock"
            );
            poisoned.into_inner()
        }
    }
}
