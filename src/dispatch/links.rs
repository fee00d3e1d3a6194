//! Click-time link resolution.
//!
//! Anchors render unconditionally; only navigation is mediated here. Note
//! ids resolve against the active storage first, then the remaining known
//! storages in order. Resolution failure surfaces through the notifier and
//! suppresses navigation; it never affects the rendered tree.

use tracing::warn;

use super::LinkTarget;
use crate::domain::note_link;
use crate::workspace::{Navigator, Notifier, Workspace};

pub struct LinkRouter<'a> {
    workspace: &'a dyn Workspace,
    navigator: &'a dyn Navigator,
    notifier: &'a dyn Notifier,
}

impl<'a> LinkRouter<'a> {
    pub fn new(
        workspace: &'a dyn Workspace,
        navigator: &'a dyn Navigator,
        notifier: &'a dyn Notifier,
    ) -> Self {
        Self {
            workspace,
            navigator,
            notifier,
        }
    }

    /// Follow a raw href, classifying it first.
    pub async fn follow(&self, href: &str) {
        if note_link::looks_like_note_id(href) {
            self.open_note(href).await;
        } else {
            self.navigator.open_external(href).await;
        }
    }

    /// Follow an already-classified link target.
    pub async fn open(&self, target: &LinkTarget) {
        match target {
            LinkTarget::Note { note_id } => self.open_note(note_id).await,
            LinkTarget::External { url } => self.navigator.open_external(url).await,
        }
    }

    async fn open_note(&self, note_id: &str) {
        let Some(active) = self.workspace.active_storage() else {
            warn!(
                target: "taccuino::render::links",
                note_id,
                "note link clicked without an active storage"
            );
            self.notifier
                .notify("Note not found", "No storage is active in this window.")
                .await;
            return;
        };

        if let Some(path) = self.workspace.resolve_note_path(&active, note_id).await {
            self.navigator.navigate_to(&path).await;
            return;
        }

        for storage in self.workspace.storages() {
            if storage == active {
                continue;
            }
            if let Some(path) = self.workspace.resolve_note_path(&storage, note_id).await {
                self.navigator.navigate_to(&path).await;
                return;
            }
        }

        warn!(
            target: "taccuino::render::links",
            note_id,
            "note link did not resolve in any storage"
        );
        self.notifier
            .notify(
                "Note not found",
                &format!("No storage contains a note with id `{note_id}`."),
            )
            .await;
    }
}
