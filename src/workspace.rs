//! Interfaces of the external collaborators the pipeline consumes.
//!
//! The pipeline owns none of these concerns: storages and attachments come
//! from the workspace layer, navigation from the router, toasts from the
//! notification UI, and source edits go back through the content sink.

use async_trait::async_trait;

use crate::domain::attachments::AttachmentMetadata;

/// Identifier of one storage known to the workspace.
pub type StorageId = String;

/// Storage/workspace layer: note lookup and attachment metadata.
#[async_trait]
pub trait Workspace: Send + Sync {
    /// Storage backing the currently displayed note, when one is active.
    fn active_storage(&self) -> Option<StorageId>;

    /// All storages known to the app, in display order.
    fn storages(&self) -> Vec<StorageId>;

    /// Resolve a note id to a navigable path inside the given storage.
    async fn resolve_note_path(&self, storage: &str, note_id: &str) -> Option<String>;

    /// Attachment metadata for the given key.
    async fn attachment(&self, key: &str) -> Option<AttachmentMetadata>;
}

/// Routing layer.
#[async_trait]
pub trait Navigator: Send + Sync {
    async fn navigate_to(&self, path: &str);
    async fn open_external(&self, url: &str);
}

/// Toast/notification UI.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, title: &str, description: &str);
}

/// Receives source-text edits (checkbox toggles).
#[async_trait]
pub trait ContentSink: Send + Sync {
    async fn update_content(&self, new_text: String);
}
