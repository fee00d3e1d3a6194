//! Attachment metadata supplied by the storage layer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Mapping from attachment key (the token used as an image `src`) to its
/// metadata. Supplied externally; the pipeline only reads it.
pub type AttachmentMap = BTreeMap<String, AttachmentMetadata>;

/// Metadata describing one stored attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentMetadata {
    pub id: String,
    pub content_type: String,
    pub source: AttachmentSource,
}

/// Where the attachment bytes live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttachmentSource {
    /// Object inside the workspace attachment store.
    Store { object_key: String },
    /// File on the local filesystem.
    Path { path: String },
}

impl AttachmentMetadata {
    /// Whether the attachment can be shown through the image component.
    pub fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }
}
