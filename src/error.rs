use thiserror::Error;

/// Structured errors surfaced by individual pipeline stages.
///
/// These never escape a full render: stages degrade locally (logging through
/// `tracing`) instead of aborting the pass. The variants exist so helpers can
/// report *why* a fallback was taken.
#[derive(Debug, Clone, Error)]
pub enum RenderError {
    #[error("math rendering failed: {message}")]
    Math { message: String },
    #[error("anchor slug generation failed: {message}")]
    Anchoring { message: String },
    #[error("diagram endpoint rejected: {message}")]
    DiagramEndpoint { message: String },
}
