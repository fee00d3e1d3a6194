use serde::{Deserialize, Serialize};

/// Presentation configuration passed into every render request.
///
/// Only [`RenderConfig::theme_key`] participates in render invalidation:
/// `theme` and `style_overrides` restyle the already-produced tree and never
/// require a recompute.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Application theme name (light, dark, ...).
    pub theme: String,
    /// Code block highlighting theme consumed by the code-fence component.
    pub code_block_theme: String,
    /// Free-form CSS overrides appended by the preview host.
    #[serde(default)]
    pub style_overrides: String,
}

impl RenderConfig {
    pub fn new(theme: impl Into<String>, code_block_theme: impl Into<String>) -> Self {
        Self {
            theme: theme.into(),
            code_block_theme: code_block_theme.into(),
            style_overrides: String::new(),
        }
    }

    /// The configuration value whose change invalidates a previous render.
    pub fn theme_key(&self) -> &str {
        &self.code_block_theme
    }
}
