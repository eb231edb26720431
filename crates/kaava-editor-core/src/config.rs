//! Editor configuration.

use serde::Deserialize;
use smol_str::SmolStr;

/// Pass cap for the normalizer's fixed-point loops.
pub const DEFAULT_MAX_PASSES: usize = 10;

/// Prefix used for generated formula node ids.
pub const DEFAULT_ID_PREFIX: &str = "formula";

/// Configuration for a [`FormulaEditor`](crate::FormulaEditor).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct EditorConfig {
    /// Node ids are generated as `{id_prefix}-{n}`.
    pub id_prefix: SmolStr,
    /// Shorthand expansion settings used for previews.
    pub normalizer: NormalizerConfig,
    /// Render previews as block (display) math instead of inline.
    pub display_mode: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            id_prefix: SmolStr::new_static(DEFAULT_ID_PREFIX),
            normalizer: NormalizerConfig::default(),
            display_mode: false,
        }
    }
}

/// Settings for [`normalize_latex`](crate::normalize::normalize_latex).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct NormalizerConfig {
    /// Upper bound on rewrite passes for fraction and exponent-chain expansion.
    ///
    /// Input that has not stabilised when the cap is hit is used as-is.
    pub max_passes: usize,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            max_passes: DEFAULT_MAX_PASSES,
        }
    }
}
