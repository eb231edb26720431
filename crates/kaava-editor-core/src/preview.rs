//! Formula previews and the rendering seam.
//!
//! Rendering is done by an external collaborator behind [`FormulaRenderer`].
//! Results are written back keyed by node id; if the node is gone by the
//! time a result arrives, the write-back is silently dropped.

use std::collections::HashMap;
use std::fmt::Display;

use crate::store::NodeId;

/// Turns a LaTeX string into a visual representation.
///
/// Implementations may fail on malformed input. The editor never retries;
/// a failure becomes a [`Preview::Fallback`] showing the LaTeX source.
pub trait FormulaRenderer {
    type Error: Display;

    fn render(&self, latex: &str, display_mode: bool) -> Result<String, Self::Error>;
}

/// What a host should display for a formula node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preview {
    /// Rendered output (e.g. MathML) for the normalized LaTeX.
    Rendered { latex: String, html: String },
    /// Rendering failed; show `latex` literally with an error style.
    Fallback { latex: String, message: String },
}

impl Preview {
    pub fn latex(&self) -> &str {
        match self {
            Preview::Rendered { latex, .. } | Preview::Fallback { latex, .. } => latex,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Preview::Fallback { .. })
    }
}

/// A render job for one node: the normalized LaTeX to hand to a renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewRequest {
    pub id: NodeId,
    pub latex: String,
    pub display_mode: bool,
}

/// Latest preview per node id.
#[derive(Debug, Clone, Default)]
pub struct PreviewCache {
    previews: HashMap<NodeId, Preview>,
}

impl PreviewCache {
    pub fn get(&self, id: &str) -> Option<&Preview> {
        self.previews.get(id)
    }

    pub fn len(&self) -> usize {
        self.previews.len()
    }

    pub fn is_empty(&self) -> bool {
        self.previews.is_empty()
    }

    /// Overwrite the preview for `id`.
    pub(crate) fn insert(&mut self, id: NodeId, preview: Preview) {
        self.previews.insert(id, preview);
    }

    pub(crate) fn forget(&mut self, id: &str) {
        self.previews.remove(id);
    }

    pub(crate) fn clear(&mut self) {
        self.previews.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_overwrites_by_id() {
        let mut cache = PreviewCache::default();
        cache.insert(
            "formula-0".into(),
            Preview::Fallback {
                latex: "x^".into(),
                message: "unexpected end".into(),
            },
        );
        cache.insert(
            "formula-0".into(),
            Preview::Rendered {
                latex: "x^{ 2 }".into(),
                html: "<math></math>".into(),
            },
        );
        assert_eq!(cache.len(), 1);
        let preview = cache.get("formula-0").unwrap();
        assert!(!preview.is_fallback());
        assert_eq!(preview.latex(), "x^{ 2 }");

        cache.forget("formula-0");
        assert!(cache.is_empty());
    }
}
