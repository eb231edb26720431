//! Error types for document operations.

use smol_str::SmolStr;
use thiserror::Error;

/// Errors raised by document-level operations.
///
/// None of these are fatal. The host-facing [`FormulaEditor`](crate::FormulaEditor)
/// recovers from every one of them locally and never hands them to the user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EditorError {
    /// The id does not name a live formula node (removed, or never existed).
    #[error("formula node not found: {0}")]
    NodeNotFound(SmolStr),

    /// The node exists but is not currently being edited.
    #[error("formula node is not being edited: {0}")]
    NotEditing(SmolStr),
}
