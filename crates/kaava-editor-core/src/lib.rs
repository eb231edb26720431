//! kaava-editor-core: formula-aware document editing without framework dependencies.
//!
//! This crate provides:
//! - `FormulaEditor` - the host-facing editor: focus, routing, lifecycle, previews
//! - `FormulaDocument` - ordered text runs and formula references
//! - `FormulaStore` - the arena owning every `FormulaNode`
//! - `normalize` - shorthand (`a/b`, `x^2`, `*`) to LaTeX rewriting
//! - `serialize` - the canonical `text $formula$` string and its parser
//! - `actions` / `execute` - semantic actions and key handling

pub mod actions;
pub mod config;
pub mod coordinator;
pub mod document;
pub mod error;
pub mod execute;
pub mod normalize;
pub mod preview;
pub mod serialize;
pub mod store;
pub mod symbols;
pub mod text;

#[cfg(test)]
mod tests;

pub use actions::{FormulaAction, Key, KeyCombo, KeydownResult, Modifiers, action_for_key};
pub use config::{EditorConfig, NormalizerConfig};
pub use coordinator::FormulaEditor;
pub use document::{CommitOutcome, FormulaDocument, Segment};
pub use error::EditorError;
pub use execute::{execute_action, handle_keydown};
pub use normalize::normalize_latex;
pub use preview::{FormulaRenderer, Preview, PreviewRequest};
pub use serialize::{ContentPiece, parse_content};
pub use smol_str::SmolStr;
pub use store::{FormulaNode, FormulaStore, NodeId, NodePhase, NodeState};
pub use symbols::{SymbolGroup, TOOLBAR_SYMBOLS, ToolbarSymbol};
pub use text::{EditorRope, TextBuffer};
