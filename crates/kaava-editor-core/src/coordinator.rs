//! Active-node coordination.
//!
//! [`FormulaEditor`] is the host-facing surface. It owns the document, the
//! preview cache, and the single focus pointer that decides which formula
//! node (if any) is `Editing`. Every transition into `Editing` goes through
//! here and commits the previous holder first, so at most one node is ever
//! being edited.
//!
//! Nothing on this surface returns an error: stale ids and other misses are
//! logged and become no-ops.

use smol_str::SmolStr;

use crate::config::EditorConfig;
use crate::document::{CommitOutcome, FormulaDocument, Segment};
use crate::normalize::{normalize_latex_with, sanitize_latex};
use crate::preview::{FormulaRenderer, Preview, PreviewCache, PreviewRequest};
use crate::serialize::parse_content;
use crate::store::{FormulaNode, NodeId, NodeState};

/// The embedded-formula document editor.
#[derive(Debug, Clone)]
pub struct FormulaEditor {
    doc: FormulaDocument,
    /// The node holding `Editing`, if any.
    focused: Option<NodeId>,
    previews: PreviewCache,
    config: EditorConfig,
}

impl Default for FormulaEditor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl FormulaEditor {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            doc: FormulaDocument::new(config.id_prefix.clone()),
            focused: None,
            previews: PreviewCache::default(),
            config,
        }
    }

    /// Create an editor holding parsed canonical content.
    pub fn with_content(config: EditorConfig, content: &str) -> Self {
        let mut editor = Self::new(config);
        editor.load(content);
        editor
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn document(&self) -> &FormulaDocument {
        &self.doc
    }

    pub fn segments(&self) -> &[Segment] {
        self.doc.segments()
    }

    pub fn node(&self, id: &str) -> Option<&FormulaNode> {
        self.doc.node(id)
    }

    pub fn node_count(&self) -> usize {
        self.doc.store().len()
    }

    /// Id of the focused node.
    pub fn focused(&self) -> Option<&NodeId> {
        self.focused.as_ref()
    }

    /// The node currently in `Editing` state.
    pub fn editing_node(&self) -> Option<&FormulaNode> {
        self.focused.as_deref().and_then(|id| self.doc.node(id))
    }

    pub fn caret(&self) -> usize {
        self.doc.caret()
    }

    pub fn set_caret(&mut self, offset: usize) {
        self.doc.set_caret(offset);
    }

    // === Focus ===

    /// Give `id` the editing focus, committing the previous holder first.
    ///
    /// Activating a committed node returns it to `Editing`. Returns false
    /// for an unknown id.
    pub fn focus(&mut self, id: &str) -> bool {
        if !self.doc.store().contains(id) {
            tracing::debug!(%id, "focus on unknown formula node ignored");
            return false;
        }
        if self.focused.as_deref() == Some(id) {
            return true;
        }
        self.blur();
        // Committing the previous holder may have removed it, never `id`.
        if self.doc.set_state(id, NodeState::Editing).is_err() {
            return false;
        }
        self.take_focus(id.into());
        true
    }

    /// Commit the focused node (if any) and clear the focus pointer.
    pub fn blur(&mut self) -> Option<CommitOutcome> {
        let id = self.focused.take()?;
        match self.doc.commit(&id) {
            Ok(outcome) => {
                if outcome == CommitOutcome::Removed {
                    self.previews.forget(&id);
                }
                tracing::debug!(%id, ?outcome, "formula node blurred");
                Some(outcome)
            }
            Err(err) => {
                tracing::debug!(%id, %err, "blur of stale focus");
                None
            }
        }
    }

    /// Insert `text` at the focused node's caret.
    ///
    /// Returns false when nothing is focused, so the caller can fall back
    /// to [`insert_formula`](Self::insert_formula).
    pub fn route_insert(&mut self, text: &str) -> bool {
        let Some(id) = self.focused.clone() else {
            return false;
        };
        match self.doc.insert_into_node(&id, text) {
            Ok(()) => true,
            Err(err) => {
                tracing::debug!(%err, "focused node vanished, dropping focus");
                self.focused = None;
                false
            }
        }
    }

    fn take_focus(&mut self, id: NodeId) {
        tracing::debug!(%id, "formula node focused");
        self.focused = Some(id);
        debug_assert!(self.doc.store().editing().count() <= 1);
    }

    // === Node operations ===

    /// Start a new formula at the document caret and focus it.
    pub fn insert_formula(&mut self, initial: &str) -> NodeId {
        self.blur();
        let at = self.doc.caret();
        self.open_formula_at(at, initial)
    }

    /// Start a new formula at a document offset and focus it.
    ///
    /// `at` is interpreted against the document as it is before the call.
    pub fn insert_formula_at(&mut self, at: usize, initial: &str) -> NodeId {
        let previous = self
            .focused
            .as_deref()
            .and_then(|id| self.doc.offset_of(id));
        let mut at = at;
        if let (Some(CommitOutcome::Removed), Some(offset)) = (self.blur(), previous) {
            if offset < at {
                at -= 1;
            }
        }
        self.open_formula_at(at, initial)
    }

    fn open_formula_at(&mut self, at: usize, initial: &str) -> NodeId {
        let id = self.doc.insert_node(at, NodeState::Editing, initial);
        self.take_focus(id.clone());
        id
    }

    /// Replace a node's raw buffer.
    pub fn update_content(&mut self, id: &str, raw: &str) -> bool {
        match self.doc.update_content(id, raw) {
            Ok(()) => true,
            Err(err) => {
                tracing::debug!(%err, "update ignored");
                false
            }
        }
    }

    /// Move the caret inside a node's buffer.
    pub fn set_node_caret(&mut self, id: &str, offset: usize) -> bool {
        self.doc.set_node_caret(id, offset).is_ok()
    }

    /// Commit a node. For the focused node this is the same as [`blur`](Self::blur).
    pub fn commit(&mut self, id: &str) -> Option<CommitOutcome> {
        if self.focused.as_deref() == Some(id) {
            return self.blur();
        }
        match self.doc.commit(id) {
            Ok(outcome) => {
                if outcome == CommitOutcome::Removed {
                    self.previews.forget(id);
                }
                Some(outcome)
            }
            Err(err) => {
                tracing::debug!(%err, "commit ignored");
                None
            }
        }
    }

    /// Delete a node and its segment regardless of its content.
    pub fn remove(&mut self, id: &str) -> bool {
        if let Err(err) = self.doc.remove(id) {
            tracing::debug!(%err, "remove ignored");
            return false;
        }
        if self.focused.as_deref() == Some(id) {
            self.focused = None;
        }
        self.previews.forget(id);
        true
    }

    /// Put an empty text run after the node and move the caret into it.
    pub fn split_after(&mut self, id: &str) -> bool {
        self.doc.split_after(id).is_ok()
    }

    /// Backspace inside the focused node.
    ///
    /// An already empty buffer removes the node. Returns false when nothing
    /// is focused or the node caret is at the start of the buffer.
    pub fn delete_backward(&mut self) -> bool {
        let Some(id) = self.focused.clone() else {
            return false;
        };
        let blank = self.doc.node(&id).is_some_and(FormulaNode::is_blank);
        if blank {
            return self.remove(&id);
        }
        matches!(self.doc.delete_in_node(&id), Ok(true))
    }

    // === Host surface ===

    /// Insert plain text at the document caret.
    ///
    /// Never routed into a focused formula.
    pub fn append_text(&mut self, content: &str) {
        let at = self.doc.caret();
        self.doc.insert_text(at, content);
    }

    /// Insert a committed formula at the caret without an editing phase.
    ///
    /// Blank input creates nothing and returns `None`.
    pub fn append_formula(&mut self, latex: &str) -> Option<NodeId> {
        if latex.trim().is_empty() {
            tracing::debug!("blank formula not appended");
            return None;
        }
        let at = self.doc.caret();
        Some(self.doc.insert_node(at, NodeState::Committed, latex))
    }

    /// Toolbar insertion: into the open formula if there is one, otherwise
    /// into a new formula at the caret. Returns the receiving node.
    pub fn insert_symbol(&mut self, latex: &str) -> NodeId {
        if let Some(id) = self.focused.clone() {
            if self.route_insert(latex) {
                return id;
            }
        }
        self.insert_formula(latex)
    }

    /// Paste into the focused formula, or splice parsed content in at the caret.
    ///
    /// Text routed into a formula loses its `$` delimiters, since a `$`
    /// inside a buffer would not survive a save and reload.
    pub fn paste(&mut self, text: &str) -> Vec<NodeId> {
        if self.focused.is_some() {
            let latex: String = sanitize_latex(text).chars().filter(|&c| c != '$').collect();
            if latex.is_empty() || self.route_insert(&latex) {
                return Vec::new();
            }
        }
        let pieces = parse_content(text);
        let at = self.doc.caret();
        self.doc.insert_pieces(at, &pieces)
    }

    /// Replace the whole document with parsed canonical content.
    ///
    /// Node ids keep counting up, so previews requested against the old
    /// document can never land on the new one.
    pub fn load(&mut self, content: &str) {
        self.focused = None;
        self.previews.clear();
        self.doc.clear();
        let pieces = parse_content(content);
        self.doc.insert_pieces(0, &pieces);
        tracing::debug!(nodes = self.doc.store().len(), "document loaded");
    }

    /// The canonical string: text verbatim, formulas as `$raw$`.
    pub fn get_content(&self) -> String {
        self.doc.get_content()
    }

    // === Previews ===

    /// Normalized LaTeX to render for `id`, or `None` for a missing or
    /// blank node.
    pub fn request_preview(&self, id: &str) -> Option<PreviewRequest> {
        let node = self.doc.node(id)?;
        if node.is_blank() {
            return None;
        }
        Some(PreviewRequest {
            id: node.id().clone(),
            latex: normalize_latex_with(&node.raw_content(), &self.config.normalizer),
            display_mode: self.config.display_mode,
        })
    }

    /// Write a render result back. A missing id is a silent no-op.
    pub fn apply_preview(
        &mut self,
        id: &str,
        latex: String,
        result: Result<String, String>,
    ) -> bool {
        if !self.doc.store().contains(id) {
            tracing::debug!(%id, "discarding preview for removed node");
            return false;
        }
        let preview = match result {
            Ok(html) => Preview::Rendered { latex, html },
            Err(message) => Preview::Fallback { latex, message },
        };
        self.previews.insert(SmolStr::from(id), preview);
        true
    }

    /// Request, render and apply a preview in one step.
    pub fn render_preview<R: FormulaRenderer>(&mut self, id: &str, renderer: &R) -> Option<&Preview> {
        let request = self.request_preview(id)?;
        let result = renderer
            .render(&request.latex, request.display_mode)
            .map_err(|err| err.to_string());
        self.apply_preview(&request.id, request.latex, result);
        self.previews.get(id)
    }

    pub fn preview(&self, id: &str) -> Option<&Preview> {
        self.previews.get(id)
    }
}
