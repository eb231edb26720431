//! Document model: an ordered sequence of text runs and formula references.
//!
//! The document owns the [`FormulaStore`]; segments refer to nodes by id
//! only. Positions are document offsets where every text char counts one
//! and every formula counts one (formulas are atomic to the caret).

use smol_str::SmolStr;

use crate::error::EditorError;
use crate::serialize::{ContentPiece, serialize_segments};
use crate::store::{FormulaNode, FormulaStore, NodeId, NodeState};

/// One ordered element of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Plain text, no identity beyond position.
    Text(String),
    /// Placeholder for the formula node with this id.
    Formula(NodeId),
}

impl Segment {
    /// Length in document offsets.
    pub fn doc_len(&self) -> usize {
        match self {
            Segment::Text(text) => text.chars().count(),
            Segment::Formula(_) => 1,
        }
    }

    pub fn as_formula(&self) -> Option<&NodeId> {
        match self {
            Segment::Formula(id) => Some(id),
            Segment::Text(_) => None,
        }
    }
}

/// Result of committing a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The node moved from `Editing` to `Committed`.
    Committed,
    /// The node was already committed; nothing changed.
    AlreadyCommitted,
    /// The buffer was blank, so the node and its segment were removed.
    Removed,
}

/// Where a text insertion lands.
enum TextSlot {
    /// Inside (or at either edge of) an existing text run.
    InRun { index: usize, char_offset: usize },
    /// Between non-text segments; a new run goes at `index`.
    NewRun { index: usize },
}

/// The editable mixed text/formula content.
#[derive(Debug, Clone, Default)]
pub struct FormulaDocument {
    segments: Vec<Segment>,
    store: FormulaStore,
    caret: usize,
}

impl FormulaDocument {
    pub fn new(id_prefix: impl Into<SmolStr>) -> Self {
        Self {
            segments: Vec::new(),
            store: FormulaStore::new(id_prefix),
            caret: 0,
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn store(&self) -> &FormulaStore {
        &self.store
    }

    pub fn node(&self, id: &str) -> Option<&FormulaNode> {
        self.store.get(id)
    }

    /// Current document caret.
    pub fn caret(&self) -> usize {
        self.caret
    }

    /// Move the caret, clamped to the document length.
    pub fn set_caret(&mut self, offset: usize) {
        self.caret = offset.min(self.len());
    }

    /// Length in document offsets.
    pub fn len(&self) -> usize {
        self.segments.iter().map(Segment::doc_len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.iter().all(|s| s.doc_len() == 0)
    }

    /// Canonical string: text verbatim, formulas as `$raw$`.
    pub fn get_content(&self) -> String {
        serialize_segments(&self.segments, &self.store)
    }

    /// Index of the segment referencing `id`.
    pub fn segment_index(&self, id: &str) -> Option<usize> {
        self.segments
            .iter()
            .position(|s| s.as_formula().is_some_and(|sid| sid == id))
    }

    /// Document offset of the formula `id`.
    pub fn offset_of(&self, id: &str) -> Option<usize> {
        let index = self.segment_index(id)?;
        Some(self.segment_start(index))
    }

    fn segment_start(&self, index: usize) -> usize {
        self.segments[..index].iter().map(Segment::doc_len).sum()
    }

    /// Create a node and its segment at `at`, splitting a text run if needed.
    ///
    /// The caret ends up just after the new formula. Callers are responsible
    /// for the single-editor rule when `state` is `Editing`.
    pub(crate) fn insert_node(&mut self, at: usize, state: NodeState, raw: &str) -> NodeId {
        let at = at.min(self.len());
        let index = self.split_at(at);
        let id = self.store.create(state, raw);
        self.segments.insert(index, Segment::Formula(id.clone()));
        self.caret = at + 1;
        tracing::debug!(%id, at, ?state, "formula node created");
        id
    }

    /// Insert plain text at `at`, extending an adjacent run where possible.
    ///
    /// The caret ends up after the inserted text.
    pub fn insert_text(&mut self, at: usize, text: &str) {
        let at = at.min(self.len());
        if text.is_empty() {
            self.caret = at;
            return;
        }
        match self.text_slot(at) {
            TextSlot::InRun { index, char_offset } => {
                if let Segment::Text(run) = &mut self.segments[index] {
                    let byte = char_to_byte(run, char_offset);
                    run.insert_str(byte, text);
                }
            }
            TextSlot::NewRun { index } => {
                self.segments.insert(index, Segment::Text(text.to_string()));
            }
        }
        self.caret = at + text.chars().count();
    }

    /// Replace a node's raw buffer.
    pub fn update_content(&mut self, id: &str, raw: &str) -> Result<(), EditorError> {
        let node = self
            .store
            .get_mut(id)
            .ok_or_else(|| EditorError::NodeNotFound(id.into()))?;
        node.set_raw(raw);
        tracing::trace!(%id, len = raw.len(), "formula content updated");
        Ok(())
    }

    /// Insert text at the node's own caret. Committed nodes are frozen.
    pub fn insert_into_node(&mut self, id: &str, text: &str) -> Result<(), EditorError> {
        let node = self
            .store
            .get_mut(id)
            .ok_or_else(|| EditorError::NodeNotFound(id.into()))?;
        if !node.is_editing() {
            return Err(EditorError::NotEditing(id.into()));
        }
        node.insert_at_caret(text);
        tracing::trace!(%id, caret = node.caret(), "formula input routed");
        Ok(())
    }

    /// Delete the char before the node's caret.
    pub fn delete_in_node(&mut self, id: &str) -> Result<bool, EditorError> {
        let node = self
            .store
            .get_mut(id)
            .ok_or_else(|| EditorError::NodeNotFound(id.into()))?;
        if !node.is_editing() {
            return Err(EditorError::NotEditing(id.into()));
        }
        Ok(node.delete_before_caret())
    }

    pub fn set_node_caret(&mut self, id: &str, offset: usize) -> Result<(), EditorError> {
        let node = self
            .store
            .get_mut(id)
            .ok_or_else(|| EditorError::NodeNotFound(id.into()))?;
        node.set_caret(offset);
        Ok(())
    }

    pub(crate) fn set_state(&mut self, id: &str, state: NodeState) -> Result<(), EditorError> {
        let node = self
            .store
            .get_mut(id)
            .ok_or_else(|| EditorError::NodeNotFound(id.into()))?;
        node.set_state(state);
        Ok(())
    }

    /// Freeze a node's buffer, or remove the node if the buffer is blank.
    ///
    /// Idempotent on committed nodes with content.
    pub fn commit(&mut self, id: &str) -> Result<CommitOutcome, EditorError> {
        let node = self
            .store
            .get_mut(id)
            .ok_or_else(|| EditorError::NodeNotFound(id.into()))?;
        // A blank buffer never survives a commit, whatever the state.
        if node.is_blank() {
            self.remove(id)?;
            return Ok(CommitOutcome::Removed);
        }
        if node.state() == NodeState::Committed {
            return Ok(CommitOutcome::AlreadyCommitted);
        }
        node.set_state(NodeState::Committed);
        tracing::debug!(%id, "formula node committed");
        Ok(CommitOutcome::Committed)
    }

    /// Delete a node and its segment unconditionally, merging the text runs
    /// on either side.
    pub fn remove(&mut self, id: &str) -> Result<(), EditorError> {
        if self.store.remove(id).is_none() {
            return Err(EditorError::NodeNotFound(id.into()));
        }
        if let Some(index) = self.segment_index(id) {
            let start = self.segment_start(index);
            self.segments.remove(index);
            if self.caret > start {
                self.caret -= 1;
            }
            self.merge_runs_around(index);
        }
        tracing::debug!(%id, "formula node removed");
        Ok(())
    }

    /// Insert an empty text run right after the node and move the caret there.
    pub fn split_after(&mut self, id: &str) -> Result<(), EditorError> {
        let index = self
            .segment_index(id)
            .ok_or_else(|| EditorError::NodeNotFound(id.into()))?;
        self.segments.insert(index + 1, Segment::Text(String::new()));
        self.caret = self.segment_start(index) + 1;
        Ok(())
    }

    /// Insert parsed content at `at`; formulas are created committed.
    ///
    /// Returns the ids of the created nodes in document order.
    pub(crate) fn insert_pieces(&mut self, at: usize, pieces: &[ContentPiece<'_>]) -> Vec<NodeId> {
        let mut ids = Vec::new();
        self.caret = at.min(self.len());
        for piece in pieces {
            match piece {
                ContentPiece::Text(text) => self.insert_text(self.caret, text),
                ContentPiece::Formula(raw) => {
                    ids.push(self.insert_node(self.caret, NodeState::Committed, raw));
                }
            }
        }
        ids
    }

    /// Drop all content, keeping the id counter.
    pub(crate) fn clear(&mut self) {
        self.segments.clear();
        self.store.clear();
        self.caret = 0;
    }

    /// Split the text run containing `at` so that `at` is a segment
    /// boundary; returns the segment index at that boundary.
    ///
    /// Empty runs sitting at `at` stay before the boundary, so a node
    /// inserted after `split_after` lands past the line break.
    fn split_at(&mut self, at: usize) -> usize {
        let mut start = 0;
        for index in 0..self.segments.len() {
            let len = self.segments[index].doc_len();
            if at <= start && len > 0 {
                return index;
            }
            if at < start + len {
                if let Segment::Text(run) = &mut self.segments[index] {
                    let byte = char_to_byte(run, at - start);
                    let tail = run.split_off(byte);
                    self.segments.insert(index + 1, Segment::Text(tail));
                }
                return index + 1;
            }
            start += len;
        }
        self.segments.len()
    }

    fn text_slot(&self, at: usize) -> TextSlot {
        let mut start = 0;
        for (index, segment) in self.segments.iter().enumerate() {
            let len = segment.doc_len();
            match segment {
                Segment::Text(_) if at >= start && at <= start + len => {
                    return TextSlot::InRun {
                        index,
                        char_offset: at - start,
                    };
                }
                Segment::Formula(_) if at <= start => return TextSlot::NewRun { index },
                _ => {}
            }
            start += len;
        }
        TextSlot::NewRun {
            index: self.segments.len(),
        }
    }

    /// Merge the runs at `index - 1` and `index` if both are text.
    fn merge_runs_around(&mut self, index: usize) {
        if index == 0 || index >= self.segments.len() {
            return;
        }
        if let (Segment::Text(_), Segment::Text(_)) =
            (&self.segments[index - 1], &self.segments[index])
        {
            if let Segment::Text(tail) = self.segments.remove(index) {
                if let Segment::Text(head) = &mut self.segments[index - 1] {
                    head.push_str(&tail);
                }
            }
        }
    }
}

fn char_to_byte(s: &str, char_offset: usize) -> usize {
    s.char_indices()
        .nth(char_offset)
        .map(|(byte, _)| byte)
        .unwrap_or(s.len())
}
