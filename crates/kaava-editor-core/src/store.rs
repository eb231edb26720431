//! Formula node store.
//!
//! Owns every [`FormulaNode`] of a document, keyed by id. Everything outside
//! the store (segments, previews, the host's widgets) holds only the id and
//! looks the node up on each access, so a stale id is always a safe miss.

use std::collections::HashMap;

use smol_str::{SmolStr, format_smolstr};

use crate::text::{EditorRope, TextBuffer};

/// Identifier of a formula node. Unique for the lifetime of an editor.
pub type NodeId = SmolStr;

/// Lifecycle state of a formula node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    /// The node owns keystroke focus and its buffer is mutable.
    Editing,
    /// The buffer is frozen as final (non-blank) content.
    Committed,
}

/// Lifecycle state with blank-buffer editing called out.
///
/// `EmptyEditing` is `Editing` with a blank buffer; it is the only state
/// that backspace and blur remove outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodePhase {
    EmptyEditing,
    Editing,
    Committed,
}

/// An atomic, independently editable formula fragment.
#[derive(Debug, Clone)]
pub struct FormulaNode {
    id: NodeId,
    buffer: EditorRope,
    /// Char offset inside `buffer` where routed input lands.
    caret: usize,
    state: NodeState,
}

impl FormulaNode {
    fn new(id: NodeId, state: NodeState, raw: &str) -> Self {
        let buffer = EditorRope::from_str(raw);
        let caret = buffer.len_chars();
        Self {
            id,
            buffer,
            caret,
            state,
        }
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    /// The user-entered shorthand/LaTeX, exactly as typed.
    pub fn raw_content(&self) -> String {
        self.buffer.to_string()
    }

    pub fn state(&self) -> NodeState {
        self.state
    }

    pub fn phase(&self) -> NodePhase {
        match self.state {
            NodeState::Committed => NodePhase::Committed,
            NodeState::Editing if self.buffer.is_blank() => NodePhase::EmptyEditing,
            NodeState::Editing => NodePhase::Editing,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.state == NodeState::Editing
    }

    /// True when the buffer is empty or whitespace only.
    pub fn is_blank(&self) -> bool {
        self.buffer.is_blank()
    }

    /// Char offset of the node's own caret.
    pub fn caret(&self) -> usize {
        self.caret
    }

    pub(crate) fn set_state(&mut self, state: NodeState) {
        self.state = state;
    }

    /// Replace the buffer, leaving the caret at the end.
    pub(crate) fn set_raw(&mut self, raw: &str) {
        self.buffer.set(raw);
        self.caret = self.buffer.len_chars();
    }

    pub(crate) fn set_caret(&mut self, offset: usize) {
        self.caret = offset.min(self.buffer.len_chars());
    }

    pub(crate) fn insert_at_caret(&mut self, text: &str) {
        self.buffer.insert(self.caret, text);
        self.caret += text.chars().count();
    }

    /// Delete the char before the caret. Returns false at offset 0.
    pub(crate) fn delete_before_caret(&mut self) -> bool {
        if self.caret == 0 {
            return false;
        }
        self.buffer.delete(self.caret - 1..self.caret);
        self.caret -= 1;
        true
    }
}

/// Arena of formula nodes keyed by id.
#[derive(Debug, Clone)]
pub struct FormulaStore {
    nodes: HashMap<NodeId, FormulaNode>,
    prefix: SmolStr,
    /// Monotonic; never reset, so ids are never reused.
    next_id: usize,
}

impl Default for FormulaStore {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_ID_PREFIX)
    }
}

impl FormulaStore {
    pub fn new(prefix: impl Into<SmolStr>) -> Self {
        Self {
            nodes: HashMap::new(),
            prefix: prefix.into(),
            next_id: 0,
        }
    }

    pub(crate) fn create(&mut self, state: NodeState, raw: &str) -> NodeId {
        let id = make_node_id(&self.prefix, self.next_id);
        self.next_id += 1;
        self.nodes
            .insert(id.clone(), FormulaNode::new(id.clone(), state, raw));
        id
    }

    pub fn get(&self, id: &str) -> Option<&FormulaNode> {
        self.nodes.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut FormulaNode> {
        self.nodes.get_mut(id)
    }

    pub(crate) fn remove(&mut self, id: &str) -> Option<FormulaNode> {
        self.nodes.remove(id)
    }

    /// Drop every node but keep the id counter running.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes currently in `Editing` state.
    pub fn editing(&self) -> impl Iterator<Item = &FormulaNode> {
        self.nodes.values().filter(|node| node.is_editing())
    }
}

/// Generate a node id from the store prefix and a counter.
pub fn make_node_id(prefix: &str, index: usize) -> NodeId {
    format_smolstr!("{}-{}", prefix, index)
}
