//! Editor actions and key input types.
//!
//! `FormulaAction` represents semantic operations on a formula document,
//! decoupled from how they're triggered (keyboard, toolbar, paste, a replay
//! script). `KeyCombo` is the platform-agnostic keyboard input that
//! [`action_for_key`] maps onto actions.

use smol_str::SmolStr;

use crate::store::NodeId;

/// All possible editor actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormulaAction {
    // === Formula lifecycle ===
    /// Start a new formula at the caret (toolbar button or shortcut).
    InsertFormula { initial: String },

    /// Insert into the open formula, or start one if none is open.
    InsertSymbol { latex: String },

    /// Give a formula the editing focus (click/focus on its widget).
    Focus { id: NodeId },

    /// Commit the focused formula and drop focus (blur, click-away).
    Blur,

    /// Enter: commit, break the line, and open a fresh formula.
    CommitAndContinue,

    /// Shift+Enter: commit and break the line, back to plain text.
    CommitAndExit,

    /// Tab: leave the formula; an empty one is removed.
    ExitFormula,

    /// Backspace inside a formula; an empty one is removed.
    DeleteBackward,

    // === Text ===
    /// Typed characters: into the focused formula, otherwise plain text.
    Type { text: String },

    /// Plain text at the caret, never into a formula.
    AppendText { text: String },

    /// A committed formula at the caret (AI suggestion, template).
    AppendFormula { latex: String },

    /// Clipboard paste.
    Paste { text: String },

    // === Navigation ===
    /// Move the document caret.
    MoveCursor { offset: usize },

    /// Move the caret inside the focused formula.
    MoveNodeCursor { offset: usize },
}

impl FormulaAction {
    /// Whether this action only makes sense with a focused formula.
    pub fn needs_focus(&self) -> bool {
        matches!(
            self,
            Self::CommitAndContinue
                | Self::CommitAndExit
                | Self::ExitFormula
                | Self::DeleteBackward
                | Self::MoveNodeCursor { .. }
        )
    }
}

/// Key values for keyboard input.
///
/// Platform code converts native key events into this enum.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    /// A character key.
    Character(SmolStr),

    Backspace,
    Delete,
    Enter,
    Tab,
    Escape,

    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Home,
    End,
}

impl Key {
    /// Create a character key.
    pub fn character(s: impl Into<SmolStr>) -> Self {
        Self::Character(s.into())
    }
}

/// Modifier key state for a key combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        ctrl: false,
        alt: false,
        shift: false,
        meta: false,
    };

    pub const CTRL: Self = Self {
        ctrl: true,
        alt: false,
        shift: false,
        meta: false,
    };

    pub const SHIFT: Self = Self {
        ctrl: false,
        alt: false,
        shift: true,
        meta: false,
    };

    pub const META: Self = Self {
        ctrl: false,
        alt: false,
        shift: false,
        meta: true,
    };

    /// Get the primary modifier for the platform (Cmd on Mac, Ctrl elsewhere).
    pub fn primary(is_mac: bool) -> Self {
        if is_mac { Self::META } else { Self::CTRL }
    }
}

/// A key combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyCombo {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyCombo {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn with_modifiers(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    pub fn shift(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::SHIFT,
        }
    }

    pub fn primary(key: Key, is_mac: bool) -> Self {
        Self {
            key,
            modifiers: Modifiers::primary(is_mac),
        }
    }
}

/// Result of handling a keydown event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeydownResult {
    /// Event was handled, prevent default.
    Handled,
    /// Event was not a keybinding, let platform handle it.
    NotHandled,
}

/// Map a key combination onto an action.
///
/// Formula-editing keys (Enter, Shift+Enter, Tab, Backspace, Escape) only
/// map when `formula_focused`; otherwise the platform keeps them. The
/// primary modifier + `m` starts a formula anywhere.
pub fn action_for_key(combo: &KeyCombo, formula_focused: bool) -> Option<FormulaAction> {
    let mods = combo.modifiers;
    let primary = mods.ctrl || mods.meta;

    if primary && !mods.alt {
        if let Key::Character(c) = &combo.key {
            if c.eq_ignore_ascii_case("m") {
                return Some(FormulaAction::InsertFormula {
                    initial: String::new(),
                });
            }
        }
        return None;
    }

    if !formula_focused {
        return None;
    }

    match &combo.key {
        Key::Enter if mods.shift => Some(FormulaAction::CommitAndExit),
        Key::Enter => Some(FormulaAction::CommitAndContinue),
        Key::Tab => Some(FormulaAction::ExitFormula),
        Key::Backspace => Some(FormulaAction::DeleteBackward),
        Key::Escape => Some(FormulaAction::Blur),
        Key::Character(c) => Some(FormulaAction::Type {
            text: c.to_string(),
        }),
        _ => None,
    }
}
