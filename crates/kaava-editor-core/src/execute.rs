//! Action execution for the formula editor.
//!
//! `execute_action` is the central dispatch point: hosts translate input
//! events into [`FormulaAction`]s and feed them here.

use crate::actions::{FormulaAction, KeyCombo, KeydownResult, action_for_key};
use crate::coordinator::FormulaEditor;
use crate::document::CommitOutcome;

/// Execute an action on the editor.
///
/// Returns true if the action was handled and the editor was changed.
pub fn execute_action(editor: &mut FormulaEditor, action: &FormulaAction) -> bool {
    if action.needs_focus() && editor.focused().is_none() {
        return false;
    }
    match action {
        FormulaAction::InsertFormula { initial } => {
            editor.insert_formula(initial);
            true
        }
        FormulaAction::InsertSymbol { latex } => {
            editor.insert_symbol(latex);
            true
        }
        FormulaAction::Focus { id } => editor.focus(id),
        FormulaAction::Blur => editor.blur().is_some(),
        FormulaAction::CommitAndContinue => execute_commit_and_continue(editor),
        FormulaAction::CommitAndExit => execute_commit_and_exit(editor),
        FormulaAction::ExitFormula => execute_exit_formula(editor),
        FormulaAction::DeleteBackward => editor.delete_backward(),
        FormulaAction::Type { text } => {
            if !editor.route_insert(text) {
                editor.append_text(text);
            }
            true
        }
        FormulaAction::AppendText { text } => {
            editor.append_text(text);
            true
        }
        FormulaAction::AppendFormula { latex } => editor.append_formula(latex).is_some(),
        FormulaAction::Paste { text } => {
            editor.paste(text);
            true
        }
        FormulaAction::MoveCursor { offset } => {
            editor.set_caret(*offset);
            true
        }
        FormulaAction::MoveNodeCursor { offset } => match editor.focused().cloned() {
            Some(id) => editor.set_node_caret(&id, *offset),
            None => false,
        },
    }
}

/// Map a keydown onto an action and execute it.
pub fn handle_keydown(editor: &mut FormulaEditor, combo: &KeyCombo) -> KeydownResult {
    let Some(action) = action_for_key(combo, editor.focused().is_some()) else {
        return KeydownResult::NotHandled;
    };
    if execute_action(editor, &action) {
        KeydownResult::Handled
    } else {
        KeydownResult::NotHandled
    }
}

fn execute_commit_and_continue(editor: &mut FormulaEditor) -> bool {
    let Some(id) = editor.focused().cloned() else {
        return false;
    };
    // An empty formula just closes; only a committed one continues.
    if editor.blur() == Some(CommitOutcome::Committed) {
        editor.split_after(&id);
        editor.insert_formula("");
    }
    true
}

fn execute_commit_and_exit(editor: &mut FormulaEditor) -> bool {
    let Some(id) = editor.focused().cloned() else {
        return false;
    };
    if editor.blur() == Some(CommitOutcome::Committed) {
        editor.split_after(&id);
    }
    true
}

fn execute_exit_formula(editor: &mut FormulaEditor) -> bool {
    let Some(id) = editor.focused().cloned() else {
        return false;
    };
    if editor.node(&id).is_some_and(|node| node.is_blank()) {
        return editor.remove(&id);
    }
    editor.blur();
    if let Some(offset) = editor.document().offset_of(&id) {
        editor.set_caret(offset + 1);
    }
    true
}
