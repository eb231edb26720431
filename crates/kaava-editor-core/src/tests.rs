//! Scenario tests for the editor surface.
//!
//! These drive `FormulaEditor` the way a host would and check the lifecycle
//! rules end to end: single active editor, empty-commit removal, stale ids,
//! previews, and the canonical string.

use insta::assert_snapshot;

use crate::document::{CommitOutcome, Segment};
use crate::preview::{FormulaRenderer, Preview};
use crate::store::{NodePhase, NodeState};
use crate::{EditorConfig, FormulaEditor};

fn editing_count(editor: &FormulaEditor) -> usize {
    editor.document().store().editing().count()
}

/// Renders anything without a `\bad` command.
struct FakeRenderer;

impl FormulaRenderer for FakeRenderer {
    type Error = String;

    fn render(&self, latex: &str, display_mode: bool) -> Result<String, String> {
        if latex.contains(r"\bad") {
            return Err(format!("unknown command in {latex}"));
        }
        let tag = if display_mode { "block" } else { "inline" };
        Ok(format!("<math display=\"{tag}\">{latex}</math>"))
    }
}

// === Single active editor ===

#[test]
fn test_single_editor_across_focus_and_insert() {
    let mut editor = FormulaEditor::default();
    let a = editor.insert_formula("a");
    assert_eq!(editing_count(&editor), 1);

    let b = editor.insert_formula("b");
    assert_eq!(editing_count(&editor), 1);
    assert_eq!(editor.node(&a).map(|n| n.state()), Some(NodeState::Committed));

    assert!(editor.focus(&a));
    assert_eq!(editing_count(&editor), 1);
    assert_eq!(editor.node(&b).map(|n| n.state()), Some(NodeState::Committed));
    assert_eq!(editor.editing_node().map(|n| n.id()), Some(&a));

    let c = editor.insert_formula("");
    assert!(editor.focus(&b));
    // The empty `c` was force-committed, which removes it.
    assert!(editor.node(&c).is_none());
    assert_eq!(editing_count(&editor), 1);
}

#[test]
fn test_refocusing_the_same_node_keeps_it_editing() {
    let mut editor = FormulaEditor::default();
    let a = editor.insert_formula("x");
    assert!(editor.focus(&a));
    assert_eq!(editor.node(&a).map(|n| n.phase()), Some(NodePhase::Editing));
}

#[test]
fn test_activating_committed_node_returns_to_editing() {
    let mut editor = FormulaEditor::default();
    let id = editor.append_formula("x^2+1=0").unwrap();
    assert_eq!(editor.node(&id).map(|n| n.phase()), Some(NodePhase::Committed));

    assert!(editor.focus(&id));
    assert!(editor.route_insert("0"));
    assert_eq!(editor.blur(), Some(CommitOutcome::Committed));
    assert_eq!(editor.get_content(), "$x^2+1=00$");
}

// === Commit rules ===

#[test]
fn test_empty_commit_removes_node_and_segment() {
    let mut editor = FormulaEditor::default();
    editor.append_text("ab");
    editor.set_caret(1);
    let id = editor.insert_formula("x");

    assert!(editor.update_content(&id, ""));
    assert_eq!(editor.commit(&id), Some(CommitOutcome::Removed));
    assert!(editor.node(&id).is_none());
    assert!(editor.focused().is_none());
    assert_eq!(editor.segments(), &[Segment::Text("ab".into())]);
}

#[test]
fn test_commit_of_committed_node_is_noop() {
    let mut editor = FormulaEditor::default();
    let id = editor.append_formula("y").unwrap();
    assert_eq!(editor.commit(&id), Some(CommitOutcome::AlreadyCommitted));
    assert_eq!(editor.get_content(), "$y$");
}

#[test]
fn test_blanked_committed_node_is_removed_on_commit() {
    let mut editor = FormulaEditor::default();
    editor.append_text("a ");
    let id = editor.append_formula("x").unwrap();

    assert!(editor.update_content(&id, ""));
    assert_eq!(editor.commit(&id), Some(CommitOutcome::Removed));
    assert!(editor.node(&id).is_none());
    assert_eq!(editor.segments(), &[Segment::Text("a ".into())]);
    assert_eq!(editor.get_content(), "a ");
}

#[test]
fn test_backspace_at_buffer_start_deletes_nothing() {
    let mut editor = FormulaEditor::default();
    let id = editor.insert_formula("ab");
    assert!(editor.set_node_caret(&id, 0));
    assert!(!editor.delete_backward());
    assert_eq!(editor.node(&id).map(|n| n.raw_content()), Some("ab".into()));

    assert!(editor.set_node_caret(&id, 2));
    assert!(editor.delete_backward());
    assert_eq!(editor.node(&id).map(|n| n.raw_content()), Some("a".into()));
}

#[test]
fn test_remove_focused_node_clears_focus() {
    let mut editor = FormulaEditor::default();
    let id = editor.insert_formula("nonempty");
    assert!(editor.remove(&id));
    assert!(editor.focused().is_none());
    assert_eq!(editor.get_content(), "");
}

// === Stale ids ===

#[test]
fn test_stale_ids_are_noops() {
    let mut editor = FormulaEditor::default();
    let id = editor.insert_formula("x");
    editor.remove(&id);

    assert!(!editor.update_content(&id, "y"));
    assert_eq!(editor.commit(&id), None);
    assert!(!editor.remove(&id));
    assert!(!editor.focus(&id));
    assert!(!editor.split_after(&id));
    assert!(!editor.set_node_caret(&id, 0));
    assert_eq!(editor.get_content(), "");
}

// === Host surface ===

#[test]
fn test_serialization_in_insertion_order() {
    let mut editor = FormulaEditor::default();
    editor.append_text("Ratkaise: ");
    editor.append_formula("x^2+1=0");
    editor.append_text(" kun x>0");
    assert_snapshot!(editor.get_content(), @"Ratkaise: $x^2+1=0$ kun x>0");
}

#[test]
fn test_append_text_is_not_routed_into_focused_formula() {
    let mut editor = FormulaEditor::default();
    let id = editor.insert_formula("a+");
    editor.append_text(" teksti");
    assert_eq!(editor.node(&id).map(|n| n.raw_content()), Some("a+".into()));
    assert_eq!(editor.focused(), Some(&id));
    assert_eq!(editor.get_content(), "$a+$ teksti");
}

#[test]
fn test_editing_node_is_serialized_with_current_buffer() {
    let mut editor = FormulaEditor::default();
    editor.append_text("x = ");
    editor.insert_formula("\\frac{1}{");
    assert_eq!(editor.get_content(), "x = $\\frac{1}{$");
}

#[test]
fn test_append_blank_formula_creates_nothing() {
    let mut editor = FormulaEditor::default();
    assert_eq!(editor.append_formula("   "), None);
    assert_eq!(editor.node_count(), 0);
}

#[test]
fn test_insert_symbol_routes_or_opens() {
    let mut editor = FormulaEditor::default();
    let opened = editor.insert_symbol(r"\sqrt{}");
    let routed = editor.insert_symbol("2");
    assert_eq!(opened, routed);
    assert_eq!(editor.node_count(), 1);
    editor.blur();
    assert_eq!(editor.get_content(), r"$\sqrt{}2$");
}

#[test]
fn test_insert_formula_at_accounts_for_removed_predecessor() {
    let mut editor = FormulaEditor::default();
    editor.append_text("ab");
    editor.set_caret(0);
    editor.insert_formula("");
    // Document is now [F, "ab"]; offset 3 means after "ab".
    let id = editor.insert_formula_at(3, "z");
    assert_eq!(editor.get_content(), "ab$z$");
    assert_eq!(editor.focused(), Some(&id));
}

#[test]
fn test_paste_into_focused_formula_drops_delimiters() {
    let mut editor = FormulaEditor::default();
    let id = editor.insert_formula("");
    assert!(editor.paste("$a$ b").is_empty());
    assert_eq!(editor.node(&id).map(|n| n.raw_content()), Some("a b".into()));

    assert!(editor.paste("$$^2$$").is_empty());
    assert_eq!(editor.node(&id).map(|n| n.raw_content()), Some("a b^2".into()));
}

#[test]
fn test_pasted_formula_survives_save_and_load() {
    let mut editor = FormulaEditor::default();
    editor.append_text("x = ");
    editor.insert_formula("");
    editor.paste("$a$ b");
    editor.blur();
    let saved = editor.get_content();
    assert_eq!(saved, "x = $a b$");

    let reloaded = FormulaEditor::with_content(EditorConfig::default(), &saved);
    assert_eq!(reloaded.segments().len(), editor.segments().len());
    let raws = |e: &FormulaEditor| -> Vec<String> {
        e.segments()
            .iter()
            .map(|s| match s {
                Segment::Text(t) => t.clone(),
                Segment::Formula(id) => e.node(id).map(|n| n.raw_content()).unwrap_or_default(),
            })
            .collect()
    };
    assert_eq!(raws(&reloaded), raws(&editor));
    assert_eq!(reloaded.get_content(), saved);
}

#[test]
fn test_delimiter_only_paste_inserts_nothing() {
    let mut editor = FormulaEditor::default();
    let id = editor.insert_formula("x");
    assert!(editor.paste("$$").is_empty());
    assert_eq!(editor.node(&id).map(|n| n.raw_content()), Some("x".into()));
    assert_eq!(editor.node_count(), 1);
}

#[test]
fn test_paste_mixed_content_at_caret() {
    let mut editor = FormulaEditor::default();
    editor.append_text("alku  loppu");
    editor.set_caret(5);
    let ids = editor.paste("$a/b$ ja $c$");
    assert_eq!(ids.len(), 2);
    assert_eq!(editor.get_content(), "alku $a/b$ ja $c$ loppu");
    assert!(ids
        .iter()
        .all(|id| editor.node(id).map(|n| n.state()) == Some(NodeState::Committed)));
}

#[test]
fn test_load_replaces_document_and_keeps_counting_ids() {
    let mut editor = FormulaEditor::default();
    let old = editor.insert_formula("x");

    editor.load("Olkoon $f(x)=x^2$.");
    assert!(editor.focused().is_none());
    assert!(editor.node(&old).is_none());
    assert_eq!(editor.node_count(), 1);
    assert_eq!(editor.get_content(), "Olkoon $f(x)=x^2$.");

    let new = editor.segments()[1].as_formula().cloned().unwrap();
    assert_ne!(new, old);
}

#[test]
fn test_custom_id_prefix() {
    let config = EditorConfig {
        id_prefix: "kaava".into(),
        ..EditorConfig::default()
    };
    let mut editor = FormulaEditor::new(config);
    let id = editor.insert_formula("x");
    assert_eq!(id, "kaava-0");
}

// === Previews ===

#[test]
fn test_preview_uses_normalized_latex() {
    let mut editor = FormulaEditor::default();
    let id = editor.insert_formula("x^2/3");
    let request = editor.request_preview(&id).unwrap();
    assert_snapshot!(request.latex, @r"x^\frac{2}{3}");
    assert!(!request.display_mode);

    // Canonical content keeps the raw buffer.
    assert_eq!(editor.get_content(), "$x^2/3$");
}

#[test]
fn test_render_preview_success_and_fallback() {
    let mut editor = FormulaEditor::default();
    let good = editor.append_formula("a/b").unwrap();
    let bad = editor.append_formula(r"\bad{x}").unwrap();

    let preview = editor.render_preview(&good, &FakeRenderer).cloned();
    assert_eq!(
        preview,
        Some(Preview::Rendered {
            latex: r"\frac{a}{b}".into(),
            html: r#"<math display="inline">\frac{a}{b}</math>"#.into(),
        })
    );

    let preview = editor.render_preview(&bad, &FakeRenderer).unwrap();
    assert!(preview.is_fallback());
    assert_eq!(preview.latex(), r"\bad{x}");

    // A failed render leaves the stored content untouched.
    assert_eq!(editor.get_content(), r"$a/b$$\bad{x}$");
}

#[test]
fn test_late_preview_for_removed_node_is_dropped() {
    let mut editor = FormulaEditor::default();
    let id = editor.insert_formula("x");
    let request = editor.request_preview(&id).unwrap();

    editor.remove(&id);
    assert!(!editor.apply_preview(&request.id, request.latex, Ok("<math/>".into())));
    assert!(editor.preview(&id).is_none());
}

#[test]
fn test_late_preview_after_load_is_dropped() {
    let mut editor = FormulaEditor::with_content(EditorConfig::default(), "$x$");
    let id = editor.segments()[0].as_formula().cloned().unwrap();
    let request = editor.request_preview(&id).unwrap();

    editor.load("$x$");
    assert!(!editor.apply_preview(&request.id, request.latex, Ok("<math/>".into())));
}

#[test]
fn test_blank_node_has_no_preview_request() {
    let mut editor = FormulaEditor::default();
    let id = editor.insert_formula(" ");
    assert!(editor.request_preview(&id).is_none());
}

#[test]
fn test_display_mode_from_config() {
    let config = EditorConfig {
        display_mode: true,
        ..EditorConfig::default()
    };
    let mut editor = FormulaEditor::new(config);
    let id = editor.append_formula("x").unwrap();
    let html = match editor.render_preview(&id, &FakeRenderer) {
        Some(Preview::Rendered { html, .. }) => html.clone(),
        other => panic!("unexpected preview: {other:?}"),
    };
    assert!(html.contains("block"));
}
