//! Editing scripts for `kaava replay`.
//!
//! One command per line; blank lines and `#` comments are skipped. The
//! argument is everything after the first space, taken verbatim.
//!
//! ```text
//! text Ratkaise:
//! formula
//! type x^2+1=0
//! key shift+enter
//! symbol π
//! ```

use kaava_editor_core::symbols::find_symbol;
use kaava_editor_core::{
    FormulaAction, FormulaEditor, Key, KeyCombo, KeydownResult, Modifiers, execute_action,
    handle_keydown,
};
use miette::{Result, miette};

/// One script line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Action(FormulaAction),
    Key(KeyCombo),
    Load(String),
}

pub fn parse_script(source: &str) -> Result<Vec<Step>> {
    let mut steps = Vec::new();
    for (index, line) in source.lines().enumerate() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.trim().is_empty() || line.trim_start().starts_with('#') {
            continue;
        }
        let step = parse_line(line).map_err(|msg| miette!("line {}: {msg}", index + 1))?;
        steps.push(step);
    }
    Ok(steps)
}

fn parse_line(line: &str) -> Result<Step, String> {
    let (verb, arg) = line.split_once(' ').unwrap_or((line, ""));
    let text = || arg.to_string();
    let step = match verb {
        "text" => Step::Action(FormulaAction::AppendText { text: text() }),
        "type" => Step::Action(FormulaAction::Type { text: text() }),
        "formula" => Step::Action(FormulaAction::InsertFormula { initial: text() }),
        "append" => Step::Action(FormulaAction::AppendFormula { latex: text() }),
        "paste" => Step::Action(FormulaAction::Paste { text: text() }),
        "symbol" => {
            let latex = find_symbol(arg).map_or(arg, |s| s.latex).to_string();
            Step::Action(FormulaAction::InsertSymbol { latex })
        }
        "focus" => Step::Action(FormulaAction::Focus { id: arg.into() }),
        "blur" => Step::Action(FormulaAction::Blur),
        "caret" => Step::Action(FormulaAction::MoveCursor {
            offset: parse_offset(arg)?,
        }),
        "node-caret" => Step::Action(FormulaAction::MoveNodeCursor {
            offset: parse_offset(arg)?,
        }),
        "key" => Step::Key(parse_key(arg)?),
        "load" => Step::Load(text()),
        other => return Err(format!("unknown command `{other}`")),
    };
    Ok(step)
}

fn parse_offset(arg: &str) -> Result<usize, String> {
    arg.trim()
        .parse()
        .map_err(|_| format!("expected an offset, got `{arg}`"))
}

/// Parse `shift+enter`, `ctrl+m`, `tab`, `x`, ...
pub fn parse_key(input: &str) -> Result<KeyCombo, String> {
    let input = input.trim();
    let (mods, name) = match input.rsplit_once('+') {
        // A bare `+` or a trailing `++` means the plus key itself.
        Some((mods, "")) => (mods.strip_suffix('+').unwrap_or(mods), "+"),
        Some((mods, name)) => (mods, name),
        None => ("", input),
    };

    let mut modifiers = Modifiers::NONE;
    for part in mods.split('+').filter(|p| !p.is_empty()) {
        match part.to_ascii_lowercase().as_str() {
            "ctrl" => modifiers.ctrl = true,
            "shift" => modifiers.shift = true,
            "alt" => modifiers.alt = true,
            "meta" | "cmd" => modifiers.meta = true,
            other => return Err(format!("unknown modifier `{other}`")),
        }
    }

    let key = match name.to_ascii_lowercase().as_str() {
        "enter" => Key::Enter,
        "tab" => Key::Tab,
        "backspace" => Key::Backspace,
        "delete" => Key::Delete,
        "escape" | "esc" => Key::Escape,
        "left" => Key::ArrowLeft,
        "right" => Key::ArrowRight,
        "up" => Key::ArrowUp,
        "down" => Key::ArrowDown,
        "home" => Key::Home,
        "end" => Key::End,
        _ if name.chars().count() == 1 => Key::character(name),
        _ => return Err(format!("unknown key `{name}`")),
    };
    Ok(KeyCombo::with_modifiers(key, modifiers))
}

/// Run the steps against `editor` the way a host would.
///
/// Keys the editor doesn't handle fall through to the host: unmodified
/// characters are typed as text, anything else is ignored.
pub fn replay(editor: &mut FormulaEditor, steps: &[Step]) {
    for step in steps {
        match step {
            Step::Action(action) => {
                if !execute_action(editor, action) {
                    tracing::info!(?action, "action had no effect");
                }
            }
            Step::Key(combo) => {
                if handle_keydown(editor, combo) == KeydownResult::NotHandled {
                    host_default(editor, combo);
                }
            }
            Step::Load(content) => editor.load(content),
        }
    }
}

fn host_default(editor: &mut FormulaEditor, combo: &KeyCombo) {
    let mods = combo.modifiers;
    match &combo.key {
        Key::Character(c) if !(mods.ctrl || mods.meta || mods.alt) => {
            editor.append_text(c);
        }
        key => tracing::info!(?key, "key ignored"),
    }
}
