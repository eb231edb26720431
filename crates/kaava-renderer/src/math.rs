//! LaTeX → MathML via pulldown-latex.

use pulldown_cmark_escape::escape_html;
use pulldown_latex::{
    Parser, Storage, config::DisplayMode, config::RenderConfig, mathml::push_mathml,
};

use crate::error::RenderError;

/// Outcome of rendering one formula.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MathResult {
    /// MathML markup.
    Success(String),
    /// Rendering failed; `html` shows the source with an error style.
    Error { html: String, message: String },
}

impl MathResult {
    /// The markup to display, whichever way rendering went.
    pub fn html(&self) -> &str {
        match self {
            MathResult::Success(html) | MathResult::Error { html, .. } => html,
        }
    }
}

/// Render LaTeX (without `$` delimiters) to MathML.
pub fn try_render_math(latex: &str, display_mode: bool) -> Result<String, RenderError> {
    let storage = Storage::new();
    let parser = Parser::new(latex, &storage);
    let config = RenderConfig {
        display_mode: if display_mode {
            DisplayMode::Block
        } else {
            DisplayMode::Inline
        },
        ..Default::default()
    };

    // push_mathml stops at the first error; collect first so every parse
    // error ends up in the message.
    let events: Vec<_> = parser.collect();
    let errors: Vec<String> = events
        .iter()
        .filter_map(|e| e.as_ref().err().map(|err| err.to_string()))
        .collect();
    if !errors.is_empty() {
        return Err(RenderError::Parse(errors.join("; ")));
    }

    let mut mathml = String::new();
    push_mathml(&mut mathml, events.into_iter(), config)
        .map_err(|e| RenderError::Emit(e.to_string()))?;
    Ok(mathml)
}

/// Render LaTeX, falling back to an escaped `<code>` span on failure.
pub fn render_math(latex: &str, display_mode: bool) -> MathResult {
    match try_render_math(latex, display_mode) {
        Ok(mathml) => MathResult::Success(mathml),
        Err(err) => {
            let message = err.to_string();
            tracing::debug!(latex, %message, "math render failed");
            MathResult::Error {
                html: fallback_html(latex, &message, display_mode),
                message,
            }
        }
    }
}

/// Error-styled markup showing the raw LaTeX, with the error as a tooltip.
pub fn fallback_html(latex: &str, error: &str, display_mode: bool) -> String {
    let mode_class = if display_mode {
        "math-display"
    } else {
        "math-inline"
    };
    let mut escaped_latex = String::new();
    let mut escaped_error = String::new();
    // Writing to a String can't fail.
    let _ = escape_html(&mut escaped_latex, latex);
    let _ = escape_html(&mut escaped_error, error);
    format!(
        r#"<span class="math math-error {mode_class}" title="{escaped_error}"><code>{escaped_latex}</code></span>"#
    )
}
