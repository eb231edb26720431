//! HTML output for previews and whole documents.

use kaava_editor_core::normalize::normalize_latex_with;
use kaava_editor_core::{ContentPiece, FormulaRenderer, NormalizerConfig, Preview, parse_content};
use pulldown_cmark_escape::escape_html_body_text;

use crate::error::RenderError;
use crate::math::{fallback_html, render_math, try_render_math};

/// The pulldown-latex backed preview renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct MathRenderer;

impl FormulaRenderer for MathRenderer {
    type Error = RenderError;

    fn render(&self, latex: &str, display_mode: bool) -> Result<String, RenderError> {
        try_render_math(latex, display_mode)
    }
}

/// Markup for a cached preview. Fallbacks show the LaTeX source.
pub fn preview_html(preview: &Preview, display_mode: bool) -> String {
    match preview {
        Preview::Rendered { html, .. } => html.clone(),
        Preview::Fallback { latex, message } => fallback_html(latex, message, display_mode),
    }
}

/// Render canonical content: text escaped, each formula normalized and
/// rendered inline.
pub fn render_content_html(content: &str, config: &NormalizerConfig) -> String {
    let mut out = String::new();
    for piece in parse_content(content) {
        match piece {
            ContentPiece::Text(text) => {
                // Writing to a String can't fail.
                let _ = escape_html_body_text(&mut out, text);
            }
            ContentPiece::Formula(raw) => {
                let latex = normalize_latex_with(raw, config);
                out.push_str(render_math(&latex, false).html());
            }
        }
    }
    out
}
