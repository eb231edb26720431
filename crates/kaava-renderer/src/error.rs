//! Error types for math rendering.

use miette::Diagnostic;
use thiserror::Error;

/// Why a formula could not be rendered.
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
#[non_exhaustive]
pub enum RenderError {
    /// The LaTeX source did not parse.
    #[error("invalid LaTeX: {0}")]
    #[diagnostic(code(kaava::render::parse), help("the raw formula is shown as text instead"))]
    Parse(String),

    /// Parsed events could not be written out as MathML.
    #[error("MathML output failed: {0}")]
    #[diagnostic(code(kaava::render::emit))]
    Emit(String),
}
