//! kaava renderer
//!
//! Turns formula LaTeX into MathML with pulldown-latex. [`MathRenderer`]
//! plugs into the editor's preview seam, and [`render_content_html`] renders
//! a whole canonical `text $formula$` string for display.

pub mod error;
pub mod html;
pub mod math;

pub use error::RenderError;
pub use html::{MathRenderer, preview_html, render_content_html};
pub use math::{MathResult, fallback_html, render_math, try_render_math};
