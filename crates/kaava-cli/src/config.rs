//! KDL config file loading.
//!
//! ```kdl
//! id-prefix "kaava"
//! max-passes 10
//! display-mode false
//! ```

use std::path::{Path, PathBuf};

use kaava_editor_core::EditorConfig;
use kdl::{KdlDocument, KdlValue};
use miette::{IntoDiagnostic, Result, WrapErr, miette};

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("kaava").join("config.kdl"))
}

/// Load the editor config.
///
/// An explicit `path` must exist. Without one the default location is tried
/// and a missing file gives the defaults.
pub fn load_config(path: Option<&Path>) -> Result<EditorConfig> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Some(path) if path.exists() => path,
            _ => return Ok(EditorConfig::default()),
        },
    };
    tracing::debug!(path = %path.display(), "loading config");
    let content = std::fs::read_to_string(&path)
        .into_diagnostic()
        .wrap_err_with(|| format!("reading {}", path.display()))?;
    parse_config(&content)
}

pub fn parse_config(content: &str) -> Result<EditorConfig> {
    let doc: KdlDocument = content.parse().into_diagnostic()?;
    let mut config = EditorConfig::default();

    if let Some(value) = first_value(&doc, "id-prefix") {
        let prefix = value
            .as_string()
            .ok_or_else(|| miette!("id-prefix must be a string"))?;
        if prefix.is_empty() {
            return Err(miette!("id-prefix must not be empty"));
        }
        config.id_prefix = prefix.into();
    }

    if let Some(value) = first_value(&doc, "max-passes") {
        let passes = value
            .as_i64()
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| miette!("max-passes must be a non-negative integer"))?;
        config.normalizer.max_passes = passes;
    }

    if let Some(value) = first_value(&doc, "display-mode") {
        config.display_mode = value
            .as_bool()
            .ok_or_else(|| miette!("display-mode must be a boolean"))?;
    }

    Ok(config)
}

fn first_value<'a>(doc: &'a KdlDocument, name: &str) -> Option<&'a KdlValue> {
    Some(doc.get(name)?.entries().first()?.value())
}
