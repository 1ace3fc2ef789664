//! Glob-based file selection.
//!
//! Patterns follow standard glob semantics (`*`, `?`, character classes).
//! One extension layers on top: a pattern of the form `/*<dir>` names the
//! directory `<dir>` under the root as a wholesale copy/remove target and
//! skips per-file matching. The extension is resolved by a pre-check
//! before the glob engine ever sees the pattern.

use std::path::{Path, PathBuf};

use crate::error::{TemplateError, TemplateResult};

/// Prefix marking a pattern as a wholesale directory target.
const DIR_PREFIX: &str = "/*";

/// Evaluate `patterns` in order against `root`, returning matched paths
/// relative to `root`.
pub fn select(root: &Path, patterns: &[String]) -> TemplateResult<Vec<PathBuf>> {
    let mut selected = Vec::new();
    for pattern in patterns {
        selected.extend(select_one(root, pattern)?);
    }
    Ok(selected)
}

/// Evaluate a single pattern against `root`.
pub(crate) fn select_one(root: &Path, pattern: &str) -> TemplateResult<Vec<PathBuf>> {
    if let Some(dir) = pattern.strip_prefix(DIR_PREFIX) {
        if root.join(dir).is_dir() {
            return Ok(vec![PathBuf::from(dir)]);
        }
        return Ok(Vec::new());
    }

    let escaped_root = glob::Pattern::escape(&root.to_string_lossy());
    let full_pattern = format!("{escaped_root}/{pattern}");
    let paths = glob::glob(&full_pattern).map_err(|e| TemplateError::InvalidPattern {
        pattern: pattern.to_string(),
        source: e,
    })?;

    let mut matches = Vec::new();
    for entry in paths {
        let path = entry.map_err(|e| TemplateError::Io(e.into_error()))?;
        if let Ok(relative) = path.strip_prefix(root) {
            matches.push(relative.to_path_buf());
        }
    }
    Ok(matches)
}
