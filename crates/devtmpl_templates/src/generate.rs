//! The end-to-end generation pipeline.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use devtmpl_source::{resolve, ResolveConfig};

use crate::error::TemplateResult;
use crate::manifest::load_template;
use crate::materialize::{copy_tree, materialize};
use crate::options::{apply_defaults, check_options};
use crate::substitute::substitute_options;

/// Configuration for a generation run.
#[derive(Debug, Clone)]
pub struct GenerateConfig {
    /// Root directory for scratch/temp allocation. `None` uses the system
    /// default.
    pub tmp_root: Option<PathBuf>,
    /// Retain the temporary directories after completion, for diagnostics.
    pub keep_tmp_dir: bool,
    /// Glob patterns removed from the scratch tree before substitution.
    pub omit_paths: Vec<String>,
    /// Copy a local source directory to temp before reading it. In-place
    /// use is cheaper but lets mutation leak into the caller's filesystem.
    pub isolate_local_source: bool,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            tmp_root: None,
            keep_tmp_dir: false,
            omit_paths: Vec::new(),
            isolate_local_source: true,
        }
    }
}

impl GenerateConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tmp_root(mut self, tmp_root: impl Into<PathBuf>) -> Self {
        self.tmp_root = Some(tmp_root.into());
        self
    }

    pub fn keep_tmp_dir(mut self, keep: bool) -> Self {
        self.keep_tmp_dir = keep;
        self
    }

    pub fn with_omit_path(mut self, pattern: impl Into<String>) -> Self {
        self.omit_paths.push(pattern.into());
        self
    }

    pub fn isolate_local_source(mut self, isolate: bool) -> Self {
        self.isolate_local_source = isolate;
        self
    }
}

/// Materialize the template at `source` into `target` with default
/// configuration.
pub async fn generate(
    source: &str,
    target: &Path,
    options: HashMap<String, String>,
) -> TemplateResult<()> {
    generate_with_config(source, target, options, GenerateConfig::default()).await
}

/// Materialize the template at `source` into `target`.
///
/// Stages run in order: source resolution, manifest load, option
/// validation, materialization into scratch, default filling, token
/// substitution, final copy. The target directory is only created once
/// substitution has succeeded; a failure after that point may leave the
/// target partially populated.
pub async fn generate_with_config(
    source: &str,
    target: &Path,
    mut options: HashMap<String, String>,
    config: GenerateConfig,
) -> TemplateResult<()> {
    let resolve_config = ResolveConfig {
        tmp_root: config.tmp_root.clone(),
        isolate_local: config.isolate_local_source,
    };
    let resolved = resolve(source, &resolve_config).await?;
    info!(source, template_dir = ?resolved.dir(), "resolved template source");

    let loaded = load_template(resolved.dir())?;
    check_options(&loaded.manifest, &options)?;

    let scratch = materialize(resolved.dir(), &loaded.manifest, &config)?;

    apply_defaults(&loaded.manifest, &mut options);
    substitute_options(scratch.path(), &options)?;

    fs::create_dir_all(target)?;
    copy_tree(scratch.path(), target)?;
    info!(target = ?target, id = %loaded.manifest.id, "template generated");

    if config.keep_tmp_dir {
        let source_dir = resolved.keep();
        let scratch_dir = scratch.keep();
        debug!(source = ?source_dir, scratch = ?scratch_dir, "retaining temporary directories");
    }

    Ok(())
}
