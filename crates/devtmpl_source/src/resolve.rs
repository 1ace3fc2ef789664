//! Resolving a source string into a local template directory.

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::debug;

use crate::classify::{classify, SourceKind};
use crate::error::{SourceError, SourceResult};
use crate::fetch::{fetch_archive, find_template_dir};
use crate::oci::OciClient;

/// Configuration for source resolution.
#[derive(Debug, Clone)]
pub struct ResolveConfig {
    /// Root directory for temporary allocations. `None` uses the system
    /// default.
    pub tmp_root: Option<PathBuf>,
    /// Copy a local source directory into temporary storage instead of
    /// using it in place. Copying keeps later pipeline stages from
    /// mutating the caller's filesystem.
    pub isolate_local: bool,
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self {
            tmp_root: None,
            isolate_local: true,
        }
    }
}

/// A resolved template source: the local directory holding the raw
/// template, plus the temporary storage lease backing it. Dropping the
/// value releases the temporary storage.
#[derive(Debug)]
pub struct ResolvedSource {
    kind: SourceKind,
    dir: PathBuf,
    temp: Option<TempDir>,
}

impl ResolvedSource {
    /// Local directory containing the raw template.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// How the source string was classified.
    pub fn kind(&self) -> &SourceKind {
        &self.kind
    }

    /// Detach the temporary storage so it survives this value, returning
    /// the template directory path.
    pub fn keep(mut self) -> PathBuf {
        if let Some(temp) = self.temp.take() {
            let _ = temp.into_path();
        }
        std::mem::take(&mut self.dir)
    }
}

/// Resolve a source string into a local directory holding the raw template.
pub async fn resolve(source: &str, config: &ResolveConfig) -> SourceResult<ResolvedSource> {
    let kind = classify(source)?;

    let (dir, temp) = match &kind {
        SourceKind::LocalDir(path) => {
            if !config.isolate_local {
                debug!(?path, "using local template directory in place");
                (path.clone(), None)
            } else {
                let temp = source_tmp_dir(config.tmp_root.as_deref())?;
                copy_dir_contents(path, temp.path())?;
                debug!(?path, tmp = ?temp.path(), "copied local template directory");
                (temp.path().to_path_buf(), Some(temp))
            }
        }
        SourceKind::Archive(url) => {
            let temp = source_tmp_dir(config.tmp_root.as_deref())?;
            fetch_archive(url, temp.path()).await?;
            let dir = find_template_dir(temp.path())?;
            (dir, Some(temp))
        }
        SourceKind::OciReference(reference) => {
            let temp = source_tmp_dir(config.tmp_root.as_deref())?;
            OciClient::new().pull_template(reference, temp.path()).await?;
            (temp.path().to_path_buf(), Some(temp))
        }
    };

    Ok(ResolvedSource { kind, dir, temp })
}

fn source_tmp_dir(tmp_root: Option<&Path>) -> std::io::Result<TempDir> {
    let mut builder = tempfile::Builder::new();
    builder.prefix("devcontainer-source-");
    match tmp_root {
        Some(root) => builder.tempdir_in(root),
        None => builder.tempdir(),
    }
}

fn copy_dir_contents(src: &Path, dst: &Path) -> SourceResult<()> {
    let options = fs_extra::dir::CopyOptions::new()
        .overwrite(true)
        .content_only(true);
    fs_extra::dir::copy(src, dst, &options)
        .map_err(|e| SourceError::copy_failed(src, e.to_string()))?;
    Ok(())
}
