//! Materialization of a template into a scratch directory.
//!
//! Ordering is load-bearing: configuration copy, then optional-path copy,
//! then omit-pattern removal. Omit patterns run against the scratch tree,
//! so they can remove files an optional path just added.

use std::fs;
use std::path::Path;

use tempfile::TempDir;
use tracing::debug;

use crate::error::{TemplateError, TemplateResult};
use crate::generate::GenerateConfig;
use crate::manifest::{ConfigLayout, TemplateManifest};
use crate::select::select_one;

/// A populated scratch directory, removed on drop unless kept.
#[derive(Debug)]
pub struct Scratch {
    temp: TempDir,
}

impl Scratch {
    /// Path of the scratch directory.
    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    /// Detach the scratch directory so it survives this value.
    pub fn keep(self) -> std::path::PathBuf {
        self.temp.into_path()
    }
}

/// Copy the configuration artifacts and the manifest's optional paths into
/// a fresh scratch directory, then apply the omit patterns. Any failure
/// drops the scratch directory, removing partial output.
pub fn materialize(
    template_dir: &Path,
    manifest: &TemplateManifest,
    config: &GenerateConfig,
) -> TemplateResult<Scratch> {
    let layout = ConfigLayout::locate(template_dir)?;

    let temp = scratch_dir(config.tmp_root.as_deref())?;
    let scratch = Scratch { temp };

    copy_configuration(template_dir, scratch.path(), layout)?;
    copy_optional_paths(template_dir, scratch.path(), &manifest.optional_paths)?;
    remove_omitted(scratch.path(), &config.omit_paths)?;

    debug!(scratch = ?scratch.path(), "materialized template");
    Ok(scratch)
}

/// Recursively copy the contents of `src` into `dst`, creating `dst` as
/// needed. Permission bits are preserved.
pub(crate) fn copy_tree(src: &Path, dst: &Path) -> TemplateResult<()> {
    fs::create_dir_all(dst)?;
    let options = fs_extra::dir::CopyOptions::new()
        .overwrite(true)
        .content_only(true);
    fs_extra::dir::copy(src, dst, &options)
        .map_err(|e| TemplateError::copy_failed(src, e.to_string()))?;
    Ok(())
}

fn copy_configuration(src: &Path, dst: &Path, layout: ConfigLayout) -> TemplateResult<()> {
    if layout.parent {
        let file = src.join(".devcontainer.json");
        fs::copy(&file, dst.join(".devcontainer.json"))
            .map_err(|e| TemplateError::copy_failed(&file, e.to_string()))?;
    }
    if layout.nested {
        copy_tree(&src.join(".devcontainer"), &dst.join(".devcontainer"))?;
    }
    Ok(())
}

fn copy_optional_paths(src: &Path, dst: &Path, patterns: &[String]) -> TemplateResult<()> {
    for pattern in patterns {
        for relative in select_one(src, pattern)? {
            let from = src.join(&relative);
            let to = dst.join(&relative);

            if from.is_dir() {
                copy_tree(&from, &to)?;
            } else {
                if let Some(parent) = to.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::copy(&from, &to)
                    .map_err(|e| TemplateError::copy_failed(&from, e.to_string()))?;
            }
            debug!(path = ?relative, %pattern, "copied optional path");
        }
    }
    Ok(())
}

fn remove_omitted(scratch: &Path, patterns: &[String]) -> TemplateResult<()> {
    for pattern in patterns {
        for relative in select_one(scratch, pattern)? {
            let target = scratch.join(&relative);

            let result = if target.is_dir() {
                fs::remove_dir_all(&target)
            } else {
                fs::remove_file(&target)
            };
            result.map_err(|e| TemplateError::copy_failed(&target, e.to_string()))?;
            debug!(path = ?relative, %pattern, "removed omitted path");
        }
    }
    Ok(())
}

fn scratch_dir(tmp_root: Option<&Path>) -> std::io::Result<TempDir> {
    let mut builder = tempfile::Builder::new();
    builder.prefix("devcontainer-");
    match tmp_root {
        Some(root) => builder.tempdir_in(root),
        None => builder.tempdir(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn touch(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn nested_template(dir: &Path, optional_paths: &[&str]) -> TemplateManifest {
        touch(dir, ".devcontainer/devcontainer.json", "{}");
        TemplateManifest {
            optional_paths: optional_paths.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_copies_nested_configuration_tree() {
        let src = tempdir().unwrap();
        let manifest = nested_template(src.path(), &[]);
        touch(src.path(), ".devcontainer/Dockerfile", "FROM debian");

        let scratch = materialize(src.path(), &manifest, &GenerateConfig::default()).unwrap();

        assert!(scratch.path().join(".devcontainer/devcontainer.json").is_file());
        assert!(scratch.path().join(".devcontainer/Dockerfile").is_file());
    }

    #[test]
    fn test_copies_parent_configuration_file() {
        let src = tempdir().unwrap();
        touch(src.path(), ".devcontainer.json", "{}");
        let manifest = TemplateManifest::default();

        let scratch = materialize(src.path(), &manifest, &GenerateConfig::default()).unwrap();

        assert!(scratch.path().join(".devcontainer.json").is_file());
        assert!(!scratch.path().join(".devcontainer").exists());
    }

    #[test]
    fn test_copies_both_layouts_when_present() {
        let src = tempdir().unwrap();
        let manifest = nested_template(src.path(), &[]);
        touch(src.path(), ".devcontainer.json", "{}");

        let scratch = materialize(src.path(), &manifest, &GenerateConfig::default()).unwrap();

        assert!(scratch.path().join(".devcontainer.json").is_file());
        assert!(scratch.path().join(".devcontainer/devcontainer.json").is_file());
    }

    #[test]
    fn test_missing_configuration_fails() {
        let src = tempdir().unwrap();
        let manifest = TemplateManifest::default();

        let result = materialize(src.path(), &manifest, &GenerateConfig::default());
        assert!(matches!(
            result,
            Err(TemplateError::ConfigurationNotFound { .. })
        ));
    }

    #[test]
    fn test_optional_paths_copied_at_same_relative_position() {
        let src = tempdir().unwrap();
        let manifest = nested_template(src.path(), &["Dockerfile*", "/*scripts"]);
        touch(src.path(), "Dockerfile", "FROM debian");
        touch(src.path(), "Dockerfile.alpine", "FROM alpine");
        touch(src.path(), "scripts/setup.sh", "echo hi");
        touch(src.path(), "README.md", "not selected");

        let scratch = materialize(src.path(), &manifest, &GenerateConfig::default()).unwrap();

        assert!(scratch.path().join("Dockerfile").is_file());
        assert!(scratch.path().join("Dockerfile.alpine").is_file());
        assert!(scratch.path().join("scripts/setup.sh").is_file());
        assert!(!scratch.path().join("README.md").exists());
    }

    #[test]
    fn test_optional_pattern_without_matches_is_not_an_error() {
        let src = tempdir().unwrap();
        let manifest = nested_template(src.path(), &["*.absent"]);

        materialize(src.path(), &manifest, &GenerateConfig::default()).unwrap();
    }

    #[test]
    fn test_omit_patterns_remove_after_optional_copy() {
        let src = tempdir().unwrap();
        let manifest = nested_template(src.path(), &["Dockerfile*"]);
        touch(src.path(), "Dockerfile", "FROM debian");
        touch(src.path(), "Dockerfile.alpine", "FROM alpine");

        let config = GenerateConfig {
            omit_paths: vec!["Dockerfile.alpine".to_string()],
            ..Default::default()
        };
        let scratch = materialize(src.path(), &manifest, &config).unwrap();

        assert!(scratch.path().join("Dockerfile").is_file());
        assert!(!scratch.path().join("Dockerfile.alpine").exists());
    }

    #[test]
    fn test_omit_dir_prefix_removes_directory_wholesale() {
        let src = tempdir().unwrap();
        let manifest = nested_template(src.path(), &["/*scripts"]);
        touch(src.path(), "scripts/setup.sh", "echo hi");

        let config = GenerateConfig {
            omit_paths: vec!["/*scripts".to_string()],
            ..Default::default()
        };
        let scratch = materialize(src.path(), &manifest, &config).unwrap();

        assert!(!scratch.path().join("scripts").exists());
    }

    #[test]
    fn test_scratch_allocated_under_tmp_root() {
        let src = tempdir().unwrap();
        let manifest = nested_template(src.path(), &[]);
        let tmp_root = tempdir().unwrap();

        let config = GenerateConfig {
            tmp_root: Some(tmp_root.path().to_path_buf()),
            ..Default::default()
        };
        let scratch = materialize(src.path(), &manifest, &config).unwrap();

        assert!(scratch.path().starts_with(tmp_root.path()));
    }

    #[test]
    fn test_scratch_removed_on_drop() {
        let src = tempdir().unwrap();
        let manifest = nested_template(src.path(), &[]);

        let scratch = materialize(src.path(), &manifest, &GenerateConfig::default()).unwrap();
        let path = scratch.path().to_path_buf();
        assert!(path.exists());

        drop(scratch);
        assert!(!path.exists());
    }
}
