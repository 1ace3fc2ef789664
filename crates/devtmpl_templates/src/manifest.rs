//! Template manifest model, loading, and configuration layout location.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{TemplateError, TemplateResult};
use devtmpl_source::MANIFEST_FILE;

/// A configurable option declared by the template.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TemplateOption {
    /// Option type, informational only.
    #[serde(default, rename = "type")]
    pub option_type: String,
    #[serde(default)]
    pub description: String,
    /// Suggested values. Not enforced.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub proposals: Vec<String>,
    /// Restricted values. Not enforced beyond deserialization.
    #[serde(default, rename = "enum", skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<String>,
    /// Effective value when the caller omits the option.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl TemplateOption {
    /// Whether the option carries a non-empty default value.
    pub fn has_default(&self) -> bool {
        matches!(&self.default, Some(d) if !d.is_empty())
    }
}

/// The `devcontainer-template.json` descriptor at a template root.
/// Unknown fields are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TemplateManifest {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, rename = "documentationURL", skip_serializing_if = "Option::is_none")]
    pub documentation_url: Option<String>,
    #[serde(default, rename = "licenseURL", skip_serializing_if = "Option::is_none")]
    pub license_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub platforms: Vec<String>,
    /// Declared options, keyed by the name used in substitution tokens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<HashMap<String, TemplateOption>>,
    /// Glob patterns for files to include beyond the configuration.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub optional_paths: Vec<String>,
}

impl TemplateManifest {
    /// Sorted names of the declared options.
    pub fn option_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .options
            .as_ref()
            .map(|options| options.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }
}

/// Which devcontainer configuration artifacts a template tree carries.
///
/// Both forms may be present at once; the materializer copies whichever
/// artifacts exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigLayout {
    /// `.devcontainer.json` directly at the template root.
    pub parent: bool,
    /// `.devcontainer/devcontainer.json`, or
    /// `.devcontainer/<name>/devcontainer.json` one level down.
    pub nested: bool,
}

impl ConfigLayout {
    /// Determine which configuration layouts `template_dir` uses.
    pub fn locate(template_dir: &Path) -> TemplateResult<ConfigLayout> {
        let parent = template_dir.join(".devcontainer.json").is_file();

        let devcontainer_dir = template_dir.join(".devcontainer");
        let mut nested = devcontainer_dir.join("devcontainer.json").is_file();
        if !nested && devcontainer_dir.is_dir() {
            for entry in fs::read_dir(&devcontainer_dir)? {
                let entry = entry?;
                if entry.file_type()?.is_dir()
                    && entry.path().join("devcontainer.json").is_file()
                {
                    nested = true;
                    break;
                }
            }
        }

        if !parent && !nested {
            return Err(TemplateError::ConfigurationNotFound {
                path: template_dir.to_path_buf(),
                manifest: None,
            });
        }

        Ok(ConfigLayout { parent, nested })
    }
}

/// A parsed manifest together with the configuration layout of its tree.
#[derive(Debug, Clone)]
pub struct LoadedTemplate {
    pub manifest: TemplateManifest,
    pub layout: ConfigLayout,
}

/// Read and parse `devcontainer-template.json` at `template_dir`, then
/// confirm a configuration layout is present.
///
/// A parse failure is fatal. A missing configuration is reported as
/// [`TemplateError::ConfigurationNotFound`] carrying the parsed manifest.
pub fn load_template(template_dir: &Path) -> TemplateResult<LoadedTemplate> {
    let manifest_path = template_dir.join(MANIFEST_FILE);
    let content = fs::read_to_string(&manifest_path).map_err(|e| TemplateError::ManifestRead {
        path: template_dir.to_path_buf(),
        source: e,
    })?;

    let manifest: TemplateManifest =
        serde_json::from_str(&content).map_err(|e| TemplateError::ManifestParse {
            path: template_dir.to_path_buf(),
            source: e,
        })?;

    debug!(id = %manifest.id, ?template_dir, "loaded template manifest");

    match ConfigLayout::locate(template_dir) {
        Ok(layout) => Ok(LoadedTemplate { manifest, layout }),
        Err(TemplateError::ConfigurationNotFound { path, .. }) => {
            Err(TemplateError::ConfigurationNotFound {
                path,
                manifest: Some(Box::new(manifest)),
            })
        }
        Err(e) => Err(e),
    }
}
