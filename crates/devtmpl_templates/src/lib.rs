//! # devtmpl_templates
//!
//! Devcontainer template materialization.
//!
//! A template is a source tree holding a `devcontainer-template.json`
//! manifest, a devcontainer configuration, and optional auxiliary files.
//! This crate loads the manifest, validates caller-supplied options against
//! the declared option set, copies the selected file set into a scratch
//! directory, substitutes `${templateOption:KEY}` tokens, and copies the
//! result into the target workspace.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::collections::HashMap;
//! use std::path::Path;
//!
//! use devtmpl_templates::{generate_with_config, GenerateConfig};
//!
//! # #[tokio::main]
//! # async fn main() -> devtmpl_templates::TemplateResult<()> {
//! let mut options = HashMap::new();
//! options.insert("imageVariant".to_string(), "bookworm".to_string());
//!
//! generate_with_config(
//!     "ghcr.io/devcontainers/templates/rust",
//!     Path::new("./my-workspace"),
//!     options,
//!     GenerateConfig::default(),
//! )
//! .await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod generate;
pub mod manifest;
pub mod materialize;
pub mod options;
pub mod select;
pub mod substitute;

pub use devtmpl_source::MANIFEST_FILE;
pub use error::{TemplateError, TemplateResult};
pub use generate::{generate, generate_with_config, GenerateConfig};
pub use manifest::{load_template, ConfigLayout, LoadedTemplate, TemplateManifest, TemplateOption};
pub use materialize::{materialize, Scratch};
pub use options::{apply_defaults, check_options};
pub use select::select;
pub use substitute::substitute_options;
