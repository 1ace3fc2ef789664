//! # devtmpl_source
//!
//! Source resolution for devcontainer templates.
//!
//! A template source string may name a local directory, a remote archive
//! URL, or an OCI registry reference. This crate classifies the string,
//! fetches the template into a local directory, and hands back a
//! [`ResolvedSource`] whose temporary storage is released on drop.
//!
//! Classification is a fixed priority order: local directory existence,
//! then archive-URL shape, then OCI reference parsing. The existence check
//! runs first because a relative path is frequently a syntactically valid
//! OCI reference.
//!
//! ## Example
//!
//! ```rust,no_run
//! use devtmpl_source::{resolve, ResolveConfig};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), devtmpl_source::SourceError> {
//! let resolved = resolve("ghcr.io/devcontainers/templates/rust", &ResolveConfig::default()).await?;
//! println!("template at {:?}", resolved.dir());
//! # Ok(())
//! # }
//! ```

pub mod classify;
pub mod error;
pub mod fetch;
pub mod oci;
pub mod resolve;

pub use classify::{classify, SourceKind, ARCHIVE_EXTENSIONS};
pub use error::{SourceError, SourceResult};
pub use oci::{OciClient, DEVCONTAINER_LAYER_MEDIA_TYPE};
pub use resolve::{resolve, ResolveConfig, ResolvedSource};

/// File name of the template manifest at a template root.
pub const MANIFEST_FILE: &str = "devcontainer-template.json";
