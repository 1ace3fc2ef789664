//! Source string classification.
//!
//! A source string is classified with a fixed priority order:
//!
//! 1. `file://` prefix stripped, the rest must name a local directory
//! 2. existing local directory
//! 3. absolute URL with a host whose path ends in a known archive suffix
//! 4. anything else is parsed as an OCI reference
//!
//! The local check runs before reference parsing: a relative path such as
//! `templates/rust` also parses as a valid OCI reference.

use std::path::{Path, PathBuf};

use oci_distribution::Reference;
use url::Url;

use crate::error::{SourceError, SourceResult};

/// Archive suffixes recognized on remote URLs.
pub const ARCHIVE_EXTENSIONS: &[&str] = &[".tar", ".zip", ".tgz", ".tar.gz", ".tar.bz2", ".tar.xz"];

/// The resolved kind of a template source string.
#[derive(Debug, Clone)]
pub enum SourceKind {
    /// An existing local directory.
    LocalDir(PathBuf),
    /// A remote archive URL.
    Archive(Url),
    /// An OCI registry reference.
    OciReference(Reference),
}

/// Classify a source string into a [`SourceKind`].
pub fn classify(source: &str) -> SourceResult<SourceKind> {
    // file:// URIs are local paths spelled as URLs.
    if let Some(stripped) = source.strip_prefix("file://") {
        let path = Path::new(stripped);
        if path.is_dir() {
            return Ok(SourceKind::LocalDir(path.to_path_buf()));
        }
        return Err(SourceError::InvalidSource(source.to_string()));
    }

    let path = Path::new(source);
    if path.is_dir() {
        return Ok(SourceKind::LocalDir(path.to_path_buf()));
    }

    if let Some(url) = archive_url(source) {
        return Ok(SourceKind::Archive(url));
    }

    let reference = source
        .parse::<Reference>()
        .map_err(|e| SourceError::invalid_reference(source, e.to_string()))?;
    Ok(SourceKind::OciReference(reference))
}

/// Parse `source` as an archive URL. Returns `None` unless it is a
/// well-formed absolute URL with a host and a recognized archive suffix.
fn archive_url(source: &str) -> Option<Url> {
    let url = Url::parse(source).ok()?;
    if !url.has_host() {
        return None;
    }
    let path = url.path();
    ARCHIVE_EXTENSIONS
        .iter()
        .any(|ext| path.ends_with(ext))
        .then_some(url)
}
