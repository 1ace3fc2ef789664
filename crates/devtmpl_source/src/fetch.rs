//! Remote archive download and extraction.

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use tracing::debug;
use url::Url;

use crate::error::{SourceError, SourceResult};
use crate::MANIFEST_FILE;

/// Download an archive URL and extract it into `dest`.
pub(crate) async fn fetch_archive(url: &Url, dest: &Path) -> SourceResult<()> {
    debug!(%url, "downloading archive");

    let response = reqwest::get(url.clone())
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| SourceError::fetch_failed(url.as_str(), e.to_string()))?;
    let bytes = response
        .bytes()
        .await
        .map_err(|e| SourceError::fetch_failed(url.as_str(), e.to_string()))?;

    extract_archive(url.path(), &bytes, dest)
}

/// Extract archive bytes into `dest`, picking the format from the file name.
pub(crate) fn extract_archive(name: &str, data: &[u8], dest: &Path) -> SourceResult<()> {
    if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
        let mut archive = tar::Archive::new(GzDecoder::new(Cursor::new(data)));
        archive
            .unpack(dest)
            .map_err(|e| SourceError::fetch_failed(name, e.to_string()))?;
    } else if name.ends_with(".tar.bz2") || name.ends_with(".tar.xz") {
        return Err(SourceError::fetch_failed(
            name,
            "unsupported archive compression, use tar, tar.gz, tgz or zip",
        ));
    } else if name.ends_with(".tar") {
        let mut archive = tar::Archive::new(Cursor::new(data));
        archive
            .unpack(dest)
            .map_err(|e| SourceError::fetch_failed(name, e.to_string()))?;
    } else if name.ends_with(".zip") {
        let mut archive = zip::ZipArchive::new(Cursor::new(data))
            .map_err(|e| SourceError::fetch_failed(name, e.to_string()))?;
        archive
            .extract(dest)
            .map_err(|e| SourceError::fetch_failed(name, e.to_string()))?;
    } else {
        return Err(SourceError::fetch_failed(name, "unrecognized archive extension"));
    }

    debug!(?dest, "extracted archive");
    Ok(())
}

/// Locate the template root within an extracted tree: the root itself, or
/// one of its immediate subdirectories, must contain the manifest.
pub(crate) fn find_template_dir(dir: &Path) -> SourceResult<PathBuf> {
    if dir.join(MANIFEST_FILE).is_file() {
        return Ok(dir.to_path_buf());
    }

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() && entry.path().join(MANIFEST_FILE).is_file() {
            return Ok(entry.path());
        }
    }

    Err(SourceError::TemplateNotFound(dir.to_path_buf()))
}
