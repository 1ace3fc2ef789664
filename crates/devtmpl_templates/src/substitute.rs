//! Substitution of `${templateOption:KEY}` tokens in file contents.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use regex::bytes::Regex;
use tracing::debug;
use walkdir::WalkDir;

use crate::error::TemplateResult;

/// Walk every regular file under `dir` and replace each
/// `${templateOption:<key>}` token whose key is present in `options`.
///
/// Tokens with unknown keys are left verbatim; partial application is
/// legal. Files without any token are not rewritten, so their
/// modification times are preserved. Rewrites keep the original
/// permission bits. The pass is byte-oriented, so binary files transit
/// unchanged.
pub fn substitute_options(dir: &Path, options: &HashMap<String, String>) -> TemplateResult<()> {
    let token = Regex::new(r"\$\{templateOption:([^}]+)\}").unwrap();

    for entry in WalkDir::new(dir).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();

        let content = fs::read(path)?;
        if !token.is_match(&content) {
            continue;
        }

        let rewritten = token.replace_all(&content, |caps: &regex::bytes::Captures| {
            let value = std::str::from_utf8(&caps[1])
                .ok()
                .and_then(|key| options.get(key));
            match value {
                Some(value) => value.as_bytes().to_vec(),
                None => caps[0].to_vec(),
            }
        });

        let permissions = fs::metadata(path)?.permissions();
        fs::write(path, rewritten.as_ref())?;
        fs::set_permissions(path, permissions)?;
        debug!(?path, "substituted template options");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::tempdir;

    fn options(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_replaces_known_keys() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Dockerfile");
        fs::write(&path, "FROM debian:${templateOption:imageVariant}\n").unwrap();

        substitute_options(dir.path(), &options(&[("imageVariant", "bookworm")])).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "FROM debian:bookworm\n"
        );
    }

    #[test]
    fn test_unknown_key_left_verbatim() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"a": "${templateOption:known}", "b": "${templateOption:unknown}"}"#)
            .unwrap();

        substitute_options(dir.path(), &options(&[("known", "yes")])).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            r#"{"a": "yes", "b": "${templateOption:unknown}"}"#
        );
    }

    #[test]
    fn test_substitution_is_idempotent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("file.txt");
        fs::write(&path, "x=${templateOption:a} y=${templateOption:b}").unwrap();
        let opts = options(&[("a", "1")]);

        substitute_options(dir.path(), &opts).unwrap();
        let once = fs::read_to_string(&path).unwrap();
        substitute_options(dir.path(), &opts).unwrap();
        let twice = fs::read_to_string(&path).unwrap();

        assert_eq!(once, twice);
        assert_eq!(once, "x=1 y=${templateOption:b}");
    }

    #[test]
    fn test_every_occurrence_replaced() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("compose.yaml");
        fs::write(
            &path,
            "image: app:${templateOption:tag}\ncache: app:${templateOption:tag}\n",
        )
        .unwrap();

        substitute_options(dir.path(), &options(&[("tag", "v2")])).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "image: app:v2\ncache: app:v2\n"
        );
    }

    #[test]
    fn test_walks_nested_directories() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join(".devcontainer");
        fs::create_dir(&nested).unwrap();
        let path = nested.join("devcontainer.json");
        fs::write(&path, r#"{"image": "${templateOption:image}"}"#).unwrap();

        substitute_options(dir.path(), &options(&[("image", "debian")])).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            r#"{"image": "debian"}"#
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_rewrite_preserves_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("setup.sh");
        fs::write(&path, "echo ${templateOption:msg}\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();

        substitute_options(dir.path(), &options(&[("msg", "hi")])).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }

    #[test]
    fn test_binary_file_without_tokens_untouched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("blob.bin");
        let bytes: Vec<u8> = (0..=255).collect();
        fs::write(&path, &bytes).unwrap();

        substitute_options(dir.path(), &options(&[("a", "b")])).unwrap();

        assert_eq!(fs::read(&path).unwrap(), bytes);
    }
}
