//! Validation of caller-supplied options against the manifest.

use std::collections::HashMap;

use crate::error::{TemplateError, TemplateResult};
use crate::manifest::TemplateManifest;

/// Check every caller-supplied option name against the manifest's declared
/// option set. Fails before any file is touched.
pub fn check_options(
    manifest: &TemplateManifest,
    options: &HashMap<String, String>,
) -> TemplateResult<()> {
    let declared = match &manifest.options {
        Some(declared) => declared,
        None => {
            if options.is_empty() {
                return Ok(());
            }
            let mut supplied: Vec<String> = options.keys().cloned().collect();
            supplied.sort();
            return Err(TemplateError::UnexpectedOptions(supplied));
        }
    };

    let mut supplied: Vec<&String> = options.keys().collect();
    supplied.sort();
    for name in supplied {
        if !declared.contains_key(name) {
            return Err(TemplateError::UnknownOption {
                name: name.clone(),
                available: manifest.option_names(),
            });
        }
    }

    Ok(())
}

/// Insert the declared default for every option with a non-empty default
/// that the caller did not supply. Runs after validation and before
/// substitution.
pub fn apply_defaults(manifest: &TemplateManifest, options: &mut HashMap<String, String>) {
    let Some(declared) = &manifest.options else {
        return;
    };

    for (name, spec) in declared {
        if options.contains_key(name) {
            continue;
        }
        if let Some(default) = &spec.default {
            if !default.is_empty() {
                options.insert(name.clone(), default.clone());
            }
        }
    }
}
