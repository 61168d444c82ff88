//! Document loading: multi-document parsing, profile filtering, overlays.
//!
//! A source file may contain several YAML documents separated by `---`. Each
//! document is kept or dropped by the profile filter, the survivors are
//! deep-merged in original order, and dotted keys in the result are expanded
//! into nested mappings.

use std::path::Path;

use serde::Deserialize;
use serde_yaml::Value;
use tracing::{debug, info, warn};

use crate::error::{ConfigError, ConfigResult};
use crate::merge::{deep_merge, expand_paths};
use crate::profile::document_applies;
use crate::{PropertyTree, empty_tree};

/// Base file name for the local application layer.
pub const APPLICATION_FILE: &str = "application.yml";

/// File name for the bootstrap layer.
pub const BOOTSTRAP_FILE: &str = "bootstrap.yml";

/// Maximum allowed source file size (1 MiB).
pub const MAX_SOURCE_SIZE: u64 = 1_048_576;

/// Load one YAML source into a merged, expanded property tree.
///
/// # Errors
///
/// [`ConfigError::SourceUnavailable`] if the file cannot be read,
/// [`ConfigError::Oversized`] if it exceeds [`MAX_SOURCE_SIZE`], and
/// [`ConfigError::ParseError`] if any document in it is malformed.
pub async fn load_source(path: &Path, active: &[String]) -> ConfigResult<PropertyTree> {
    let text = read_source(path).await?;
    merge_documents(&text, path, active)
}

/// Load the local application layer: `application.yml` plus one optional
/// `application-<profile>.yml` overlay per active profile, merged after the
/// base in profile order.
///
/// A missing overlay is not an error; a malformed one is logged and skipped.
///
/// # Errors
///
/// Fails only when the base `application.yml` cannot be read or parsed.
pub async fn load_application(config_path: &Path, active: &[String]) -> ConfigResult<PropertyTree> {
    let base_path = config_path.join(APPLICATION_FILE);
    let mut merged = load_source(&base_path, active).await?;

    for profile in active {
        let overlay_path = config_path.join(format!("application-{profile}.yml"));
        match load_source(&overlay_path, active).await {
            Ok(overlay) => {
                deep_merge(&mut merged, &overlay);
                info!(path = %overlay_path.display(), "loaded profile overlay");
            },
            Err(ConfigError::SourceUnavailable { .. }) => {
                debug!(path = %overlay_path.display(), "profile overlay not found, skipping");
            },
            Err(err) => {
                warn!(
                    path = %overlay_path.display(),
                    error = %err,
                    "skipping malformed profile overlay"
                );
            },
        }
    }

    Ok(merged)
}

/// Read a source file in a single operation (no exists/stat pre-checks).
async fn read_source(path: &Path) -> ConfigResult<String> {
    let text =
        tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ConfigError::SourceUnavailable {
                path: path.display().to_string(),
                source: e,
            })?;

    // Size is checked after reading to avoid a TOCTOU between stat and read.
    if text.len() as u64 > MAX_SOURCE_SIZE {
        return Err(ConfigError::Oversized {
            path: path.display().to_string(),
            len: text.len() as u64,
            limit: MAX_SOURCE_SIZE,
        });
    }

    Ok(text)
}

/// Split `text` into documents, keep those that apply to the active profiles,
/// and deep-merge them in original order.
fn merge_documents(text: &str, path: &Path, active: &[String]) -> ConfigResult<PropertyTree> {
    let mut merged = empty_tree();
    let mut total: usize = 0;
    let mut kept: usize = 0;

    for document in serde_yaml::Deserializer::from_str(text) {
        let value = Value::deserialize(document).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            source: e,
        })?;
        if value.is_null() {
            continue;
        }
        total = total.saturating_add(1);
        if !document_applies(&value, active) {
            continue;
        }
        kept = kept.saturating_add(1);
        deep_merge(&mut merged, &value);
    }

    debug!(path = %path.display(), total, kept, "merged yaml documents");
    Ok(expand_paths(merged))
}
