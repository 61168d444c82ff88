use serde_yaml::{Mapping, Value};
use tracing::warn;

use super::deep::deep_merge;
use crate::empty_tree;

/// Expand `.`-separated keys into nested mappings.
///
/// A key like `a.b.c` becomes one level of nesting per path segment, with the
/// original value at the final segment. Keys without `.` map to a single-level
/// entry. Expansion recurses into mapping values, so dotted keys are expanded
/// at any depth; sequences are left untouched.
///
/// When two expanded keys disagree on the shape of an intermediate segment the
/// [`deep_merge`] rules apply while combining the resulting trees.
#[must_use]
pub fn expand_paths(value: Value) -> Value {
    let Value::Mapping(map) = value else {
        return value;
    };

    let mut expanded = empty_tree();
    for (key, val) in map {
        let val = expand_paths(val);
        let entry = match key.as_str() {
            Some(path) if path.contains('.') => {
                let segments: Vec<&str> = path.split('.').filter(|s| !s.is_empty()).collect();
                if segments.is_empty() {
                    // A key made only of separators addresses nothing.
                    warn!(key = path, "dropping property with empty path");
                    continue;
                }
                nest_segments(&segments, val)
            },
            _ => {
                let mut single = Mapping::new();
                single.insert(key, val);
                Value::Mapping(single)
            },
        };
        deep_merge(&mut expanded, &entry);
    }
    expanded
}

/// Build a nested mapping from path segments, folding leaf to root.
fn nest_segments(segments: &[&str], leaf: Value) -> Value {
    segments.iter().rev().fold(leaf, |inner, segment| {
        let mut map = Mapping::new();
        map.insert(Value::String((*segment).to_owned()), inner);
        Value::Mapping(map)
    })
}

/// Flatten a nested tree into a single mapping with dotted leaf keys.
///
/// The inverse of [`expand_paths`]. Mappings whose keys are not all strings
/// cannot be addressed by a dotted path and are kept as leaf values.
#[must_use]
pub fn flatten_paths(value: &Value) -> Mapping {
    let mut flat = Mapping::new();
    flatten_into(value, "", &mut flat);
    flat
}

fn flatten_into(value: &Value, prefix: &str, flat: &mut Mapping) {
    match value {
        Value::Mapping(map) if !map.is_empty() && map.iter().all(|(k, _)| k.is_string()) => {
            for (key, child) in map {
                let Some(key) = key.as_str() else { continue };
                let path = if prefix.is_empty() {
                    key.to_owned()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten_into(child, &path, flat);
            }
        },
        leaf => {
            if prefix.is_empty() {
                if !leaf.is_mapping() {
                    warn!("ignoring non-mapping root while flattening");
                }
            } else {
                flat.insert(Value::String(prefix.to_owned()), leaf.clone());
            }
        },
    }
}

/// Normalize an arbitrarily shaped payload (flat, nested, or mixed) into a
/// fully nested tree: flatten to dotted leaves, then expand.
///
/// Used on remote payloads, whose shape is up to the collaborator.
#[must_use]
pub fn normalize_paths(value: &Value) -> Value {
    expand_paths(Value::Mapping(flatten_paths(value)))
}
