use serde_yaml::Value;

use crate::empty_tree;

/// Recursively deep-merge `overlay` into `base`.
///
/// - Mappings merge recursively per-key.
/// - Scalars and sequences from the overlay **replace** the base value.
///
/// No key is ever deleted. The operation is associative left-to-right but not
/// commutative: the order in which layers are applied is semantically
/// significant.
pub fn deep_merge(base: &mut Value, overlay: &Value) {
    match (base, overlay) {
        (Value::Mapping(base_map), Value::Mapping(overlay_map)) => {
            for (key, overlay_val) in overlay_map {
                if let Some(base_val) = base_map.get_mut(key) {
                    deep_merge(base_val, overlay_val);
                } else {
                    base_map.insert(key.clone(), overlay_val.clone());
                }
            }
        },
        (base, overlay) => {
            *base = overlay.clone();
        },
    }
}

/// Fold an ordered sequence of layers into one tree, earliest first.
///
/// For any key present in several layers the value from the later layer wins;
/// mappings are combined with [`deep_merge`].
#[must_use]
pub fn merge_all<I>(layers: I) -> Value
where
    I: IntoIterator<Item = Value>,
{
    let mut merged = empty_tree();
    for layer in layers {
        deep_merge(&mut merged, &layer);
    }
    merged
}
