use serde_yaml::{Mapping, Value};

/// Navigate into a nested tree by path segments.
pub fn get_nested<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut current = value;
    for segment in path {
        current = current.as_mapping()?.get(*segment)?;
    }
    Some(current)
}

/// Set a value at a nested path, creating intermediate mappings as needed.
///
/// A scalar sitting where an intermediate mapping is required is replaced by
/// a mapping; the caller asked for the nested location to exist.
pub fn set_nested(value: &mut Value, path: &[&str], new_val: Value) {
    let Some((leaf, parents)) = path.split_last() else {
        return;
    };

    let mut current = value;
    for segment in parents {
        let Some(map) = current.as_mapping_mut() else {
            return;
        };
        let key = Value::String((*segment).to_owned());
        let needs_map = map.get(&key).is_none_or(|v| !v.is_mapping());
        if needs_map {
            map.insert(key.clone(), Value::Mapping(Mapping::new()));
        }
        let Some(next) = map.get_mut(&key) else {
            return;
        };
        current = next;
    }

    if let Some(map) = current.as_mapping_mut() {
        map.insert(Value::String((*leaf).to_owned()), new_val);
    }
}
