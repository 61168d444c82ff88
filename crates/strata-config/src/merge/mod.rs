//! Deep merge and dot-path expansion over YAML property trees.
//!
//! The merge operates on raw [`serde_yaml::Value`] trees rather than
//! deserialized structs. This correctly handles "absent vs default" — a key
//! missing from an overlay document will not override the base layer.

mod deep;
mod expand;
mod path;

pub use deep::{deep_merge, merge_all};
pub use expand::{expand_paths, flatten_paths, normalize_paths};
pub use path::{get_nested, set_nested};

#[cfg(test)]
mod tests;
