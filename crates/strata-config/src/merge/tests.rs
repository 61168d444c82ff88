use serde_yaml::Value;

use super::*;

fn yaml(text: &str) -> Value {
    serde_yaml::from_str(text).unwrap()
}

#[test]
fn test_deep_merge_later_wins() {
    let mut base = yaml("x: 1");
    let overlay = yaml("x: 2");

    deep_merge(&mut base, &overlay);
    assert_eq!(base, yaml("x: 2"));
}

#[test]
fn test_merge_all_order_sensitivity() {
    let a = yaml("x: 1");
    let b = yaml("x: 2");

    assert_eq!(merge_all([a.clone(), b.clone()]), yaml("x: 2"));
    assert_eq!(merge_all([b, a]), yaml("x: 1"));
}

#[test]
fn test_deep_merge_preserves_siblings() {
    let mut base = yaml(
        r"
        a:
          b: 1
          c: 2
    ",
    );
    let overlay = yaml(
        r"
        a:
          b: 9
    ",
    );

    deep_merge(&mut base, &overlay);

    let a = base.get("a").unwrap();
    assert_eq!(a.get("b").unwrap().as_i64().unwrap(), 9);
    assert_eq!(a.get("c").unwrap().as_i64().unwrap(), 2);
}

#[test]
fn test_deep_merge_sequence_replaces() {
    let mut base = yaml("list: [1, 2, 3]");
    let overlay = yaml("list: [4]");

    deep_merge(&mut base, &overlay);
    assert_eq!(base, yaml("list: [4]"));
}

#[test]
fn test_deep_merge_never_deletes() {
    let mut base = yaml("keep: here\nother: 1");
    let overlay = yaml("other: 2");

    deep_merge(&mut base, &overlay);
    assert_eq!(base.get("keep").unwrap().as_str().unwrap(), "here");
}

#[test]
fn test_expand_single_path() {
    let expanded = expand_paths(yaml("a.b.c: v"));
    assert_eq!(expanded, yaml("a: {b: {c: v}}"));
}

#[test]
fn test_expand_sibling_paths() {
    let expanded = expand_paths(yaml("a.b.c: v\na.b.d: w"));
    assert_eq!(expanded, yaml("a: {b: {c: v, d: w}}"));
}

#[test]
fn test_expand_plain_keys_unchanged() {
    let expanded = expand_paths(yaml("plain: 1\nnested:\n  inner: 2"));
    assert_eq!(expanded, yaml("plain: 1\nnested: {inner: 2}"));
}

#[test]
fn test_expand_recurses_into_mappings() {
    let expanded = expand_paths(yaml("outer:\n  a.b: v"));
    assert_eq!(expanded, yaml("outer: {a: {b: v}}"));
}

#[test]
fn test_expand_skips_empty_segments() {
    let expanded = expand_paths(yaml("'a..b': v"));
    assert_eq!(expanded, yaml("a: {b: v}"));
}

#[test]
fn test_expand_non_mapping_passthrough() {
    let scalar = yaml("42");
    assert_eq!(expand_paths(scalar.clone()), scalar);
}

#[test]
fn test_flatten_nested_tree() {
    let flat = flatten_paths(&yaml("a: {b: {c: v}, d: 2}"));

    assert_eq!(flat.get("a.b.c").unwrap().as_str().unwrap(), "v");
    assert_eq!(flat.get("a.d").unwrap().as_i64().unwrap(), 2);
}

#[test]
fn test_flatten_keeps_sequences_as_leaves() {
    let flat = flatten_paths(&yaml("a: {list: [1, 2]}"));
    assert_eq!(flat.get("a.list").unwrap(), &yaml("[1, 2]"));
}

#[test]
fn test_normalize_flat_payload() {
    let normalized = normalize_paths(&yaml("a.b: 1\na.c: 2"));
    assert_eq!(normalized, yaml("a: {b: 1, c: 2}"));
}

#[test]
fn test_normalize_mixed_payload() {
    let normalized = normalize_paths(&yaml("a: {b: 1}\na.c: 2"));
    assert_eq!(normalized, yaml("a: {b: 1, c: 2}"));
}

#[test]
fn test_normalize_is_idempotent() {
    let tree = yaml("a: {b: {c: v}}\nplain: 1");
    assert_eq!(normalize_paths(&tree), tree);
}

#[test]
fn test_get_nested() {
    let tree = yaml("a: {b: {c: v}}");
    assert_eq!(
        get_nested(&tree, &["a", "b", "c"]).unwrap().as_str(),
        Some("v")
    );
    assert!(get_nested(&tree, &["a", "missing"]).is_none());
}

#[test]
fn test_set_nested_creates_intermediates() {
    let mut tree = yaml("{}");
    set_nested(&mut tree, &["a", "b", "c"], yaml("v"));
    assert_eq!(tree, yaml("a: {b: {c: v}}"));
}

#[test]
fn test_set_nested_overwrites_scalar_intermediate() {
    let mut tree = yaml("a: scalar");
    set_nested(&mut tree, &["a", "b"], yaml("v"));
    assert_eq!(tree, yaml("a: {b: v}"));
}

#[test]
fn test_set_nested_preserves_siblings() {
    let mut tree = yaml("a: {keep: 1}");
    set_nested(&mut tree, &["a", "b"], yaml("2"));
    assert_eq!(tree, yaml("a: {keep: 1, b: 2}"));
}
