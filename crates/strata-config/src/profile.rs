//! Profile-aware document filtering.
//!
//! A YAML document may carry a top-level `profiles` field naming the profiles
//! it applies to, either as a comma-separated string (`"dev,!prod"`) or as a
//! sequence of tokens. A token prefixed with `!` negates: if that profile is
//! active the whole document is excluded, regardless of any other token.

use serde_yaml::Value;
use tracing::warn;

/// The document field consulted for profile filtering.
pub const PROFILES_FIELD: &str = "profiles";

/// Decide whether a parsed document applies given the active profile set.
///
/// - A document with no `profiles` field applies universally.
/// - A negated token (`!name`) excludes the document immediately when `name`
///   is active; when `name` is inactive the token counts as a match.
/// - A plain token marks the document included when it names an active
///   profile, but evaluation continues: a later negated token still excludes.
/// - With a `profiles` field and no matching token, the document is excluded
///   by default.
///
/// Empty tokens (e.g. from a trailing comma) are ignored, not treated as a
/// match.
#[must_use]
pub fn document_applies(doc: &Value, active: &[String]) -> bool {
    let Some(field) = doc.get(PROFILES_FIELD) else {
        return true;
    };

    let tokens: Vec<String> = match field {
        Value::String(expr) => expr.split(',').map(str::to_owned).collect(),
        Value::Sequence(seq) => seq
            .iter()
            .filter_map(|v| v.as_str().map(str::to_owned))
            .collect(),
        other => {
            warn!(field = ?other, "ignoring malformed `profiles` field");
            return true;
        },
    };

    let mut included = false;
    for token in &tokens {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        if let Some(negated) = token.strip_prefix('!') {
            if active.iter().any(|p| p == negated) {
                return false;
            }
            included = true;
        } else if active.iter().any(|p| p == token) {
            included = true;
        }
    }
    included
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(text: &str) -> Value {
        serde_yaml::from_str(text).unwrap()
    }

    fn profiles(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn test_untagged_document_always_applies() {
        let d = doc("key: value");
        assert!(document_applies(&d, &[]));
        assert!(document_applies(&d, &profiles(&["prod"])));
    }

    #[test]
    fn test_plain_token_match() {
        let d = doc("profiles: dev,test\nkey: value");
        assert!(document_applies(&d, &profiles(&["test"])));
    }

    #[test]
    fn test_negation_includes_when_inactive() {
        let d = doc("profiles: '!prod'");
        assert!(document_applies(&d, &profiles(&["dev"])));
    }

    #[test]
    fn test_negation_excludes_when_active() {
        let d = doc("profiles: '!prod'");
        assert!(!document_applies(&d, &profiles(&["prod"])));
    }

    #[test]
    fn test_negation_short_circuits_plain_match() {
        // `prod` is listed both plain and negated; negation wins.
        let d = doc("profiles: 'prod,!prod'");
        assert!(!document_applies(&d, &profiles(&["prod"])));
    }

    #[test]
    fn test_no_match_excluded_by_default() {
        let d = doc("profiles: staging");
        assert!(!document_applies(&d, &profiles(&["dev"])));
    }

    #[test]
    fn test_empty_active_set_excludes_tagged_document() {
        let d = doc("profiles: dev");
        assert!(!document_applies(&d, &[]));
    }

    #[test]
    fn test_negated_only_with_empty_active_set() {
        // The negation does not fire, so the token counts as a match.
        let d = doc("profiles: '!prod'");
        assert!(document_applies(&d, &[]));
    }

    #[test]
    fn test_empty_tokens_ignored() {
        let d = doc("profiles: 'dev,'");
        assert!(document_applies(&d, &profiles(&["dev"])));

        let empty_only = doc("profiles: ','");
        assert!(!document_applies(&empty_only, &profiles(&["dev"])));
    }

    #[test]
    fn test_tokens_are_trimmed() {
        let d = doc("profiles: ' dev , test '");
        assert!(document_applies(&d, &profiles(&["test"])));
    }

    #[test]
    fn test_sequence_form() {
        let d = doc("profiles: [dev, '!prod']");
        assert!(document_applies(&d, &profiles(&["dev"])));
        assert!(!document_applies(&d, &profiles(&["dev", "prod"])));
    }

    #[test]
    fn test_malformed_field_is_ignored() {
        let d = doc("profiles: 42");
        assert!(document_applies(&d, &profiles(&["dev"])));
    }
}
