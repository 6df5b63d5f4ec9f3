//! Deterministic cache key derivation.
//!
//! `key = namespace + hex(sha256(canonical_json(params)))`. Canonicalization
//! sorts object keys and list-valued parameters and drops empty values, so
//! semantically identical requests map to the same key regardless of the
//! order the parameters arrived in.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::Error;

/// Canonical JSON for a parameter set.
///
/// Object keys are emitted in sorted order, arrays are sorted by their
/// serialized form, and null / empty-string / empty-array members are
/// dropped (absent and empty parameters are equivalent).
pub fn canonical_json<T: Serialize>(params: &T) -> Result<String, Error> {
    let value = serde_json::to_value(params)
        .map_err(|e| Error::InvalidInput(format!("unserializable parameters: {e}")))?;
    Ok(normalize(value).to_string())
}

fn normalize(value: Value) -> Value {
    match value {
        Value::Array(items) => {
            let mut items: Vec<Value> = items.into_iter().map(normalize).collect();
            items.sort_by_key(|item| item.to_string());
            Value::Array(items)
        }
        Value::Object(map) => {
            let sorted: BTreeMap<String, Value> = map
                .into_iter()
                .map(|(k, v)| (k, normalize(v)))
                .filter(|(_, v)| !is_empty(v))
                .collect();
            Value::Object(sorted.into_iter().collect())
        }
        other => other,
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Compute a namespaced cache key for a parameter set.
pub fn cache_key<T: Serialize>(namespace: &str, params: &T) -> Result<String, Error> {
    let canonical = canonical_json(params)?;
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    Ok(format!("{namespace}{}", hex::encode(hasher.finalize())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{FilterRequest, TextFilter, TextOp};
    use serde_json::json;

    #[test]
    fn test_key_stability() {
        let params = json!({"account_name": {"value": "Tech", "op": "contains"}, "page": 1});
        let key1 = cache_key("gridview:data:", &params).unwrap();
        let key2 = cache_key("gridview:data:", &params).unwrap();
        assert_eq!(key1, key2);
    }

    #[test]
    fn test_key_invariant_under_field_order() {
        let a = json!({"page": 1, "limit": 25, "country": ["India"]});
        let b = json!({"country": ["India"], "limit": 25, "page": 1});
        assert_eq!(canonical_json(&a).unwrap(), canonical_json(&b).unwrap());
        assert_eq!(cache_key("gridview:data:", &a).unwrap(), cache_key("gridview:data:", &b).unwrap());
    }

    #[test]
    fn test_key_invariant_under_list_order() {
        let a = json!({"country": ["India", "USA"]});
        let b = json!({"country": ["USA", "India"]});
        assert_eq!(cache_key("gridview:data:", &a).unwrap(), cache_key("gridview:data:", &b).unwrap());
    }

    #[test]
    fn test_absent_and_empty_are_equivalent() {
        let a = json!({"account_name": "Tech", "website": null, "city": []});
        let b = json!({"account_name": "Tech"});
        assert_eq!(canonical_json(&a).unwrap(), canonical_json(&b).unwrap());
    }

    #[test]
    fn test_different_values_differ() {
        let a = json!({"account_name": "Tech"});
        let b = json!({"account_name": "Pharma"});
        assert_ne!(cache_key("gridview:data:", &a).unwrap(), cache_key("gridview:data:", &b).unwrap());
    }

    #[test]
    fn test_namespace_prefixes_key() {
        let params = json!({"field": "city"});
        let key = cache_key("gridview:values:", &params).unwrap();
        assert!(key.starts_with("gridview:values:"));
        // namespace + 64 hex chars
        assert_eq!(key.len(), "gridview:values:".len() + 64);
        assert!(key["gridview:values:".len()..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_filter_request_serializes_canonically() {
        let request = FilterRequest {
            account_name: Some(TextFilter::new("Tech", TextOp::Contains)),
            country: vec!["USA".to_string(), "India".to_string()],
            ..Default::default()
        };
        let canonical = canonical_json(&request).unwrap();
        // sorted list, empty members dropped, keys in sorted order
        assert_eq!(
            canonical,
            r#"{"account_name":{"op":"contains","value":"Tech"},"country":["India","USA"]}"#
        );
    }
}
