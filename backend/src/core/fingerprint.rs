//! Canonical fingerprints
//!
//! Hashes any serializable value through canonical JSON (object keys sorted
//! recursively) so the digest does not depend on map iteration order. Used
//! for config hashes and for detecting whether an editor draft differs from
//! what was loaded.

use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// Compute a deterministic SHA-256 hex digest of `value`.
pub fn canonical_sha256<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let value = serde_json::to_value(value)?;

    fn canonicalize(value: Value) -> Value {
        match value {
            Value::Object(map) => {
                let sorted: BTreeMap<String, Value> =
                    map.into_iter().map(|(k, v)| (k, canonicalize(v))).collect();
                Value::Object(sorted.into_iter().collect())
            }
            Value::Array(arr) => Value::Array(arr.into_iter().map(canonicalize).collect()),
            other => other,
        }
    }

    let json = serde_json::to_string(&canonicalize(value))?;

    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_fingerprint_is_deterministic() {
        #[derive(Serialize)]
        struct Sample {
            value: i32,
            name: String,
        }

        let a = Sample {
            value: 42,
            name: "test".to_string(),
        };
        let b = Sample {
            value: 42,
            name: "test".to_string(),
        };

        assert_eq!(canonical_sha256(&a).unwrap(), canonical_sha256(&b).unwrap());
    }

    #[test]
    fn test_fingerprint_ignores_map_order() {
        let mut first = HashMap::new();
        first.insert("a", 1);
        first.insert("b", 2);

        let mut second = HashMap::new();
        second.insert("b", 2);
        second.insert("a", 1);

        assert_eq!(
            canonical_sha256(&first).unwrap(),
            canonical_sha256(&second).unwrap()
        );
    }

    #[test]
    fn test_fingerprint_differs_for_different_values() {
        assert_ne!(
            canonical_sha256(&vec![1, 2]).unwrap(),
            canonical_sha256(&vec![2, 1]).unwrap()
        );
    }
}
