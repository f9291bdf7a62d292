//! # Canonical Serialization
//!
//! `CanonicalBytes` is the sole construction path for bytes that get hashed.
//! Serialization uses `serde_jcs` for RFC 8785 output: sorted keys, compact
//! separators, deterministic byte sequence. Two structurally equal values
//! always produce identical bytes, regardless of the order in which their
//! maps were populated.

use serde::Serialize;

use crate::error::CanonicalizationError;

/// Bytes produced exclusively by RFC 8785 canonicalization.
///
/// The inner buffer is private; the only constructor is
/// [`CanonicalBytes::new()`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Canonicalize any serializable value.
    ///
    /// # Errors
    ///
    /// Returns `CanonicalizationError::SerializationFailed` if the value
    /// cannot be represented as JSON, and `EncodingFailed` if the JCS
    /// encoder rejects it.
    pub fn new(obj: &impl Serialize) -> Result<Self, CanonicalizationError> {
        let value = serde_json::to_value(obj)?;
        let bytes = serde_jcs::to_vec(&value)
            .map_err(|e| CanonicalizationError::EncodingFailed(e.to_string()))?;
        Ok(Self(bytes))
    }

    /// Access the canonical bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Length of the canonical byte sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if the byte sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_sorted_keys_compact() {
        let data = serde_json::json!({"b": 2, "a": 1, "c": {"z": true, "y": null}});
        let cb = CanonicalBytes::new(&data).unwrap();
        assert_eq!(
            std::str::from_utf8(cb.as_bytes()).unwrap(),
            r#"{"a":1,"b":2,"c":{"y":null,"z":true}}"#
        );
    }

    #[test]
    fn test_insertion_order_irrelevant() {
        let mut first = HashMap::new();
        let mut second = HashMap::new();
        for i in 0..32 {
            first.insert(format!("k{i}"), i);
        }
        for i in (0..32).rev() {
            second.insert(format!("k{i}"), i);
        }
        assert_eq!(
            CanonicalBytes::new(&first).unwrap(),
            CanonicalBytes::new(&second).unwrap()
        );
    }

    #[test]
    fn test_empty_object() {
        let cb = CanonicalBytes::new(&serde_json::json!({})).unwrap();
        assert_eq!(cb.as_bytes(), b"{}");
        assert_eq!(cb.len(), 2);
        assert!(!cb.is_empty());
    }
}
