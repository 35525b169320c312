//! Artifact serialization.
//!
//! Compact JSON, keys in insertion order, standard escaping. The output is
//! byte-for-byte stable for the same input tables.

use serde::Serialize;

/// Serialize an artifact to its file content.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string(value)
}
