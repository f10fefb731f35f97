//! Deterministic hashing for codes, policies and reports.
//!
//! Values are serialized to JSON and hashed with xxh64. Codes serialize as
//! their canonical text, so two codes for the same diagram always hash the
//! same way.
//!
//! ## Determinism Guarantees
//!
//! - Struct fields serialize in declaration order
//! - No floats appear in hashed data

use serde::Serialize;
use xxhash_rust::xxh64::xxh64;

/// Serialize a value to canonical JSON bytes for hashing.
///
/// The crate's own types always serialize; a failing serializer yields an
/// empty buffer.
pub fn to_canonical_bytes<T: Serialize>(value: &T) -> Vec<u8> {
    serde_json::to_vec(value).unwrap_or_default()
}

/// Compute canonical hash of a serializable value.
pub fn canonical_hash<T: Serialize>(value: &T) -> u64 {
    xxh64(&to_canonical_bytes(value), 0)
}

/// Compute canonical hash and return as hex string.
pub fn canonical_hash_hex<T: Serialize>(value: &T) -> String {
    format!("{:016x}", canonical_hash(value))
}
