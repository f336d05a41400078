//! Canonical serialization for deterministic hashing.
//!
//! ## Determinism Guarantees
//!
//! - Stable field order: Struct fields serialize in declaration order
//! - Stable Vec order: Vectors serialize in index order
//! - Floats are quantized to i64 before they reach the hasher

use serde::Serialize;
use xxhash_rust::xxh64::xxh64;

/// Quantization factor for float normalization.
const FLOAT_QUANTIZATION_FACTOR: f64 = 1_000_000.0;

/// Quantize a float to an i64 for deterministic hashing.
///
/// Non-finite values map to fixed sentinels so they still hash stably.
pub fn quantize(value: f64) -> i64 {
    if value.is_nan() {
        i64::MIN
    } else {
        (value * FLOAT_QUANTIZATION_FACTOR).round() as i64
    }
}

/// Serialize a value to canonical JSON bytes for hashing.
///
/// Types that cannot be represented as JSON (maps with non-string keys)
/// serialize to an empty buffer.
pub fn to_canonical_bytes<T: Serialize>(value: &T) -> Vec<u8> {
    serde_json::to_vec(value).unwrap_or_default()
}

/// Compute canonical hash of a serializable value.
pub fn canonical_hash<T: Serialize>(value: &T) -> u64 {
    let bytes = to_canonical_bytes(value);
    xxh64(&bytes, 0)
}

/// Compute canonical hash and return as hex string.
pub fn canonical_hash_hex<T: Serialize>(value: &T) -> String {
    format!("{:016x}", canonical_hash(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct TestStruct {
        name: String,
        value: i64,
    }

    #[test]
    fn test_determinism() {
        let s = TestStruct {
            name: "test".to_string(),
            value: quantize(42.5),
        };

        let h1 = canonical_hash(&s);
        let h2 = canonical_hash(&s);
        assert_eq!(h1, h2);
        assert_eq!(canonical_hash_hex(&s).len(), 16);
    }

    #[test]
    fn test_quantize() {
        assert_eq!(quantize(1.5), 1_500_000);
        assert_eq!(quantize(-0.0000004), 0);
        assert_eq!(quantize(f64::NAN), i64::MIN);
        assert_eq!(quantize(f64::INFINITY), i64::MAX);
    }
}
