use num_bigint::BigInt;
use serde::Serialize;
use sha2::{Digest, Sha256};

/// SHA-256 of `data`, lowercase hex (64 chars).
pub fn digest(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Canonical JSON bytes for `value`.
///
/// Going through `serde_json::Value` sorts object keys (its map is a
/// `BTreeMap`), so the output does not depend on struct field order.
/// Do not enable serde_json's `preserve_order` feature in this crate.
pub fn canonical_json<T: Serialize>(value: &T) -> Vec<u8> {
    let value = serde_json::to_value(value).expect("serialize canonical value");
    serde_json::to_vec(&value).expect("serialize canonical json")
}

/// Puzzle preimage: decimal rendering of `proof^2 - previous_proof^2`.
/// Computed with big integers so u64 inputs never overflow.
pub fn puzzle_input(previous_proof: u64, proof: u64) -> String {
    let prev = BigInt::from(previous_proof);
    let cur = BigInt::from(proof);
    (&cur * &cur - &prev * &prev).to_string()
}
