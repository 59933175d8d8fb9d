use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::hash::{canonical_json, digest};
use super::{GENESIS_PREVIOUS_HASH, GENESIS_PROOF};
use crate::transaction::Transaction;

/// A single block in the ledger holding a batch of transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    pub timestamp: i64, // Unix timestamp (UTC)
    pub transactions: Vec<Transaction>,
    pub proof: u64, // Proof-of-Work value that sealed this block
    pub previous_hash: String,
    pub hash: String, // Digest of every other field, set once
}

/// Everything that goes into the digest.
#[derive(Serialize)]
struct HashedFields<'a> {
    index: u64,
    timestamp: i64,
    transactions: &'a [Transaction],
    proof: u64,
    previous_hash: &'a str,
}

impl Block {
    /// Create the genesis block (index 1, sentinel previous hash).
    pub fn genesis() -> Self {
        Self::new(
            1,
            Utc::now().timestamp(),
            Vec::new(),
            GENESIS_PROOF,
            GENESIS_PREVIOUS_HASH.to_string(),
        )
    }

    pub fn new(
        index: u64,
        timestamp: i64,
        transactions: Vec<Transaction>,
        proof: u64,
        previous_hash: String,
    ) -> Self {
        let hash = Self::digest_of(index, timestamp, &transactions, proof, &previous_hash);
        Self {
            index,
            timestamp,
            transactions,
            proof,
            previous_hash,
            hash,
        }
    }

    /// Recompute the digest from the current field values. A block whose
    /// `hash` differs from this has been tampered with.
    pub fn compute_hash(&self) -> String {
        Self::digest_of(
            self.index,
            self.timestamp,
            &self.transactions,
            self.proof,
            &self.previous_hash,
        )
    }

    fn digest_of(
        index: u64,
        timestamp: i64,
        transactions: &[Transaction],
        proof: u64,
        previous_hash: &str,
    ) -> String {
        let fields = HashedFields {
            index,
            timestamp,
            transactions,
            proof,
            previous_hash,
        };
        digest(&canonical_json(&fields))
    }
}
