pub mod block;
pub mod hash;
pub mod model;
pub mod pow;
pub mod validation;

#[cfg(test)]
pub mod test_utils;

pub use block::Block;
pub use model::Blockchain;
pub use pow::{LinearSearch, ProofSearch, valid_proof};
pub use validation::is_valid_chain;

/// Default Proof-of-Work difficulty (number of leading hex zeros).
pub const DEFAULT_DIFFICULTY: u32 = 4;

/// Previous-hash sentinel carried by the genesis block.
pub const GENESIS_PREVIOUS_HASH: &str = "1";

/// Proof carried by the genesis block; the first mined proof builds on it.
pub const GENESIS_PROOF: u64 = 100;

/// A SHA-256 hex digest has 64 characters; more zeros can never match.
pub const MAX_DIFFICULTY: u32 = 64;
