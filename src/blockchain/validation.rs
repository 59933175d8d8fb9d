use log::debug;

use super::{Block, GENESIS_PREVIOUS_HASH, GENESIS_PROOF, valid_proof};

/// Validate an arbitrary chain: genesis shape, hash linkage, digest binding,
/// index/timestamp ordering and PoW between every adjacent pair.
///
/// Pure; stops at the first violation.
pub fn is_valid_chain(chain: &[Block], difficulty: u32) -> bool {
    let Some(genesis) = chain.first() else {
        return false;
    };

    if genesis.index != 1
        || genesis.previous_hash != GENESIS_PREVIOUS_HASH
        || genesis.proof != GENESIS_PROOF
        || genesis.hash != genesis.compute_hash()
    {
        debug!("VALIDATOR - bad genesis block");
        return false;
    }

    for pair in chain.windows(2) {
        let (prev, current) = (&pair[0], &pair[1]);

        // Check linkage
        if current.previous_hash != prev.hash {
            debug!("VALIDATOR - block #{} does not link to #{}", current.index, prev.index);
            return false;
        }

        if current.index != prev.index + 1 || current.timestamp < prev.timestamp {
            debug!("VALIDATOR - block #{} out of order", current.index);
            return false;
        }

        // Digest must still match the content
        if current.hash != current.compute_hash() {
            debug!("VALIDATOR - block #{} digest mismatch", current.index);
            return false;
        }

        if !valid_proof(prev.proof, current.proof, difficulty) {
            debug!("VALIDATOR - block #{} fails proof-of-work", current.index);
            return false;
        }
    }

    true
}
