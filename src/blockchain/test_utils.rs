//! Helpers shared by the chain, consensus and API tests.

use serde_json::Number;

use super::{Block, Blockchain, LinearSearch, ProofSearch};

/// Low difficulty so tests mine in milliseconds.
pub const DIFF: u32 = 2;

/// Search a proof on top of the tip and seal whatever is pending.
/// Returns the new block's index.
pub fn mine_next(bc: &mut Blockchain) -> u64 {
    let tip = bc.tip().clone();
    let proof = LinearSearch::new(bc.difficulty())
        .find_proof(tip.proof)
        .expect("proof");
    bc.create_block(proof, &tip.hash).expect("append").index
}

/// A valid chain of `blocks` blocks mined at `DIFF`, one transaction each.
pub fn mined_chain(blocks: usize) -> Vec<Block> {
    let mut bc = Blockchain::new(DIFF);
    for i in 1..blocks {
        bc.append_transaction("peer", "someone", Number::from(i as u64));
        mine_next(&mut bc);
    }
    bc.chain().to_vec()
}
