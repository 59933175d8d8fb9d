use chrono::Utc;
use log::debug;
use serde_json::Number;

use super::{Block, valid_proof};
use crate::error::{LedgerError, Result};
use crate::transaction::Transaction;

/// In-memory chain plus the queue of transactions waiting for the next block.
#[derive(Debug)]
pub struct Blockchain {
    chain: Vec<Block>,
    pending: Vec<Transaction>,
    difficulty: u32,
}

impl Blockchain {
    /// Initialize a new blockchain with a genesis block.
    pub fn new(difficulty: u32) -> Self {
        Self {
            chain: vec![Block::genesis()],
            pending: Vec::new(),
            difficulty,
        }
    }

    /// Return the last block in the chain.
    pub fn tip(&self) -> &Block {
        self.chain
            .last()
            .expect("Blockchain should always have at least the genesis block")
    }

    /// Queue a transaction and return the index of the block that will hold it.
    pub fn append_transaction(
        &mut self,
        sender: impl Into<String>,
        receiver: impl Into<String>,
        amount: Number,
    ) -> u64 {
        self.pending.push(Transaction::new(sender, receiver, amount));
        self.tip().index + 1
    }

    /// Seal the pending transactions into a new block on top of the tip.
    ///
    /// Fails without touching state if `previous_hash` is no longer the tip
    /// (someone appended or replaced the chain while we were searching) or
    /// if `proof` does not meet the difficulty against the tip's proof.
    pub fn create_block(&mut self, proof: u64, previous_hash: &str) -> Result<&Block> {
        self.check_seal(proof, previous_hash)?;

        let tip = self.tip();
        let index = tip.index + 1;
        let timestamp = Utc::now().timestamp().max(tip.timestamp);
        let block = Block::new(
            index,
            timestamp,
            std::mem::take(&mut self.pending),
            proof,
            previous_hash.to_string(),
        );
        debug!(
            "CHAIN - appended block #{} ({} txs, hash={})",
            block.index,
            block.transactions.len(),
            block.hash
        );

        self.chain.push(block);
        Ok(self.tip())
    }

    /// Same as `create_block`, with `reward` appended after the pending
    /// transactions. On error the reward is dropped and the queue is untouched.
    pub fn create_block_with_reward(
        &mut self,
        proof: u64,
        previous_hash: &str,
        reward: Transaction,
    ) -> Result<&Block> {
        self.check_seal(proof, previous_hash)?;
        self.pending.push(reward);
        self.create_block(proof, previous_hash)
    }

    fn check_seal(&self, proof: u64, previous_hash: &str) -> Result<()> {
        let tip = self.tip();
        if tip.hash != previous_hash {
            return Err(LedgerError::StaleTip {
                expected: previous_hash.to_string(),
                actual: tip.hash.clone(),
            });
        }
        if !valid_proof(tip.proof, proof, self.difficulty) {
            return Err(LedgerError::InvalidProof {
                proof,
                difficulty: self.difficulty,
            });
        }
        Ok(())
    }

    /// Swap the whole chain. The caller must have validated `chain`;
    /// an empty chain is ignored.
    /// Pending transactions stay queued for the next mined block.
    pub fn replace(&mut self, chain: Vec<Block>) {
        if chain.is_empty() {
            return;
        }
        debug!(
            "CHAIN - replaced {} blocks with {} (pending kept: {})",
            self.chain.len(),
            chain.len(),
            self.pending.len()
        );
        self.chain = chain;
    }

    pub fn chain(&self) -> &[Block] {
        &self.chain
    }

    pub fn pending(&self) -> &[Transaction] {
        &self.pending
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }
}
