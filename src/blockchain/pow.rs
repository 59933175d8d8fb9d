use super::hash::{digest, puzzle_input};

/// Proof-of-Work predicate: sha256(str(proof^2 - previous_proof^2)) must start
/// with `difficulty` hex zeros.
pub fn valid_proof(previous_proof: u64, proof: u64, difficulty: u32) -> bool {
    let hash = digest(puzzle_input(previous_proof, proof).as_bytes());
    let zeros = difficulty as usize;
    hash.len() >= zeros && hash[..zeros].bytes().all(|b| b == b'0')
}

/// Strategy for finding the next proof given the tip's proof.
///
/// `None` means the strategy gave up (e.g. an attempt budget ran out).
pub trait ProofSearch: Send + Sync {
    fn find_proof(&self, previous_proof: u64) -> Option<u64>;
}

/// Plain brute force: try 1, 2, 3, ... and return the first hit.
#[derive(Debug, Clone, Copy)]
pub struct LinearSearch {
    pub difficulty: u32,
    /// Stop after this many candidates. `None` searches until a hit.
    pub max_attempts: Option<u64>,
}

impl LinearSearch {
    pub fn new(difficulty: u32) -> Self {
        Self {
            difficulty,
            max_attempts: None,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: Option<u64>) -> Self {
        self.max_attempts = max_attempts;
        self
    }
}

impl ProofSearch for LinearSearch {
    fn find_proof(&self, previous_proof: u64) -> Option<u64> {
        let limit = self.max_attempts.unwrap_or(u64::MAX);
        (1..=limit).find(|&candidate| valid_proof(previous_proof, candidate, self.difficulty))
    }
}
