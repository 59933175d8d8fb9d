use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("stale tip: block built on {expected}, current tip is {actual}")]
    StaleTip { expected: String, actual: String },
    #[error("proof {proof} does not satisfy difficulty {difficulty} against the tip")]
    InvalidProof { proof: u64, difficulty: u32 },
    #[error("invalid node address: {0}")]
    InvalidNodeAddress(String),
    #[error("peer {peer} unreachable: {reason}")]
    PeerUnreachable { peer: String, reason: String },
    #[error("peer {peer} returned HTTP {status}")]
    PeerStatus { peer: String, status: u16 },
    #[error("peer {peer} sent a malformed chain: {reason}")]
    MalformedPeerChain { peer: String, reason: String },
}

pub type Result<T> = std::result::Result<T, LedgerError>;
