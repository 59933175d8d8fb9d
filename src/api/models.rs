use crate::blockchain::{Block, Blockchain, LinearSearch, ProofSearch};
use crate::config::Settings;
use crate::network::{ChainFetcher, NodeRegistry};
use crate::transaction::Transaction;
use serde::{Deserialize, Serialize};
use serde_json::Number;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Shared application state: the chain store, known peers and the
/// collaborators that mine and fetch.
pub struct AppState {
    pub blockchain: Mutex<Blockchain>,
    pub nodes: Mutex<NodeRegistry>,
    pub miner: Arc<dyn ProofSearch>,
    pub fetcher: Arc<dyn ChainFetcher>,
    /// This node's identity; sender of mining rewards.
    pub node_id: String,
    pub reward_receiver: String,
    pub mine_retry_limit: u32,
}

impl AppState {
    pub fn new(settings: &Settings, fetcher: Arc<dyn ChainFetcher>) -> Self {
        let miner = LinearSearch::new(settings.difficulty)
            .with_max_attempts(settings.mining_max_attempts);
        Self {
            blockchain: Mutex::new(Blockchain::new(settings.difficulty)),
            nodes: Mutex::new(NodeRegistry::new()),
            miner: Arc::new(miner),
            fetcher,
            node_id: Uuid::new_v4().simple().to_string(),
            reward_receiver: settings.reward_receiver.clone(),
            mine_retry_limit: settings.mine_retry_limit.max(1),
        }
    }
}

/* ---------- Chain API Models ---------- */

#[derive(Serialize)]
pub struct ChainResponse<'a> {
    pub chain: &'a [Block],
    pub length: usize,
}

#[derive(Serialize)]
pub struct MineResponse {
    pub message: String,
    pub index: u64,
    pub transactions: Vec<Transaction>,
    pub proof: u64,
    pub previous_hash: String,
    pub timestamp: i64,
}

#[derive(Serialize)]
pub struct ReplaceResponse<'a> {
    pub message: &'static str,
    pub chain: &'a [Block],
}

#[derive(Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub length: usize,
}

/* ---------- TX API Models ---------- */

/// Every field is optional so a missing one yields our own 400 body.
#[derive(Deserialize)]
pub struct AddTransactionRequest {
    pub sender: Option<String>,
    pub receiver: Option<String>,
    pub amount: Option<Number>,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/* ---------- Node API Models ---------- */

#[derive(Deserialize)]
pub struct ConnectNodeRequest {
    pub nodes: Option<Vec<String>>,
}

#[derive(Serialize)]
pub struct ConnectNodeResponse {
    pub message: &'static str,
    pub total_nodes: Vec<String>,
}
