use actix_web::{HttpResponse, Responder, get, web};
use log::{debug, info, warn};
use serde_json::Number;
use std::sync::Arc;
use std::time::Instant;

use super::models::{AppState, ChainResponse, MineResponse, ReplaceResponse, ValidateResponse};
use crate::blockchain::is_valid_chain;
use crate::error::LedgerError;
use crate::network::resolve_conflicts;
use crate::transaction::Transaction;

/// Get the full blockchain.
#[get("/get_chain")]
pub async fn get_chain(state: web::Data<AppState>) -> impl Responder {
    let bc = state.blockchain.lock().expect("mutex poisoned");
    HttpResponse::Ok().json(ChainResponse {
        chain: bc.chain(),
        length: bc.len(),
    })
}

/// Validate the local chain.
#[get("/validate_chain")]
pub async fn validate_chain(state: web::Data<AppState>) -> impl Responder {
    let bc = state.blockchain.lock().expect("mutex poisoned");
    HttpResponse::Ok().json(ValidateResponse {
        valid: is_valid_chain(bc.chain(), bc.difficulty()),
        length: bc.len(),
    })
}

/// Mine a new block from the pending queue:
/// - Snapshot the tip and release the lock
/// - Search for a proof on the blocking pool
/// - Re-lock and seal pending txs + reward; retry if the tip moved meanwhile
#[get("/mine_block")]
pub async fn mine_block(state: web::Data<AppState>) -> impl Responder {
    for attempt in 1..=state.mine_retry_limit {
        let (previous_proof, previous_hash) = {
            let bc = state.blockchain.lock().expect("mutex poisoned");
            let tip = bc.tip();
            (tip.proof, tip.hash.clone())
        };

        let t0 = Instant::now();
        let miner = Arc::clone(&state.miner);
        let proof = match web::block(move || miner.find_proof(previous_proof)).await {
            Ok(Some(proof)) => proof,
            Ok(None) => {
                warn!(
                    "MINER - proof search exhausted its budget after {} ms",
                    t0.elapsed().as_millis()
                );
                return HttpResponse::ServiceUnavailable()
                    .body("proof search exhausted its attempt budget");
            }
            Err(e) => {
                warn!("MINER - blocking pool error: {}", e);
                return HttpResponse::InternalServerError().body("mining worker failed");
            }
        };
        debug!(
            "MINER - proof {} found in {} ms (attempt {})",
            proof,
            t0.elapsed().as_millis(),
            attempt
        );

        let reward = Transaction::new(
            state.node_id.clone(),
            state.reward_receiver.clone(),
            Number::from(1u64),
        );

        let mut bc = state.blockchain.lock().expect("mutex poisoned");
        match bc.create_block_with_reward(proof, &previous_hash, reward) {
            Ok(block) => {
                info!(
                    "MINER - sealed block #{} (hash={}, proof={}, txs={})",
                    block.index,
                    block.hash,
                    block.proof,
                    block.transactions.len()
                );
                return HttpResponse::Ok().json(MineResponse {
                    message: "Congratulations, you just mined a block!".to_string(),
                    index: block.index,
                    transactions: block.transactions.clone(),
                    proof: block.proof,
                    previous_hash: block.previous_hash.clone(),
                    timestamp: block.timestamp,
                });
            }
            Err(LedgerError::StaleTip { .. }) => {
                debug!("MINER - tip moved during search, retrying ({attempt})");
            }
            Err(e) => {
                warn!("MINER - could not seal block: {}", e);
                return HttpResponse::InternalServerError().body(e.to_string());
            }
        }
    }

    warn!(
        "MINER - tip kept moving, gave up after {} attempts",
        state.mine_retry_limit
    );
    HttpResponse::Conflict().body("chain tip kept moving while mining; try again")
}

/// Poll every registered peer and adopt the longest valid chain.
#[get("/replace_chain")]
pub async fn replace_chain(state: web::Data<AppState>) -> impl Responder {
    let peers = state.nodes.lock().expect("mutex poisoned").nodes();
    let replaced = resolve_conflicts(&state.blockchain, &peers, state.fetcher.as_ref()).await;

    let message = if replaced {
        "The chain has been replaced by the longest chain"
    } else {
        "Our chain is the largest or equal to the longest chain"
    };
    let bc = state.blockchain.lock().expect("mutex poisoned");
    HttpResponse::Ok().json(ReplaceResponse {
        message,
        chain: bc.chain(),
    })
}
