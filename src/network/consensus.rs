use actix_web::http::StatusCode;
use async_trait::async_trait;
use futures::future::join_all;
use log::{debug, info, warn};
use serde::Deserialize;
use std::sync::Mutex;
use std::time::Duration;

use crate::blockchain::{Block, Blockchain, is_valid_chain};
use crate::error::{LedgerError, Result};

/// Largest `/get_chain` body we accept from a peer.
const MAX_CHAIN_BODY_BYTES: usize = 64 * 1024 * 1024;

/// Wire shape of a peer's `/get_chain` response.
#[derive(Debug, Deserialize)]
pub struct PeerChain {
    pub chain: Vec<Block>,
    pub length: usize,
}

impl PeerChain {
    /// Reject bodies whose advertised length disagrees with the blocks sent.
    pub fn into_blocks(self, peer: &str) -> Result<Vec<Block>> {
        if self.length != self.chain.len() {
            return Err(LedgerError::MalformedPeerChain {
                peer: peer.to_string(),
                reason: format!(
                    "length {} but {} blocks sent",
                    self.length,
                    self.chain.len()
                ),
            });
        }
        Ok(self.chain)
    }
}

/// Source of a peer's full chain.
#[async_trait(?Send)]
pub trait ChainFetcher: Send + Sync {
    async fn fetch_chain(&self, peer: &str) -> Result<Vec<Block>>;
}

/// Fetches `GET http://{peer}/get_chain` with a per-peer timeout.
#[derive(Debug, Clone)]
pub struct HttpChainFetcher {
    timeout: Duration,
}

impl HttpChainFetcher {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait(?Send)]
impl ChainFetcher for HttpChainFetcher {
    async fn fetch_chain(&self, peer: &str) -> Result<Vec<Block>> {
        let client = awc::Client::builder().timeout(self.timeout).finish();
        let url = format!("http://{peer}/get_chain");

        let mut resp = client
            .get(&url)
            .send()
            .await
            .map_err(|e| LedgerError::PeerUnreachable {
                peer: peer.to_string(),
                reason: e.to_string(),
            })?;

        if resp.status() != StatusCode::OK {
            return Err(LedgerError::PeerStatus {
                peer: peer.to_string(),
                status: resp.status().as_u16(),
            });
        }

        let body = resp
            .json::<PeerChain>()
            .limit(MAX_CHAIN_BODY_BYTES)
            .await
            .map_err(|e| LedgerError::MalformedPeerChain {
                peer: peer.to_string(),
                reason: e.to_string(),
            })?;

        body.into_blocks(peer)
    }
}

/// Longest-valid-chain rule.
///
/// Fetches every peer concurrently, drops peers that fail or send invalid
/// chains, then under the store lock adopts the longest candidate that is
/// strictly longer than the local chain. Equal lengths keep what we have.
/// Returns whether the local chain was replaced.
pub async fn resolve_conflicts(
    blockchain: &Mutex<Blockchain>,
    peers: &[String],
    fetcher: &dyn ChainFetcher,
) -> bool {
    let difficulty = blockchain.lock().expect("mutex poisoned").difficulty();

    let fetches = peers.iter().map(|peer| async move {
        (peer.as_str(), fetcher.fetch_chain(peer).await)
    });
    let results = join_all(fetches).await;

    // Validation is pure, so it runs before taking the lock.
    let mut candidates: Vec<(&str, Vec<Block>)> = Vec::new();
    for (peer, result) in results {
        match result {
            Ok(chain) if is_valid_chain(&chain, difficulty) => {
                debug!("CONSENSUS - peer {} offers {} blocks", peer, chain.len());
                candidates.push((peer, chain));
            }
            Ok(chain) => {
                warn!(
                    "CONSENSUS - discarding invalid chain from {} ({} blocks)",
                    peer,
                    chain.len()
                );
            }
            Err(e) => warn!("CONSENSUS - skipping peer: {}", e),
        }
    }

    let mut bc = blockchain.lock().expect("mutex poisoned");
    let local_len = bc.len();

    let mut best: Option<(&str, Vec<Block>)> = None;
    for (peer, chain) in candidates {
        let to_beat = best.as_ref().map_or(local_len, |(_, c)| c.len());
        if chain.len() > to_beat {
            best = Some((peer, chain));
        }
    }

    match best {
        Some((peer, chain)) => {
            info!(
                "CONSENSUS - adopting chain from {} ({} -> {} blocks)",
                peer,
                local_len,
                chain.len()
            );
            bc.replace(chain);
            true
        }
        None => {
            debug!(
                "CONSENSUS - local chain ({} blocks) kept after polling {} peers",
                local_len,
                peers.len()
            );
            false
        }
    }
}
