use actix_web::http::Uri;
use std::collections::HashSet;

use crate::error::{LedgerError, Result};

/// Known peers, stored as `host:port`. Additive only; no liveness tracking.
#[derive(Debug, Default)]
pub struct NodeRegistry {
    nodes: HashSet<String>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one peer. Accepts a URL (`http://10.0.0.5:5000/`) or a bare
    /// authority (`10.0.0.5:5000`); returns the stored `host:port`.
    pub fn register(&mut self, address: &str) -> Result<String> {
        let authority = parse_authority(address)?;
        self.nodes.insert(authority.clone());
        Ok(authority)
    }

    /// Register a batch. Nothing is stored unless every address parses.
    pub fn register_all<S: AsRef<str>>(&mut self, addresses: &[S]) -> Result<()> {
        for address in addresses {
            parse_authority(address.as_ref())?;
        }
        for address in addresses {
            self.register(address.as_ref())?;
        }
        Ok(())
    }

    /// Snapshot of the registered peers (no particular order).
    pub fn nodes(&self) -> Vec<String> {
        self.nodes.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }
}

/// Extract `host[:port]` from a node address.
fn parse_authority(address: &str) -> Result<String> {
    let invalid = || LedgerError::InvalidNodeAddress(address.to_string());

    let uri: Uri = address.trim().parse().map_err(|_| invalid())?;
    let host = uri.host().filter(|h| !h.is_empty()).ok_or_else(invalid)?;
    Ok(match uri.port_u16() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}
