use serde::{Deserialize, Serialize};
use serde_json::Number;

/// A value transfer queued for the next block.
///
/// `amount` keeps the caller's JSON number as-is (integer or float, any sign);
/// checking balances or signs is left to whoever owns identities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub sender: String,
    pub receiver: String,
    pub amount: Number,
}

impl Transaction {
    pub fn new(sender: impl Into<String>, receiver: impl Into<String>, amount: Number) -> Self {
        Self {
            sender: sender.into(),
            receiver: receiver.into(),
            amount,
        }
    }
}
