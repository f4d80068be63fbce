//! Chain data - stateless façade over the remote data / broadcast service.
//!
//! ```text
//! Wallet ──► ChainData (trait)
//!               │
//!               ├── list_utxos / funded_total     (balance)
//!               ├── recommended_fees              (FeeEstimator)
//!               ├── is_spent / prev_out           (TransactionSigner)
//!               └── submit                        (Broadcaster)
//!               ▼
//!           MempoolClient (HTTP + JSON)
//! ```
//!
//! Calls are sequential and never retried. Nothing is cached between calls.

mod mempool;
#[cfg(test)]
pub(crate) mod fake;

pub use mempool::MempoolClient;

use crate::error::ChainError;
use async_trait::async_trait;
use bitcoin::{OutPoint, ScriptBuf, Txid};
use serde::Deserialize;

/// Unspent output as listed by the service. Identity is `(txid, vout)`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UnspentOutput {
    pub txid: Txid,
    pub vout: u32,
    pub value: u64,
}

impl UnspentOutput {
    pub fn new(txid: Txid, vout: u32, value: u64) -> Self {
        Self { txid, vout, value }
    }

    pub fn outpoint(&self) -> OutPoint { OutPoint::new(self.txid, self.vout) }
}

/// Locking script and value of a previous output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrevOut {
    pub script_pubkey: ScriptBuf,
    pub value: u64,
}

/// Recommended fee rates in sat/vB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeRecommendation {
    #[serde(default)]
    pub fastest_fee: u64,
    #[serde(default)]
    pub half_hour_fee: u64,
    pub hour_fee: u64,
    #[serde(default)]
    pub economy_fee: u64,
    #[serde(default)]
    pub minimum_fee: u64,
}

/// Raw outcome of a submission; classification belongs to the Broadcaster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitReply {
    pub status: u16,
    pub body: String,
}

impl SubmitReply {
    pub fn is_success(&self) -> bool { (200..300).contains(&self.status) }
}

#[async_trait]
pub trait ChainData: Send + Sync {
    async fn list_utxos(&self, address: &str) -> Result<Vec<UnspentOutput>, ChainError>;

    /// Cumulative funded counter for an address (confirmed chain stats).
    async fn funded_total(&self, address: &str) -> Result<u64, ChainError>;

    async fn recommended_fees(&self) -> Result<FeeRecommendation, ChainError>;

    async fn prev_out(&self, txid: &Txid, vout: u32) -> Result<PrevOut, ChainError>;

    async fn is_spent(&self, txid: &Txid, vout: u32) -> Result<bool, ChainError>;

    /// POST raw transaction hex. Transport failures are errors; any HTTP status is a reply.
    async fn submit(&self, raw_hex: &str) -> Result<SubmitReply, ChainError>;
}
