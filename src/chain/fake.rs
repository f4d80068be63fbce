//! In-memory ChainData for unit tests.

use super::{ChainData, FeeRecommendation, PrevOut, SubmitReply, UnspentOutput};
use crate::error::ChainError;
use async_trait::async_trait;
use bitcoin::{ScriptBuf, Txid};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

#[derive(Default)]
pub struct FakeChain {
    pub utxos: HashMap<String, Vec<UnspentOutput>>,
    pub funded: HashMap<String, u64>,
    pub hour_fee: Option<u64>,
    pub prev_outs: HashMap<(Txid, u32), PrevOut>,
    pub spent: HashSet<(Txid, u32)>,
    pub reply: Option<SubmitReply>,
    pub submitted: Mutex<Vec<String>>,
}

impl FakeChain {
    pub fn with_fee(mut self, rate: u64) -> Self { self.hour_fee = Some(rate); self }

    pub fn with_utxo(mut self, address: &str, utxo: UnspentOutput, script: ScriptBuf) -> Self {
        self.prev_outs.insert((utxo.txid, utxo.vout), PrevOut { script_pubkey: script, value: utxo.value });
        self.utxos.entry(address.to_string()).or_default().push(utxo);
        self
    }

    pub fn with_spent(mut self, txid: Txid, vout: u32) -> Self { self.spent.insert((txid, vout)); self }

    pub fn with_reply(mut self, status: u16, body: &str) -> Self {
        self.reply = Some(SubmitReply { status, body: body.to_string() });
        self
    }
}

#[async_trait]
impl ChainData for FakeChain {
    async fn list_utxos(&self, address: &str) -> Result<Vec<UnspentOutput>, ChainError> {
        Ok(self.utxos.get(address).cloned().unwrap_or_default())
    }

    async fn funded_total(&self, address: &str) -> Result<u64, ChainError> {
        Ok(self.funded.get(address).copied().unwrap_or(0))
    }

    async fn recommended_fees(&self) -> Result<FeeRecommendation, ChainError> {
        let hour_fee = self.hour_fee.ok_or_else(|| ChainError::Status { status: 503, body: "no fees".into() })?;
        Ok(FeeRecommendation { fastest_fee: hour_fee, half_hour_fee: hour_fee, hour_fee, economy_fee: hour_fee, minimum_fee: 1 })
    }

    async fn prev_out(&self, txid: &Txid, vout: u32) -> Result<PrevOut, ChainError> {
        self.prev_outs
            .get(&(*txid, vout))
            .cloned()
            .ok_or_else(|| ChainError::NotFound(format!("{}:{}", txid, vout)))
    }

    async fn is_spent(&self, txid: &Txid, vout: u32) -> Result<bool, ChainError> {
        Ok(self.spent.contains(&(*txid, vout)))
    }

    async fn submit(&self, raw_hex: &str) -> Result<SubmitReply, ChainError> {
        if let Ok(mut log) = self.submitted.lock() {
            log.push(raw_hex.to_string());
        }
        self.reply.clone().ok_or_else(|| ChainError::Status { status: 0, body: "offline".into() })
    }
}
