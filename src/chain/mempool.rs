//! MempoolClient - HTTP client for an Esplora/mempool.space style API.

use super::{ChainData, FeeRecommendation, PrevOut, SubmitReply, UnspentOutput};
use crate::config::WalletConfig;
use crate::core::paths;
use crate::error::ChainError;
use async_trait::async_trait;
use bitcoin::{ScriptBuf, Txid};
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct AddressInfo {
    chain_stats: ChainStats,
}

#[derive(Debug, Deserialize)]
struct ChainStats {
    funded_txo_sum: u64,
}

#[derive(Debug, Deserialize)]
struct TxInfo {
    vout: Vec<TxOutInfo>,
}

#[derive(Debug, Deserialize)]
struct TxOutInfo {
    scriptpubkey: String,
    value: u64,
}

#[derive(Debug, Deserialize)]
struct OutSpend {
    spent: bool,
}

#[derive(Debug, Clone)]
pub struct MempoolClient {
    base_url: String,
    client: reqwest::Client,
}

impl MempoolClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, client: reqwest::Client::new() }
    }

    pub fn from_config(config: &WalletConfig) -> Self {
        Self::new(config.api_base())
    }

    pub fn base_url(&self) -> &str { &self.base_url }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ChainError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "GET");
        let resp = self.client.get(&url).send().await?;
        let status = resp.status();

        if status.as_u16() == 404 {
            return Err(ChainError::NotFound(path.to_string()));
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ChainError::Status { status: status.as_u16(), body });
        }

        let text = resp.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl ChainData for MempoolClient {
    async fn list_utxos(&self, address: &str) -> Result<Vec<UnspentOutput>, ChainError> {
        self.get_json(&paths::address_utxos(address)).await
    }

    async fn funded_total(&self, address: &str) -> Result<u64, ChainError> {
        let info: AddressInfo = self.get_json(&paths::address(address)).await?;
        Ok(info.chain_stats.funded_txo_sum)
    }

    async fn recommended_fees(&self) -> Result<FeeRecommendation, ChainError> {
        self.get_json(paths::FEES_RECOMMENDED).await
    }

    async fn prev_out(&self, txid: &Txid, vout: u32) -> Result<PrevOut, ChainError> {
        let tx: TxInfo = self.get_json(&paths::tx(&txid.to_string())).await?;
        let out = tx
            .vout
            .into_iter()
            .nth(vout as usize)
            .ok_or_else(|| ChainError::NotFound(format!("output {}:{}", txid, vout)))?;
        let script_pubkey = ScriptBuf::from_hex(&out.scriptpubkey)
            .map_err(|e| ChainError::Decode(format!("scriptpubkey of {}:{}: {}", txid, vout, e)))?;
        Ok(PrevOut { script_pubkey, value: out.value })
    }

    async fn is_spent(&self, txid: &Txid, vout: u32) -> Result<bool, ChainError> {
        let status: OutSpend = self.get_json(&paths::tx_outspend(&txid.to_string(), vout)).await?;
        Ok(status.spent)
    }

    async fn submit(&self, raw_hex: &str) -> Result<SubmitReply, ChainError> {
        let url = format!("{}{}", self.base_url, paths::TX_SUBMIT);
        let resp = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "text/plain")
            .body(raw_hex.to_string())
            .send()
            .await?;
        let status = resp.status().as_u16();
        let body = resp.text().await?;
        Ok(SubmitReply { status, body })
    }
}
