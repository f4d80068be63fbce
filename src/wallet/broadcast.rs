//! Broadcaster - submit signed bytes, classify the service's answer.

use super::signer::SignedTransaction;
use crate::chain::{ChainData, SubmitReply};
use crate::error::{BroadcastFailure, SigningError, WalletResult};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub struct Broadcaster {
    chain: Arc<dyn ChainData>,
}

impl Broadcaster {
    pub fn new(chain: Arc<dyn ChainData>) -> Self { Self { chain } }

    /// Returns the transaction id reported by the service.
    pub async fn submit(&self, tx: &SignedTransaction) -> WalletResult<String> {
        let reply = self.chain.submit(&tx.raw_hex()).await.map_err(|e| {
            warn!(error = %e, "broadcast transport failure");
            SigningError::Broadcast { reason: BroadcastFailure::Network, message: e.to_string() }
        })?;

        let txid = classify_reply(&reply).map_err(|e| {
            warn!(status = reply.status, error = %e, "broadcast refused");
            e
        })?;
        info!(%txid, "broadcast accepted");
        Ok(txid)
    }
}

/// Success needs a JSON body with a string `txid`. Failures carry the JSON
/// `message` field, or the raw body when there is none.
pub fn classify_reply(reply: &SubmitReply) -> Result<String, SigningError> {
    let parsed: Option<Value> = serde_json::from_str(&reply.body).ok();

    if reply.is_success() {
        return parsed
            .as_ref()
            .and_then(|v| v.get("txid"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| SigningError::Broadcast {
                reason: BroadcastFailure::MalformedResponse,
                message: reply.body.clone(),
            });
    }

    let message = parsed
        .as_ref()
        .and_then(|v| v.get("message"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| reply.body.clone());
    Err(SigningError::Broadcast { reason: BroadcastFailure::from_status(reply.status), message })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply(status: u16, body: &str) -> SubmitReply {
        SubmitReply { status, body: body.to_string() }
    }

    #[test]
    fn test_success_returns_txid() {
        assert_eq!(classify_reply(&reply(200, r#"{"txid":"X"}"#)).unwrap(), "X");
        assert_eq!(classify_reply(&reply(201, r#"{"txid":"abc","extra":1}"#)).unwrap(), "abc");
    }

    #[test]
    fn test_success_without_txid_is_malformed() {
        for body in ["", "not json", r#"{"id":"X"}"#, r#"{"txid":5}"#] {
            let err = classify_reply(&reply(200, body)).unwrap_err();
            assert!(matches!(err, SigningError::Broadcast { reason: BroadcastFailure::MalformedResponse, .. }));
        }
    }

    #[test]
    fn test_status_messages() {
        let cases = [
            (400, "Invalid transaction"),
            (403, "Transaction rejected"),
            (429, "Rate limited"),
            (500, "Broadcast failed (HTTP 500)"),
        ];
        for (status, expected) in cases {
            let err = classify_reply(&reply(status, r#"{"message":"nope"}"#)).unwrap_err();
            let text = err.to_string();
            assert!(text.contains(expected), "{} -> {}", status, text);
            assert!(text.ends_with("nope"));
        }
    }

    #[test]
    fn test_raw_body_when_not_json() {
        let err = classify_reply(&reply(400, "sendrawtransaction RPC error: bad-txns")).unwrap_err();
        assert_eq!(err.to_string(), "Invalid transaction: sendrawtransaction RPC error: bad-txns");
    }
}
