//! Error taxonomy for wallet operations.
//!
//! Every failure aborts the current operation. Nothing is defaulted or retried here.

use crate::money::Money;
use thiserror::Error;

/// Wallet errors surfaced to library callers.
#[derive(Error, Debug)]
pub enum WalletError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Insufficient funds: sending {amount} with fee {fee} exceeds available amount {available}")]
    InsufficientFunds { amount: Money, fee: Money, available: Money },

    #[error("Signing error: {0}")]
    Signing(#[from] SigningError),

    #[error("Data unavailable: {0}")]
    DataUnavailable(String),

    #[error("Key store: {0}")]
    KeyStore(String),
}

/// Signing and broadcast failures. Broadcast rejections share this kind so
/// callers only branch on the message.
#[derive(Error, Debug)]
pub enum SigningError {
    #[error("cannot sign foreign UTXO {txid}:{vout}")]
    ForeignUtxo { txid: String, vout: u32 },

    #[error("already spent: {txid}:{vout}")]
    AlreadySpent { txid: String, vout: u32 },

    #[error("unsupported script type for {txid}:{vout}: {script}")]
    UnsupportedScript { txid: String, vout: u32, script: String },

    #[error("sighash failed for input {index}: {reason}")]
    Sighash { index: usize, reason: String },

    #[error("{reason}: {message}")]
    Broadcast { reason: BroadcastFailure, message: String },
}

/// Caller-facing cause of a failed broadcast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BroadcastFailure {
    InvalidTransaction,
    Rejected,
    RateLimited,
    Failed(u16),
    Network,
    MalformedResponse,
}

impl BroadcastFailure {
    /// Map a non-success HTTP status to its cause.
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => Self::InvalidTransaction,
            403 => Self::Rejected,
            429 => Self::RateLimited,
            other => Self::Failed(other),
        }
    }
}

impl std::fmt::Display for BroadcastFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTransaction => write!(f, "Invalid transaction"),
            Self::Rejected => write!(f, "Transaction rejected"),
            Self::RateLimited => write!(f, "Rate limited"),
            Self::Failed(status) => write!(f, "Broadcast failed (HTTP {})", status),
            Self::Network => write!(f, "Network error"),
            Self::MalformedResponse => write!(f, "Malformed success response"),
        }
    }
}

/// Transport-level failures talking to the chain data service.
#[derive(Error, Debug)]
pub enum ChainError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server error ({status}): {body}")]
    Status { status: u16, body: String },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("decode error: {0}")]
    Decode(String),
}

impl From<ChainError> for WalletError {
    fn from(e: ChainError) -> Self {
        WalletError::DataUnavailable(e.to_string())
    }
}

impl From<serde_json::Error> for ChainError {
    fn from(e: serde_json::Error) -> Self {
        ChainError::Decode(e.to_string())
    }
}

pub type WalletResult<T> = Result<T, WalletError>;
