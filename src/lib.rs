//! Beewallet: single-key custodial Bitcoin wallet. Balance, fee-aware send, ownership-gated signing.
//!
//! # Architecture
//!
//! ```text
//! Wallet (entry point)
//!   │
//!   ├── KeyStore (WIF file, owner-only, create-if-absent)
//!   │     └── SigningKey → legacy (P2PKH) + segwit (P2WPKH) address
//!   │
//!   ├── ChainData (trait)
//!   │     └── MempoolClient (Esplora-style HTTP + JSON)
//!   │
//!   └── Engine
//!         ├── FeeEstimator      hourFee × (10 + 68·in + 31·out)
//!         ├── TransactionBuilder all UTXOs in, destination + change out
//!         ├── TransactionSigner  resolve → enrich → authorize → seal
//!         └── Broadcaster        submit → txid | classified rejection
//! ```
//!
//! # Operations
//!
//! | Operation | Method | Description |
//! |-----------|--------|-------------|
//! | balance | `wallet.balance()` | Sum of UTXO values over both owned addresses |
//! | build | `wallet.build_transaction(utxos, dest, amount)` | Unsigned transaction |
//! | sign | `wallet.sign_transaction(unsigned)` | Signed transaction |
//! | broadcast | `wallet.broadcast_transaction(&signed)` | Transaction id |
//! | send | `wallet.send(amount, dest)` | All of the above |
//!
//! # Usage
//!
//! ```ignore
//! use beewallet::{Money, Network, Wallet, WalletConfig};
//!
//! let wallet = Wallet::open(&WalletConfig::new(Network::Signet).with_data_dir("data"))?;
//! println!("{}", wallet.balance().await?);
//! let txid = wallet.send(Money::from_btc_str("0.0005")?, "tb1q...").await?;
//! ```

pub mod chain;
pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod money;
pub mod network;
pub mod wallet;

// =============================================================================
// Re-exports
// =============================================================================
pub use chain::{ChainData, FeeRecommendation, MempoolClient, PrevOut, SubmitReply, UnspentOutput};
pub use config::WalletConfig;
pub use error::{BroadcastFailure, ChainError, SigningError, WalletError, WalletResult};
pub use money::{Currency, Money};
pub use network::Network;
pub use wallet::{
    AddressFamily, Broadcaster, FeeEstimator, FeeQuote, KeyStore, SignedTransaction, SigningKey,
    TransactionBuilder, TransactionSigner, UnsignedTransaction, Wallet,
};
