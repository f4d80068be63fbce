//! Path constants for the chain data / broadcast service
//!
//! Centralized registry for every endpoint the wallet touches.
//! Paths are relative to the configured API base.

/// Default service bases per network
pub const MEMPOOL_MAINNET: &str = "https://mempool.space/api";
pub const MEMPOOL_TESTNET: &str = "https://mempool.space/testnet/api";
pub const MEMPOOL_SIGNET: &str = "https://mempool.space/signet/api";
pub const LOCAL_REGTEST: &str = "http://127.0.0.1:3002/api";

/// Fee recommendation (sat/vB per confirmation target)
pub const FEES_RECOMMENDED: &str = "/v1/fees/recommended";

/// Raw transaction submission (POST, hex body)
pub const TX_SUBMIT: &str = "/tx";

/// Address summary with funded/spent counters
pub fn address(addr: &str) -> String { format!("/address/{}", addr) }

/// Unspent outputs for an address
pub fn address_utxos(addr: &str) -> String { format!("/address/{}/utxo", addr) }

/// Full transaction with per-output scriptpubkey
pub fn tx(txid: &str) -> String { format!("/tx/{}", txid) }

/// Spend status of one output
pub fn tx_outspend(txid: &str, vout: u32) -> String { format!("/tx/{}/outspend/{}", txid, vout) }
