//! Wallet module - single-key custodial wallet engine
//!
//! One compressed key controls two addresses (legacy P2PKH and segwit P2WPKH).
//! Every operation fetches fresh chain data; nothing is cached between calls.
//!
//! # Architecture
//!
//! ```text
//! Wallet::send(amount, destination)
//!     │
//!     ├── KeyStore ─────────► SigningKey (WIF file, 0600, create-if-absent)
//!     ├── ChainData::list_utxos (legacy, then segwit)
//!     ├── TransactionBuilder ─► FeeEstimator (hourFee × vbytes)
//!     │       └── UnsignedTransaction [destination, change]
//!     ├── TransactionSigner ──► resolve → enrich → authorize → seal
//!     │       └── SignedTransaction
//!     └── Broadcaster ───────► ChainData::submit → txid | SigningError
//! ```
//!
//! # Operations
//!
//! | Operation | Description |
//! |-----------|-------------|
//! | `balance` | Sum of UTXO values over both owned addresses |
//! | `balance_of` | Sum of UTXO values at one address |
//! | `funded_total` | Service's cumulative funded counter (informational) |
//! | `build_transaction` | All supplied UTXOs in, destination + change out |
//! | `sign_transaction` | Ownership-gated per-input signing |
//! | `broadcast_transaction` | Submit and classify the reply |
//! | `send` | List → build → sign → broadcast |

mod broadcast;
mod builder;
pub mod fee;
mod key;
pub mod keystore;
pub mod primitives;
mod service;
mod signer;

pub use broadcast::{classify_reply, Broadcaster};
pub use builder::{TransactionBuilder, UnsignedTransaction, OUTPUT_COUNT};
pub use fee::{estimate_vbytes, miner_fee, FeeEstimator, FeeQuote};
pub use key::{AddressFamily, SigningKey};
pub use keystore::KeyStore;
pub use service::Wallet;
pub use signer::{SignedTransaction, TransactionSigner};
