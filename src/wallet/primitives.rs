//! Primitives - the narrow slice of `bitcoin` the engine depends on.
//!
//! Script classification, destination parsing, sighash computation and ECDSA
//! signing. Everything else in the wallet goes through these functions.

use crate::error::{SigningError, WalletError, WalletResult};
use crate::network::Network;
use bitcoin::hashes::Hash;
use bitcoin::secp256k1::{Message, Secp256k1};
use bitcoin::sighash::{EcdsaSighashType, SighashCache};
use bitcoin::{ecdsa, Address, Amount, PrivateKey, Script, ScriptBuf, Transaction};
use std::str::FromStr;

/// Locking script kinds the signer can authorize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptKind {
    P2pkh,
    P2wpkh,
    Other,
}

/// Sighash domain: legacy (base) or BIP143 witness v0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SighashDomain {
    Base,
    WitnessV0,
}

impl ScriptKind {
    pub fn domain(&self) -> Option<SighashDomain> {
        match self {
            Self::P2pkh => Some(SighashDomain::Base),
            Self::P2wpkh => Some(SighashDomain::WitnessV0),
            Self::Other => None,
        }
    }
}

pub fn classify_script(script: &Script) -> ScriptKind {
    if script.is_p2pkh() {
        ScriptKind::P2pkh
    } else if script.is_p2wpkh() {
        ScriptKind::P2wpkh
    } else {
        ScriptKind::Other
    }
}

/// Parse a destination address for `network` and return its locking script.
pub fn script_for_address(destination: &str, network: Network) -> WalletResult<ScriptBuf> {
    let address = Address::from_str(destination.trim())
        .map_err(|e| WalletError::InvalidAddress(format!("{}: {}", destination, e)))?
        .require_network(network.to_bitcoin())
        .map_err(|e| WalletError::InvalidAddress(format!("{}: {}", destination, e)))?;
    Ok(address.script_pubkey())
}

/// Digest input `index` commits to, with SIGHASH_ALL.
pub fn sighash(
    tx: &Transaction,
    index: usize,
    script_pubkey: &Script,
    value: u64,
    domain: SighashDomain,
) -> Result<[u8; 32], SigningError> {
    let failed = |e: String| SigningError::Sighash { index, reason: e };
    let mut cache = SighashCache::new(tx);
    match domain {
        SighashDomain::Base => cache
            .legacy_signature_hash(index, script_pubkey, EcdsaSighashType::All.to_u32())
            .map(|h| h.to_byte_array())
            .map_err(|e| failed(e.to_string())),
        SighashDomain::WitnessV0 => cache
            .p2wpkh_signature_hash(index, script_pubkey, Amount::from_sat(value), EcdsaSighashType::All)
            .map(|h| h.to_byte_array())
            .map_err(|e| failed(e.to_string())),
    }
}

/// DER signature with the SIGHASH_ALL byte appended.
pub fn sign(key: &PrivateKey, digest: [u8; 32]) -> ecdsa::Signature {
    let secp = Secp256k1::signing_only();
    let signature = secp.sign_ecdsa(&Message::from_digest(digest), &key.inner);
    ecdsa::Signature { signature, sighash_type: EcdsaSighashType::All }
}
