//! SigningKey - the wallet's single secret scalar and the two addresses it controls.

use crate::error::{WalletError, WalletResult};
use crate::network::Network;
use bitcoin::secp256k1::{rand, Secp256k1};
use bitcoin::{Address, CompressedPublicKey, NetworkKind, PrivateKey, PublicKey, ScriptBuf};
use zeroize::Zeroizing;

/// Address encoding family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressFamily {
    /// Base58 pay-to-public-key-hash.
    Legacy,
    /// Bech32 pay-to-witness-public-key-hash.
    Segwit,
}

impl AddressFamily {
    pub fn as_str(&self) -> &'static str {
        match self { Self::Legacy => "legacy", Self::Segwit => "segwit" }
    }
}

/// Compressed key plus cached public key. Read-only after construction.
#[derive(Clone)]
pub struct SigningKey {
    private: PrivateKey,
    public: CompressedPublicKey,
    network: Network,
}

impl SigningKey {
    pub fn generate(network: Network) -> WalletResult<Self> {
        let secp = Secp256k1::new();
        let (secret, _) = secp.generate_keypair(&mut rand::thread_rng());
        Self::from_private(PrivateKey::new(secret, network.to_bitcoin()), network)
    }

    /// Parse wallet-import format. The key must be compressed and minted for `network`'s kind.
    pub fn from_wif(wif: &str, network: Network) -> WalletResult<Self> {
        let private = PrivateKey::from_wif(wif.trim())
            .map_err(|e| WalletError::KeyStore(format!("invalid WIF: {}", e)))?;
        if !private.compressed {
            return Err(WalletError::KeyStore("uncompressed keys are not supported".into()));
        }
        if private.network != NetworkKind::from(network.to_bitcoin()) {
            return Err(WalletError::KeyStore(format!("key does not belong to {}", network)));
        }
        Self::from_private(private, network)
    }

    fn from_private(private: PrivateKey, network: Network) -> WalletResult<Self> {
        let secp = Secp256k1::signing_only();
        let public = CompressedPublicKey::from_private_key(&secp, &private)
            .map_err(|e| WalletError::KeyStore(e.to_string()))?;
        Ok(Self { private, public, network })
    }

    pub fn to_wif(&self) -> Zeroizing<String> { Zeroizing::new(self.private.to_wif()) }
    pub fn network(&self) -> Network { self.network }
    pub fn private_key(&self) -> &PrivateKey { &self.private }
    pub fn compressed_public_key(&self) -> &CompressedPublicKey { &self.public }
    pub fn public_key(&self) -> PublicKey { PublicKey::new(self.public.0) }

    pub fn legacy_address(&self) -> Address {
        Address::p2pkh(self.public.pubkey_hash(), self.network.to_bitcoin())
    }

    pub fn segwit_address(&self) -> Address {
        Address::p2wpkh(&self.public, self.network.to_bitcoin())
    }

    pub fn address_of(&self, family: AddressFamily) -> Address {
        match family {
            AddressFamily::Legacy => self.legacy_address(),
            AddressFamily::Segwit => self.segwit_address(),
        }
    }

    /// Which owned address, if any, a locking script pays to.
    pub fn owns_script(&self, script: &ScriptBuf) -> Option<AddressFamily> {
        [AddressFamily::Legacy, AddressFamily::Segwit]
            .into_iter()
            .find(|family| self.address_of(*family).script_pubkey() == *script)
    }
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKey")
            .field("public", &self.public)
            .field("network", &self.network)
            .finish_non_exhaustive()
    }
}
