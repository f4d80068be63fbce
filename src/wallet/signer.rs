//! TransactionSigner - ownership-gated, per-input authorization.
//!
//! Each input moves through four steps in index order:
//!
//! ```text
//! Resolve   spend status of (txid, vout)      -> AlreadySpent
//! Enrich    locking script + value of prevout -> DataUnavailable
//! Authorize classify script, check ownership  -> UnsupportedScript / ForeignUtxo
//! Seal      script_sig (P2PKH) or witness (P2WPKH)
//! ```
//!
//! Any failure aborts the whole transaction; no partially signed transaction
//! is ever returned.

use super::builder::UnsignedTransaction;
use super::key::SigningKey;
use super::primitives::{classify_script, sighash, sign, SighashDomain};
use crate::chain::{ChainData, PrevOut};
use crate::error::{SigningError, WalletResult};
use bitcoin::consensus::encode::serialize_hex;
use bitcoin::script::{Builder, PushBytesBuf};
use bitcoin::{OutPoint, Transaction, Txid, Witness};
use std::sync::Arc;
use tracing::debug;

/// Fully authorized transaction ready for broadcast.
#[derive(Debug, Clone)]
pub struct SignedTransaction {
    tx: Transaction,
}

impl SignedTransaction {
    pub fn tx(&self) -> &Transaction { &self.tx }
    pub fn txid(&self) -> Txid { self.tx.compute_txid() }
    /// Canonical wire encoding, hex.
    pub fn raw_hex(&self) -> String { serialize_hex(&self.tx) }
}

#[derive(Clone)]
pub struct TransactionSigner {
    key: SigningKey,
    chain: Arc<dyn ChainData>,
}

impl TransactionSigner {
    pub fn new(key: SigningKey, chain: Arc<dyn ChainData>) -> Self { Self { key, chain } }

    pub async fn sign(&self, unsigned: UnsignedTransaction) -> WalletResult<SignedTransaction> {
        let mut tx = unsigned.into_tx();
        for index in 0..tx.input.len() {
            let outpoint = tx.input[index].previous_output;
            self.resolve(&outpoint).await?;
            let prev = self.chain.prev_out(&outpoint.txid, outpoint.vout).await?;
            self.authorize_and_seal(&mut tx, index, &outpoint, &prev)?;
        }
        Ok(SignedTransaction { tx })
    }

    async fn resolve(&self, outpoint: &OutPoint) -> WalletResult<()> {
        if self.chain.is_spent(&outpoint.txid, outpoint.vout).await? {
            return Err(SigningError::AlreadySpent { txid: outpoint.txid.to_string(), vout: outpoint.vout }.into());
        }
        Ok(())
    }

    fn authorize_and_seal(&self, tx: &mut Transaction, index: usize, outpoint: &OutPoint, prev: &PrevOut) -> WalletResult<()> {
        let kind = classify_script(&prev.script_pubkey);
        let domain = kind.domain().ok_or_else(|| SigningError::UnsupportedScript {
            txid: outpoint.txid.to_string(),
            vout: outpoint.vout,
            script: prev.script_pubkey.to_hex_string(),
        })?;
        let family = self
            .key
            .owns_script(&prev.script_pubkey)
            .ok_or_else(|| SigningError::ForeignUtxo { txid: outpoint.txid.to_string(), vout: outpoint.vout })?;

        let digest = sighash(tx, index, &prev.script_pubkey, prev.value, domain)?;
        let signature = sign(self.key.private_key(), digest).to_vec();
        let pubkey = self.key.compressed_public_key().to_bytes();

        match domain {
            SighashDomain::Base => {
                let sig_push = PushBytesBuf::try_from(signature)
                    .map_err(|e| SigningError::Sighash { index, reason: e.to_string() })?;
                tx.input[index].script_sig = Builder::new()
                    .push_slice(sig_push)
                    .push_key(&self.key.public_key())
                    .into_script();
            }
            SighashDomain::WitnessV0 => {
                tx.input[index].witness = Witness::from_slice(&[signature, pubkey.to_vec()]);
            }
        }

        debug!(index, family = family.as_str(), "signed input");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::fake::FakeChain;
    use crate::chain::UnspentOutput;
    use crate::error::WalletError;
    use crate::money::Money;
    use crate::network::Network;
    use crate::wallet::builder::TransactionBuilder;
    use crate::wallet::fee::FeeEstimator;
    use bitcoin::ScriptBuf;

    const WIF: &str = "cMahea7zqjxrtgAbB7LSGbcQUr1uX1ojuat9jZodMN87JcbXMTcA";
    const DEST: &str = "tb1qrp33g0q5c5txsp9arysrx4k6zdkfs4nce4xj0gdcccefvpysxf3q0sl5k7";

    fn key() -> SigningKey { SigningKey::from_wif(WIF, Network::Signet).unwrap() }

    fn txid(n: u8) -> Txid { format!("{:02x}", n).repeat(32).parse().unwrap() }

    async fn sign_with(chain: FakeChain, utxos: &[UnspentOutput]) -> WalletResult<SignedTransaction> {
        let chain: Arc<dyn ChainData> = Arc::new(chain.with_fee(1));
        let key = key();
        let builder = TransactionBuilder::new(FeeEstimator::new(chain.clone()), Network::Signet, key.legacy_address().script_pubkey());
        let unsigned = builder.build(utxos, DEST, Money::btc(10_000)).await?;
        TransactionSigner::new(key, chain).sign(unsigned).await
    }

    /// Test: legacy and segwit inputs get script_sig and witness respectively
    #[tokio::test]
    async fn test_signs_both_families() {
        let k = key();
        let legacy = UnspentOutput::new(txid(1), 0, 30_000);
        let segwit = UnspentOutput::new(txid(2), 1, 40_000);
        let chain = FakeChain::default()
            .with_utxo("legacy", legacy.clone(), k.legacy_address().script_pubkey())
            .with_utxo("segwit", segwit.clone(), k.segwit_address().script_pubkey());

        let signed = sign_with(chain, &[legacy, segwit]).await.unwrap();
        let inputs = &signed.tx().input;

        assert!(!inputs[0].script_sig.is_empty());
        assert!(inputs[0].witness.is_empty());
        assert!(inputs[1].script_sig.is_empty());
        assert_eq!(inputs[1].witness.len(), 2);
        assert_eq!(inputs[1].witness.nth(1), Some(&k.compressed_public_key().to_bytes()[..]));
        assert_eq!(inputs[1].witness.nth(0).and_then(|s| s.last()), Some(&0x01));
        assert_eq!(signed.raw_hex().len() % 2, 0);
    }

    /// Recompute the input's digest from scratch and check the sealed signature against it.
    fn verifies(signed: &Transaction, index: usize, prev: &PrevOut, domain: SighashDomain) -> bool {
        use bitcoin::hashes::Hash;
        use bitcoin::script::Instruction;
        use bitcoin::secp256k1::{Message, Secp256k1};
        use bitcoin::sighash::{EcdsaSighashType, SighashCache};
        use bitcoin::{Amount, PublicKey};

        let mut bare = signed.clone();
        for input in &mut bare.input {
            input.script_sig = ScriptBuf::new();
            input.witness = Witness::new();
        }
        let mut cache = SighashCache::new(&bare);
        let digest = match domain {
            SighashDomain::Base => cache
                .legacy_signature_hash(index, &prev.script_pubkey, EcdsaSighashType::All.to_u32())
                .unwrap()
                .to_byte_array(),
            SighashDomain::WitnessV0 => cache
                .p2wpkh_signature_hash(index, &prev.script_pubkey, Amount::from_sat(prev.value), EcdsaSighashType::All)
                .unwrap()
                .to_byte_array(),
        };

        let input = &signed.input[index];
        let (sig, pk): (Vec<u8>, Vec<u8>) = if input.witness.is_empty() {
            let pushes: Vec<Vec<u8>> = input
                .script_sig
                .instructions()
                .filter_map(|i| match i.unwrap() {
                    Instruction::PushBytes(bytes) => Some(bytes.as_bytes().to_vec()),
                    Instruction::Op(_) => None,
                })
                .collect();
            assert_eq!(pushes.len(), 2);
            (pushes[0].clone(), pushes[1].clone())
        } else {
            (input.witness.nth(0).unwrap().to_vec(), input.witness.nth(1).unwrap().to_vec())
        };

        let sig = bitcoin::ecdsa::Signature::from_slice(&sig).unwrap();
        assert_eq!(sig.sighash_type, EcdsaSighashType::All);
        let pk = PublicKey::from_slice(&pk).unwrap();
        Secp256k1::verification_only()
            .verify_ecdsa(&Message::from_digest(digest), &sig.signature, &pk.inner)
            .is_ok()
    }

    /// Test: every sealed input carries a signature valid over its own digest
    #[tokio::test]
    async fn test_signatures_verify() {
        let k = key();
        let first = UnspentOutput::new(txid(10), 0, 30_000);
        let second = UnspentOutput::new(txid(11), 1, 40_000);
        let third = UnspentOutput::new(txid(12), 2, 20_000);
        let legacy = PrevOut { script_pubkey: k.legacy_address().script_pubkey(), value: 30_000 };
        let segwit = PrevOut { script_pubkey: k.segwit_address().script_pubkey(), value: 40_000 };
        let legacy_third = PrevOut { script_pubkey: k.legacy_address().script_pubkey(), value: 20_000 };
        let chain = FakeChain::default()
            .with_utxo("legacy", first.clone(), legacy.script_pubkey.clone())
            .with_utxo("segwit", second.clone(), segwit.script_pubkey.clone())
            .with_utxo("legacy", third.clone(), legacy_third.script_pubkey.clone());

        let signed = sign_with(chain, &[first, second, third]).await.unwrap();
        let tx = signed.tx();
        assert!(verifies(tx, 0, &legacy, SighashDomain::Base));
        assert!(verifies(tx, 1, &segwit, SighashDomain::WitnessV0));
        assert!(verifies(tx, 2, &legacy_third, SighashDomain::Base));

        // segwit commits to the spent amount
        let wrong_value = PrevOut { value: 40_001, ..segwit.clone() };
        assert!(!verifies(tx, 1, &wrong_value, SighashDomain::WitnessV0));

        // legacy signatures are bound to their input position
        let mut swapped = tx.clone();
        swapped.input[0].script_sig = tx.input[2].script_sig.clone();
        swapped.input[2].script_sig = tx.input[0].script_sig.clone();
        assert!(!verifies(&swapped, 0, &legacy, SighashDomain::Base));
    }

    /// Test: identical inputs produce byte-identical output
    #[tokio::test]
    async fn test_deterministic() {
        let k = key();
        let utxo = UnspentOutput::new(txid(3), 0, 50_000);
        let make = || FakeChain::default().with_utxo("a", utxo.clone(), k.segwit_address().script_pubkey());
        let a = sign_with(make(), &[utxo.clone()]).await.unwrap();
        let b = sign_with(make(), &[utxo.clone()]).await.unwrap();
        assert_eq!(a.raw_hex(), b.raw_hex());
        assert_eq!(a.txid(), b.txid());
    }

    /// Test: a script paying someone else is never signed
    #[tokio::test]
    async fn test_refuses_foreign_utxo() {
        let other = SigningKey::generate(Network::Signet).unwrap();
        let utxo = UnspentOutput::new(txid(4), 2, 50_000);
        let chain = FakeChain::default().with_utxo("other", utxo.clone(), other.segwit_address().script_pubkey());

        let err = sign_with(chain, &[utxo]).await.unwrap_err();
        assert!(matches!(err, WalletError::Signing(SigningError::ForeignUtxo { vout: 2, .. })));
        assert!(err.to_string().contains("cannot sign foreign UTXO"));
    }

    /// Test: one foreign input aborts the whole transaction
    #[tokio::test]
    async fn test_foreign_after_owned_aborts() {
        let k = key();
        let other = SigningKey::generate(Network::Signet).unwrap();
        let mine = UnspentOutput::new(txid(5), 0, 30_000);
        let theirs = UnspentOutput::new(txid(6), 0, 30_000);
        let chain = FakeChain::default()
            .with_utxo("mine", mine.clone(), k.legacy_address().script_pubkey())
            .with_utxo("theirs", theirs.clone(), other.legacy_address().script_pubkey());
        assert!(matches!(
            sign_with(chain, &[mine, theirs]).await,
            Err(WalletError::Signing(SigningError::ForeignUtxo { .. }))
        ));
    }

    #[tokio::test]
    async fn test_already_spent() {
        let k = key();
        let utxo = UnspentOutput::new(txid(7), 0, 50_000);
        let chain = FakeChain::default()
            .with_utxo("a", utxo.clone(), k.legacy_address().script_pubkey())
            .with_spent(txid(7), 0);
        let err = sign_with(chain, &[utxo]).await.unwrap_err();
        assert!(matches!(err, WalletError::Signing(SigningError::AlreadySpent { .. })));
        assert!(err.to_string().contains("already spent"));
    }

    #[tokio::test]
    async fn test_unsupported_script() {
        let utxo = UnspentOutput::new(txid(8), 0, 50_000);
        let p2sh = ScriptBuf::from_hex("a914751e76e8199196d454941c45d1b3a323f1433bd687").unwrap();
        let chain = FakeChain::default().with_utxo("a", utxo.clone(), p2sh);
        assert!(matches!(
            sign_with(chain, &[utxo]).await,
            Err(WalletError::Signing(SigningError::UnsupportedScript { .. }))
        ));
    }

    /// Test: enrichment failure surfaces as data-unavailable
    #[tokio::test]
    async fn test_missing_prevout() {
        let utxo = UnspentOutput::new(txid(9), 0, 50_000);
        let result = sign_with(FakeChain::default(), &[utxo]).await;
        assert!(matches!(result, Err(WalletError::DataUnavailable(_))));
    }
}
