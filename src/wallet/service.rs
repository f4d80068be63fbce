//! Wallet - façade wiring key, chain data, fees, builder, signer and broadcaster.

use super::broadcast::Broadcaster;
use super::builder::{TransactionBuilder, UnsignedTransaction};
use super::fee::{self, FeeEstimator};
use super::key::{AddressFamily, SigningKey};
use super::keystore::KeyStore;
use super::signer::{SignedTransaction, TransactionSigner};
use crate::chain::{ChainData, MempoolClient, UnspentOutput};
use crate::config::WalletConfig;
use crate::error::WalletResult;
use crate::money::{Currency, Money};
use crate::network::Network;
use bitcoin::Address;
use std::sync::Arc;
use tracing::info;

pub struct Wallet {
    key: SigningKey,
    network: Network,
    chain: Arc<dyn ChainData>,
    fees: FeeEstimator,
    builder: TransactionBuilder,
    signer: TransactionSigner,
    broadcaster: Broadcaster,
}

impl Wallet {
    /// Load or create the key from the configured store, talk to the configured service.
    pub fn open(config: &WalletConfig) -> WalletResult<Self> {
        let key = KeyStore::from_config(config).ensure_key_file()?;
        let chain: Arc<dyn ChainData> = Arc::new(MempoolClient::from_config(config));
        info!(network = %config.network, api = %config.api_base(), "wallet opened");
        Ok(Self::new(key, chain, config.network))
    }

    pub fn new(key: SigningKey, chain: Arc<dyn ChainData>, network: Network) -> Self {
        let fees = FeeEstimator::new(chain.clone());
        let builder = TransactionBuilder::new(fees.clone(), network, key.legacy_address().script_pubkey());
        let signer = TransactionSigner::new(key.clone(), chain.clone());
        let broadcaster = Broadcaster::new(chain.clone());
        Self { key, network, chain, fees, builder, signer, broadcaster }
    }

    pub fn network(&self) -> Network { self.network }
    pub fn key(&self) -> &SigningKey { &self.key }
    pub fn legacy_address(&self) -> Address { self.key.legacy_address() }
    pub fn segwit_address(&self) -> Address { self.key.segwit_address() }

    /// Legacy first, then segwit.
    pub fn addresses(&self) -> [Address; 2] {
        [self.key.address_of(AddressFamily::Legacy), self.key.address_of(AddressFamily::Segwit)]
    }

    /// Sum of unspent output values at one address; zero when there are none.
    pub async fn balance_of(&self, address: &str) -> WalletResult<Money> {
        let utxos = self.chain.list_utxos(address).await?;
        sum_values(&utxos)
    }

    /// Balance across both owned addresses.
    pub async fn balance(&self) -> WalletResult<Money> {
        sum_values(&self.spendable_utxos().await?)
    }

    /// The service's cumulative funded counter. Not a balance: spent outputs still count.
    pub async fn funded_total(&self, address: &str) -> WalletResult<Money> {
        Money::from_sat(self.chain.funded_total(address).await?)
    }

    /// Legacy UTXOs then segwit UTXOs, each in service order.
    pub async fn spendable_utxos(&self) -> WalletResult<Vec<UnspentOutput>> {
        let mut utxos = Vec::new();
        for address in self.addresses() {
            let found = self.chain.list_utxos(&address.to_string()).await?;
            info!(%address, count = found.len(), "listed utxos");
            utxos.extend(found);
        }
        Ok(utxos)
    }

    pub async fn miner_fee(&self, inputs: usize, outputs: usize) -> WalletResult<Money> {
        self.fees.estimate(inputs, outputs).await
    }

    /// Fee for an explicit rate and shape, without a service round-trip.
    pub fn miner_fee_at(rate: Money, inputs: usize, outputs: usize) -> WalletResult<Money> {
        fee::miner_fee(rate, inputs, outputs)
    }

    pub async fn build_transaction(&self, utxos: &[UnspentOutput], destination: &str, amount: Money) -> WalletResult<UnsignedTransaction> {
        self.builder.build(utxos, destination, amount).await
    }

    pub async fn sign_transaction(&self, unsigned: UnsignedTransaction) -> WalletResult<SignedTransaction> {
        self.signer.sign(unsigned).await
    }

    pub async fn broadcast_transaction(&self, signed: &SignedTransaction) -> WalletResult<String> {
        self.broadcaster.submit(signed).await
    }

    /// Spend every owned UTXO: `amount` to `destination`, the rest minus fee back to the legacy address.
    pub async fn send(&self, amount: Money, destination: &str) -> WalletResult<String> {
        let utxos = self.spendable_utxos().await?;
        let unsigned = self.build_transaction(&utxos, destination, amount).await?;
        info!(amount = %unsigned.amount(), fee = %unsigned.fee(), change = %unsigned.change(), %destination, "sending");
        let signed = self.sign_transaction(unsigned).await?;
        self.broadcast_transaction(&signed).await
    }
}

fn sum_values(utxos: &[UnspentOutput]) -> WalletResult<Money> {
    let values = utxos.iter().map(|u| Money::from_sat(u.value)).collect::<WalletResult<Vec<_>>>()?;
    Money::sum(Currency::BTC, values)
}
