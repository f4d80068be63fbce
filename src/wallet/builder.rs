//! TransactionBuilder - spend every supplied UTXO to destination + change.
//!
//! ```text
//! inputs:  utxo[0], utxo[1], ... (caller order, no selection)
//! outputs: [0] amount -> destination
//!          [1] total - amount - fee -> wallet legacy address (always, even 0)
//! ```

use super::fee::FeeEstimator;
use super::primitives::script_for_address;
use crate::chain::UnspentOutput;
use crate::error::{WalletError, WalletResult};
use crate::money::{Currency, Money};
use crate::network::Network;
use bitcoin::absolute::LockTime;
use bitcoin::transaction::Version;
use bitcoin::{ScriptBuf, Sequence, Transaction, TxIn, TxOut, Witness};
use tracing::debug;

/// Destination plus change.
pub const OUTPUT_COUNT: usize = 2;

/// Built but not yet authorized. Only the per-input script_sig/witness changes when signed.
#[derive(Debug, Clone)]
pub struct UnsignedTransaction {
    tx: Transaction,
    total_input_value: Money,
    amount: Money,
    fee: Money,
    change: Money,
}

impl UnsignedTransaction {
    pub fn tx(&self) -> &Transaction { &self.tx }
    pub fn total_input_value(&self) -> Money { self.total_input_value }
    pub fn amount(&self) -> Money { self.amount }
    pub fn fee(&self) -> Money { self.fee }
    pub fn change(&self) -> Money { self.change }
    pub fn outputs(&self) -> &[TxOut] { &self.tx.output }

    pub(crate) fn into_tx(self) -> Transaction { self.tx }
}

#[derive(Clone)]
pub struct TransactionBuilder {
    fees: FeeEstimator,
    network: Network,
    change_script: ScriptBuf,
}

impl TransactionBuilder {
    pub fn new(fees: FeeEstimator, network: Network, change_script: ScriptBuf) -> Self {
        Self { fees, network, change_script }
    }

    pub async fn build(&self, utxos: &[UnspentOutput], destination: &str, amount: Money) -> WalletResult<UnsignedTransaction> {
        let amount = amount.require_currency(Currency::BTC)?;
        if amount.is_negative() {
            return Err(WalletError::InvalidAmount(format!("amount must not be negative, got {}", amount)));
        }
        let destination_script = script_for_address(destination, self.network)?;

        let fee = self.fees.estimate(utxos.len(), OUTPUT_COUNT).await?;
        let values = utxos.iter().map(|u| Money::from_sat(u.value)).collect::<WalletResult<Vec<_>>>()?;
        let total = Money::sum(Currency::BTC, values)?;
        let change = total.checked_sub(amount)?.checked_sub(fee)?;
        if change.is_negative() {
            return Err(WalletError::InsufficientFunds { amount, fee, available: total });
        }

        let input = utxos
            .iter()
            .map(|u| TxIn {
                previous_output: u.outpoint(),
                script_sig: ScriptBuf::new(),
                sequence: Sequence::MAX,
                witness: Witness::new(),
            })
            .collect();
        let output = vec![
            TxOut { value: amount.to_amount()?, script_pubkey: destination_script },
            TxOut { value: change.to_amount()?, script_pubkey: self.change_script.clone() },
        ];
        let tx = Transaction { version: Version::TWO, lock_time: LockTime::ZERO, input, output };

        debug!(inputs = utxos.len(), total = %total, amount = %amount, fee = %fee, change = %change, "built transaction");
        Ok(UnsignedTransaction { tx, total_input_value: total, amount, fee, change })
    }
}
