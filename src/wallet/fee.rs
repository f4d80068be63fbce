//! FeeEstimator - recommended rate times an estimated virtual size.
//!
//! The rate is fetched fresh on every call. When it cannot be fetched the
//! estimate fails; no fallback rate is ever substituted.

use crate::chain::ChainData;
use crate::error::WalletResult;
use crate::money::Money;
use std::sync::Arc;
use tracing::debug;

pub const BASE_VBYTES: u64 = 10;
pub const INPUT_VBYTES: u64 = 68;
pub const OUTPUT_VBYTES: u64 = 31;

/// `10 + 68 * inputs + 31 * outputs`
pub fn estimate_vbytes(inputs: usize, outputs: usize) -> u64 {
    BASE_VBYTES + INPUT_VBYTES * inputs as u64 + OUTPUT_VBYTES * outputs as u64
}

/// Fee for a transaction shape at `rate` per vbyte.
pub fn miner_fee(rate: Money, inputs: usize, outputs: usize) -> WalletResult<Money> {
    FeeQuote { rate, vbytes: estimate_vbytes(inputs, outputs) }.fee()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeQuote {
    /// Per virtual byte.
    pub rate: Money,
    pub vbytes: u64,
}

impl FeeQuote {
    pub fn fee(&self) -> WalletResult<Money> { self.rate.times(self.vbytes) }
}

#[derive(Clone)]
pub struct FeeEstimator {
    chain: Arc<dyn ChainData>,
}

impl FeeEstimator {
    pub fn new(chain: Arc<dyn ChainData>) -> Self { Self { chain } }

    pub async fn quote(&self, inputs: usize, outputs: usize) -> WalletResult<FeeQuote> {
        let fees = self.chain.recommended_fees().await?;
        let quote = FeeQuote { rate: Money::from_sat(fees.hour_fee)?, vbytes: estimate_vbytes(inputs, outputs) };
        debug!(rate = fees.hour_fee, vbytes = quote.vbytes, "fee quote");
        Ok(quote)
    }

    pub async fn estimate(&self, inputs: usize, outputs: usize) -> WalletResult<Money> {
        self.quote(inputs, outputs).await?.fee()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::fake::FakeChain;
    use crate::error::WalletError;

    #[test]
    fn test_vbyte_model() {
        assert_eq!(estimate_vbytes(1, 2), 140);
        assert_eq!(estimate_vbytes(4, 2), 344);
        assert_eq!(estimate_vbytes(0, 0), 10);
    }

    #[test]
    fn test_miner_fee() {
        assert_eq!(miner_fee(Money::btc(1), 4, 2).unwrap(), Money::btc(344));
        assert_eq!(miner_fee(Money::btc(3), 1, 2).unwrap(), Money::btc(420));
    }

    #[tokio::test]
    async fn test_estimate_uses_hour_fee() {
        let estimator = FeeEstimator::new(Arc::new(FakeChain::default().with_fee(2)));
        let quote = estimator.quote(1, 2).await.unwrap();
        assert_eq!(quote.rate, Money::btc(2));
        assert_eq!(quote.vbytes, 140);
        assert_eq!(estimator.estimate(1, 2).await.unwrap(), Money::btc(280));
    }

    #[tokio::test]
    async fn test_unavailable_rate_is_an_error() {
        let estimator = FeeEstimator::new(Arc::new(FakeChain::default()));
        assert!(matches!(estimator.estimate(1, 2).await, Err(WalletError::DataUnavailable(_))));
    }
}
