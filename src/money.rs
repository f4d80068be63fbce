//! Money - currency-tagged integer amounts.
//!
//! Values are whole minor units (satoshis for BTC). Arithmetic across currencies
//! fails instead of converting. Negative results are allowed so callers can
//! detect shortfalls, but [`Money::to_amount`] refuses them.

use crate::error::{WalletError, WalletResult};
use bitcoin::Amount;

pub const SATS_PER_BTC: i64 = 100_000_000;

/// Three-letter currency code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Currency([u8; 3]);

impl Currency {
    pub const BTC: Currency = Currency(*b"BTC");

    pub fn new(code: &str) -> WalletResult<Self> {
        let bytes = code.as_bytes();
        if bytes.len() != 3 || !bytes.iter().all(|b| b.is_ascii_uppercase()) {
            return Err(WalletError::InvalidAmount(format!("unknown currency code '{}'", code)));
        }
        Ok(Self([bytes[0], bytes[1], bytes[2]]))
    }

    pub fn code(&self) -> &str {
        // Constructed only from ASCII uppercase
        std::str::from_utf8(&self.0).unwrap_or("???")
    }

    pub fn decimals(&self) -> u32 {
        if *self == Self::BTC { 8 } else { 2 }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Money {
    minor_units: i64,
    currency: Currency,
}

impl Money {
    pub fn new(minor_units: i64, currency: Currency) -> Self {
        Self { minor_units, currency }
    }

    pub fn btc(sats: i64) -> Self {
        Self::new(sats, Currency::BTC)
    }

    pub fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    /// BTC amount from an unsigned satoshi count (UTXO values, fee rates).
    pub fn from_sat(sats: u64) -> WalletResult<Self> {
        i64::try_from(sats)
            .map(Self::btc)
            .map_err(|_| WalletError::InvalidAmount(format!("{} sats overflows", sats)))
    }

    /// Parse a decimal BTC string such as `0.0005` exactly, without floats.
    pub fn from_btc_str(input: &str) -> WalletResult<Self> {
        let s = input.trim();
        let invalid = || WalletError::InvalidAmount(format!("'{}' is not a BTC amount", input));
        let (whole, frac) = s.split_once('.').unwrap_or((s, ""));
        if whole.is_empty() && frac.is_empty() {
            return Err(invalid());
        }
        if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        if frac.len() > 8 {
            return Err(WalletError::InvalidAmount(format!("'{}' has more than 8 decimal places", input)));
        }
        let whole: i64 = if whole.is_empty() { 0 } else { whole.parse().map_err(|_| invalid())? };
        let frac: i64 = if frac.is_empty() { 0 } else { format!("{:0<8}", frac).parse().map_err(|_| invalid())? };
        whole
            .checked_mul(SATS_PER_BTC)
            .and_then(|w| w.checked_add(frac))
            .map(Self::btc)
            .ok_or_else(invalid)
    }

    pub fn minor_units(&self) -> i64 { self.minor_units }
    pub fn currency(&self) -> Currency { self.currency }
    pub fn is_negative(&self) -> bool { self.minor_units < 0 }

    /// Validated factory for boundaries that only accept one currency.
    pub fn require_currency(self, currency: Currency) -> WalletResult<Self> {
        if self.currency != currency {
            return Err(WalletError::InvalidAmount(format!(
                "currency must be {}, got {}",
                currency, self.currency
            )));
        }
        Ok(self)
    }

    pub fn checked_add(self, other: Money) -> WalletResult<Money> {
        self.same_currency(&other)?;
        self.minor_units
            .checked_add(other.minor_units)
            .map(|v| Self::new(v, self.currency))
            .ok_or_else(|| WalletError::InvalidAmount(format!("{} + {} overflows", self, other)))
    }

    pub fn checked_sub(self, other: Money) -> WalletResult<Money> {
        self.same_currency(&other)?;
        self.minor_units
            .checked_sub(other.minor_units)
            .map(|v| Self::new(v, self.currency))
            .ok_or_else(|| WalletError::InvalidAmount(format!("{} - {} overflows", self, other)))
    }

    pub fn times(self, factor: u64) -> WalletResult<Money> {
        i64::try_from(factor)
            .ok()
            .and_then(|f| self.minor_units.checked_mul(f))
            .map(|v| Self::new(v, self.currency))
            .ok_or_else(|| WalletError::InvalidAmount(format!("{} * {} overflows", self, factor)))
    }

    /// Sum of zero or more amounts; zero for an empty iterator.
    pub fn sum<I: IntoIterator<Item = Money>>(currency: Currency, items: I) -> WalletResult<Money> {
        items.into_iter().try_fold(Self::zero(currency), |acc, m| acc.checked_add(m))
    }

    /// Convert to an on-chain output value. Negative or non-BTC amounts never reach a transaction.
    pub fn to_amount(self) -> WalletResult<Amount> {
        let sats = self.require_currency(Currency::BTC)?.minor_units;
        u64::try_from(sats)
            .map(Amount::from_sat)
            .map_err(|_| WalletError::InvalidAmount(format!("negative output value {}", self)))
    }

    fn same_currency(&self, other: &Money) -> WalletResult<()> {
        if self.currency != other.currency {
            return Err(WalletError::InvalidAmount(format!(
                "currency mismatch: {} vs {}",
                self.currency, other.currency
            )));
        }
        Ok(())
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let decimals = self.currency.decimals();
        let scale = 10i128.pow(decimals);
        let value = self.minor_units as i128;
        let sign = if value < 0 { "-" } else { "" };
        let abs = value.abs();
        write!(
            f,
            "{}{}.{:0width$} {}",
            sign,
            abs / scale,
            abs % scale,
            self.currency,
            width = decimals as usize
        )
    }
}
