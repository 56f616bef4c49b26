//! # Amount Normalization
//!
//! Converts display decimals to a chain's native integer unit and back.
//! Each adapter owns a normalizer bound to its own `decimals`.

use crate::domain::{AmountError, SwapError};
use rust_decimal::Decimal;

/// Largest scale `Decimal` can represent.
pub const MAX_DECIMALS: u32 = 28;

/// Decimal <-> native unit conversion for one chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AmountNormalizer {
    decimals: u32,
}

impl AmountNormalizer {
    /// Create a normalizer for a chain with `decimals` fractional digits.
    pub fn new(decimals: u32) -> Result<Self, SwapError> {
        if decimals > MAX_DECIMALS {
            return Err(SwapError::InvalidConfig(format!(
                "decimals {decimals} exceeds {MAX_DECIMALS}"
            )));
        }
        Ok(Self { decimals })
    }

    /// Fractional digits of the native unit.
    pub fn decimals(&self) -> u32 {
        self.decimals
    }

    /// Scale a display amount to native units.
    ///
    /// Rejects zero and negative amounts and anything finer than one native
    /// unit; never rounds.
    pub fn to_native(&self, amount: Decimal) -> Result<u128, AmountError> {
        if amount <= Decimal::ZERO {
            return Err(AmountError::NonPositive);
        }

        let normalized = amount.normalize();
        let scale = normalized.scale();
        if scale > self.decimals {
            return Err(AmountError::PrecisionLoss {
                decimals: self.decimals,
            });
        }

        let mantissa = u128::try_from(normalized.mantissa()).map_err(|_| AmountError::Overflow)?;
        let factor = 10u128
            .checked_pow(self.decimals - scale)
            .ok_or(AmountError::Overflow)?;
        mantissa.checked_mul(factor).ok_or(AmountError::Overflow)
    }

    /// Parse display text and scale it to native units.
    pub fn parse_to_native(&self, text: &str) -> Result<u128, AmountError> {
        let amount = Decimal::from_str_exact(text.trim())
            .map_err(|e| AmountError::Malformed(e.to_string()))?;
        self.to_native(amount)
    }

    /// Convert native units back to a display amount.
    pub fn from_native(&self, amount: u128) -> Result<Decimal, AmountError> {
        let mantissa = i128::try_from(amount).map_err(|_| AmountError::Overflow)?;
        Decimal::try_from_i128_with_scale(mantissa, self.decimals)
            .map(|d| d.normalize())
            .map_err(|_| AmountError::Overflow)
    }
}
