//! Data model shared by the converter, the swap engine and the CLI

use std::fmt;
use std::str::FromStr;

use num_bigint::BigUint;

pub use alloy_primitives::Address;

use crate::units::DecimalAmount;
use crate::{QuoteError, BPS_SCALE};

/// Token quantity in base units (already scaled by `10^decimals`)
pub type RawAmount = BigUint;

/// Proportion of the input kept after the pool fee, as `numerator / denominator`
///
/// 997/1000 is the 0.30% tier. Kept as a value rather than baked into the
/// formula so other pool classes can pass their own tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeRate {
    numerator: u32,
    denominator: u32,
}

impl FeeRate {
    /// Uniswap V2 pairs: 0.30% fee
    pub const UNISWAP_V2: FeeRate = FeeRate {
        numerator: 997,
        denominator: 1000,
    };

    pub fn new(numerator: u32, denominator: u32) -> Result<Self, QuoteError> {
        if denominator == 0 || numerator == 0 || numerator > denominator {
            return Err(QuoteError::InvalidFee {
                numerator,
                denominator,
            });
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }

    pub fn numerator(&self) -> u32 {
        self.numerator
    }

    pub fn denominator(&self) -> u32 {
        self.denominator
    }

    /// Fee taken by the pool in basis points, rounded down
    pub fn fee_bps(&self) -> u32 {
        let taken = u64::from(self.denominator - self.numerator);
        (taken * u64::from(BPS_SCALE) / u64::from(self.denominator)) as u32
    }
}

impl Default for FeeRate {
    fn default() -> Self {
        Self::UNISWAP_V2
    }
}

impl FromStr for FeeRate {
    type Err = QuoteError;

    /// Parses `"997/1000"`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || QuoteError::InvalidFeeText(s.to_string());
        let (num, den) = s.trim().split_once('/').ok_or_else(bad)?;
        let numerator = num.trim().parse::<u32>().map_err(|_| bad())?;
        let denominator = den.trim().parse::<u32>().map_err(|_| bad())?;
        Self::new(numerator, denominator)
    }
}

impl fmt::Display for FeeRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

/// Result of the pair's `getReserves()`, in the pool's own token order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolReserves {
    pub reserve_first: RawAmount,
    pub reserve_second: RawAmount,
    pub last_update_timestamp: u32,
}

/// Token metadata read once per quote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenDescriptor {
    pub address: Address,
    pub decimals: u8,
    pub symbol: String,
}

/// Output of one quote run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapQuote {
    pub raw_output: RawAmount,
    pub readable_output: DecimalAmount,
    pub output_symbol: String,
}
