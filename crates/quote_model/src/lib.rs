//! Quote Model - Exact constant product quote math (x·y=k)
//!
//! This crate holds the arithmetic the pool contract performs on-chain,
//! reproduced off-chain with unbounded integers so results match bit for bit:
//! decimal/base-unit conversion and the fee-on-input swap formula.
//!
//! Nothing here performs I/O. The CLI crate fetches pool state and feeds it in.

pub mod swap;
pub mod types;
pub mod units;

pub use swap::{
    order_reserves, order_reserves_checked, price_impact_bps, quote, quote_checked, spot_output,
};
pub use types::{Address, FeeRate, PoolReserves, RawAmount, SwapQuote, TokenDescriptor};
pub use units::{to_raw, to_readable, DecimalAmount};

use thiserror::Error;

/// Basis points scale (10,000 bps = 100%)
pub const BPS_SCALE: u32 = 10_000;

/// Placeholder symbol for tokens whose `symbol()` cannot be read
pub const UNKNOWN_SYMBOL: &str = "UNKNOWN";

/// Error types for quote operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuoteError {
    /// Formula denominator is zero (empty input reserve and zero input)
    #[error("division by zero: input reserve and input amount are both zero")]
    DivisionByZero,
    /// One of the pool reserves is zero
    #[error("pool has an empty reserve (reserve in: {reserve_in}, reserve out: {reserve_out})")]
    EmptyReserves {
        reserve_in: RawAmount,
        reserve_out: RawAmount,
    },
    /// Token is neither of the pool's two assets
    #[error("token {token} is not one of the pool assets ({first}, {second})")]
    TokenNotInPool {
        token: Address,
        first: Address,
        second: Address,
    },
    /// Input and output token are the same asset
    #[error("input and output token are the same ({0})")]
    SameToken(Address),
    /// Fee fraction is not in (0, 1]
    #[error("invalid fee rate {numerator}/{denominator}")]
    InvalidFee { numerator: u32, denominator: u32 },
    /// Fee text is not of the form `numerator/denominator`
    #[error("invalid fee rate {0:?}: expected numerator/denominator, e.g. 997/1000")]
    InvalidFeeText(String),
    /// Text is not a non-negative decimal number
    #[error("invalid amount: {0:?}")]
    InvalidAmount(String),
}
