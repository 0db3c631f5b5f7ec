//! Constant product swap math (x·y=k) with the fee taken on the input leg
//!
//! Mirrors the pair contract's `getAmountOut`:
//! - amount_in_with_fee = Δx · fee.num
//! - Δy = (y · amount_in_with_fee) / (x · fee.den + amount_in_with_fee)
//!
//! Every product is computed on unbounded integers and the single division
//! truncates, exactly like the EVM's `DIV` on non-negative operands.

use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};

use crate::types::{Address, FeeRate, PoolReserves, RawAmount};
use crate::{QuoteError, BPS_SCALE};

/// Raw output for selling `amount_in` into a pool with `reserve_in`/`reserve_out`
///
/// # Errors
/// * `DivisionByZero` when `reserve_in == 0` and `amount_in == 0`
pub fn quote(
    reserve_in: &RawAmount,
    reserve_out: &RawAmount,
    amount_in: &RawAmount,
    fee: FeeRate,
) -> Result<RawAmount, QuoteError> {
    let amount_in_with_fee = amount_in * fee.numerator();
    let numerator = reserve_out * &amount_in_with_fee;
    let denominator = reserve_in * fee.denominator() + &amount_in_with_fee;

    if denominator.is_zero() {
        return Err(QuoteError::DivisionByZero);
    }

    Ok(numerator / denominator)
}

/// Same as [`quote`], but refuses pools with an empty reserve
///
/// With `reserve_in == 0` the formula hands out the entire opposite reserve,
/// and with `reserve_out == 0` it always returns zero. Neither is a price.
pub fn quote_checked(
    reserve_in: &RawAmount,
    reserve_out: &RawAmount,
    amount_in: &RawAmount,
    fee: FeeRate,
) -> Result<RawAmount, QuoteError> {
    if reserve_in.is_zero() || reserve_out.is_zero() {
        if reserve_in.is_zero() && amount_in.is_zero() {
            return Err(QuoteError::DivisionByZero);
        }
        return Err(QuoteError::EmptyReserves {
            reserve_in: reserve_in.clone(),
            reserve_out: reserve_out.clone(),
        });
    }
    quote(reserve_in, reserve_out, amount_in, fee)
}

/// `(reserve_in, reserve_out)` for a trade selling `input_token`
///
/// If `input_token` is the pool's first asset the reserves are returned as
/// stored, otherwise swapped. An address that belongs to neither asset is
/// treated as the second one; use [`order_reserves_checked`] to reject it.
pub fn order_reserves<'a>(
    pool_first: &Address,
    input_token: &Address,
    reserves: &'a PoolReserves,
) -> (&'a RawAmount, &'a RawAmount) {
    if input_token == pool_first {
        (&reserves.reserve_first, &reserves.reserve_second)
    } else {
        (&reserves.reserve_second, &reserves.reserve_first)
    }
}

/// [`order_reserves`] after checking both tokens are the pool's two assets
pub fn order_reserves_checked<'a>(
    pool_first: &Address,
    pool_second: &Address,
    input_token: &Address,
    output_token: &Address,
    reserves: &'a PoolReserves,
) -> Result<(&'a RawAmount, &'a RawAmount), QuoteError> {
    if input_token == output_token {
        return Err(QuoteError::SameToken(*input_token));
    }
    for token in [input_token, output_token] {
        if token != pool_first && token != pool_second {
            return Err(QuoteError::TokenNotInPool {
                token: *token,
                first: *pool_first,
                second: *pool_second,
            });
        }
    }
    Ok(order_reserves(pool_first, input_token, reserves))
}

/// Output at the marginal (pre-trade) price, fee applied, no curve slippage
///
/// `amount_in_with_fee · y / (x · fee.den)`, or zero for an empty input reserve.
pub fn spot_output(
    reserve_in: &RawAmount,
    reserve_out: &RawAmount,
    amount_in: &RawAmount,
    fee: FeeRate,
) -> RawAmount {
    let denominator = reserve_in * fee.denominator();
    if denominator.is_zero() {
        return BigUint::zero();
    }
    amount_in * fee.numerator() * reserve_out / denominator
}

/// Shortfall of `actual` versus `spot` in basis points, rounded down
pub fn price_impact_bps(spot: &RawAmount, actual: &RawAmount) -> u32 {
    if spot.is_zero() || actual >= spot {
        return 0;
    }
    let impact: BigUint = (spot - actual) * BPS_SCALE / spot;
    impact.to_u32().unwrap_or(BPS_SCALE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn big(v: u128) -> BigUint {
        BigUint::from(v)
    }

    fn addr(byte: u8) -> Address {
        Address::repeat_byte(byte)
    }

    fn reserves(first: u128, second: u128) -> PoolReserves {
        PoolReserves {
            reserve_first: big(first),
            reserve_second: big(second),
            last_update_timestamp: 1_700_000_000,
        }
    }

    #[test]
    fn test_quote_reference_scenario() {
        // 0.1% of a 1e12 reserve into a 2e6 reserve at 0.30%
        let out = quote(
            &big(1_000_000_000_000),
            &big(2_000_000),
            &big(1_000_000_000),
            FeeRate::UNISWAP_V2,
        )
        .unwrap();
        assert_eq!(out, big(1992));
    }

    #[test]
    fn test_quote_zero_input() {
        let out = quote(&big(5_000), &big(7_000), &big(0), FeeRate::UNISWAP_V2).unwrap();
        assert!(out.is_zero());
    }

    #[test]
    fn test_quote_degenerate_pool() {
        let result = quote(&big(0), &big(7_000), &big(0), FeeRate::UNISWAP_V2);
        assert_eq!(result, Err(QuoteError::DivisionByZero));
    }

    #[test]
    fn test_quote_beyond_256_bits() {
        // reserve × fee × amount well past 2^256
        let huge = BigUint::from(u128::MAX) * BigUint::from(u128::MAX);
        let out = quote(&huge, &huge, &huge, FeeRate::UNISWAP_V2).unwrap();
        let expected = &huge * 997u32 * &huge / (&huge * 1000u32 + &huge * 997u32);
        assert_eq!(out, expected);
        assert!(out < huge);
    }

    #[test]
    fn test_quote_checked_empty_pool() {
        let fee = FeeRate::UNISWAP_V2;
        assert!(matches!(
            quote_checked(&big(0), &big(10), &big(5), fee),
            Err(QuoteError::EmptyReserves { .. })
        ));
        assert!(matches!(
            quote_checked(&big(10), &big(0), &big(5), fee),
            Err(QuoteError::EmptyReserves { .. })
        ));
        assert_eq!(
            quote_checked(&big(0), &big(10), &big(0), fee),
            Err(QuoteError::DivisionByZero)
        );
        assert_eq!(
            quote_checked(&big(1_000_000_000_000), &big(2_000_000), &big(1_000_000_000), fee),
            Ok(big(1992))
        );
    }

    #[test]
    fn test_custom_fee_tier() {
        // 0.25% tier gives slightly more than 0.30%
        let fee = FeeRate::new(9975, 10_000).unwrap();
        let a = quote(&big(1_000_000), &big(1_000_000), &big(10_000), fee).unwrap();
        let b = quote(&big(1_000_000), &big(1_000_000), &big(10_000), FeeRate::UNISWAP_V2).unwrap();
        assert!(a >= b);
        assert_eq!(b, big(9871));
    }

    #[test]
    fn test_order_reserves_symmetry() {
        let r = reserves(100, 200);
        let (first, second) = (addr(1), addr(2));
        assert_eq!(order_reserves(&first, &first, &r), (&big(100), &big(200)));
        assert_eq!(order_reserves(&first, &second, &r), (&big(200), &big(100)));
    }

    #[test]
    fn test_order_reserves_unrelated_token_falls_through() {
        let r = reserves(100, 200);
        assert_eq!(order_reserves(&addr(1), &addr(9), &r), (&big(200), &big(100)));
    }

    #[test]
    fn test_order_reserves_checked() {
        let r = reserves(100, 200);
        let (first, second) = (addr(1), addr(2));
        assert_eq!(
            order_reserves_checked(&first, &second, &second, &first, &r).unwrap(),
            (&big(200), &big(100))
        );
        assert!(matches!(
            order_reserves_checked(&first, &second, &addr(9), &first, &r),
            Err(QuoteError::TokenNotInPool { .. })
        ));
        assert!(matches!(
            order_reserves_checked(&first, &second, &first, &addr(9), &r),
            Err(QuoteError::TokenNotInPool { .. })
        ));
        assert_eq!(
            order_reserves_checked(&first, &second, &first, &first, &r),
            Err(QuoteError::SameToken(first))
        );
    }

    #[test]
    fn test_spot_and_impact() {
        let (x, y, dx) = (big(1_000_000_000_000), big(2_000_000), big(1_000_000_000));
        let spot = spot_output(&x, &y, &dx, FeeRate::UNISWAP_V2);
        assert_eq!(spot, big(1994));
        let out = quote(&x, &y, &dx, FeeRate::UNISWAP_V2).unwrap();
        // (1994 - 1992) * 10_000 / 1994 = 10
        assert_eq!(price_impact_bps(&spot, &out), 10);
        assert_eq!(price_impact_bps(&big(0), &out), 0);
        assert!(spot_output(&big(0), &y, &dx, FeeRate::UNISWAP_V2).is_zero());
    }
}
