//! Golden quotes: exact outputs the pair contract would return

use num_bigint::BigUint;
use quote_model::*;

fn big(s: &str) -> BigUint {
    BigUint::parse_bytes(s.as_bytes(), 10).unwrap()
}

fn weth() -> Address {
    "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2".parse().unwrap()
}

fn usdt() -> Address {
    "0xdac17f958d2ee523a2206206994597c13d831ec7".parse().unwrap()
}

/// WETH (18 decimals) is token0, USDT (6 decimals) is token1
fn weth_usdt_reserves() -> PoolReserves {
    PoolReserves {
        reserve_first: big("17345812345678901234567"),
        reserve_second: big("44123456789012"),
        last_update_timestamp: 1_717_171_717,
    }
}

#[test]
fn test_reference_scenario_bit_exact() {
    let reserve_in = big("1000000000000");
    let reserve_out = big("2000000");
    let amount_in = big("1000000000");

    let out = quote(&reserve_in, &reserve_out, &amount_in, FeeRate::UNISWAP_V2).unwrap();
    assert_eq!(out, big("1992"));
    assert_eq!(to_readable(&out, 6).format_fixed(6), "0.001992");
}

#[test]
fn test_sell_one_weth_for_usdt() {
    let reserves = weth_usdt_reserves();
    let amount: DecimalAmount = "1".parse().unwrap();
    let amount_in = to_raw(&amount, 18);

    let (reserve_in, reserve_out) = order_reserves(&weth(), &weth(), &reserves);
    let out = quote(reserve_in, reserve_out, &amount_in, FeeRate::UNISWAP_V2).unwrap();

    assert_eq!(out, big("2535975668"));
    assert_eq!(to_readable(&out, 6).format_fixed(6), "2535.975668");
}

#[test]
fn test_sell_fractional_weth() {
    let reserves = weth_usdt_reserves();
    let amount: DecimalAmount = "1.3".parse().unwrap();
    let amount_in = to_raw(&amount, 18);
    assert_eq!(amount_in, big("1300000000000000000"));

    let (reserve_in, reserve_out) = order_reserves(&weth(), &weth(), &reserves);
    let out = quote(reserve_in, reserve_out, &amount_in, FeeRate::UNISWAP_V2).unwrap();
    assert_eq!(out, big("3296711525"));
}

#[test]
fn test_sell_usdt_for_weth_uses_swapped_reserves() {
    let reserves = weth_usdt_reserves();
    let amount: DecimalAmount = "2500".parse().unwrap();
    let amount_in = to_raw(&amount, 6);

    let (reserve_in, reserve_out) =
        order_reserves_checked(&weth(), &usdt(), &usdt(), &weth(), &reserves).unwrap();
    let out = quote(reserve_in, reserve_out, &amount_in, FeeRate::UNISWAP_V2).unwrap();

    assert_eq!(out, big("979796196302357214"));
    assert_eq!(to_readable(&out, 18).format_fixed(6), "0.979796");
}

#[test]
fn test_degenerate_pool_raises() {
    let zero = BigUint::from(0u8);
    let result = quote(&zero, &big("5"), &zero, FeeRate::UNISWAP_V2);
    assert_eq!(result, Err(QuoteError::DivisionByZero));
}

#[test]
fn test_default_amount_parses() {
    let amount: DecimalAmount = "1".parse().unwrap();
    assert_eq!(to_raw(&amount, 18), big("1000000000000000000"));
}
