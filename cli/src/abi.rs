//! Contract bindings and return-data decoding for the quote's read-only calls
//!
//! Call data and conforming return values go through the `sol!` bindings.
//! `getReserves()` and non-conforming `symbol()` returns are read word by word.

use alloy_primitives::U256;
use alloy_sol_types::{sol, SolCall};
use num_bigint::BigUint;
use quote_model::{PoolReserves, RawAmount};

use crate::error::QueryError;

pub const WORD: usize = 32;

sol! {
    /// Uniswap V2 pair, read-only subset
    interface IUniswapV2Pair {
        function getReserves() external view returns (uint112 reserve0, uint112 reserve1, uint32 blockTimestampLast);
        function token0() external view returns (address);
        function token1() external view returns (address);
    }

    /// ERC-20 token, read-only subset
    interface IERC20 {
        function balanceOf(address account) external view returns (uint256);
        function decimals() external view returns (uint8);
        function symbol() external view returns (string memory);
    }
}

pub use IERC20::{balanceOfCall, decimalsCall, symbolCall};
pub use IUniswapV2Pair::{getReservesCall, token0Call, token1Call};

/// Decode the return data of `C` with strict type checks
pub fn decode_returns<C: SolCall>(data: &[u8], what: &'static str) -> Result<C::Return, QueryError> {
    C::abi_decode_returns(data, true).map_err(|e| QueryError::decoding(what, e.to_string()))
}

pub fn to_raw_amount(value: U256) -> RawAmount {
    BigUint::from_bytes_be(&value.to_be_bytes::<32>())
}

fn ensure_len(data: &[u8], min: usize, what: &'static str) -> Result<(), QueryError> {
    if data.len() < min {
        return Err(QueryError::decoding(
            what,
            format!("insufficient data length: {} (need {})", data.len(), min),
        ));
    }
    Ok(())
}

fn word(data: &[u8], index: usize) -> &[u8] {
    &data[index * WORD..(index + 1) * WORD]
}

/// Word as a length, if it fits in a `usize`
fn word_as_usize(word: &[u8]) -> Option<usize> {
    if word[..WORD - 8].iter().any(|b| *b != 0) {
        return None;
    }
    let mut tail = [0u8; 8];
    tail.copy_from_slice(&word[WORD - 8..]);
    usize::try_from(u64::from_be_bytes(tail)).ok()
}

/// `(uint112 reserve0, uint112 reserve1, uint32 blockTimestampLast)`
///
/// Read leniently: any response of at least three words is accepted and the
/// timestamp is the low four bytes of the third word.
pub fn decode_reserves(data: &[u8]) -> Result<PoolReserves, QueryError> {
    ensure_len(data, 3 * WORD, "reserves")?;

    let timestamp_word = word(data, 2);
    let mut ts = [0u8; 4];
    ts.copy_from_slice(&timestamp_word[WORD - 4..]);

    Ok(PoolReserves {
        reserve_first: BigUint::from_bytes_be(word(data, 0)),
        reserve_second: BigUint::from_bytes_be(word(data, 1)),
        last_update_timestamp: u32::from_be_bytes(ts),
    })
}

/// Length at bytes 32..64 and payload from byte 64, ignoring the offset word
fn decode_length_prefixed(data: &[u8]) -> Option<String> {
    if data.len() < 3 * WORD {
        return None;
    }
    let len = word_as_usize(word(data, 1))?;
    if len == 0 {
        return None;
    }
    let bytes = data.get(2 * WORD..(2 * WORD).checked_add(len)?)?;
    Some(String::from_utf8_lossy(bytes).into_owned())
}

/// Older tokens return `bytes32` padded with NULs
fn decode_bytes32(data: &[u8]) -> Option<String> {
    if data.len() != WORD {
        return None;
    }
    let end = data.iter().position(|b| *b == 0).unwrap_or(WORD);
    if end == 0 {
        return None;
    }
    Some(String::from_utf8_lossy(&data[..end]).into_owned())
}

/// `symbol()` return data, falling back to manual layouts for non-conforming tokens
pub fn decode_symbol(data: &[u8]) -> Result<String, QueryError> {
    // A conforming `string` return is at least an offset word and a length word
    if data.len() >= 2 * WORD {
        if let Ok(ret) = symbolCall::abi_decode_returns(data, true) {
            return Ok(ret._0);
        }
    }
    if let Some(s) = decode_length_prefixed(data) {
        log::warn!("symbol: standard string decoding failed, used length prefix");
        return Ok(s);
    }
    if let Some(s) = decode_bytes32(data) {
        log::warn!("symbol: decoded as bytes32");
        return Ok(s);
    }
    Err(QueryError::decoding(
        "symbol",
        format!("no string layout matches {} bytes", data.len()),
    ))
}
