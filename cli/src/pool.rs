//! Pool state reader: reserves, token order and token metadata of a pair

use alloy_sol_types::SolCall;
use quote_model::{Address, PoolReserves, RawAmount, TokenDescriptor, UNKNOWN_SYMBOL};

use crate::abi::{
    self, balanceOfCall, decimalsCall, getReservesCall, symbolCall, token0Call, token1Call,
};
use crate::client::ContractQuery;
use crate::error::QueryError;

/// Token metadata plus the balance the pool holds of it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenInfo {
    pub descriptor: TokenDescriptor,
    pub balance: RawAmount,
}

pub struct PoolReader<Q> {
    query: Q,
}

impl<Q: ContractQuery> PoolReader<Q> {
    pub fn new(query: Q) -> Self {
        Self { query }
    }

    fn call<C: SolCall>(&self, contract: &Address, call: &C, what: &'static str) -> Result<C::Return, QueryError> {
        let data = self.query.call(contract, &call.abi_encode())?;
        abi::decode_returns::<C>(&data, what)
    }

    pub fn reserves(&self, pool: &Address) -> Result<PoolReserves, QueryError> {
        let data = self.query.call(pool, &getReservesCall {}.abi_encode())?;
        abi::decode_reserves(&data)
    }

    /// The pool's first asset (`token0`)
    pub fn first_asset(&self, pool: &Address) -> Result<Address, QueryError> {
        Ok(self.call(pool, &token0Call {}, "token0")?._0)
    }

    /// The pool's second asset (`token1`)
    pub fn second_asset(&self, pool: &Address) -> Result<Address, QueryError> {
        Ok(self.call(pool, &token1Call {}, "token1")?._0)
    }

    pub fn balance_of(&self, token: &Address, holder: &Address) -> Result<RawAmount, QueryError> {
        let balance = self.call(token, &balanceOfCall { account: *holder }, "balance")?;
        Ok(abi::to_raw_amount(balance._0))
    }

    pub fn decimals(&self, token: &Address) -> Result<u8, QueryError> {
        Ok(self.call(token, &decimalsCall {}, "decimals")?._0)
    }

    pub fn symbol(&self, token: &Address) -> Result<String, QueryError> {
        let data = self.query.call(token, &symbolCall {}.abi_encode())?;
        abi::decode_symbol(&data)
    }

    /// Balance held by `holder`, decimals and symbol of `token`
    ///
    /// Balance and decimals are required. A symbol that cannot be read is
    /// replaced by a placeholder.
    pub fn token_info(&self, token: &Address, holder: &Address) -> Result<TokenInfo, QueryError> {
        let balance = self.balance_of(token, holder)?;
        let decimals = self.decimals(token)?;
        let symbol = self.symbol(token).unwrap_or_else(|e| {
            log::warn!("symbol() of {} unavailable: {}", token, e);
            UNKNOWN_SYMBOL.to_string()
        });

        Ok(TokenInfo {
            descriptor: TokenDescriptor {
                address: *token,
                decimals,
                symbol,
            },
            balance,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abi::tests::{encode_string, word_address, word_u128};
    use crate::testing::MockQuery;
    use num_bigint::BigUint;

    fn pool() -> Address {
        Address::repeat_byte(0xaa)
    }

    fn token() -> Address {
        Address::repeat_byte(0x11)
    }

    #[test]
    fn test_reserves_and_assets() {
        let mut data = word_u128(500);
        data.extend(word_u128(700));
        data.extend(word_u128(42));

        let mock = MockQuery::new()
            .with(pool(), getReservesCall {}.abi_encode(), Ok(data))
            .with(pool(), token0Call {}.abi_encode(), Ok(word_address(&token())))
            .with(pool(), token1Call {}.abi_encode(), Ok(word_address(&Address::repeat_byte(0x22))));
        let reader = PoolReader::new(&mock);

        let reserves = reader.reserves(&pool()).unwrap();
        assert_eq!(reserves.reserve_first, BigUint::from(500u32));
        assert_eq!(reserves.reserve_second, BigUint::from(700u32));
        assert_eq!(reserves.last_update_timestamp, 42);
        assert_eq!(reader.first_asset(&pool()).unwrap(), token());
        assert_eq!(reader.second_asset(&pool()).unwrap(), Address::repeat_byte(0x22));
    }

    #[test]
    fn test_token_info() {
        let mock = MockQuery::new()
            .with(token(), balanceOfCall { account: pool() }.abi_encode(), Ok(word_u128(9_000_000)))
            .with(token(), decimalsCall {}.abi_encode(), Ok(word_u128(6)))
            .with(token(), symbolCall {}.abi_encode(), Ok(encode_string("USDT")));
        let reader = PoolReader::new(&mock);

        let info = reader.token_info(&token(), &pool()).unwrap();
        assert_eq!(info.balance, BigUint::from(9_000_000u32));
        assert_eq!(info.descriptor.decimals, 6);
        assert_eq!(info.descriptor.symbol, "USDT");
        assert_eq!(info.descriptor.address, token());
    }

    #[test]
    fn test_symbol_failure_uses_placeholder() {
        let mock = MockQuery::new()
            .with(token(), balanceOfCall { account: pool() }.abi_encode(), Ok(word_u128(1)))
            .with(token(), decimalsCall {}.abi_encode(), Ok(word_u128(18)))
            .with(
                token(),
                symbolCall {}.abi_encode(),
                Err(QueryError::RemoteExecution {
                    contract: token(),
                    code: -32000,
                    message: "execution reverted".into(),
                }),
            );
        let reader = PoolReader::new(&mock);

        let info = reader.token_info(&token(), &pool()).unwrap();
        assert_eq!(info.descriptor.symbol, UNKNOWN_SYMBOL);
    }

    #[test]
    fn test_decimals_failure_is_fatal() {
        let mock = MockQuery::new()
            .with(token(), balanceOfCall { account: pool() }.abi_encode(), Ok(word_u128(1)))
            .with(token(), decimalsCall {}.abi_encode(), Ok(vec![0u8; 4]));
        let reader = PoolReader::new(&mock);

        let err = reader.token_info(&token(), &pool()).unwrap_err();
        assert!(matches!(err, QueryError::Decoding { what: "decimals", .. }));
        // symbol() is never attempted after a fatal failure
        assert_eq!(mock.calls().len(), 2);
    }
}
