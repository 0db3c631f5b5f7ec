//! Scripted contract query service for tests

use std::cell::RefCell;
use std::collections::HashMap;

use quote_model::Address;

use crate::client::ContractQuery;
use crate::error::QueryError;

type Call = (Address, Vec<u8>);

/// Answers calls from a fixed table and records every call made
#[derive(Default)]
pub struct MockQuery {
    responses: HashMap<Call, Result<Vec<u8>, QueryError>>,
    calls: RefCell<Vec<Call>>,
}

impl MockQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, contract: Address, data: Vec<u8>, response: Result<Vec<u8>, QueryError>) -> Self {
        self.responses.insert((contract, data), response);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }
}

impl ContractQuery for MockQuery {
    fn call(&self, contract: &Address, data: &[u8]) -> Result<Vec<u8>, QueryError> {
        self.calls.borrow_mut().push((*contract, data.to_vec()));
        self.responses
            .get(&(*contract, data.to_vec()))
            .cloned()
            .unwrap_or_else(|| {
                Err(QueryError::RemoteExecution {
                    contract: *contract,
                    code: -32601,
                    message: format!("unexpected call 0x{}", hex::encode(data)),
                })
            })
    }
}
