//! Failures of remote contract queries

use quote_model::Address;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// Endpoint unreachable, timed out, or answered with a non-success HTTP status
    #[error("cannot reach RPC endpoint: {0}")]
    Connection(String),

    /// Node rejected the call (revert, missing function, bad params)
    #[error("call to {contract} rejected by node (code {code}): {message}")]
    RemoteExecution {
        contract: Address,
        code: i64,
        message: String,
    },

    /// Response bytes do not match the expected layout
    #[error("cannot decode {what}: {reason}")]
    Decoding { what: &'static str, reason: String },
}

impl QueryError {
    pub fn decoding(what: &'static str, reason: impl Into<String>) -> Self {
        QueryError::Decoding {
            what,
            reason: reason.into(),
        }
    }
}
