use alloy::{primitives::B256, transports::TransportError};

use super::trivia::decode_revert_data;

#[derive(Debug, thiserror::Error)]
pub enum BlockchainError {
    #[error("parse error: {0}")]
    ParseError(String),
    #[error("transport error: {0}")]
    Transport(TransportError),
    #[error("contract error: {0}")]
    Contract(alloy::contract::Error),
    #[error("pending transaction error: {0}")]
    PendingTransaction(#[from] alloy::providers::PendingTransactionError),
    #[error("invalid signing key: {0}")]
    Signer(#[from] alloy::signers::local::LocalSignerError),
    #[error("execution reverted: {name}")]
    Revert { name: &'static str },
    #[error("transaction {tx_hash} was mined but failed")]
    Failed { tx_hash: B256 },
}

impl BlockchainError {
    /// Keeps the RPC error unless it carries revert data of a known contract error.
    pub fn from_transport(err: TransportError) -> Self {
        let revert = err
            .as_error_resp()
            .and_then(|payload| payload.as_revert_data())
            .and_then(|data| decode_revert_data(&data));
        match revert {
            Some(name) => Self::Revert { name },
            None => Self::Transport(err),
        }
    }
}

impl From<TransportError> for BlockchainError {
    fn from(err: TransportError) -> Self {
        Self::from_transport(err)
    }
}

impl From<alloy::contract::Error> for BlockchainError {
    fn from(err: alloy::contract::Error) -> Self {
        match err {
            alloy::contract::Error::TransportError(e) => Self::from_transport(e),
            other => Self::Contract(other),
        }
    }
}
