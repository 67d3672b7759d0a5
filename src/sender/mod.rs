use alloy::primitives::{Address, B256};
use async_trait::async_trait;

use crate::{env::SigningKey, error::SendError};

pub mod cast;
pub mod native;

pub use cast::CastSender;
pub use native::NativeSender;

pub const INITIALIZE_SIGNATURE: &str = "initialize()";

/// Everything a backend needs to send one `initialize()` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitializeRequest {
    pub contract_address: String,
    pub rpc_url: String,
    pub private_key: SigningKey,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendReceipt {
    /// The external tool exited successfully; it printed its own receipt.
    Delegated,
    /// `owner` is the signing account, which `initialize()` records as contract owner.
    Mined { tx_hash: B256, owner: Address },
}

/// Signs and broadcasts `initialize()` as a legacy transaction.
#[async_trait]
pub trait TransactionSender: Send + Sync {
    fn name(&self) -> &str;

    async fn send_initialize(&self, request: &InitializeRequest)
    -> Result<SendReceipt, SendError>;
}
