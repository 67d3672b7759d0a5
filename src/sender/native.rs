use async_trait::async_trait;

use super::{InitializeRequest, SendReceipt, TransactionSender};
use crate::{
    contracts::{
        trivia::TriviaChainContract,
        utils::{get_address_from_private_key, get_provider},
    },
    env::parse_contract_address,
    error::SendError,
};

/// Builds, signs and broadcasts the transaction in-process.
#[derive(Debug, Clone, Default)]
pub struct NativeSender;

#[async_trait]
impl TransactionSender for NativeSender {
    fn name(&self) -> &str {
        "native"
    }

    async fn send_initialize(
        &self,
        request: &InitializeRequest,
    ) -> Result<SendReceipt, SendError> {
        let private_key = request.private_key.to_b256()?;
        let owner = get_address_from_private_key(private_key)?;
        let address = parse_contract_address(&request.contract_address)?;
        log::info!("signing as {owner}");

        let provider = get_provider(&request.rpc_url)?;
        let contract = TriviaChainContract::new(provider, address);
        let tx_hash = contract.initialize(private_key).await?;
        Ok(SendReceipt::Mined { tx_hash, owner })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{ConfigError, SigningKey};

    #[tokio::test]
    async fn test_malformed_key_fails_before_any_rpc() {
        let request = InitializeRequest {
            contract_address: "0x7e32b54800705876d3b5cfbc7d9c226a211f7c1a".to_string(),
            // Nothing listens here; the key check must fail first.
            rpc_url: "http://127.0.0.1:1".to_string(),
            private_key: SigningKey::normalize("not-hex"),
        };

        let err = NativeSender.send_initialize(&request).await.unwrap_err();

        assert!(matches!(err, SendError::Config(ConfigError::PrivateKey)));
        assert_eq!(err.exit_code(), 1);
    }

    #[tokio::test]
    async fn test_zero_key_is_rejected_by_the_signer() {
        let request = InitializeRequest {
            contract_address: "0x7e32b54800705876d3b5cfbc7d9c226a211f7c1a".to_string(),
            rpc_url: "http://127.0.0.1:1".to_string(),
            private_key: SigningKey::normalize(&"00".repeat(32)),
        };

        let err = NativeSender.send_initialize(&request).await.unwrap_err();

        assert!(matches!(
            err,
            SendError::Blockchain(crate::contracts::error::BlockchainError::Signer(_))
        ));
    }
}
