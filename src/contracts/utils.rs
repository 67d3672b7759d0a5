use alloy::{
    network::EthereumWallet,
    primitives::{Address, B256},
    providers::{
        ProviderBuilder,
        fillers::{
            BlobGasFiller, ChainIdFiller, FillProvider, GasFiller, JoinFill, NonceFiller,
            WalletFiller,
        },
    },
    rpc::client::RpcClient,
    signers::local::{LocalSignerError, PrivateKeySigner},
    transports::layers::RetryBackoffLayer,
};
use reqwest::Url;

use crate::contracts::error::BlockchainError;

// Use simple nonce manager for the nonce filler; every run signs a single transaction.
pub type JoinedRecommendedFillersWithSimpleNonce = JoinFill<
    alloy::providers::Identity,
    JoinFill<GasFiller, JoinFill<BlobGasFiller, JoinFill<NonceFiller, ChainIdFiller>>>,
>;

pub type NormalProvider =
    FillProvider<JoinedRecommendedFillersWithSimpleNonce, alloy::providers::RootProvider>;

pub type ProviderWithSigner = FillProvider<
    JoinFill<JoinedRecommendedFillersWithSimpleNonce, WalletFiller<EthereumWallet>>,
    alloy::providers::RootProvider,
>;

pub fn get_provider(rpc_url: &str) -> Result<NormalProvider, BlockchainError> {
    let retry_layer = RetryBackoffLayer::new(5, 1000, 100);
    let url: Url = rpc_url
        .parse()
        .map_err(|e| BlockchainError::ParseError(format!("Failed to parse URL {rpc_url}: {e}")))?;
    let client = RpcClient::builder().layer(retry_layer).http(url);
    let provider = ProviderBuilder::new().on_client(client);
    Ok(provider)
}

pub fn get_provider_with_signer(
    provider: &NormalProvider,
    private_key: B256,
) -> Result<ProviderWithSigner, BlockchainError> {
    let signer = PrivateKeySigner::from_bytes(&private_key).map_err(LocalSignerError::from)?;
    let wallet = EthereumWallet::new(signer);
    let wallet_filler = WalletFiller::new(wallet);
    Ok(provider.clone().join_with(wallet_filler))
}

pub fn get_address_from_private_key(private_key: B256) -> Result<Address, BlockchainError> {
    let signer = PrivateKeySigner::from_bytes(&private_key).map_err(LocalSignerError::from)?;
    Ok(signer.address())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_from_known_key() {
        // First default anvil account.
        let key: B256 = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80"
            .parse()
            .unwrap();
        let expected: Address = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
            .parse()
            .unwrap();
        assert_eq!(get_address_from_private_key(key).unwrap(), expected);
    }

    #[test]
    fn test_zero_key_is_rejected() {
        assert!(matches!(
            get_address_from_private_key(B256::ZERO),
            Err(BlockchainError::Signer(_))
        ));
    }

    #[test]
    fn test_get_provider_rejects_bad_url() {
        assert!(matches!(
            get_provider("not a url"),
            Err(BlockchainError::ParseError(_))
        ));
    }
}
