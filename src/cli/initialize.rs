use crate::{
    env::{Config, EnvVar, PRIVATE_KEY_VAR},
    error::CliError,
    sender::{InitializeRequest, SendReceipt, TransactionSender},
};

pub async fn initialize_operation<S>(
    sender: &S,
    env: &EnvVar,
    config: &Config,
) -> Result<SendReceipt, CliError>
where
    S: TransactionSender + ?Sized,
{
    // 1) The key is required; nothing is sent without it
    let Some(private_key) = env.private_key.clone() else {
        return Err(CliError::MissingPrivateKey);
    };
    if !private_key.is_well_formed() {
        log::warn!("{PRIVATE_KEY_VAR} is not 32 hex-encoded bytes; passing it through as is");
    }

    // 2) Hand one legacy initialize() call to the backend
    let request = InitializeRequest {
        contract_address: config.contract_address.clone(),
        rpc_url: config.rpc_url.clone(),
        private_key,
    };
    println!("Initializing TriviaChain contract at {}...", request.contract_address);
    log::info!("sending initialize() via {} to {}", sender.name(), request.rpc_url);
    let receipt = sender.send_initialize(&request).await?;

    if let SendReceipt::Mined { tx_hash, owner } = &receipt {
        println!("  tx hash: 0x{}", hex::encode(tx_hash.0));
        println!("  owner:   {owner}");
    }
    println!("Contract initialized!");
    Ok(receipt)
}
