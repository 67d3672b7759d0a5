use alloy::{
    network::{ReceiptResponse as _, TransactionBuilder as _},
    primitives::{Address, B256, U256},
    providers::Provider as _,
    sol,
    sol_types::SolInterface as _,
};

use super::{
    error::BlockchainError,
    utils::{NormalProvider, get_provider_with_signer},
};

sol!(
    #[sol(rpc, all_derives)]
    TriviaChain,
    "abi/TriviaChain.json",
);

/// Name of the TriviaChain custom error encoded in `data`, if any.
pub fn decode_revert_data(data: &[u8]) -> Option<&'static str> {
    use self::TriviaChain::TriviaChainErrors as E;

    let name = match E::abi_decode(data, true).ok()? {
        E::Unauthorized(_) => "Unauthorized",
        E::SessionNotFound(_) => "SessionNotFound",
        E::SessionAlreadyActive(_) => "SessionAlreadyActive",
        E::SessionNotActive(_) => "SessionNotActive",
        E::SessionFull(_) => "SessionFull",
        E::PlayerNotInSession(_) => "PlayerNotInSession",
        E::PlayerAlreadyJoined(_) => "PlayerAlreadyJoined",
        E::InvalidRoomCode(_) => "InvalidRoomCode",
        E::InvalidQuestionIndex(_) => "InvalidQuestionIndex",
        E::QuestionNotActive(_) => "QuestionNotActive",
        E::AlreadyAnswered(_) => "AlreadyAnswered",
    };
    Some(name)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCreatedEvent {
    pub session_id: U256,
    pub host: Address,
    pub room_code: B256,
    pub max_players: U256,
    pub timestamp: u64,
}

#[derive(Debug, Clone)]
pub struct TriviaChainContract {
    pub provider: NormalProvider,
    pub address: Address,
}

impl TriviaChainContract {
    pub fn new(provider: NormalProvider, address: Address) -> Self {
        Self { provider, address }
    }

    /// Sends `initialize()` as a legacy transaction and waits for it to be mined.
    pub async fn initialize(&self, signer_private_key: B256) -> Result<B256, BlockchainError> {
        let signer = get_provider_with_signer(&self.provider, signer_private_key)?;
        let contract = TriviaChain::new(self.address, signer.clone());
        let gas_price = signer.get_gas_price().await?;
        let tx_request = contract
            .initialize()
            .into_transaction_request()
            .with_gas_price(gas_price);
        let pending = signer.send_transaction(tx_request).await?;
        let tx_hash = *pending.tx_hash();
        log::info!("initialize() broadcast: {tx_hash}");

        let receipt = pending.get_receipt().await?;
        if !receipt.status() {
            return Err(BlockchainError::Failed { tx_hash });
        }
        Ok(tx_hash)
    }

    pub async fn get_winner(&self, session_id: U256) -> Result<Address, BlockchainError> {
        let trivia = TriviaChain::new(self.address, self.provider.clone());
        let winner = trivia.getWinner(session_id).call().await?;
        Ok(winner._0)
    }

    pub async fn get_player_score(
        &self,
        session_id: U256,
        player: Address,
    ) -> Result<U256, BlockchainError> {
        let trivia = TriviaChain::new(self.address, self.provider.clone());
        let score = trivia.getPlayerScore(session_id, player).call().await?;
        Ok(score._0)
    }

    pub async fn get_session_created_events(
        &self,
        from_eth_block: u64,
        to_eth_block: Option<u64>,
    ) -> Result<Vec<SessionCreatedEvent>, BlockchainError> {
        let to_eth_block = match to_eth_block {
            Some(block) => block,
            None => self.provider.get_block_number().await?,
        };
        let contract = TriviaChain::new(self.address, self.provider.clone());
        let events = contract
            .event_filter::<TriviaChain::SessionCreated>()
            .address(self.address)
            .from_block(from_eth_block)
            .to_block(to_eth_block)
            .query()
            .await?;
        let mut session_events: Vec<SessionCreatedEvent> = events
            .into_iter()
            .map(|(event, _meta)| SessionCreatedEvent {
                session_id: event.sessionId,
                host: event.host,
                room_code: event.roomCode,
                max_players: event.maxPlayers,
                timestamp: event.timestamp,
            })
            .collect();
        session_events.sort_by_key(|event| event.session_id);
        Ok(session_events)
    }
}
