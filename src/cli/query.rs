use alloy::primitives::{Address, U256};

use crate::contracts::trivia::{SessionCreatedEvent, TriviaChainContract};

pub async fn winner_operation(
    contract: &TriviaChainContract,
    session_id: U256,
) -> anyhow::Result<Address> {
    let winner = contract.get_winner(session_id).await?;
    if winner == Address::ZERO {
        log::info!("session {session_id} has no winner yet");
    }
    println!("{winner}");
    Ok(winner)
}

pub async fn player_score_operation(
    contract: &TriviaChainContract,
    session_id: U256,
    player: Address,
) -> anyhow::Result<U256> {
    let score = contract.get_player_score(session_id, player).await?;
    println!("{score}");
    Ok(score)
}

pub async fn sessions_operation(
    contract: &TriviaChainContract,
    from_block: u64,
    to_block: Option<u64>,
) -> anyhow::Result<Vec<SessionCreatedEvent>> {
    let sessions = contract
        .get_session_created_events(from_block, to_block)
        .await?;
    log::info!("found {} sessions", sessions.len());
    for session in &sessions {
        println!("{}", format_session(session));
    }
    Ok(sessions)
}

fn format_session(session: &SessionCreatedEvent) -> String {
    format!(
        "session {}  host {}  room 0x{}  max players {}  created at {}",
        session.session_id,
        session.host,
        hex::encode(session.room_code.0),
        session.max_players,
        session.timestamp,
    )
}
