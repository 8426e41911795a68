//! Wire protocol: request/response bodies for the HTTP surface and the
//! event stream pushed to WebSocket observers.

use crate::types::*;
use serde::{Deserialize, Serialize};

/// Events fanned out to every connected observer of one session.
///
/// The first event a new observer receives is a `gameState` snapshot;
/// afterwards exactly one event is pushed per mutating operation.
/// Only `gameStarted` is redacted: chat and votes are public by design,
/// the spy's identity during active play is not.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ServerEvent {
    /// Full-state snapshot sent to every freshly connected observer
    GameState { data: Game },
    PlayerJoined { player: Player, game_state: Game },
    GameStarted { game_state: RedactedGame },
    NewMessage {
        message: Message,
        ai_response: Option<Message>,
    },
    VoteUpdate { game_state: Game },
}

/// Player entry with the spy-identifying fields stripped entirely
/// (absent keys, not nulls)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicPlayer {
    pub id: PlayerId,
    pub name: String,
    pub is_host: bool,
}

impl From<&Player> for PublicPlayer {
    fn from(p: &Player) -> Self {
        Self {
            id: p.id.clone(),
            name: p.name.clone(),
            is_host: p.is_host,
        }
    }
}

/// Broadcast projection of a game with per-player secrets removed
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedactedGame {
    pub id: GameId,
    pub host: String,
    pub status: GameStatus,
    pub location: Option<Location>,
    pub players: Vec<PublicPlayer>,
    pub messages: Vec<Message>,
    pub votes: std::collections::HashMap<PlayerId, PlayerId>,
    pub result: Option<GameResult>,
    pub created_at: String,
}

impl From<&Game> for RedactedGame {
    fn from(game: &Game) -> Self {
        Self {
            id: game.id.clone(),
            host: game.host.clone(),
            status: game.status,
            location: game.location.clone(),
            players: game.players.iter().map(PublicPlayer::from).collect(),
            messages: game.messages.clone(),
            votes: game.votes.clone(),
            result: game.result.clone(),
            created_at: game.created_at.clone(),
        }
    }
}

// HTTP request/response bodies

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGameRequest {
    pub host_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinGameRequest {
    pub player_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinGameResponse {
    pub player: Player,
    pub game_state: Game,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostMessageRequest {
    pub player_id: PlayerId,
    pub message: String,
    #[serde(default)]
    pub request_ai_response: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostMessageResponse {
    pub message: Message,
    pub ai_response: Option<Message>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    pub player_id: PlayerId,
    pub voted_for_id: PlayerId,
}
