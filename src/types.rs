use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Opaque ID types for type safety
pub type GameId = String;
pub type PlayerId = String;
pub type MessageId = String;

/// Minimum number of players required to start a game
pub const MIN_PLAYERS: usize = 3;
/// Maximum number of players a lobby will accept
pub const MAX_PLAYERS: usize = 8;

/// Sentinel role assigned to the spy (who gets no real role)
pub const SPY_ROLE: &str = "Spy";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Lobby,
    Playing,
    Ended,
}

/// The authoritative record for one game. One of these exists per game id
/// in the session store; only that game's session instance writes it.
///
/// Voting has no status of its own: a game is "in voting" while `status`
/// is `Playing` and the votes map is non-empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: GameId,
    /// Display name of the player who created the game
    pub host: String,
    pub status: GameStatus,
    /// Assigned at start, None while in the lobby
    pub location: Option<Location>,
    /// Join order; the first entry is always the host
    pub players: Vec<Player>,
    /// Append-only, chronological
    pub messages: Vec<Message>,
    /// Voter id -> accused id, last write wins per voter
    pub votes: HashMap<PlayerId, PlayerId>,
    /// Set exactly once, when the last outstanding vote arrives
    pub result: Option<GameResult>,
    pub created_at: String,
}

impl Game {
    pub fn player(&self, player_id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == player_id)
    }

    pub fn player_by_name(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.name == name)
    }

    pub fn spy(&self) -> Option<&Player> {
        self.players.iter().find(|p| p.is_spy)
    }

    /// True once every current player has a recorded vote
    pub fn all_voted(&self) -> bool {
        self.players.iter().all(|p| self.votes.contains_key(&p.id))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub is_host: bool,
    /// Assigned at game start; the spy gets the sentinel "Spy"
    pub role: Option<String>,
    pub is_spy: bool,
}

impl Player {
    pub fn new(name: impl Into<String>, is_host: bool) -> Self {
        Self {
            id: ulid::Ulid::new().to_string(),
            name: name.into(),
            is_host,
            role: None,
            is_spy: false,
        }
    }
}

/// A themed setting with the roles dealt to non-spy players
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Location {
    pub name: String,
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Player,
    Ai,
}

/// One chat entry, either player-authored or an AI hint.
///
/// AI messages carry `for_player` (who asked); player messages carry the
/// author attribution. The unused side is omitted from the wire form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: MessageId,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub text: String,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_id: Option<PlayerId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub for_player: Option<PlayerId>,
}

impl Message {
    pub fn from_player(player: &Player, text: impl Into<String>) -> Self {
        Self {
            id: ulid::Ulid::new().to_string(),
            kind: MessageKind::Player,
            text: text.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            player_id: Some(player.id.clone()),
            player_name: Some(player.name.clone()),
            for_player: None,
        }
    }

    pub fn from_hint(for_player: &PlayerId, text: impl Into<String>) -> Self {
        Self {
            id: ulid::Ulid::new().to_string(),
            kind: MessageKind::Ai,
            text: text.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            player_id: None,
            player_name: None,
            for_player: Some(for_player.clone()),
        }
    }
}

/// Outcome of a finished game
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResult {
    /// The player with strictly the most votes (first to reach the maximum
    /// in join order on a tie)
    pub accused_player: Player,
    pub spy_player: Player,
    pub vote_counts: HashMap<PlayerId, u32>,
    /// True iff the accused is the spy
    pub non_spies_win: bool,
}

/// Per-player aggregate kept by the statistics store
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStats {
    pub player_name: String,
    pub games_played: u32,
    pub games_won: u32,
    pub times_was_spy: u32,
    pub times_spy_won: u32,
}
