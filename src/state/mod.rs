mod chat;
mod session;
mod vote;

pub use session::GameSession;

use crate::error::GameError;
use crate::llm::HintGenerator;
use crate::store::{MemoryStatsStore, MemoryStore, SessionStore, StatsStore};
use crate::types::*;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared application state: the session registry plus the collaborators
/// every session borrows (durable store, statistics store, hint generator).
///
/// Exactly one `GameSession` exists per game id and is the sole writer of
/// that game's record; the registry is how the routing layer finds it.
#[derive(Clone)]
pub struct AppState {
    sessions: Arc<RwLock<HashMap<GameId, Arc<GameSession>>>>,
    store: Arc<dyn SessionStore>,
    stats: Arc<dyn StatsStore>,
    hints: Option<Arc<HintGenerator>>,
}

impl AppState {
    /// In-memory stores, no hint generator. The configuration used by
    /// most tests.
    pub fn new() -> Self {
        Self::with_parts(
            Arc::new(MemoryStore::new()),
            Arc::new(MemoryStatsStore::new()),
            None,
        )
    }

    pub fn new_with_hints(hints: Option<HintGenerator>) -> Self {
        Self::with_parts(
            Arc::new(MemoryStore::new()),
            Arc::new(MemoryStatsStore::new()),
            hints.map(Arc::new),
        )
    }

    pub fn with_parts(
        store: Arc<dyn SessionStore>,
        stats: Arc<dyn StatsStore>,
        hints: Option<Arc<HintGenerator>>,
    ) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            store,
            stats,
            hints,
        }
    }

    pub fn stats_store(&self) -> Arc<dyn StatsStore> {
        self.stats.clone()
    }

    /// Create a new game with one host player. Always succeeds given
    /// valid input (only storage can fail).
    pub async fn create_game(&self, host_name: &str) -> Result<Game, GameError> {
        let host = Player::new(host_name, true);
        let game = Game {
            id: ulid::Ulid::new().to_string(),
            host: host_name.to_string(),
            status: GameStatus::Lobby,
            location: None,
            players: vec![host],
            messages: vec![],
            votes: HashMap::new(),
            result: None,
            created_at: chrono::Utc::now().to_rfc3339(),
        };

        self.store
            .put(&game.id, &game)
            .await
            .map_err(|e| GameError::Storage(e.to_string()))?;

        let session = Arc::new(GameSession::new(
            game.id.clone(),
            self.store.clone(),
            self.stats.clone(),
            self.hints.clone(),
        ));
        self.sessions
            .write()
            .await
            .insert(game.id.clone(), session);

        tracing::info!(game_id = %game.id, host = host_name, "Created game");
        Ok(game)
    }

    /// Look up the session instance owning a game id
    pub async fn session(&self, game_id: &str) -> Result<Arc<GameSession>, GameError> {
        self.sessions
            .read()
            .await
            .get(game_id)
            .cloned()
            .ok_or(GameError::NotFound)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_game_seeds_a_lobby_with_one_host() {
        let state = AppState::new();
        let game = state.create_game("Alice").await.unwrap();

        assert_eq!(game.status, GameStatus::Lobby);
        assert_eq!(game.host, "Alice");
        assert_eq!(game.players.len(), 1);
        assert!(game.players[0].is_host);
        assert!(game.players[0].role.is_none());
        assert!(game.location.is_none());
        assert!(state.session(&game.id).await.is_ok());
    }

    #[tokio::test]
    async fn unknown_game_id_is_not_found() {
        let state = AppState::new();
        assert!(matches!(
            state.session("nope").await,
            Err(GameError::NotFound)
        ));
    }

    #[tokio::test]
    async fn exactly_one_host_through_joins() {
        let state = AppState::new();
        let game = state.create_game("Alice").await.unwrap();
        let session = state.session(&game.id).await.unwrap();

        session.join("Bob").await.unwrap();
        let (_, game) = session.join("Carol").await.unwrap();

        assert_eq!(game.players.iter().filter(|p| p.is_host).count(), 1);
        assert_eq!(game.players[0].name, "Alice");
    }

    #[tokio::test]
    async fn rejoin_with_same_name_is_idempotent() {
        let state = AppState::new();
        let game = state.create_game("Alice").await.unwrap();
        let session = state.session(&game.id).await.unwrap();

        let (bob1, _) = session.join("Bob").await.unwrap();
        let (bob2, game) = session.join("Bob").await.unwrap();

        assert_eq!(bob1.id, bob2.id);
        assert_eq!(game.players.len(), 2);
    }

    #[tokio::test]
    async fn rejoin_does_not_broadcast() {
        let state = AppState::new();
        let game = state.create_game("Alice").await.unwrap();
        let session = state.session(&game.id).await.unwrap();

        session.join("Bob").await.unwrap();
        let mut rx = session.subscribe();
        session.join("Bob").await.unwrap();

        assert!(matches!(
            rx.try_recv(),
            Err(tokio::sync::broadcast::error::TryRecvError::Empty)
        ));
    }

    #[tokio::test]
    async fn join_is_rejected_at_capacity() {
        let state = AppState::new();
        let game = state.create_game("P0").await.unwrap();
        let session = state.session(&game.id).await.unwrap();

        for i in 1..MAX_PLAYERS {
            session.join(&format!("P{}", i)).await.unwrap();
        }
        assert!(matches!(
            session.join("Overflow").await,
            Err(GameError::GameFull)
        ));

        let game = session.state().await.unwrap();
        assert_eq!(game.players.len(), MAX_PLAYERS);
    }

    #[tokio::test]
    async fn join_after_start_is_rejected() {
        let state = AppState::new();
        let game = state.create_game("Alice").await.unwrap();
        let session = state.session(&game.id).await.unwrap();

        session.join("Bob").await.unwrap();
        session.join("Carol").await.unwrap();
        session.start().await.unwrap();

        assert!(matches!(
            session.join("Dave").await,
            Err(GameError::AlreadyStarted)
        ));
    }
}
