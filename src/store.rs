//! Durable persistence seams: one JSON-like record per game, plus the
//! aggregate statistics store keyed by player name.
//!
//! The in-memory implementations are the defaults; the traits are the
//! boundary a KV backend would implement instead.

use crate::types::{Game, GameId, GameResult, PlayerStats};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Serialization failed: {0}")]
    Serialization(String),

    #[error("Backend unavailable: {0}")]
    Unavailable(String),
}

/// Durable key-value persistence of one record per game
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, game_id: &GameId) -> StoreResult<Option<Game>>;
    async fn put(&self, game_id: &GameId, game: &Game) -> StoreResult<()>;
}

/// Post-game statistics, written best-effort after a result resolves
#[async_trait]
pub trait StatsStore: Send + Sync {
    async fn record_result(&self, game_id: &GameId, result: &GameResult) -> StoreResult<()>;
    async fn update_aggregate(
        &self,
        player_name: &str,
        outcome: PlayerOutcome,
    ) -> StoreResult<PlayerStats>;
    async fn player_stats(&self, player_name: &str) -> StoreResult<PlayerStats>;
}

/// One player's outcome in a finished game
#[derive(Debug, Clone, Copy)]
pub struct PlayerOutcome {
    pub won: bool,
    pub was_spy: bool,
}

/// Process-local session store
#[derive(Default)]
pub struct MemoryStore {
    games: RwLock<HashMap<GameId, Game>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn get(&self, game_id: &GameId) -> StoreResult<Option<Game>> {
        Ok(self.games.read().await.get(game_id).cloned())
    }

    async fn put(&self, game_id: &GameId, game: &Game) -> StoreResult<()> {
        self.games
            .write()
            .await
            .insert(game_id.clone(), game.clone());
        Ok(())
    }
}

/// Process-local statistics store
#[derive(Default)]
pub struct MemoryStatsStore {
    results: RwLock<HashMap<GameId, GameResult>>,
    players: RwLock<HashMap<String, PlayerStats>>,
}

impl MemoryStatsStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StatsStore for MemoryStatsStore {
    async fn record_result(&self, game_id: &GameId, result: &GameResult) -> StoreResult<()> {
        self.results
            .write()
            .await
            .insert(game_id.clone(), result.clone());
        Ok(())
    }

    async fn update_aggregate(
        &self,
        player_name: &str,
        outcome: PlayerOutcome,
    ) -> StoreResult<PlayerStats> {
        let mut players = self.players.write().await;
        let stats = players
            .entry(player_name.to_string())
            .or_insert_with(|| PlayerStats {
                player_name: player_name.to_string(),
                ..PlayerStats::default()
            });

        stats.games_played += 1;
        if outcome.won {
            stats.games_won += 1;
        }
        if outcome.was_spy {
            stats.times_was_spy += 1;
            if outcome.won {
                stats.times_spy_won += 1;
            }
        }

        Ok(stats.clone())
    }

    async fn player_stats(&self, player_name: &str) -> StoreResult<PlayerStats> {
        Ok(self
            .players
            .read()
            .await
            .get(player_name)
            .cloned()
            .unwrap_or_else(|| PlayerStats {
                player_name: player_name.to_string(),
                ..PlayerStats::default()
            }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GameStatus, Player};

    fn sample_game(id: &str) -> Game {
        Game {
            id: id.to_string(),
            host: "Alice".into(),
            status: GameStatus::Lobby,
            location: None,
            players: vec![Player::new("Alice", true)],
            messages: vec![],
            votes: HashMap::new(),
            result: None,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    #[tokio::test]
    async fn memory_store_round_trips_records() {
        let store = MemoryStore::new();
        let id: GameId = "g1".into();

        assert!(store.get(&id).await.unwrap().is_none());

        let game = sample_game(&id);
        store.put(&id, &game).await.unwrap();
        let loaded = store.get(&id).await.unwrap().unwrap();
        assert_eq!(loaded.id, game.id);
        assert_eq!(loaded.players.len(), 1);
    }

    #[tokio::test]
    async fn aggregates_track_spy_outcomes() {
        let stats = MemoryStatsStore::new();

        stats
            .update_aggregate("Bob", PlayerOutcome { won: true, was_spy: true })
            .await
            .unwrap();
        stats
            .update_aggregate("Bob", PlayerOutcome { won: false, was_spy: false })
            .await
            .unwrap();
        let bob = stats.player_stats("Bob").await.unwrap();

        assert_eq!(bob.games_played, 2);
        assert_eq!(bob.games_won, 1);
        assert_eq!(bob.times_was_spy, 1);
        assert_eq!(bob.times_spy_won, 1);
    }

    #[tokio::test]
    async fn unknown_player_gets_zeroed_stats() {
        let stats = MemoryStatsStore::new();
        let carol = stats.player_stats("Carol").await.unwrap();
        assert_eq!(carol.player_name, "Carol");
        assert_eq!(carol.games_played, 0);
    }
}
