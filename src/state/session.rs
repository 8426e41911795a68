//! One game's session instance: membership, role dealing and the
//! broadcast channel its observers hang off.

use crate::error::GameError;
use crate::llm::HintGenerator;
use crate::locations::{pick_random_location, pick_random_role};
use crate::protocol::{RedactedGame, ServerEvent};
use crate::store::{SessionStore, StatsStore};
use crate::types::*;
use rand::Rng;
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};

/// Capacity of the per-session event channel; a lagging observer misses
/// events instead of backpressuring the mutating operation.
const EVENT_CHANNEL_CAPACITY: usize = 100;

/// The single writer for one game's durable record.
///
/// Every mutating operation holds `op_lock` for its full duration,
/// including the awaited hint round-trip, so read-modify-write against
/// the store never interleaves within one game. Different games run
/// fully in parallel.
pub struct GameSession {
    id: GameId,
    store: Arc<dyn SessionStore>,
    pub(crate) stats: Arc<dyn StatsStore>,
    pub(crate) hints: Option<Arc<HintGenerator>>,
    events: broadcast::Sender<ServerEvent>,
    pub(crate) op_lock: Mutex<()>,
}

impl GameSession {
    pub fn new(
        id: GameId,
        store: Arc<dyn SessionStore>,
        stats: Arc<dyn StatsStore>,
        hints: Option<Arc<HintGenerator>>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            id,
            store,
            stats,
            hints,
            events,
            op_lock: Mutex::new(()),
        }
    }

    pub fn id(&self) -> &GameId {
        &self.id
    }

    /// New observers subscribe here; the WebSocket layer sends them a
    /// snapshot first, then forwards everything from this receiver.
    pub fn subscribe(&self) -> broadcast::Receiver<ServerEvent> {
        self.events.subscribe()
    }

    pub(crate) async fn load(&self) -> Result<Game, GameError> {
        self.store
            .get(&self.id)
            .await
            .map_err(|e| GameError::Storage(e.to_string()))?
            .ok_or(GameError::NotFound)
    }

    pub(crate) async fn persist(&self, game: &Game) -> Result<(), GameError> {
        self.store
            .put(&self.id, game)
            .await
            .map_err(|e| GameError::Storage(e.to_string()))
    }

    /// Fan an event out to all connected observers. A send error only
    /// means nobody is listening.
    pub(crate) fn publish(&self, event: ServerEvent) {
        if let Err(e) = self.events.send(event) {
            tracing::debug!(game_id = %self.id, "No observers for event: {}", e);
        }
    }

    /// Full current record, without redaction. This is the privileged
    /// read path participants use to fetch their own role.
    pub async fn state(&self) -> Result<Game, GameError> {
        self.load().await
    }

    /// Add a player to the lobby. A join with a name already present is
    /// an idempotent reconnect: the existing player is returned and no
    /// event is broadcast.
    pub async fn join(&self, player_name: &str) -> Result<(Player, Game), GameError> {
        let _guard = self.op_lock.lock().await;
        let mut game = self.load().await?;

        if game.status != GameStatus::Lobby {
            return Err(GameError::AlreadyStarted);
        }

        if let Some(existing) = game.player_by_name(player_name) {
            tracing::debug!(game_id = %self.id, player = player_name, "Rejoin");
            return Ok((existing.clone(), game));
        }

        if game.players.len() >= MAX_PLAYERS {
            return Err(GameError::GameFull);
        }

        let player = Player::new(player_name, false);
        game.players.push(player.clone());
        self.persist(&game).await?;

        tracing::info!(game_id = %self.id, player = player_name, "Player joined");
        self.publish(ServerEvent::PlayerJoined {
            player: player.clone(),
            game_state: game.clone(),
        });

        Ok((player, game))
    }

    /// Deal roles and begin play. Only a lobby can start: a running game
    /// keeps its deal and an ended game keeps its result. Picks a
    /// location uniformly, one spy uniformly, and an independent random
    /// role for everyone else.
    ///
    /// The broadcast carries the redacted projection; the full
    /// role-bearing state goes only to the caller. Other players fetch
    /// their own role through `state`.
    pub async fn start(&self) -> Result<Game, GameError> {
        let _guard = self.op_lock.lock().await;
        let mut game = self.load().await?;

        if game.status != GameStatus::Lobby {
            return Err(GameError::AlreadyStarted);
        }
        if game.players.len() < MIN_PLAYERS {
            return Err(GameError::NotEnoughPlayers);
        }

        let location = pick_random_location();
        let spy_index = rand::rng().random_range(0..game.players.len());

        for (index, player) in game.players.iter_mut().enumerate() {
            if index == spy_index {
                player.is_spy = true;
                player.role = Some(SPY_ROLE.to_string());
            } else {
                player.is_spy = false;
                player.role = Some(pick_random_role(&location));
            }
        }

        game.location = Some(location);
        game.status = GameStatus::Playing;
        self.persist(&game).await?;

        tracing::info!(
            game_id = %self.id,
            location = game.location.as_ref().map(|l| l.name.as_str()),
            players = game.players.len(),
            "Game started"
        );
        self.publish(ServerEvent::GameStarted {
            game_state: RedactedGame::from(&game),
        });

        Ok(game)
    }
}
