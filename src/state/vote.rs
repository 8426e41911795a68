//! Vote recording and result resolution.

use super::session::GameSession;
use crate::error::GameError;
use crate::protocol::ServerEvent;
use crate::store::PlayerOutcome;
use crate::types::*;
use std::collections::HashMap;

impl GameSession {
    /// Record (or overwrite) one player's vote. When the last outstanding
    /// vote arrives the outcome is resolved, the result persisted and the
    /// game ends.
    pub async fn vote(&self, player_id: &str, voted_for_id: &str) -> Result<Game, GameError> {
        let _guard = self.op_lock.lock().await;
        let mut game = self.load().await?;

        // Ended games are terminal; a late vote is a no-op.
        if game.status == GameStatus::Ended {
            return Ok(game);
        }
        // No ballot before roles are dealt
        if game.status == GameStatus::Lobby {
            return Err(GameError::NotStarted);
        }

        if game.player(player_id).is_none() {
            return Err(GameError::PlayerNotFound);
        }
        if game.player(voted_for_id).is_none() {
            return Err(GameError::InvalidVote);
        }

        game.votes
            .insert(player_id.to_string(), voted_for_id.to_string());

        if game.all_voted() {
            if let Some(result) = resolve_votes(&game) {
                tracing::info!(
                    game_id = %self.id(),
                    accused = %result.accused_player.name,
                    non_spies_win = result.non_spies_win,
                    "All votes in, game over"
                );
                game.status = GameStatus::Ended;
                game.result = Some(result.clone());
                self.record_stats(&game, &result).await;
            }
        }

        self.persist(&game).await?;
        self.publish(ServerEvent::VoteUpdate {
            game_state: game.clone(),
        });

        Ok(game)
    }

    /// Best-effort post-game bookkeeping; failures are logged, never
    /// surfaced to the voter.
    async fn record_stats(&self, game: &Game, result: &GameResult) {
        if let Err(e) = self.stats.record_result(&game.id, result).await {
            tracing::warn!(game_id = %self.id(), "Failed to record game result: {}", e);
        }

        for player in &game.players {
            let won = if player.is_spy {
                !result.non_spies_win
            } else {
                result.non_spies_win
            };
            let outcome = PlayerOutcome {
                won,
                was_spy: player.is_spy,
            };
            if let Err(e) = self.stats.update_aggregate(&player.name, outcome).await {
                tracing::warn!(
                    game_id = %self.id(),
                    player = %player.name,
                    "Failed to update player aggregate: {}",
                    e
                );
            }
        }
    }
}

/// Tally the votes map and pick the accused.
///
/// Counting walks voters in player join order, and a candidate takes the
/// lead only by strictly exceeding the running maximum, so on a tie the
/// first id to reach the final count wins. Deterministic for a fixed
/// record.
pub(crate) fn resolve_votes(game: &Game) -> Option<GameResult> {
    let mut vote_counts: HashMap<PlayerId, u32> = HashMap::new();
    let mut accused_id: Option<&PlayerId> = None;
    let mut max_votes = 0u32;

    for voter in &game.players {
        let Some(target) = game.votes.get(&voter.id) else {
            continue;
        };
        let count = vote_counts.entry(target.clone()).or_insert(0);
        *count += 1;
        if *count > max_votes {
            max_votes = *count;
            accused_id = Some(target);
        }
    }

    let accused_player = game.player(accused_id?)?.clone();
    let spy_player = game.spy()?.clone();
    let non_spies_win = accused_player.id == spy_player.id;

    Some(GameResult {
        accused_player,
        spy_player,
        vote_counts,
        non_spies_win,
    })
}
