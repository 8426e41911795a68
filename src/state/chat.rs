//! Chat handling: player messages and the optional AI hint appended
//! right behind them.

use super::session::GameSession;
use crate::error::GameError;
use crate::llm::HintRequest;
use crate::protocol::ServerEvent;
use crate::types::*;

/// How many prior messages (including the one just posted) are handed to
/// the hint generator as conversation context
const HINT_CONTEXT_MESSAGES: usize = 5;

impl GameSession {
    /// Append a player message and, on request, one AI hint for the same
    /// player. Persists once after both appends.
    ///
    /// The hint is auxiliary: generator failure or timeout degrades to
    /// fixed fallback text and never fails the post. No hint is attempted
    /// before a location is assigned (the personas need one).
    pub async fn post_message(
        &self,
        player_id: &str,
        text: &str,
        request_hint: bool,
    ) -> Result<(Message, Option<Message>), GameError> {
        let _guard = self.op_lock.lock().await;
        let mut game = self.load().await?;

        let player = game
            .player(player_id)
            .cloned()
            .ok_or(GameError::PlayerNotFound)?;

        let message = Message::from_player(&player, text);
        game.messages.push(message.clone());

        let mut ai_response = None;
        if request_hint {
            match (&self.hints, game.location.clone()) {
                (Some(hints), Some(location)) => {
                    let skip = game.messages.len().saturating_sub(HINT_CONTEXT_MESSAGES);
                    let request = HintRequest {
                        question: text.to_string(),
                        player_name: player.name.clone(),
                        location,
                        is_spy: player.is_spy,
                        recent_messages: game.messages[skip..].to_vec(),
                        max_tokens: None,
                    };

                    // Awaited under the op lock: nothing else mutates this
                    // game while the model call is in flight.
                    let hint_text = hints.hint(request).await;
                    let hint = Message::from_hint(&player.id, hint_text);
                    game.messages.push(hint.clone());
                    ai_response = Some(hint);
                }
                (None, _) => {
                    tracing::debug!(game_id = %self.id(), "Hint requested but no provider configured");
                }
                (_, None) => {
                    tracing::debug!(game_id = %self.id(), "Hint requested before a location was assigned");
                }
            }
        }

        self.persist(&game).await?;
        self.publish(ServerEvent::NewMessage {
            message: message.clone(),
            ai_response: ai_response.clone(),
        });

        Ok((message, ai_response))
    }
}
