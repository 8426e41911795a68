use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Recoverable failure conditions surfaced to the caller of a game
/// operation. None of these are retried by the core.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("Game not found")]
    NotFound,

    #[error("Game already started")]
    AlreadyStarted,

    #[error("Game has not started")]
    NotStarted,

    #[error("Need at least 3 players")]
    NotEnoughPlayers,

    #[error("Game is full")]
    GameFull,

    #[error("Player not found")]
    PlayerNotFound,

    #[error("Vote target is not a player in this game")]
    InvalidVote,

    #[error("Storage error: {0}")]
    Storage(String),
}

impl GameError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GameError::NotFound | GameError::PlayerNotFound => StatusCode::NOT_FOUND,
            GameError::AlreadyStarted
            | GameError::NotStarted
            | GameError::NotEnoughPlayers
            | GameError::GameFull
            | GameError::InvalidVote => StatusCode::BAD_REQUEST,
            GameError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GameError {
    fn into_response(self) -> Response {
        if let GameError::Storage(ref e) = self {
            tracing::error!("Storage failure: {}", e);
        }
        let body = Json(json!({ "error": self.to_string() }));
        (self.status_code(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_match_condition_class() {
        assert_eq!(GameError::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            GameError::PlayerNotFound.status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            GameError::AlreadyStarted.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(GameError::GameFull.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(GameError::NotStarted.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            GameError::Storage("io".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
