mod openai;
mod workers_ai;

use crate::types::{Location, Message, MessageKind};
use async_trait::async_trait;
use std::time::Duration;

pub use openai::OpenAiProvider;
pub use workers_ai::WorkersAiProvider;

/// Result type for hint generation
pub type HintResult<T> = Result<T, HintError>;

/// Fixed degraded text used whenever the provider fails or times out.
/// Posting a chat message never fails because of the hint generator.
pub const FALLBACK_HINT: &str =
    "The AI assistant is having trouble right now. Please try again.";

#[derive(Debug, thiserror::Error)]
pub enum HintError {
    #[error("API request failed: {0}")]
    ApiError(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Response parsing failed: {0}")]
    ParseError(String),
}

/// One hint request: the player's question plus the game context the
/// persona prompt is built from.
#[derive(Debug, Clone)]
pub struct HintRequest {
    /// The question the player just posted
    pub question: String,
    /// Display name of the asking player
    pub player_name: String,
    /// The game's location (never named to the spy persona)
    pub location: Location,
    /// Whether the asking player is the spy
    pub is_spy: bool,
    /// Bounded window of prior chat, oldest first
    pub recent_messages: Vec<Message>,
    /// Maximum response length in tokens (provider-dependent)
    pub max_tokens: Option<u32>,
}

/// A conversation turn derived from recent chat, in provider-neutral form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryTurn {
    User(String),
    Assistant(String),
}

impl HintRequest {
    /// Persona prompt. The asymmetry is the anti-cheat mechanic: the
    /// non-spy persona gives oblique true clues about the named location,
    /// the spy persona deflects generically and never learns the location.
    pub fn system_prompt(&self) -> String {
        if self.is_spy {
            SPY_SYSTEM_PROMPT.to_string()
        } else {
            format!(
                "You are an AI game assistant for Spyfall. The current location is: {name}.\n\n\
                 Your role: Help non-spy players by providing subtle hints about the location \
                 without giving it away completely.\n\n\
                 Rules:\n\
                 - Give contextual clues about what you might see, hear, or do at {name}\n\
                 - Be somewhat vague but helpful\n\
                 - Don't say the location name directly\n\
                 - Answer questions naturally, as if you're also at this location\n\
                 - Keep responses brief (2-3 sentences max)\n\
                 - Use sensory details (sights, sounds, smells, feelings)\n\
                 - If asked about your role, be evasive but stay in character\n\n\
                 Remember: Be helpful but not too obvious. The spy is listening!",
                name = self.location.name
            )
        }
    }

    /// Recent chat mapped to conversation turns. AI messages become
    /// assistant turns; player messages keep their speaker prefix.
    pub fn history(&self) -> Vec<HistoryTurn> {
        self.recent_messages
            .iter()
            .map(|m| match m.kind {
                MessageKind::Ai => HistoryTurn::Assistant(m.text.clone()),
                MessageKind::Player => HistoryTurn::User(format!(
                    "{}: {}",
                    m.player_name.as_deref().unwrap_or("Player"),
                    m.text
                )),
            })
            .collect()
    }

    /// The closing user turn carrying the actual question
    pub fn question_turn(&self) -> String {
        format!("{} asks: {}", self.player_name, self.question)
    }
}

const SPY_SYSTEM_PROMPT: &str =
    "You are an AI game assistant for Spyfall. You are helping THE SPY who doesn't \
     know the location.\n\n\
     Your role: Help the spy blend in without revealing you don't know the location.\n\n\
     Rules:\n\
     - Give VERY vague, generic responses that could apply to many places\n\
     - Never commit to specific details about the location\n\
     - Ask questions back to gather information\n\
     - Be conversational and natural\n\
     - Keep responses brief (2-3 sentences max)\n\
     - Act like you're being careful about revealing information\n\
     - Deflect specific questions with your own questions\n\n\
     Remember: You're helping the spy blend in. Be vague, ask questions, and don't \
     commit to details!";

/// Trait every hint backend implements
#[async_trait]
pub trait HintProvider: Send + Sync {
    async fn generate(&self, request: &HintRequest) -> HintResult<String>;

    fn name(&self) -> &str;
}

/// Wraps a provider with a deadline and the fixed fallback. `hint` never
/// fails; degraded text is the worst case.
pub struct HintGenerator {
    provider: Box<dyn HintProvider>,
    timeout: Duration,
    max_tokens: u32,
}

impl HintGenerator {
    pub fn new(provider: Box<dyn HintProvider>, timeout: Duration, max_tokens: u32) -> Self {
        Self {
            provider,
            timeout,
            max_tokens,
        }
    }

    pub async fn hint(&self, mut request: HintRequest) -> String {
        request.max_tokens.get_or_insert(self.max_tokens);

        match tokio::time::timeout(self.timeout, self.provider.generate(&request)).await {
            Ok(Ok(text)) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(Ok(_)) => {
                tracing::warn!(provider = self.provider.name(), "Empty hint response");
                FALLBACK_HINT.to_string()
            }
            Ok(Err(e)) => {
                tracing::warn!(provider = self.provider.name(), "Hint generation failed: {}", e);
                FALLBACK_HINT.to_string()
            }
            Err(_) => {
                tracing::warn!(
                    provider = self.provider.name(),
                    "Hint generation timed out after {:?}",
                    self.timeout
                );
                FALLBACK_HINT.to_string()
            }
        }
    }
}

/// Configuration for the hint generator
#[derive(Debug, Clone)]
pub struct HintConfig {
    /// OpenAI API key
    pub openai_api_key: Option<String>,
    /// OpenAI model to use
    pub openai_model: String,
    /// Cloudflare account id for Workers AI
    pub cf_account_id: Option<String>,
    /// Cloudflare API token for Workers AI
    pub cf_api_token: Option<String>,
    /// Workers AI model to use
    pub workers_ai_model: String,
    /// Deadline for one hint round-trip
    pub timeout: Duration,
    /// Default max tokens for responses
    pub max_tokens: u32,
}

impl Default for HintConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            openai_model: "gpt-4o-mini".to_string(),
            cf_account_id: None,
            cf_api_token: None,
            workers_ai_model: "@cf/meta/llama-3.3-70b-instruct-fp8-fast".to_string(),
            timeout: Duration::from_secs(30),
            max_tokens: 150,
        }
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|v| {
        let trimmed = v.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

impl HintConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            openai_api_key: non_empty_env("OPENAI_API_KEY"),
            openai_model: non_empty_env("OPENAI_MODEL").unwrap_or(defaults.openai_model),
            cf_account_id: non_empty_env("CF_ACCOUNT_ID"),
            cf_api_token: non_empty_env("CF_API_TOKEN"),
            workers_ai_model: non_empty_env("WORKERS_AI_MODEL")
                .unwrap_or(defaults.workers_ai_model),
            timeout: non_empty_env("HINT_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            max_tokens: non_empty_env("HINT_MAX_TOKENS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_tokens),
        }
    }

    /// Build a generator from the first configured provider.
    /// OpenAI takes precedence when both are configured.
    pub fn build_generator(&self) -> HintResult<HintGenerator> {
        let provider: Box<dyn HintProvider> = if let Some(api_key) = &self.openai_api_key {
            Box::new(OpenAiProvider::new(
                api_key.clone(),
                self.openai_model.clone(),
            ))
        } else if let (Some(account_id), Some(api_token)) =
            (&self.cf_account_id, &self.cf_api_token)
        {
            Box::new(WorkersAiProvider::new(
                account_id.clone(),
                api_token.clone(),
                self.workers_ai_model.clone(),
            ))
        } else {
            return Err(HintError::ConfigError(
                "No hint provider configured. Set OPENAI_API_KEY or CF_ACCOUNT_ID/CF_API_TOKEN"
                    .to_string(),
            ));
        };

        Ok(HintGenerator::new(provider, self.timeout, self.max_tokens))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Player;
    use serial_test::serial;

    fn request(is_spy: bool) -> HintRequest {
        HintRequest {
            question: "What do you smell?".to_string(),
            player_name: "Alice".to_string(),
            location: Location {
                name: "Bakery".to_string(),
                roles: vec!["Baker".to_string()],
            },
            is_spy,
            recent_messages: vec![],
            max_tokens: None,
        }
    }

    #[test]
    fn personas_differ_by_spy_status() {
        let non_spy = request(false).system_prompt();
        let spy = request(true).system_prompt();

        assert!(non_spy.contains("Bakery"));
        assert!(!spy.contains("Bakery"), "spy prompt must not leak the location");
        assert!(spy.contains("blend in"));
    }

    #[test]
    fn history_maps_kinds_to_turns() {
        let alice = Player::new("Alice", true);
        let mut req = request(false);
        req.recent_messages = vec![
            Message::from_player(&alice, "Anyone around?"),
            Message::from_hint(&alice.id, "I hear seagulls."),
        ];

        assert_eq!(
            req.history(),
            vec![
                HistoryTurn::User("Alice: Anyone around?".to_string()),
                HistoryTurn::Assistant("I hear seagulls.".to_string()),
            ]
        );
        assert_eq!(req.question_turn(), "Alice asks: What do you smell?");
    }

    struct FailingProvider;

    #[async_trait]
    impl HintProvider for FailingProvider {
        async fn generate(&self, _request: &HintRequest) -> HintResult<String> {
            Err(HintError::ApiError("boom".to_string()))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    struct SlowProvider;

    #[async_trait]
    impl HintProvider for SlowProvider {
        async fn generate(&self, _request: &HintRequest) -> HintResult<String> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok("too late".to_string())
        }

        fn name(&self) -> &str {
            "slow"
        }
    }

    #[tokio::test]
    async fn provider_failure_degrades_to_fallback() {
        let generator =
            HintGenerator::new(Box::new(FailingProvider), Duration::from_secs(5), 150);
        assert_eq!(generator.hint(request(false)).await, FALLBACK_HINT);
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_degrades_to_fallback() {
        let generator =
            HintGenerator::new(Box::new(SlowProvider), Duration::from_millis(50), 150);
        assert_eq!(generator.hint(request(true)).await, FALLBACK_HINT);
    }

    #[test]
    fn default_config() {
        let config = HintConfig::default();
        assert_eq!(config.openai_model, "gpt-4o-mini");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.max_tokens, 150);
    }

    #[test]
    #[serial]
    fn from_env_ignores_blank_values() {
        std::env::set_var("OPENAI_API_KEY", "   ");
        std::env::set_var("HINT_TIMEOUT_SECS", "7");
        let config = HintConfig::from_env();
        std::env::remove_var("OPENAI_API_KEY");
        std::env::remove_var("HINT_TIMEOUT_SECS");

        assert!(config.openai_api_key.is_none());
        assert_eq!(config.timeout, Duration::from_secs(7));
    }

    #[test]
    #[serial]
    fn build_generator_requires_a_provider() {
        std::env::remove_var("OPENAI_API_KEY");
        std::env::remove_var("CF_ACCOUNT_ID");
        std::env::remove_var("CF_API_TOKEN");
        let config = HintConfig::from_env();
        assert!(matches!(
            config.build_generator(),
            Err(HintError::ConfigError(_))
        ));
    }
}
