use super::*;
use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};

/// OpenAI provider implementation
pub struct OpenAiProvider {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiProvider {
    /// Create a new OpenAI provider with the given API key and model
    pub fn new(api_key: String, model: String) -> Self {
        let config = OpenAIConfig::new().with_api_key(api_key);
        let client = Client::with_config(config);

        Self { client, model }
    }
}

#[async_trait]
impl HintProvider for OpenAiProvider {
    async fn generate(&self, request: &HintRequest) -> HintResult<String> {
        let mut messages: Vec<ChatCompletionRequestMessage> = Vec::new();

        messages.push(
            ChatCompletionRequestSystemMessageArgs::default()
                .content(request.system_prompt())
                .build()
                .map_err(|e| HintError::ApiError(e.to_string()))?
                .into(),
        );

        for turn in request.history() {
            let msg = match turn {
                HistoryTurn::User(content) => ChatCompletionRequestUserMessageArgs::default()
                    .content(content)
                    .build()
                    .map_err(|e| HintError::ApiError(e.to_string()))?
                    .into(),
                HistoryTurn::Assistant(content) => {
                    ChatCompletionRequestAssistantMessageArgs::default()
                        .content(content)
                        .build()
                        .map_err(|e| HintError::ApiError(e.to_string()))?
                        .into()
                }
            };
            messages.push(msg);
        }

        messages.push(
            ChatCompletionRequestUserMessageArgs::default()
                .content(request.question_turn())
                .build()
                .map_err(|e| HintError::ApiError(e.to_string()))?
                .into(),
        );

        let mut req_builder = CreateChatCompletionRequestArgs::default();
        req_builder.model(&self.model).messages(messages);
        if let Some(max_tokens) = request.max_tokens {
            req_builder.max_tokens(max_tokens);
        }

        let chat_request = req_builder
            .build()
            .map_err(|e| HintError::ApiError(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(chat_request)
            .await
            .map_err(|e| HintError::ApiError(e.to_string()))?;

        let text = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| HintError::ParseError("No content in response".to_string()))?;

        Ok(text.trim().to_string())
    }

    fn name(&self) -> &str {
        "openai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Location;

    #[tokio::test]
    #[ignore] // Only run with actual API key
    async fn test_openai_generate() {
        let api_key = std::env::var("OPENAI_API_KEY").expect("OPENAI_API_KEY not set");
        let provider = OpenAiProvider::new(api_key, "gpt-4o-mini".to_string());

        let request = HintRequest {
            question: "What can you see around here?".to_string(),
            player_name: "Alice".to_string(),
            location: Location {
                name: "Submarine".to_string(),
                roles: vec!["Captain".to_string()],
            },
            is_spy: false,
            recent_messages: vec![],
            max_tokens: Some(100),
        };

        let text = provider.generate(&request).await.unwrap();
        assert!(!text.is_empty());
        println!("Generated hint: {}", text);
    }
}
