use super::*;
use serde::{Deserialize, Serialize};

/// Cloudflare Workers AI provider, speaking the REST variant of the
/// binding the game originally ran against.
pub struct WorkersAiProvider {
    account_id: String,
    api_token: String,
    model: String,
    client: reqwest::Client,
}

impl WorkersAiProvider {
    pub fn new(account_id: String, api_token: String, model: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .unwrap_or_default();

        Self {
            account_id,
            api_token,
            model,
            client,
        }
    }

    fn run_url(&self) -> String {
        format!(
            "https://api.cloudflare.com/client/v4/accounts/{}/ai/run/{}",
            self.account_id, self.model
        )
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct RunRequest {
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct RunResponse {
    success: bool,
    #[serde(default)]
    result: Option<RunResult>,
    #[serde(default)]
    errors: Vec<ApiMessage>,
}

#[derive(Debug, Deserialize)]
struct RunResult {
    response: String,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    message: String,
}

#[async_trait]
impl HintProvider for WorkersAiProvider {
    async fn generate(&self, request: &HintRequest) -> HintResult<String> {
        let mut messages = vec![ChatMessage {
            role: "system",
            content: request.system_prompt(),
        }];

        for turn in request.history() {
            messages.push(match turn {
                HistoryTurn::User(content) => ChatMessage {
                    role: "user",
                    content,
                },
                HistoryTurn::Assistant(content) => ChatMessage {
                    role: "assistant",
                    content,
                },
            });
        }

        messages.push(ChatMessage {
            role: "user",
            content: request.question_turn(),
        });

        let body = RunRequest {
            messages,
            max_tokens: request.max_tokens,
            temperature: 0.7,
        };

        let response = self
            .client
            .post(self.run_url())
            .bearer_auth(&self.api_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| HintError::ApiError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(HintError::ApiError(format!(
                "Workers AI returned status {}",
                response.status()
            )));
        }

        let parsed: RunResponse = response
            .json()
            .await
            .map_err(|e| HintError::ParseError(e.to_string()))?;

        if !parsed.success {
            let detail = parsed
                .errors
                .first()
                .map(|e| e.message.clone())
                .unwrap_or_else(|| "unknown error".to_string());
            return Err(HintError::ApiError(detail));
        }

        parsed
            .result
            .map(|r| r.response.trim().to_string())
            .ok_or_else(|| HintError::ParseError("No result in response".to_string()))
    }

    fn name(&self) -> &str {
        "workers-ai"
    }
}
