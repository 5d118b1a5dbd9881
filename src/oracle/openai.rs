use crate::error::{Result, TraderError};
use crate::models::Decision;
use crate::oracle::{parse_decision, DecisionOracle};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const OPENAI_API_BASE: &str = "https://api.openai.com/v1";
const MODEL: &str = "gpt-4-turbo-preview";

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: MessageContent,
}

#[derive(Debug, Deserialize)]
struct MessageContent {
    content: String,
}

/// OpenAI chat-completions client used as the decision oracle.
pub struct OpenAiClient {
    api_key: String,
    client: reqwest::Client,
    base_url: String,
}

impl OpenAiClient {
    pub fn new(api_key: String) -> Result<Self> {
        Self::with_base_url(api_key, OPENAI_API_BASE.to_string())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| TraderError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_key,
            client,
            base_url,
        })
    }
}

#[async_trait]
impl DecisionOracle for OpenAiClient {
    async fn decide(
        &self,
        instructions: &str,
        market_json: &str,
        account_json: &str,
    ) -> Result<Decision> {
        let request = ChatRequest {
            model: MODEL.to_string(),
            response_format: ResponseFormat {
                format_type: "json_object".to_string(),
            },
            messages: vec![
                Message {
                    role: "system".to_string(),
                    content: instructions.to_string(),
                },
                Message {
                    role: "user".to_string(),
                    content: market_json.to_string(),
                },
                Message {
                    role: "user".to_string(),
                    content: account_json.to_string(),
                },
            ],
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| TraderError::OracleError(format!("network error: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TraderError::OracleError(format!(
                "OpenAI API error {}: {}",
                status, body
            )));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| TraderError::OracleError(format!("JSON decode error: {}", e)))?;

        let content = chat
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .ok_or_else(|| TraderError::OracleError("response contained no choices".to_string()))?;

        parse_decision(content)
    }
}
