// Decision oracle: an external advisory service that turns market and
// account context into a buy/sell/hold recommendation.
pub mod openai;

pub use openai::OpenAiClient;

use crate::error::{Result, TraderError};
use crate::models::Decision;
use async_trait::async_trait;

/// One request/response exchange per cycle.
#[async_trait]
pub trait DecisionOracle: Send + Sync {
    /// `instructions` is the opaque system prompt, `market_json` the
    /// serialized daily+hourly indicator dataset, `account_json` the
    /// serialized account status.
    async fn decide(
        &self,
        instructions: &str,
        market_json: &str,
        account_json: &str,
    ) -> Result<Decision>;
}

/// Parse the oracle's message content into a `Decision`.
///
/// Markdown code fences around the JSON are tolerated. Anything that is
/// not a JSON object with a `decision` field is a malformed decision.
pub fn parse_decision(content: &str) -> Result<Decision> {
    let mut text = content.trim();
    if text.starts_with("```") {
        text = text
            .trim_start_matches("```json")
            .trim_start_matches("```")
            .trim_end_matches("```")
            .trim();
    }

    serde_json::from_str::<Decision>(text).map_err(|e| {
        TraderError::MalformedDecision(format!("{} (content: {})", e, content.trim()))
    })
}
