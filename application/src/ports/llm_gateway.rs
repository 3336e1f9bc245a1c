//! LLM Gateway port
//!
//! Defines the interface for communicating with model providers. The
//! OpenRouter adapter in the infrastructure layer implements it; tests use
//! in-memory fakes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during LLM gateway operations
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Request failed for {model}: {message}")]
    RequestFailed { model: String, message: String },

    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    #[error("Empty completion from {model} (finish_reason={finish_reason})")]
    EmptyCompletion { model: String, finish_reason: String },

    #[error("API key not configured (set DELIBERATE_API_KEY or [api].key)")]
    MissingApiKey,

    #[error("Timeout after {0} attempts")]
    Timeout(u32),

    #[error("Other error: {0}")]
    Other(String),
}

/// One completed generation from a model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmReply {
    pub content: String,
    pub tokens_input: u32,
    pub tokens_output: u32,
    pub latency_ms: u64,
    pub cost_usd: f64,
    /// Provider-qualified model id (e.g., "openai/gpt-4o")
    pub model_id: String,
    /// Provider name (e.g., "openai")
    pub provider: String,
}

/// Catalog entry describing an available model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    pub name: String,
    pub provider: String,
    /// USD per input token
    pub prompt_price: f64,
    /// USD per output token
    pub completion_price: f64,
    pub context_window: u32,
}

impl ModelInfo {
    /// Estimated cost of one call in USD.
    pub fn estimate_cost(&self, tokens_input: u32, tokens_output: u32) -> f64 {
        f64::from(tokens_input) * self.prompt_price
            + f64::from(tokens_output) * self.completion_price
    }
}

/// Gateway for model communication
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Send a prompt to a model and wait for its completion.
    async fn generate(&self, prompt: &str, model: &str) -> Result<LlmReply, GatewayError>;

    /// Models the provider currently offers.
    async fn available_models(&self) -> Result<Vec<ModelInfo>, GatewayError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_cost() {
        let info = ModelInfo {
            id: "openai/gpt-4o".into(),
            name: "GPT-4o".into(),
            provider: "openai".into(),
            prompt_price: 0.0025 / 1000.0,
            completion_price: 0.01 / 1000.0,
            context_window: 128_000,
        };

        let cost = info.estimate_cost(1000, 500);
        assert!((cost - (0.0025 + 0.005)).abs() < 1e-12);
    }

    #[test]
    fn test_gateway_error_display() {
        let error = GatewayError::EmptyCompletion {
            model: "gpt-4o".into(),
            finish_reason: "length".into(),
        };
        assert!(error.to_string().contains("gpt-4o"));
        assert!(error.to_string().contains("length"));
    }
}
