//! OpenRouter chat-completions adapter
//!
//! Implements [`LlmGateway`] against the OpenRouter API: bearer auth,
//! exponential backoff on timeouts and 5xx, tolerant content extraction, and
//! a TTL-cached model catalog used for cost estimation.

use crate::config::FileApiConfig;
use async_trait::async_trait;
use deliberate_application::{GatewayError, LlmGateway, LlmReply, ModelInfo};
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// How long a fetched model catalog stays fresh
const CATALOG_TTL: Duration = Duration::from_secs(3600);

/// Hard cap on completion length requested from providers
const MAX_TOKENS: u32 = 2000;

/// OpenRouter gateway with retry logic and cost tracking
pub struct OpenRouterGateway {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    max_retries: u32,
    catalog: Mutex<Option<CachedCatalog>>,
}

struct CachedCatalog {
    models: Vec<ModelInfo>,
    fetched_at: Instant,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<ChatMessage>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<Value>,
}

#[derive(Deserialize, Default)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

#[derive(Deserialize)]
struct CatalogResponse {
    #[serde(default)]
    data: Vec<CatalogEntry>,
}

#[derive(Deserialize)]
struct CatalogEntry {
    #[serde(default)]
    id: String,
    name: Option<String>,
    pricing: Option<CatalogPricing>,
    context_length: Option<u32>,
}

#[derive(Deserialize, Default)]
struct CatalogPricing {
    prompt: Option<Value>,
    completion: Option<Value>,
}

impl OpenRouterGateway {
    /// Build a gateway from the `[api]` config section.
    ///
    /// Fails when no API key is configured.
    pub fn from_config(config: &FileApiConfig) -> Result<Self, GatewayError> {
        let api_key = match config.key.as_deref() {
            Some(key) if !key.trim().is_empty() => key.to_string(),
            _ => return Err(GatewayError::MissingApiKey),
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GatewayError::Other(e.to_string()))?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_retries: config.max_retries.max(1),
            catalog: Mutex::new(None),
        })
    }

    /// POST to /chat/completions with exponential backoff.
    ///
    /// Timeouts, connection failures, and 5xx responses are retried; any 4xx
    /// fails immediately.
    async fn call_api(&self, model: &str, prompt: &str) -> Result<(ChatResponse, u64), GatewayError> {
        let body = json!({
            "model": model,
            "messages": [{"role": "user", "content": prompt}],
            "temperature": 0.7,
            "max_tokens": MAX_TOKENS,
        });

        let mut last_error = String::new();

        for attempt in 1..=self.max_retries {
            if attempt > 1 {
                let backoff = Duration::from_secs((1u64 << (attempt - 2)).min(10));
                debug!("Retrying {} after {:?} (attempt {})", model, backoff, attempt);
                tokio::time::sleep(backoff).await;
            }

            let start = Instant::now();
            let result = self
                .client
                .post(format!("{}/chat/completions", self.base_url))
                .bearer_auth(&self.api_key)
                .header("HTTP-Referer", "https://llm-deliberate.research")
                .header("X-Title", "LLM Deliberate")
                .json(&body)
                .send()
                .await;

            match result {
                Ok(response) => {
                    let status = response.status();
                    if status.is_server_error() {
                        last_error = format!("HTTP {}", status.as_u16());
                        warn!("{} returned {} (attempt {})", model, status, attempt);
                        continue;
                    }
                    if !status.is_success() {
                        let detail = response.text().await.unwrap_or_default();
                        return Err(GatewayError::RequestFailed {
                            model: model.to_string(),
                            message: format!("HTTP {}: {}", status.as_u16(), detail),
                        });
                    }

                    let latency_ms = start.elapsed().as_millis() as u64;
                    let parsed = response
                        .json::<ChatResponse>()
                        .await
                        .map_err(|e| GatewayError::RequestFailed {
                            model: model.to_string(),
                            message: format!("malformed response: {}", e),
                        })?;
                    return Ok((parsed, latency_ms));
                }
                Err(e) if e.is_timeout() || e.is_connect() => {
                    last_error = e.to_string();
                    warn!("{} request failed (attempt {}): {}", model, attempt, e);
                }
                Err(e) => {
                    return Err(GatewayError::RequestFailed {
                        model: model.to_string(),
                        message: e.to_string(),
                    });
                }
            }
        }

        if last_error.contains("timed out") {
            Err(GatewayError::Timeout(self.max_retries))
        } else {
            Err(GatewayError::RequestFailed {
                model: model.to_string(),
                message: format!("{} after {} attempts", last_error, self.max_retries),
            })
        }
    }

    /// Catalog lookup with TTL cache; falls back to the static table when the
    /// fetch fails so cost estimation keeps working offline.
    async fn catalog(&self) -> Vec<ModelInfo> {
        let mut cache = self.catalog.lock().await;
        if let Some(cached) = cache.as_ref()
            && cached.fetched_at.elapsed() < CATALOG_TTL
        {
            return cached.models.clone();
        }

        let models = match self.fetch_catalog().await {
            Ok(models) if !models.is_empty() => models,
            Ok(_) => fallback_models(),
            Err(e) => {
                warn!("Model catalog fetch failed, using fallback table: {}", e);
                fallback_models()
            }
        };

        *cache = Some(CachedCatalog {
            models: models.clone(),
            fetched_at: Instant::now(),
        });
        models
    }

    async fn fetch_catalog(&self) -> Result<Vec<ModelInfo>, GatewayError> {
        let response = self
            .client
            .get(format!("{}/models", self.base_url))
            .timeout(Duration::from_secs(10))
            .send()
            .await
            .map_err(|e| GatewayError::Other(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GatewayError::Other(format!(
                "catalog HTTP {}",
                response.status().as_u16()
            )));
        }

        let catalog = response
            .json::<CatalogResponse>()
            .await
            .map_err(|e| GatewayError::Other(e.to_string()))?;

        Ok(catalog.data.into_iter().map(catalog_entry_to_info).collect())
    }
}

#[async_trait]
impl LlmGateway for OpenRouterGateway {
    async fn generate(&self, prompt: &str, model: &str) -> Result<LlmReply, GatewayError> {
        let (response, latency_ms) = self.call_api(model, prompt).await?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| GatewayError::RequestFailed {
                model: model.to_string(),
                message: "response contained no choices".to_string(),
            })?;

        let content = choice
            .message
            .and_then(|m| m.content)
            .map(|raw| extract_text_content(&raw))
            .unwrap_or_default();

        // Blank completions (typically 0 output tokens) must not be persisted
        if content.trim().is_empty() {
            return Err(GatewayError::EmptyCompletion {
                model: model.to_string(),
                finish_reason: choice.finish_reason.unwrap_or_else(|| "unknown".to_string()),
            });
        }

        let usage = response.usage.unwrap_or_default();
        let cost_usd = self
            .catalog()
            .await
            .iter()
            .find(|info| info.id == model)
            .map(|info| info.estimate_cost(usage.prompt_tokens, usage.completion_tokens))
            .unwrap_or(0.0);

        Ok(LlmReply {
            content,
            tokens_input: usage.prompt_tokens,
            tokens_output: usage.completion_tokens,
            latency_ms,
            cost_usd,
            model_id: model.to_string(),
            provider: provider_from_id(model),
        })
    }

    async fn available_models(&self) -> Result<Vec<ModelInfo>, GatewayError> {
        Ok(self.catalog().await)
    }
}

/// Normalize OpenRouter message content into plain text.
///
/// Accepts a bare string, an object carrying `text` or `content`, or an array
/// of such parts; anything else yields an empty string.
pub(crate) fn extract_text_content(raw: &Value) -> String {
    match raw {
        Value::String(s) => s.clone(),
        Value::Object(_) => text_from_part(raw).unwrap_or_default(),
        Value::Array(parts) => parts
            .iter()
            .filter_map(text_from_part)
            .collect::<Vec<_>>()
            .join(""),
        _ => String::new(),
    }
}

fn text_from_part(part: &Value) -> Option<String> {
    match part {
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => map
            .get("text")
            .or_else(|| map.get("content"))
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    }
}

/// "openai/gpt-4o" -> "openai"; ids without a slash report "unknown".
fn provider_from_id(model: &str) -> String {
    model
        .split_once('/')
        .map(|(provider, _)| provider.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn catalog_entry_to_info(entry: CatalogEntry) -> ModelInfo {
    let pricing = entry.pricing.unwrap_or_default();
    ModelInfo {
        provider: provider_from_id(&entry.id),
        name: entry.name.unwrap_or_else(|| entry.id.clone()),
        prompt_price: price_to_f64(pricing.prompt.as_ref()),
        completion_price: price_to_f64(pricing.completion.as_ref()),
        context_window: entry.context_length.unwrap_or(4096),
        id: entry.id,
    }
}

/// OpenRouter serializes prices as strings ("0.0000025"); tolerate numbers too.
fn price_to_f64(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::String(s)) => s.parse().unwrap_or(0.0),
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Static catalog used when the /models fetch is unavailable.
fn fallback_models() -> Vec<ModelInfo> {
    // Prices in USD per token, matching OpenRouter's pricing object
    vec![
        ModelInfo {
            id: "openai/gpt-4o".into(),
            name: "GPT-4o".into(),
            provider: "openai".into(),
            prompt_price: 0.0025 / 1000.0,
            completion_price: 0.01 / 1000.0,
            context_window: 128_000,
        },
        ModelInfo {
            id: "openai/gpt-4-turbo".into(),
            name: "GPT-4 Turbo".into(),
            provider: "openai".into(),
            prompt_price: 0.01 / 1000.0,
            completion_price: 0.03 / 1000.0,
            context_window: 128_000,
        },
        ModelInfo {
            id: "anthropic/claude-3.5-sonnet".into(),
            name: "Claude 3.5 Sonnet".into(),
            provider: "anthropic".into(),
            prompt_price: 0.003 / 1000.0,
            completion_price: 0.015 / 1000.0,
            context_window: 200_000,
        },
        ModelInfo {
            id: "anthropic/claude-3-opus".into(),
            name: "Claude 3 Opus".into(),
            provider: "anthropic".into(),
            prompt_price: 0.015 / 1000.0,
            completion_price: 0.075 / 1000.0,
            context_window: 200_000,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_plain_string() {
        assert_eq!(extract_text_content(&json!("hello")), "hello");
    }

    #[test]
    fn test_extract_object_with_text() {
        assert_eq!(extract_text_content(&json!({"text": "hi"})), "hi");
        assert_eq!(extract_text_content(&json!({"content": "hi"})), "hi");
    }

    #[test]
    fn test_extract_content_parts() {
        let raw = json!([
            {"type": "text", "text": "part one "},
            "part two",
            {"irrelevant": true},
        ]);
        assert_eq!(extract_text_content(&raw), "part one part two");
    }

    #[test]
    fn test_extract_null_and_numbers() {
        assert_eq!(extract_text_content(&json!(null)), "");
        assert_eq!(extract_text_content(&json!(42)), "");
    }

    #[test]
    fn test_provider_from_id() {
        assert_eq!(provider_from_id("openai/gpt-4o"), "openai");
        assert_eq!(provider_from_id("local-model"), "unknown");
    }

    #[test]
    fn test_price_to_f64_accepts_strings_and_numbers() {
        assert_eq!(price_to_f64(Some(&json!("0.0000025"))), 0.0000025);
        assert_eq!(price_to_f64(Some(&json!(0.001))), 0.001);
        assert_eq!(price_to_f64(Some(&json!("garbage"))), 0.0);
        assert_eq!(price_to_f64(None), 0.0);
    }

    #[test]
    fn test_catalog_entry_conversion() {
        let entry = CatalogEntry {
            id: "openai/gpt-4o".into(),
            name: None,
            pricing: Some(CatalogPricing {
                prompt: Some(json!("0.0000025")),
                completion: Some(json!("0.00001")),
            }),
            context_length: Some(128_000),
        };

        let info = catalog_entry_to_info(entry);
        assert_eq!(info.name, "openai/gpt-4o");
        assert_eq!(info.provider, "openai");
        assert_eq!(info.prompt_price, 0.0000025);
    }

    #[test]
    fn test_missing_api_key_rejected() {
        let config = FileApiConfig::default();
        assert!(matches!(
            OpenRouterGateway::from_config(&config),
            Err(GatewayError::MissingApiKey)
        ));

        let blank = FileApiConfig {
            key: Some("   ".into()),
            ..FileApiConfig::default()
        };
        assert!(matches!(
            OpenRouterGateway::from_config(&blank),
            Err(GatewayError::MissingApiKey)
        ));
    }

    #[test]
    fn test_fallback_models_cover_defaults() {
        let models = fallback_models();
        assert!(models.iter().any(|m| m.id == "openai/gpt-4o"));
        assert!(models.iter().any(|m| m.provider == "anthropic"));
    }
}
