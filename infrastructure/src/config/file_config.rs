//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file and
//! are deserialized directly.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// OpenRouter API settings
    pub api: FileApiConfig,
    /// Council composition and deliberation settings
    pub council: FileCouncilConfig,
    /// Experiment storage settings
    pub storage: FileStorageConfig,
}

impl FileConfig {
    /// Judges to use for ranking: the configured judge panel, or the council
    /// models themselves when no separate panel is set.
    pub fn judges(&self) -> &[String] {
        if self.council.judges.is_empty() {
            &self.council.models
        } else {
            &self.council.judges
        }
    }
}

/// `[api]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileApiConfig {
    /// OpenRouter API key; `DELIBERATE_API_KEY` overrides
    pub key: Option<String>,
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Retry attempts for timeouts and 5xx responses
    pub max_retries: u32,
}

impl Default for FileApiConfig {
    fn default() -> Self {
        Self {
            key: None,
            base_url: "https://openrouter.ai/api/v1".to_string(),
            timeout_secs: 60,
            max_retries: 3,
        }
    }
}

/// `[council]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCouncilConfig {
    /// Models that answer questions (OpenRouter ids, e.g. "openai/gpt-4o")
    pub models: Vec<String>,
    /// Models that rank answers; defaults to `models` when empty
    pub judges: Vec<String>,
    /// Upper bound on deliberation rounds
    pub max_rounds: u32,
}

impl Default for FileCouncilConfig {
    fn default() -> Self {
        Self {
            models: Vec::new(),
            judges: Vec::new(),
            max_rounds: 3,
        }
    }
}

/// `[storage]` section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStorageConfig {
    /// Directory for experiment JSON files; defaults to the platform data dir
    pub data_dir: Option<PathBuf>,
}

impl FileStorageConfig {
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("llm-deliberate")
                .join("experiments")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[api]
key = "sk-or-v1-test"
timeout_secs = 30

[council]
models = ["openai/gpt-4o", "anthropic/claude-3.5-sonnet"]
judges = ["openai/gpt-4o"]
max_rounds = 5

[storage]
data_dir = "/tmp/deliberate"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.api.key.as_deref(), Some("sk-or-v1-test"));
        assert_eq!(config.api.timeout_secs, 30);
        // Unset fields keep their defaults
        assert_eq!(config.api.base_url, "https://openrouter.ai/api/v1");
        assert_eq!(config.api.max_retries, 3);
        assert_eq!(config.council.models.len(), 2);
        assert_eq!(config.council.max_rounds, 5);
        assert_eq!(
            config.storage.data_dir(),
            PathBuf::from("/tmp/deliberate")
        );
    }

    #[test]
    fn test_default_config() {
        let config = FileConfig::default();
        assert!(config.api.key.is_none());
        assert!(config.council.models.is_empty());
        assert_eq!(config.council.max_rounds, 3);
    }

    #[test]
    fn test_judges_fall_back_to_models() {
        let mut config = FileConfig::default();
        config.council.models = vec!["m1".to_string(), "m2".to_string()];
        assert_eq!(config.judges(), config.council.models.as_slice());

        config.council.judges = vec!["j1".to_string()];
        assert_eq!(config.judges(), &["j1".to_string()]);
    }
}
