//! Infrastructure layer for llm-deliberate
//!
//! Adapters implementing the application's ports: the OpenRouter HTTP
//! gateway, the TOML configuration loader, JSON experiment storage, and CSV
//! export.

pub mod config;
pub mod export;
pub mod providers;
pub mod storage;

pub use config::{ConfigLoader, FileConfig};
pub use providers::OpenRouterGateway;
pub use storage::JsonExperimentStore;
