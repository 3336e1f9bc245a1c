//! Ports: interfaces the application layer depends on
//!
//! Implementations (adapters) live in the infrastructure and presentation
//! layers and are injected at wiring time.

pub mod experiment_store;
pub mod llm_gateway;
pub mod progress;
