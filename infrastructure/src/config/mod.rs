//! Configuration management
//!
//! Raw TOML data types and the multi-source loader that merges them.

mod file_config;
mod loader;

pub use file_config::{FileApiConfig, FileConfig, FileCouncilConfig, FileStorageConfig};
pub use loader::ConfigLoader;
