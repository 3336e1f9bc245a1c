//! Experiment persistence port

use async_trait::async_trait;
use deliberate_domain::Experiment;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during store operations
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Experiment '{0}' not found")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Corrupt experiment data in {path}: {message}")]
    Corrupt { path: String, message: String },
}

/// One line in an experiment listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentSummary {
    pub id: String,
    pub name: String,
    pub question_count: usize,
}

/// Storage for experiments
///
/// The storage format is the adapter's concern; the application layer only
/// sees whole [`Experiment`] snapshots.
#[async_trait]
pub trait ExperimentStore: Send + Sync {
    async fn load(&self, experiment_id: &str) -> Result<Experiment, StoreError>;

    async fn save(&self, experiment: &Experiment) -> Result<(), StoreError>;

    async fn list(&self) -> Result<Vec<ExperimentSummary>, StoreError>;

    async fn delete(&self, experiment_id: &str) -> Result<(), StoreError>;
}
