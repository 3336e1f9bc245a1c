//! JSON file experiment store
//!
//! One pretty-printed JSON file per experiment under the data directory,
//! named `<experiment-id>.json`.

use async_trait::async_trait;
use deliberate_application::{ExperimentStore, ExperimentSummary, StoreError};
use deliberate_domain::Experiment;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Experiment store backed by JSON files
pub struct JsonExperimentStore {
    data_dir: PathBuf,
}

impl JsonExperimentStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    fn experiment_path(&self, experiment_id: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", experiment_id))
    }

    async fn ensure_data_dir(&self) -> Result<(), StoreError> {
        fs::create_dir_all(&self.data_dir)
            .await
            .map_err(|e| StoreError::Io(format!("{}: {}", self.data_dir.display(), e)))
    }

    async fn read_experiment(path: &Path) -> Result<Experiment, StoreError> {
        let contents = fs::read_to_string(path)
            .await
            .map_err(|e| StoreError::Io(format!("{}: {}", path.display(), e)))?;

        serde_json::from_str(&contents).map_err(|e| StoreError::Corrupt {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl ExperimentStore for JsonExperimentStore {
    async fn load(&self, experiment_id: &str) -> Result<Experiment, StoreError> {
        let path = self.experiment_path(experiment_id);
        if !path.exists() {
            return Err(StoreError::NotFound(experiment_id.to_string()));
        }
        Self::read_experiment(&path).await
    }

    async fn save(&self, experiment: &Experiment) -> Result<(), StoreError> {
        self.ensure_data_dir().await?;

        let path = self.experiment_path(&experiment.id);
        let json = serde_json::to_string_pretty(experiment)
            .map_err(|e| StoreError::Io(e.to_string()))?;

        debug!("Saving experiment {} to {}", experiment.id, path.display());
        fs::write(&path, json)
            .await
            .map_err(|e| StoreError::Io(format!("{}: {}", path.display(), e)))
    }

    async fn list(&self) -> Result<Vec<ExperimentSummary>, StoreError> {
        if !self.data_dir.exists() {
            return Ok(Vec::new());
        }

        let mut entries = fs::read_dir(&self.data_dir)
            .await
            .map_err(|e| StoreError::Io(format!("{}: {}", self.data_dir.display(), e)))?;

        let mut summaries = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StoreError::Io(e.to_string()))?
        {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }

            // One unreadable file must not hide the rest of the listing
            match Self::read_experiment(&path).await {
                Ok(experiment) => summaries.push(ExperimentSummary {
                    id: experiment.id,
                    name: experiment.name,
                    question_count: experiment.questions.len(),
                }),
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", path.display(), e);
                }
            }
        }

        summaries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(summaries)
    }

    async fn delete(&self, experiment_id: &str) -> Result<(), StoreError> {
        let path = self.experiment_path(experiment_id);
        if !path.exists() {
            return Err(StoreError::NotFound(experiment_id.to_string()));
        }
        fs::remove_file(&path)
            .await
            .map_err(|e| StoreError::Io(format!("{}: {}", path.display(), e)))
    }
}
