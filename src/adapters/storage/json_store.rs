use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use tokio::io::AsyncWriteExt;
use tracing::debug;
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::TrialResult;
use crate::domain::ports::ResultStore;

/// Writes each trial result to its own pretty-printed JSON file.
///
/// File names are `<UTC timestamp with microseconds>-<uuid>.json`, so two
/// saves never share a key even when they land in the same microsecond.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn artifact_path(&self) -> PathBuf {
        let stamp = Utc::now().format("%Y-%m-%dT%H-%M-%S%.6fZ");
        self.dir.join(format!("{stamp}-{}.json", Uuid::new_v4()))
    }
}

#[async_trait]
impl ResultStore for JsonFileStore {
    async fn save(&self, result: &TrialResult) -> DomainResult<PathBuf> {
        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            DomainError::Persistence(format!("failed to create {}: {e}", self.dir.display()))
        })?;

        let json = serde_json::to_vec_pretty(result)?;
        let path = self.artifact_path();

        // create_new: an existing artifact is never overwritten
        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| DomainError::Persistence(format!("failed to open {}: {e}", path.display())))?;
        file.write_all(&json).await?;
        file.flush().await?;

        debug!(trial_id = result.trial_id, path = %path.display(), "trial result saved");
        Ok(path)
    }
}
