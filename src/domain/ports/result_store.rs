use std::path::PathBuf;

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::TrialResult;

/// Write-only destination for finished trial results.
///
/// Every call must produce a distinct artifact key; the core never reads
/// artifacts back.
#[async_trait]
pub trait ResultStore: Send + Sync {
    async fn save(&self, result: &TrialResult) -> DomainResult<PathBuf>;
}
