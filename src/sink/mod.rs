use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::info;

use crate::error::{HarvestError, Result};
use crate::models::Listing;

/// Writes one JSON artifact per run into a fixed output directory.
#[derive(Debug, Clone)]
pub struct ResultSink {
    dir: PathBuf,
}

impl ResultSink {
    /// Create the sink, creating `dir` (and parents) if it does not exist yet.
    pub async fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();

        if !tokio::fs::try_exists(&dir).await.unwrap_or(false) {
            info!("Creating output directory {}", dir.display());
        }
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|source| HarvestError::OutputDir {
                path: dir.clone(),
                source,
            })?;

        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Artifact location for a run that started at `started_at`.
    pub fn artifact_path(&self, started_at: DateTime<Utc>) -> PathBuf {
        self.dir.join(format!(
            "scrape-result_{}.json",
            started_at.timestamp_millis()
        ))
    }

    /// Serialize `listings` with 2-space indentation and write the artifact.
    pub async fn write(&self, listings: &[Listing], started_at: DateTime<Utc>) -> Result<PathBuf> {
        let path = self.artifact_path(started_at);
        let json = serde_json::to_string_pretty(listings)?;

        tokio::fs::write(&path, json)
            .await
            .map_err(|source| HarvestError::Write {
                path: path.clone(),
                source,
            })?;

        info!("Saved {} listings to {}", listings.len(), path.display());
        Ok(path)
    }
}
