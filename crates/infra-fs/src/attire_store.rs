// JSON attire log file

use crate::atomic::{persistence, write_atomic};
use adversim_core::domain::AttireLog;
use adversim_core::port::AttireStore;
use adversim_core::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::trace;

/// Writes the attire log as two-space pretty JSON, replacing the file each time
pub struct JsonAttireStore {
    path: PathBuf,
}

impl JsonAttireStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl AttireStore for JsonAttireStore {
    async fn save(&self, log: &AttireLog) -> Result<()> {
        let mut bytes = serde_json::to_vec_pretty(log).map_err(|e| persistence(&self.path, e))?;
        bytes.push(b'\n');
        write_atomic(&self.path, &bytes).await?;
        trace!(path = %self.path.display(), procedures = log.procedures.len(), "Attire log saved");
        Ok(())
    }
}
