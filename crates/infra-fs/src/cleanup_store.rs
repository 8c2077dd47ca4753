// JSON cleanup snapshot file

use crate::atomic::{persistence, write_atomic};
use adversim_core::domain::{Link, LinkRecord};
use adversim_core::port::CleanupStore;
use adversim_core::{AppError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Cleanup queue stored as a JSON array of link records
///
/// Saving and loading may use different files: a normal run writes
/// `cleanups.json`, a standalone cleanup reads it and writes its remainder to
/// `not_completed_cleanups.json`.
pub struct JsonCleanupStore {
    path: PathBuf,
}

impl JsonCleanupStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CleanupStore for JsonCleanupStore {
    async fn save(&self, links: &[Link]) -> Result<()> {
        let records: Vec<LinkRecord> = links.iter().map(LinkRecord::from).collect();
        let mut bytes = serde_json::to_vec_pretty(&records).map_err(|e| persistence(&self.path, e))?;
        bytes.push(b'\n');
        write_atomic(&self.path, &bytes).await?;
        trace!(path = %self.path.display(), links = records.len(), "Cleanup snapshot saved");
        Ok(())
    }

    async fn load(&self) -> Result<Vec<Link>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(AppError::NotFound(format!(
                    "cleanup snapshot {}",
                    self.path.display()
                )))
            }
            Err(e) => return Err(persistence(&self.path, e)),
        };

        let records: Vec<LinkRecord> =
            serde_json::from_slice(&bytes).map_err(|e| persistence(&self.path, e))?;
        debug!(path = %self.path.display(), links = records.len(), "Cleanup snapshot loaded");
        Ok(records.into_iter().map(Link::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adversim_core::domain::{Ability, Executor};
    use std::time::Duration;

    fn link(command: &str) -> Link {
        let ability = Ability::new("abil", "Stage", "T1074");
        let executor = Executor::new("sh", command).with_timeout(90);
        Link::new(format!("id-{command}"), &ability, &executor, command, Duration::from_secs(2), true)
    }

    #[tokio::test]
    async fn test_save_then_load_keeps_queue_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonCleanupStore::new(dir.path().join("cleanups.json"));

        store.save(&[link("a"), link("b")]).await.unwrap();
        let loaded = store.load().await.unwrap();

        let commands: Vec<_> = loaded.iter().map(|l| l.command.as_str()).collect();
        assert_eq!(commands, vec!["a", "b"]);
        assert_eq!(loaded[0].timeout, Duration::from_secs(90));
        assert!(loaded[0].is_cleanup);
    }

    #[tokio::test]
    async fn test_file_uses_duration_strings() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonCleanupStore::new(dir.path().join("cleanups.json"));

        store.save(&[link("a")]).await.unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(value[0]["timeout"], "1m30s");
        assert_eq!(value[0]["jitter"], "2s");
        assert_eq!(value[0]["procedure-name"], "Stage");
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonCleanupStore::new(dir.path().join("absent.json"));

        let result = store.load().await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
