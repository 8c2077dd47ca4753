//! Standalone cleanup: persisted queue -> LIFO replay -> remainder file
#![cfg(unix)]

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use adversim_core::application::{stop_channel, ExecutingServices, Operation, OperationPorts, StopSender, StopToken};
use adversim_core::domain::{Ability, Executor, HostProfile, Link, LinkStatus};
use adversim_core::port::id_provider::mocks::SequentialIdProvider;
use adversim_core::port::random_source::mocks::ZeroRandom;
use adversim_core::port::{CleanupStore, ExecutingService, ExecutionError, SystemTimeProvider};
use adversim_infra_fs::{
    JsonAttireStore, JsonCleanupStore, CLEANUPS_FILE, CLEANUP_LOG_FILE, NOT_COMPLETED_CLEANUPS_FILE,
};
use adversim_infra_system::{service_for, ShService};
use async_trait::async_trait;

fn host() -> HostProfile {
    HostProfile::new(std::env::consts::OS, vec!["sh".to_string()], "127.0.0.1")
}

fn ports(out: &Path) -> OperationPorts {
    OperationPorts {
        services: ExecutingServices::for_host(&host(), service_for),
        attire_store: Arc::new(JsonAttireStore::new(out.join(CLEANUP_LOG_FILE))),
        cleanup_store: Arc::new(JsonCleanupStore::new(out.join(NOT_COMPLETED_CLEANUPS_FILE))),
        id_provider: Arc::new(SequentialIdProvider::new("op")),
        random: Arc::new(ZeroRandom),
        time_provider: Arc::new(SystemTimeProvider),
    }
}

/// Queue that appends its position to `trace` when run
fn queue(trace: &Path, n: usize) -> Vec<Link> {
    let ability = Ability::new("cleanup", "Revert staging", "T1070");
    (1..=n)
        .map(|i| {
            let command = format!("echo {i} >> {}", trace.display());
            let executor = Executor::new("sh", command.clone());
            Link::new(format!("link-{i}"), &ability, &executor, command, Duration::ZERO, true)
        })
        .collect()
}

async fn persist(out: &Path, links: &[Link]) {
    JsonCleanupStore::new(out.join(CLEANUPS_FILE)).save(links).await.unwrap();
}

/// Queue is replayed last-first and drained to an empty remainder
#[tokio::test]
async fn test_cleanup_replays_lifo() {
    let out = tempfile::tempdir().unwrap();
    let trace = out.path().join("trace.txt");
    persist(out.path(), &queue(&trace, 3)).await;

    let links = JsonCleanupStore::new(out.path().join(CLEANUPS_FILE)).load().await.unwrap();
    let mut op = Operation::for_cleanup(links, host(), ports(out.path()));
    op.resume_cleanup(&StopToken::never()).await.unwrap();

    assert_eq!(fs::read_to_string(&trace).unwrap(), "3\n2\n1\n");
    assert!(op.links().iter().all(|l| l.status == LinkStatus::Success));

    let remainder = JsonCleanupStore::new(out.path().join(NOT_COMPLETED_CLEANUPS_FILE)).load().await.unwrap();
    assert!(remainder.is_empty());

    let log: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.path().join(CLEANUP_LOG_FILE)).unwrap()).unwrap();
    assert_eq!(log["procedures"][0]["cleanupCommands"].as_array().unwrap().len(), 3);
}

/// Real `sh` service that raises the stop signal after its first command
struct StopAfterFirst {
    inner: ShService,
    stop_tx: StopSender,
}

#[async_trait]
impl ExecutingService for StopAfterFirst {
    async fn execute(&self, command: &str, timeout: Duration) -> Result<String, ExecutionError> {
        let result = self.inner.execute(command, timeout).await;
        self.stop_tx.stop();
        result
    }

    fn short_name(&self) -> &str {
        self.inner.short_name()
    }
}

/// Interrupting after the first link leaves the other N-1 on disk, in order
#[tokio::test]
async fn test_interrupted_cleanup_leaves_remainder() {
    let out = tempfile::tempdir().unwrap();
    let trace = out.path().join("trace.txt");
    let original = queue(&trace, 4);
    persist(out.path(), &original).await;

    let (stop_tx, stop) = stop_channel();
    let mut services = ExecutingServices::new();
    services.register(Arc::new(StopAfterFirst {
        inner: ShService::new(),
        stop_tx,
    }));
    let ports = OperationPorts {
        services,
        ..ports(out.path())
    };

    let links = JsonCleanupStore::new(out.path().join(CLEANUPS_FILE)).load().await.unwrap();
    let mut op = Operation::for_cleanup(links, host(), ports);
    op.resume_cleanup(&stop).await.unwrap();

    assert_eq!(fs::read_to_string(&trace).unwrap(), "4\n");
    let remainder = JsonCleanupStore::new(out.path().join(NOT_COMPLETED_CLEANUPS_FILE)).load().await.unwrap();
    let actual: Vec<_> = remainder.iter().map(|l| l.command.clone()).collect();
    let expected: Vec<_> = original[..3].iter().map(|l| l.command.clone()).collect();
    assert_eq!(actual, expected);
    assert_eq!(op.cleanup_links().len(), 3);
}

/// Missing snapshot is a load error, not an empty run
#[tokio::test]
async fn test_missing_snapshot_fails_load() {
    let out = tempfile::tempdir().unwrap();

    let result = JsonCleanupStore::new(out.path().join(CLEANUPS_FILE)).load().await;

    assert!(result.is_err());
}
