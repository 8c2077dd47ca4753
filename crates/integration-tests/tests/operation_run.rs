//! End-to-end runs: YAML data -> operation -> real `sh` -> JSON files
#![cfg(unix)]

use std::fs;
use std::path::Path;
use std::sync::Arc;

use adversim_core::application::{ExecutingServices, Operation, OperationPorts, OperationSettings, StopToken};
use adversim_core::domain::{HostProfile, LinkStatus};
use adversim_core::port::id_provider::mocks::SequentialIdProvider;
use adversim_core::port::random_source::mocks::ZeroRandom;
use adversim_core::port::{ShellKind, SystemTimeProvider};
use adversim_infra_fs::{load_abilities, load_adversary, load_source, JsonAttireStore, JsonCleanupStore, CLEANUPS_FILE, LOG_FILE};
use adversim_infra_system::service_for;

fn write_data(dir: &Path, marker: &Path) {
    let abilities = dir.join("abilities");
    fs::create_dir_all(&abilities).unwrap();
    fs::write(
        abilities.join("discovery.yml"),
        format!(
            r#"
- id: stage
  name: Stage marker
  tactic: Collection
  technique_id: T1074
  executors:
    - name: sh
      command: "echo #{{host.ip}} > {marker}"
      cleanup:
        - "rm -f {marker}"
- id: users
  name: Identify users
  technique_id: T1033
  executors:
    - name: sh
      command: "echo #{{host.user}}"
- id: slow
  name: Slow command
  technique_id: T1497
  executors:
    - name: sh
      command: "sleep 5"
      timeout: 1
- id: broken
  name: Broken command
  technique_id: T1059
  executors:
    - name: sh
      command: "echo half; exit 2"
"#,
            marker = marker.display()
        ),
    )
    .unwrap();
    fs::write(
        dir.join("adversary.yml"),
        "adversary_id: adv\nname: E2E\ndescription: end to end\natomic_ordering: [stage, users, slow, broken, unknown]\n",
    )
    .unwrap();
    fs::write(
        dir.join("source.yml"),
        "facts:\n  - trait: host.ip\n    value: 10.0.0.5\n  - trait: host.user\n    value: alice\n  - trait: host.user\n    value: bob\n",
    )
    .unwrap();
}

fn host() -> HostProfile {
    HostProfile::new(std::env::consts::OS, vec!["sh".to_string()], "127.0.0.1")
}

fn ports(out: &Path) -> OperationPorts {
    OperationPorts {
        services: ExecutingServices::for_host(&host(), service_for),
        attire_store: Arc::new(JsonAttireStore::new(out.join(LOG_FILE))),
        cleanup_store: Arc::new(JsonCleanupStore::new(out.join(CLEANUPS_FILE))),
        id_provider: Arc::new(SequentialIdProvider::new("link")),
        random: Arc::new(ZeroRandom),
        time_provider: Arc::new(SystemTimeProvider),
    }
}

fn operation(data: &Path, out: &Path, cleanup: bool) -> Operation {
    let ids = SequentialIdProvider::new("ability");
    let abilities = load_abilities(&data.join("abilities"), &ids).unwrap();
    let adversary = load_adversary(&data.join("adversary.yml")).unwrap();
    let facts = load_source(&data.join("source.yml")).unwrap().into_store();
    let settings = OperationSettings {
        cleanup,
        ..OperationSettings::default()
    };
    Operation::new(adversary, abilities, facts, host(), settings, ports(out))
}

/// Full run with inline cleanup: statuses, fact substitution, attire file
#[tokio::test]
async fn test_full_run_with_inline_cleanup() {
    let data = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let marker = data.path().join("marker.txt");
    write_data(data.path(), &marker);

    assert_eq!(ExecutingServices::for_host(&host(), service_for).names(), vec![ShellKind::Sh.short_name()]);

    let mut op = operation(data.path(), out.path(), true);
    op.run(&StopToken::never()).await.unwrap();

    let by_command = |cmd: &str| op.links().iter().find(|l| l.command.starts_with(cmd)).unwrap();
    assert_eq!(by_command("echo 10.0.0.5").status, LinkStatus::Success);
    assert_eq!(by_command("echo alice").stdout, "alice\n");
    assert_eq!(by_command("echo bob").stdout, "bob\n");

    let slow = by_command("sleep 5");
    assert_eq!(slow.status, LinkStatus::Timeout);
    assert!(slow.stdout.is_empty());
    assert!(!slow.stderr.is_empty());

    let broken = by_command("echo half");
    assert_eq!(broken.status, LinkStatus::Error);
    assert_eq!(broken.stdout, "half\n");

    assert!(!marker.exists(), "inline cleanup removes the marker");
    assert!(!out.path().join(CLEANUPS_FILE).exists());

    let log: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.path().join(LOG_FILE)).unwrap()).unwrap();
    assert_eq!(log["attire-version"], "1.1");
    let procedures = log["procedures"].as_array().unwrap();
    assert_eq!(procedures.len(), 4);
    assert_eq!(procedures[0]["procedure-name"], "Stage marker");
    assert_eq!(procedures[0]["cleanupCommands"].as_array().unwrap().len(), 1);
    assert_eq!(procedures[1]["steps"].as_array().unwrap().len(), 2);
}

/// Deferred cleanup leaves the marker and a cleanup snapshot behind
#[tokio::test]
async fn test_deferred_cleanup_writes_snapshot() {
    let data = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let marker = data.path().join("marker.txt");
    write_data(data.path(), &marker);

    let mut op = operation(data.path(), out.path(), false);
    op.run(&StopToken::never()).await.unwrap();

    assert_eq!(fs::read_to_string(&marker).unwrap(), "10.0.0.5\n");

    let snapshot: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.path().join(CLEANUPS_FILE)).unwrap()).unwrap();
    let entries = snapshot.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["command"], format!("rm -f {}", marker.display()));
    assert_eq!(entries[0]["is-cleanup"], true);
    assert_eq!(entries[0]["timeout"], "1m0s");
}
