// Entry points: wire adapters into an operation and run it

use crate::banner;
use crate::cli::{CleanupArgs, CommonArgs, RunArgs};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use adversim_core::application::{ExecutingServices, Operation, OperationPorts, OperationSettings, StopToken};
use adversim_core::domain::{HostProfile, Source};
use adversim_core::port::{CleanupStore, IdProvider, RandomSource, SystemTimeProvider, UuidProvider};
use adversim_infra_fs::{
    load_abilities, load_adversary, load_source, JsonAttireStore, JsonCleanupStore, CLEANUPS_FILE,
    CLEANUP_LOG_FILE, LOG_FILE, NOT_COMPLETED_CLEANUPS_FILE,
};
use adversim_infra_system::{service_for, HostProbe, OsRandom};

fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}

/// OS randomness without link jitter
struct NoJitter(OsRandom);

impl RandomSource for NoJitter {
    fn below(&self, _upper: u64) -> u64 {
        0
    }

    fn alphanumeric(&self, len: usize) -> String {
        self.0.alphanumeric(len)
    }
}

fn random_source(common: &CommonArgs) -> Arc<dyn RandomSource> {
    if common.no_jitter {
        Arc::new(NoJitter(OsRandom))
    } else {
        Arc::new(OsRandom)
    }
}

fn ports(
    host: &HostProfile,
    common: &CommonArgs,
    id_provider: Arc<dyn IdProvider>,
    attire_path: PathBuf,
    cleanup_path: PathBuf,
) -> OperationPorts {
    OperationPorts {
        services: ExecutingServices::for_host(host, service_for),
        attire_store: Arc::new(JsonAttireStore::new(attire_path)),
        cleanup_store: Arc::new(JsonCleanupStore::new(cleanup_path)),
        id_provider,
        random: random_source(common),
        time_provider: Arc::new(SystemTimeProvider),
    }
}

fn load_facts(args: &RunArgs, data_dir: &Path) -> Result<Source> {
    match &args.source {
        Some(path) => {
            let path = expand(path);
            load_source(&path).with_context(|| format!("Failed to load fact source {}", path.display()))
        }
        None => {
            let default = data_dir.join("source.yml");
            if default.is_file() {
                load_source(&default).context("Failed to load default fact source")
            } else {
                info!("No fact source, running without facts");
                Ok(Source::default())
            }
        }
    }
}

/// Normal run: load data, execute the adversary, clean up or save the queue
pub async fn run(args: RunArgs, stop: StopToken) -> Result<()> {
    let data_dir = expand(&args.data_dir);
    let abilities_dir = args
        .abilities
        .as_deref()
        .map(expand)
        .unwrap_or_else(|| data_dir.join("abilities"));
    let adversary_path = args
        .adversary
        .as_deref()
        .map(expand)
        .unwrap_or_else(|| data_dir.join("adversary.yml"));
    let output_dir = expand(&args.common.output_dir);

    let id_provider: Arc<dyn IdProvider> = Arc::new(UuidProvider);
    let abilities = load_abilities(&abilities_dir, id_provider.as_ref()).context("Failed to load abilities")?;
    let adversary = load_adversary(&adversary_path)
        .with_context(|| format!("Failed to load adversary {}", adversary_path.display()))?;
    let facts = load_facts(&args, &data_dir)?.into_store();

    let host = HostProbe::new().detect(args.common.ip.clone());
    banner::host(&host);

    let log_path = output_dir.join(LOG_FILE);
    let cleanups_path = output_dir.join(CLEANUPS_FILE);
    let ports = ports(&host, &args.common, id_provider, log_path.clone(), cleanups_path.clone());
    let settings = OperationSettings {
        autonomous: !args.non_auto,
        cleanup: !args.non_cleanup,
        ..OperationSettings::default()
    };

    let mut operation = Operation::new(adversary, abilities, facts, host, settings, ports);
    operation.run(&stop).await.context("Operation aborted")?;

    banner::summary(&operation, &log_path);
    if args.non_cleanup {
        banner::pending_cleanup(operation.cleanup_links().len(), &cleanups_path, "adversim cleanup");
    }
    Ok(())
}

/// Standalone cleanup: replay a saved queue, last link first
pub async fn cleanup(args: CleanupArgs, stop: StopToken) -> Result<()> {
    let output_dir = expand(&args.common.output_dir);
    let input = if args.resume {
        NOT_COMPLETED_CLEANUPS_FILE
    } else {
        CLEANUPS_FILE
    };
    let links = JsonCleanupStore::new(output_dir.join(input))
        .load()
        .await
        .context("Failed to load cleanup links")?;

    let host = HostProbe::new().detect(args.common.ip.clone());
    banner::host(&host);

    let log_path = output_dir.join(CLEANUP_LOG_FILE);
    let remainder_path = output_dir.join(NOT_COMPLETED_CLEANUPS_FILE);
    let ports = ports(&host, &args.common, Arc::new(UuidProvider), log_path.clone(), remainder_path.clone());

    let mut operation = Operation::for_cleanup(links, host, ports);
    operation.resume_cleanup(&stop).await.context("Cleanup aborted")?;

    banner::summary(&operation, &log_path);
    banner::pending_cleanup(
        operation.cleanup_links().len(),
        &remainder_path,
        "adversim cleanup --resume",
    );
    Ok(())
}
