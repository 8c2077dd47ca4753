// Operation - drives one emulation run and its cleanup

use crate::application::services::ExecutingServices;
use crate::application::stop::StopToken;
use crate::domain::attire::{self, AttireLog, ExecutionCategory, ExecutionData};
use crate::domain::{Ability, Adversary, FactStore, HostProfile, Link, LinkIssuer, LinkStatus, OperationState};
use crate::error::Result;
use crate::port::{AttireStore, CleanupStore, IdProvider, RandomSource, TimeProvider};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Length of the execution id stamped into the attire log
pub const EXECUTION_ID_LEN: usize = 32;

/// Adapters an operation runs against
#[derive(Clone)]
pub struct OperationPorts {
    pub services: ExecutingServices,
    pub attire_store: Arc<dyn AttireStore>,
    pub cleanup_store: Arc<dyn CleanupStore>,
    pub id_provider: Arc<dyn IdProvider>,
    pub random: Arc<dyn RandomSource>,
    pub time_provider: Arc<dyn TimeProvider>,
}

/// Run options
#[derive(Debug, Clone)]
pub struct OperationSettings {
    /// Carried for reporting; execution is always sequential and unattended
    pub autonomous: bool,
    /// Run the cleanup phase right after the run instead of deferring it
    pub cleanup: bool,
    pub execution_command: String,
    pub execution_source: String,
    pub execution_category: ExecutionCategory,
}

impl Default for OperationSettings {
    fn default() -> Self {
        Self {
            autonomous: true,
            cleanup: true,
            execution_command: "adversim".to_string(),
            execution_source: "adversim".to_string(),
            execution_category: ExecutionCategory::default(),
        }
    }
}

/// One emulation run
pub struct Operation {
    operation_id: String,
    name: String,
    adversary: Adversary,
    abilities: HashMap<String, Ability>,
    facts: FactStore,
    host: HostProfile,
    settings: OperationSettings,
    links: Vec<Link>,
    cleanup_links: Vec<Link>,
    state: OperationState,
    attire_log: AttireLog,
    issuer: LinkIssuer,
    ports: OperationPorts,
}

impl Operation {
    /// Create an idle (`Finished`) operation for an adversary
    pub fn new(
        adversary: Adversary,
        abilities: Vec<Ability>,
        facts: FactStore,
        host: HostProfile,
        settings: OperationSettings,
        ports: OperationPorts,
    ) -> Self {
        let attire_log = Self::new_attire_log(&host, &settings, &ports);
        let issuer = LinkIssuer::new(ports.id_provider.clone(), ports.random.clone());
        let mut operation = Self {
            operation_id: ports.id_provider.generate_id(),
            name: adversary.name.clone(),
            adversary,
            abilities: HashMap::new(),
            facts,
            host,
            settings,
            links: Vec::new(),
            cleanup_links: Vec::new(),
            state: OperationState::Finished,
            attire_log,
            issuer,
            ports,
        };
        for ability in abilities {
            operation.add_ability(ability);
        }
        info!(
            operation_id = %operation.operation_id,
            name = %operation.name,
            abilities = operation.abilities.len(),
            facts = operation.facts.len(),
            executors = ?operation.ports.services.names(),
            "Operation created"
        );
        operation
    }

    /// Operation that only replays a persisted cleanup queue
    ///
    /// `links` is in queue order: the last element runs first.
    pub fn for_cleanup(links: Vec<Link>, host: HostProfile, ports: OperationPorts) -> Self {
        let adversary = Adversary::new("cleanup", "cleanup", "Standalone cleanup", Vec::new());
        let settings = OperationSettings {
            cleanup: false,
            ..OperationSettings::default()
        };
        let mut operation = Self::new(adversary, Vec::new(), FactStore::new(), host, settings, ports);
        operation.cleanup_links = links;
        operation
    }

    fn new_attire_log(host: &HostProfile, settings: &OperationSettings, ports: &OperationPorts) -> AttireLog {
        AttireLog::new(ExecutionData {
            execution_command: settings.execution_command.clone(),
            execution_id: ports.random.alphanumeric(EXECUTION_ID_LEN),
            execution_source: settings.execution_source.clone(),
            execution_category: settings.execution_category.clone(),
            target: host.hostname.clone(),
            ip: host.ip.clone(),
            path: host.path.clone(),
            user: host.user.clone(),
            time_generated: attire::format_timestamp(&ports.time_provider.now()),
        })
    }

    pub fn add_ability(&mut self, ability: Ability) {
        debug!(ability_id = %ability.id, name = %ability.name, "Added ability");
        self.abilities.insert(ability.id.clone(), ability);
    }

    pub fn remove_ability(&mut self, ability_id: &str) -> Option<Ability> {
        self.abilities.remove(ability_id)
    }

    pub fn operation_id(&self) -> &str {
        &self.operation_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> OperationState {
        self.state
    }

    pub fn is_autonomous(&self) -> bool {
        self.settings.autonomous
    }

    /// Executed (or discarded) non-cleanup links, plus cleanup links run standalone
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Accumulated cleanup queue
    pub fn cleanup_links(&self) -> &[Link] {
        &self.cleanup_links
    }

    pub fn attire_log(&self) -> &AttireLog {
        &self.attire_log
    }

    /// Execute the adversary's abilities in atomic order
    ///
    /// Link failures are recorded on the link and never abort the run; only
    /// persistence errors are returned. A stop request is honored between
    /// links: the rest of the current ability is discarded and no further
    /// ability starts, but the cleanup phase still runs.
    pub async fn run(&mut self, stop: &StopToken) -> Result<()> {
        self.state = OperationState::Running;
        info!(operation_id = %self.operation_id, name = %self.name, "Running operation");

        let ordering = self.adversary.atomic_ordering.clone();
        for ability_id in &ordering {
            if self.stop_requested(stop) {
                break;
            }

            let Some(ability) = self.abilities.get(ability_id) else {
                debug!(ability_id = %ability_id, "Ability not loaded, skipping");
                continue;
            };
            if !ability.is_available(&self.host.shells) {
                info!(ability_id = %ability_id, name = %ability.name, "No executor for host shells, skipping");
                continue;
            }

            let batch = ability.create_links(&self.host.shells, &self.facts, &self.issuer);
            debug!(
                name = %ability.name,
                links = batch.links.len(),
                cleanup_links = batch.cleanup_links.len(),
                "Created links"
            );

            let start = self.links.len();
            self.links.extend(batch.links);
            self.cleanup_links.extend(batch.cleanup_links);

            for index in start..self.links.len() {
                if self.stop_requested(stop) {
                    for link in &mut self.links[index..] {
                        link.discard();
                    }
                    warn!(discarded = self.links.len() - index, "Discarded remaining links");
                    break;
                }

                dispatch(&mut self.links[index], &self.ports.services, self.ports.time_provider.as_ref()).await;
                self.attire_log.record(&self.links[index]);
                self.ports.attire_store.save(&self.attire_log).await?;
                if !self.settings.cleanup {
                    self.ports.cleanup_store.save(&self.cleanup_links).await?;
                }
            }
        }

        if self.settings.cleanup {
            self.run_cleanup_phase().await?;
        } else {
            self.ports.cleanup_store.save(&self.cleanup_links).await?;
            info!(queued = self.cleanup_links.len(), "Cleanup deferred");
        }

        self.state = OperationState::Finished;
        info!(
            operation_id = %self.operation_id,
            executed = self.links.iter().filter(|l| l.status.is_executed()).count(),
            "Operation finished"
        );
        Ok(())
    }

    /// Run the accumulated cleanup queue, last queued first
    ///
    /// Not interrupted by stop requests.
    pub async fn run_cleanup_phase(&mut self) -> Result<()> {
        info!(queued = self.cleanup_links.len(), "Running cleanup phase");
        for index in (0..self.cleanup_links.len()).rev() {
            dispatch(
                &mut self.cleanup_links[index],
                &self.ports.services,
                self.ports.time_provider.as_ref(),
            )
            .await;
            self.attire_log.record(&self.cleanup_links[index]);
            self.ports.attire_store.save(&self.attire_log).await?;
        }
        Ok(())
    }

    /// Replay a persisted cleanup queue
    ///
    /// The queue is persisted up front, then each link is removed once
    /// executed and the remainder persisted again, so the remainder file
    /// always holds exactly the links this run has still to do.
    pub async fn resume_cleanup(&mut self, stop: &StopToken) -> Result<()> {
        self.state = OperationState::Running;
        info!(queued = self.cleanup_links.len(), "Running standalone cleanup");
        self.ports.cleanup_store.save(&self.cleanup_links).await?;

        while !self.cleanup_links.is_empty() {
            if self.stop_requested(stop) {
                warn!(remaining = self.cleanup_links.len(), "Cleanup stopped, remainder saved");
                break;
            }

            let Some(mut link) = self.cleanup_links.pop() else {
                break;
            };
            dispatch(&mut link, &self.ports.services, self.ports.time_provider.as_ref()).await;
            self.attire_log.record(&link);
            self.links.push(link);

            self.ports.attire_store.save(&self.attire_log).await?;
            self.ports.cleanup_store.save(&self.cleanup_links).await?;
        }

        self.state = OperationState::Finished;
        info!(remaining = self.cleanup_links.len(), "Standalone cleanup finished");
        Ok(())
    }

    fn stop_requested(&mut self, stop: &StopToken) -> bool {
        if !stop.is_stopped() {
            return false;
        }
        if self.state == OperationState::Running {
            warn!(operation_id = %self.operation_id, "Stop requested");
            self.state = OperationState::WaitingToStop;
        }
        true
    }
}

/// Execute a link against the service registered for its executor
async fn dispatch(link: &mut Link, services: &ExecutingServices, clock: &dyn TimeProvider) {
    match services.resolve(&link.executor.name) {
        Ok(service) => link.execute(service.as_ref(), clock).await,
        Err(e) => link.reject(&e, clock),
    }
    if link.status != LinkStatus::Success {
        error!(
            link_id = %link.link_id,
            command = %link.command,
            status = %link.status,
            stderr = %link.stderr,
            "Link failed"
        );
    }
}
