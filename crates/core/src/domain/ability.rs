// Ability Domain Model

use crate::domain::error::{DomainError, Result};
use crate::domain::executor::Executor;
use crate::domain::fact::FactStore;
use crate::domain::knowledge;
use crate::domain::link::{Link, LinkIssuer};
use crate::port::IdProvider;
use serde::{Deserialize, Serialize};

/// Tactic assigned when an ability record does not name one
pub const DEFAULT_TACTIC: &str = "null_tactic";

/// Ability record as read from a data file, before load-time normalization
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AbilityRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub tactic: Option<String>,
    #[serde(default)]
    pub technique_name: String,
    #[serde(default)]
    pub technique_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub executors: Vec<Executor>,
    #[serde(default)]
    pub privilege: String,
    #[serde(default)]
    pub delete_payload: bool,
}

/// A named technique with one executor per supported shell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ability {
    pub id: String,
    pub tactic: String,
    pub technique_name: String,
    pub technique_id: String,
    pub name: String,
    pub description: String,
    pub executors: Vec<Executor>,
    pub privilege: String,
    pub delete_payload: bool,
}

/// Links generated from one ability
#[derive(Debug, Clone, Default)]
pub struct LinkBatch {
    pub links: Vec<Link>,
    /// Cleanup links, reverse of the executor's authored cleanup order
    pub cleanup_links: Vec<Link>,
}

impl Ability {
    /// Minimal ability without executors
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        technique_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            tactic: DEFAULT_TACTIC.to_string(),
            technique_name: String::new(),
            technique_id: technique_id.into(),
            name: name.into(),
            description: String::new(),
            executors: Vec::new(),
            privilege: String::new(),
            delete_payload: false,
        }
    }

    pub fn with_executor(mut self, executor: Executor) -> Self {
        self.executors.push(executor);
        self
    }

    /// Normalize a loaded record
    ///
    /// A missing id is generated, the tactic is lower-cased (or defaulted)
    /// and a missing or empty name is rejected.
    pub fn from_record(record: AbilityRecord, id_provider: &dyn IdProvider) -> Result<Self> {
        let name = match record.name {
            Some(name) if !name.trim().is_empty() => name,
            _ => return Err(DomainError::MissingField("name")),
        };

        let id = match record.id {
            Some(id) if !id.is_empty() => id,
            _ => id_provider.generate_id(),
        };

        let tactic = record
            .tactic
            .map(|t| t.to_lowercase())
            .unwrap_or_else(|| DEFAULT_TACTIC.to_string());

        Ok(Self {
            id,
            tactic,
            technique_name: record.technique_name,
            technique_id: record.technique_id,
            name,
            description: record.description,
            executors: record.executors,
            privilege: record.privilege,
            delete_payload: record.delete_payload,
        })
    }

    /// True if any executor targets one of the given shells
    pub fn is_available(&self, shells: &[String]) -> bool {
        self.executors
            .iter()
            .any(|executor| shells.contains(&executor.name))
    }

    /// Executor for the first host shell (in preference order) this ability supports
    pub fn select_executor(&self, shells: &[String]) -> Option<&Executor> {
        shells
            .iter()
            .find_map(|shell| self.executors.iter().find(|e| &e.name == shell))
    }

    /// Expand the selected executor into concrete links
    ///
    /// Only one executor is used per call. Cleanup templates are walked in
    /// reverse authored order so that the operation's LIFO cleanup phase
    /// replays them in authored order.
    pub fn create_links(&self, shells: &[String], facts: &FactStore, issuer: &LinkIssuer) -> LinkBatch {
        let mut batch = LinkBatch::default();
        let Some(executor) = self.select_executor(shells) else {
            return batch;
        };

        for command in knowledge::replace_facts(&executor.command, facts) {
            batch.links.push(issuer.issue(self, executor, command, false));
        }

        for template in executor.cleanup.iter().rev() {
            for command in knowledge::replace_facts(template, facts) {
                batch.cleanup_links.push(issuer.issue(self, executor, command, true));
            }
        }

        batch
    }
}
