// Attire Log - structured execution record (procedures -> steps -> output)

use crate::domain::link::Link;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const ATTIRE_VERSION: &str = "1.1";

/// UTC, millisecond precision, trailing Z
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

pub fn format_timestamp(time: &DateTime<Utc>) -> String {
    time.format(TIMESTAMP_FORMAT).to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AttireLog {
    pub attire_version: String,
    pub execution_data: ExecutionData,
    pub procedures: Vec<Procedure>,
}

/// Run-level metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ExecutionData {
    pub execution_command: String,
    pub execution_id: String,
    pub execution_source: String,
    pub execution_category: ExecutionCategory,
    pub target: String,
    pub ip: String,
    pub path: String,
    pub user: String,
    pub time_generated: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionCategory {
    pub name: String,
    pub abbreviation: String,
}

impl Default for ExecutionCategory {
    fn default() -> Self {
        Self {
            name: "Purple Team Exercise".to_string(),
            abbreviation: "PTE".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Procedure {
    pub procedure_name: String,
    pub procedure_description: String,
    pub procedure_id: ProcedureId,
    pub mitre_technique_id: String,
    pub order: usize,
    pub steps: Vec<Step>,
    #[serde(rename = "cleanupCommands")]
    pub cleanup_commands: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcedureId {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Step {
    pub command: String,
    pub executor: String,
    pub order: usize,
    pub output: Vec<OutputBlock>,
    pub time_start: String,
    pub time_stop: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputBlock {
    #[serde(rename = "type")]
    pub kind: String,
    pub content: String,
    pub level: OutputLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OutputLevel {
    Stdout,
    Stderr,
}

impl OutputBlock {
    pub fn console(content: impl Into<String>, level: OutputLevel) -> Self {
        Self {
            kind: "console".to_string(),
            content: content.into(),
            level,
        }
    }
}

impl Step {
    fn from_link(link: &Link, order: usize) -> Self {
        let mut output = vec![OutputBlock::console(&link.stdout, OutputLevel::Stdout)];
        if !link.stderr.is_empty() {
            output.push(OutputBlock::console(&link.stderr, OutputLevel::Stderr));
        }

        Self {
            command: link.command.clone(),
            executor: link.executor.name.clone(),
            order,
            output,
            time_start: link.decided_time.as_ref().map(format_timestamp).unwrap_or_default(),
            time_stop: link.finished_time.as_ref().map(format_timestamp).unwrap_or_default(),
        }
    }
}

impl Procedure {
    fn from_link(link: &Link, order: usize) -> Self {
        Self {
            procedure_name: link.procedure_name.clone(),
            procedure_description: link.procedure_name.clone(),
            procedure_id: ProcedureId {
                kind: "guid".to_string(),
                id: link.procedure_id.clone(),
            },
            mitre_technique_id: link.mitre_technique_id.clone(),
            order,
            steps: Vec::new(),
            cleanup_commands: Vec::new(),
        }
    }

    fn add(&mut self, link: &Link) {
        if link.is_cleanup {
            let order = self.cleanup_commands.len() + 1;
            self.cleanup_commands.push(Step::from_link(link, order));
        } else {
            let order = self.steps.len() + 1;
            self.steps.push(Step::from_link(link, order));
        }
    }
}

impl AttireLog {
    pub fn new(execution_data: ExecutionData) -> Self {
        Self {
            attire_version: ATTIRE_VERSION.to_string(),
            execution_data,
            procedures: Vec::new(),
        }
    }

    /// Append an executed link under its procedure
    ///
    /// Procedures are created on first sight of a procedure name and looked
    /// up by a linear scan afterwards.
    pub fn record(&mut self, link: &Link) {
        let index = match self
            .procedures
            .iter()
            .position(|p| p.procedure_name == link.procedure_name)
        {
            Some(index) => index,
            None => {
                let order = self.procedures.len() + 1;
                self.procedures.push(Procedure::from_link(link, order));
                self.procedures.len() - 1
            }
        };
        self.procedures[index].add(link);
    }

    pub fn procedure(&self, name: &str) -> Option<&Procedure> {
        self.procedures.iter().find(|p| p.procedure_name == name)
    }
}
