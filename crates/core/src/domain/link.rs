// Link Domain Model - one concrete, fact-resolved command and its result

use crate::domain::ability::Ability;
use crate::domain::duration::{self, notation};
use crate::domain::executor::Executor;
use crate::port::{ExecutingService, ExecutionError, IdProvider, RandomSource, TimeProvider};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Jitter is drawn uniformly from `0..MAX_JITTER_SECS` whole seconds
pub const MAX_JITTER_SECS: u64 = 5;

/// Link status
///
/// `Execute` is the initial state; `Success`, `Error` and `Timeout` are the
/// outcomes of running the link. `Discard` marks a link abandoned by a stop
/// request before it was dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LinkStatus {
    Execute,
    Discard,
    Success,
    Error,
    Timeout,
}

impl LinkStatus {
    /// True once the link has been run
    pub fn is_executed(&self) -> bool {
        matches!(
            self,
            LinkStatus::Success | LinkStatus::Error | LinkStatus::Timeout
        )
    }
}

impl std::fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LinkStatus::Execute => write!(f, "EXECUTE"),
            LinkStatus::Discard => write!(f, "DISCARD"),
            LinkStatus::Success => write!(f, "SUCCESS"),
            LinkStatus::Error => write!(f, "ERROR"),
            LinkStatus::Timeout => write!(f, "TIMEOUT"),
        }
    }
}

/// Link Entity
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub link_id: String,
    pub procedure_name: String,
    pub procedure_id: String,
    pub mitre_technique_id: String,
    pub command: String,
    pub executor: Executor,
    pub status: LinkStatus,
    pub jitter: Duration,
    pub timeout: Duration,
    pub decided_time: Option<DateTime<Utc>>,
    pub finished_time: Option<DateTime<Utc>>,
    pub stdout: String,
    pub stderr: String,
    pub is_cleanup: bool,
}

impl Link {
    /// Create a link in the `Execute` state
    ///
    /// The id and jitter are injected; production code goes through
    /// [`LinkIssuer`].
    pub fn new(
        link_id: impl Into<String>,
        ability: &Ability,
        executor: &Executor,
        command: impl Into<String>,
        jitter: Duration,
        is_cleanup: bool,
    ) -> Self {
        Self {
            link_id: link_id.into(),
            procedure_name: ability.name.clone(),
            procedure_id: ability.id.clone(),
            mitre_technique_id: ability.technique_id.clone(),
            command: command.into(),
            executor: executor.clone(),
            status: LinkStatus::Execute,
            jitter,
            timeout: executor.timeout_duration(),
            decided_time: None,
            finished_time: None,
            stdout: String::new(),
            stderr: String::new(),
            is_cleanup,
        }
    }

    /// Run the command through an executing service
    ///
    /// Sleeps for the jitter first (not interruptible), then records the
    /// decision and finish times around the subprocess call. Running a link
    /// twice overwrites the previous outcome.
    pub async fn execute(&mut self, service: &dyn ExecutingService, clock: &dyn TimeProvider) {
        info!(
            link_id = %self.link_id,
            jitter = %duration::format(self.jitter),
            "Waiting before dispatch"
        );
        tokio::time::sleep(self.jitter).await;

        self.decided_time = Some(clock.now());
        let result = service.execute(&self.command, self.timeout).await;
        self.finished_time = Some(clock.now());
        self.apply(result);

        info!(
            link_id = %self.link_id,
            status = %self.status,
            elapsed = %self.duration().map(duration::format).unwrap_or_default(),
            "Command finished"
        );
    }

    /// Fail the link without dispatching it (e.g. no service for its shell)
    pub fn reject(&mut self, error: &ExecutionError, clock: &dyn TimeProvider) {
        let now = clock.now();
        warn!(link_id = %self.link_id, error = %error, "Link rejected before dispatch");
        self.decided_time = Some(now);
        self.finished_time = Some(now);
        self.stdout.clear();
        self.stderr = error.to_string();
        self.status = LinkStatus::Error;
    }

    /// Abandon the link without running it
    pub fn discard(&mut self) {
        self.status = LinkStatus::Discard;
    }

    fn apply(&mut self, result: Result<String, ExecutionError>) {
        match result {
            Ok(output) => {
                self.stdout = output;
                self.stderr.clear();
                self.status = LinkStatus::Success;
            }
            Err(error) => {
                self.stdout = error.partial_output().unwrap_or_default().to_string();
                self.stderr = error.to_string();
                self.status = if error.is_timeout() {
                    LinkStatus::Timeout
                } else {
                    LinkStatus::Error
                };
            }
        }
    }

    /// Time between decision and finish, once both are recorded
    pub fn duration(&self) -> Option<Duration> {
        let decided = self.decided_time?;
        let finished = self.finished_time?;
        (finished - decided).to_std().ok()
    }
}

/// Mints links with fresh ids and secure jitter
#[derive(Clone)]
pub struct LinkIssuer {
    id_provider: Arc<dyn IdProvider>,
    random: Arc<dyn RandomSource>,
}

impl LinkIssuer {
    pub fn new(id_provider: Arc<dyn IdProvider>, random: Arc<dyn RandomSource>) -> Self {
        Self {
            id_provider,
            random,
        }
    }

    pub fn issue(
        &self,
        ability: &Ability,
        executor: &Executor,
        command: impl Into<String>,
        is_cleanup: bool,
    ) -> Link {
        let jitter = Duration::from_secs(self.random.below(MAX_JITTER_SECS));
        Link::new(
            self.id_provider.generate_id(),
            ability,
            executor,
            command,
            jitter,
            is_cleanup,
        )
    }
}

/// Persisted form of a queued link (cleanup snapshot entry)
///
/// Only identity, command and scheduling fields survive; results do not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LinkRecord {
    pub procedure_name: String,
    pub procedure_id: String,
    pub mitre_technique_id: String,
    pub link_id: String,
    pub command: String,
    #[serde(with = "notation")]
    pub jitter: Duration,
    pub executor: Executor,
    #[serde(with = "notation")]
    pub timeout: Duration,
    pub is_cleanup: bool,
}

impl From<&Link> for LinkRecord {
    fn from(link: &Link) -> Self {
        Self {
            procedure_name: link.procedure_name.clone(),
            procedure_id: link.procedure_id.clone(),
            mitre_technique_id: link.mitre_technique_id.clone(),
            link_id: link.link_id.clone(),
            command: link.command.clone(),
            jitter: link.jitter,
            executor: link.executor.clone(),
            timeout: link.timeout,
            is_cleanup: link.is_cleanup,
        }
    }
}

impl From<LinkRecord> for Link {
    fn from(record: LinkRecord) -> Self {
        Self {
            link_id: record.link_id,
            procedure_name: record.procedure_name,
            procedure_id: record.procedure_id,
            mitre_technique_id: record.mitre_technique_id,
            command: record.command,
            executor: record.executor,
            status: LinkStatus::Execute,
            jitter: record.jitter,
            timeout: record.timeout,
            decided_time: None,
            finished_time: None,
            stdout: String::new(),
            stderr: String::new(),
            is_cleanup: record.is_cleanup,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::executing_service::mocks::{MockBehavior, MockExecutingService};
    use crate::port::time_provider::mocks::SteppingClock;

    fn sample_link(command: &str) -> Link {
        let ability = Ability::new("abil-1", "Whoami", "T1033");
        let executor = Executor::new("sh", command).with_timeout(1);
        Link::new("link-1", &ability, &executor, command, Duration::ZERO, false)
    }

    #[tokio::test]
    async fn test_success_captures_stdout() {
        let service = MockExecutingService::new(MockBehavior::Succeed("root\n".to_string()));
        let clock = SteppingClock::new(1_000);
        let mut link = sample_link("whoami");

        link.execute(&service, &clock).await;

        assert_eq!(link.status, LinkStatus::Success);
        assert_eq!(link.stdout, "root\n");
        assert!(link.stderr.is_empty());
        assert_eq!(link.duration(), Some(Duration::from_millis(1_000)));
        assert_eq!(service.commands(), vec!["whoami"]);
    }

    #[tokio::test]
    async fn test_timeout_leaves_stdout_empty() {
        let service = MockExecutingService::new(MockBehavior::Timeout);
        let clock = SteppingClock::new(1);
        let mut link = sample_link("sleep 5");

        link.execute(&service, &clock).await;

        assert_eq!(link.status, LinkStatus::Timeout);
        assert!(link.stdout.is_empty());
        assert!(link.stderr.contains("timed out"));
    }

    #[tokio::test]
    async fn test_failure_keeps_partial_output() {
        let service = MockExecutingService::new(MockBehavior::Fail {
            output: "partial".to_string(),
        });
        let clock = SteppingClock::new(1);
        let mut link = sample_link("false");

        link.execute(&service, &clock).await;

        assert_eq!(link.status, LinkStatus::Error);
        assert_eq!(link.stdout, "partial");
        assert!(!link.stderr.is_empty());
        assert!(link.status.is_executed());
    }

    #[test]
    fn test_reject_marks_error() {
        let clock = SteppingClock::new(1);
        let mut link = sample_link("whoami");

        link.reject(&ExecutionError::UnsupportedExecutor("zsh".to_string()), &clock);

        assert_eq!(link.status, LinkStatus::Error);
        assert!(link.stderr.contains("zsh"));
        assert_eq!(link.duration(), Some(Duration::ZERO));
    }

    #[test]
    fn test_record_uses_kebab_case_and_duration_strings() {
        let mut link = sample_link("whoami");
        link.jitter = Duration::from_secs(3);

        let json = serde_json::to_value(LinkRecord::from(&link)).unwrap();

        assert_eq!(json["link-id"], "link-1");
        assert_eq!(json["procedure-name"], "Whoami");
        assert_eq!(json["mitre-technique-id"], "T1033");
        assert_eq!(json["jitter"], "3s");
        assert_eq!(json["timeout"], "1s");
        assert_eq!(json["is-cleanup"], false);

        let restored: Link = serde_json::from_value::<LinkRecord>(json).unwrap().into();
        assert_eq!(restored.status, LinkStatus::Execute);
        assert_eq!(restored.jitter, Duration::from_secs(3));
        assert_eq!(restored.command, "whoami");
    }
}
