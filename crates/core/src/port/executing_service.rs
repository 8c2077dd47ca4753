// Executing Service Port
// Abstraction over the host shells a link command is dispatched to

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Execution errors
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("{shell} is only supported on {required} systems (host: {host})")]
    UnsupportedOs {
        shell: String,
        required: String,
        host: String,
    },

    #[error("No executing service registered for executor '{0}'")]
    UnsupportedExecutor(String),

    #[error("Spawn failed: {0}")]
    SpawnFailed(String),

    #[error("command timed out after {}", timeout_text(.0))]
    Timeout(Duration),

    #[error("{shell} exited with status {status}")]
    Failed {
        shell: String,
        status: i32,
        output: String,
    },

    #[error("IO error: {0}")]
    Io(String),
}

fn timeout_text(timeout: &Duration) -> String {
    crate::domain::duration::format(*timeout)
}

impl ExecutionError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, ExecutionError::Timeout(_))
    }

    /// Output captured before the failure, if any
    pub fn partial_output(&self) -> Option<&str> {
        match self {
            ExecutionError::Failed { output, .. } => Some(output),
            _ => None,
        }
    }
}

/// Shell families with a built-in executing service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShellKind {
    Sh,
    Cmd,
    PowerShell,
}

impl ShellKind {
    pub const ALL: [ShellKind; 3] = [ShellKind::Sh, ShellKind::Cmd, ShellKind::PowerShell];

    /// Executor name used in ability definitions
    pub fn short_name(&self) -> &'static str {
        match self {
            ShellKind::Sh => "sh",
            ShellKind::Cmd => "cmd",
            ShellKind::PowerShell => "psh",
        }
    }

    pub fn from_short_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.short_name() == name)
    }

    /// Whether the shell runs on the given host OS
    pub fn supports_os(&self, os: &str) -> bool {
        let windows = os == crate::domain::host::WINDOWS;
        match self {
            ShellKind::Sh => !windows,
            ShellKind::Cmd | ShellKind::PowerShell => windows,
        }
    }
}

impl std::fmt::Display for ShellKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.short_name())
    }
}

/// Executing Service trait
///
/// Implementations:
/// - ShService: `sh -c` on Unix-like hosts
/// - CmdService: `cmd.exe /C` on Windows
/// - PowerShellService: `powershell -Command` on Windows
#[async_trait]
pub trait ExecutingService: Send + Sync {
    /// Run a command and return its combined output
    ///
    /// # Errors
    /// - ExecutionError::UnsupportedOs if the host OS cannot run this shell
    /// - ExecutionError::Timeout if the command exceeds `timeout`
    /// - ExecutionError::Failed on a non-zero exit (output preserved)
    async fn execute(&self, command: &str, timeout: Duration) -> Result<String, ExecutionError>;

    /// Executor name this service answers to ("sh", "cmd", "psh")
    fn short_name(&self) -> &str;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Mock service behavior
    #[derive(Debug, Clone)]
    pub enum MockBehavior {
        /// Always succeed with the given output
        Succeed(String),
        /// Succeed, echoing the command back as output
        Echo,
        /// Always exit non-zero with the given output
        Fail { output: String },
        /// Always time out
        Timeout,
    }

    /// Mock Executing Service for testing; records every dispatched command
    pub struct MockExecutingService {
        name: String,
        behavior: MockBehavior,
        commands: Arc<Mutex<Vec<String>>>,
    }

    impl MockExecutingService {
        pub fn new(behavior: MockBehavior) -> Self {
            Self::named("sh", behavior)
        }

        pub fn named(name: impl Into<String>, behavior: MockBehavior) -> Self {
            Self {
                name: name.into(),
                behavior,
                commands: Arc::new(Mutex::new(Vec::new())),
            }
        }

        pub fn echo(name: impl Into<String>) -> Self {
            Self::named(name, MockBehavior::Echo)
        }

        pub fn commands(&self) -> Vec<String> {
            self.commands.lock().unwrap().clone()
        }

        pub fn call_count(&self) -> usize {
            self.commands.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ExecutingService for MockExecutingService {
        async fn execute(
            &self,
            command: &str,
            timeout: Duration,
        ) -> Result<String, ExecutionError> {
            self.commands.lock().unwrap().push(command.to_string());

            let behavior = self.behavior.clone();
            match behavior {
                MockBehavior::Echo => Ok(command.to_string()),
                MockBehavior::Succeed(output) => Ok(output),
                MockBehavior::Fail { output } => Err(ExecutionError::Failed {
                    shell: self.name.clone(),
                    status: 1,
                    output,
                }),
                MockBehavior::Timeout => Err(ExecutionError::Timeout(timeout)),
            }
        }

        fn short_name(&self) -> &str {
            &self.name
        }
    }
}
